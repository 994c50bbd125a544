//! Finding `steamvr.vrsettings`
//!
//! Lookup order: the Steam install directory (registry on Windows, the usual
//! install locations elsewhere), then the file the user picked last time,
//! then a file chooser.

use std::path::{Path, PathBuf};

use crate::config::{EditorPreferences, SETTINGS_RELATIVE_PATH};

/// Source of a user-chosen settings file
pub trait FilePicker {
    fn pick_settings_file(&self) -> Option<PathBuf>;

    /// Tell the user the file must be picked by hand
    fn notify_not_found(&self) {}
}

/// Native file chooser
pub struct RfdPicker;

impl FilePicker for RfdPicker {
    fn pick_settings_file(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select steamvr.vrsettings")
            .add_filter("VR Settings", &["vrsettings"])
            .add_filter("All Files", &["*"])
            .pick_file()
    }

    fn notify_not_found(&self) {
        crate::ui::show_info(
            "File Not Found",
            "Could not automatically find steamvr.vrsettings. Please locate it manually.",
        );
    }
}

/// How the settings file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatedBy {
    SteamInstall,
    Remembered,
    Picked,
}

/// Settings file lookup
#[derive(Debug, Clone, Default)]
pub struct SettingsLocator {
    install_dirs: Vec<PathBuf>,
    remembered: Option<PathBuf>,
}

impl SettingsLocator {
    pub fn new(install_dirs: Vec<PathBuf>, remembered: Option<PathBuf>) -> Self {
        Self {
            install_dirs,
            remembered,
        }
    }

    /// Locator for this machine's Steam install and the saved preferences
    pub fn from_system(prefs: &EditorPreferences) -> Self {
        Self::new(steam_install_dirs(), prefs.get_last_settings_file())
    }

    /// Settings path inside a Steam install directory
    pub fn settings_path_in(install_dir: &Path) -> PathBuf {
        SETTINGS_RELATIVE_PATH
            .iter()
            .fold(install_dir.to_path_buf(), |path, part| path.join(part))
    }

    /// First existing settings file without asking the user
    pub fn find_existing(&self) -> Option<(PathBuf, LocatedBy)> {
        let from_steam = self
            .install_dirs
            .iter()
            .map(|dir| Self::settings_path_in(dir))
            .find(|path| path.is_file());
        if let Some(path) = from_steam {
            return Some((path, LocatedBy::SteamInstall));
        }

        self.remembered
            .as_ref()
            .filter(|path| path.is_file())
            .map(|path| (path.clone(), LocatedBy::Remembered))
    }

    /// Find the settings file, asking `picker` as a last resort
    pub fn locate(&self, picker: &dyn FilePicker) -> Option<(PathBuf, LocatedBy)> {
        if let Some(found) = self.find_existing() {
            log::info!("Found settings file {:?} ({:?})", found.0, found.1);
            return Some(found);
        }

        log::warn!("steamvr.vrsettings not found automatically, asking the user");
        picker.notify_not_found();
        picker
            .pick_settings_file()
            .map(|path| (path, LocatedBy::Picked))
    }
}

#[cfg(target_os = "windows")]
fn steam_install_dirs() -> Vec<PathBuf> {
    registry::steam_install_path().into_iter().collect()
}

#[cfg(not(target_os = "windows"))]
fn steam_install_dirs() -> Vec<PathBuf> {
    let mut install_dirs = Vec::new();
    if let Some(data_dir) = dirs::data_dir() {
        install_dirs.push(data_dir.join("Steam"));
    }
    if let Some(home) = dirs::home_dir() {
        install_dirs.push(home.join(".steam").join("steam"));
    }
    install_dirs
}

#[cfg(target_os = "windows")]
mod registry {
    use std::path::PathBuf;
    use windows::core::w;
    use windows::Win32::Foundation::ERROR_SUCCESS;
    use windows::Win32::System::Registry::{RegGetValueW, HKEY_LOCAL_MACHINE, RRF_RT_REG_SZ};

    /// `InstallPath` from the 32-bit Steam registry key
    pub fn steam_install_path() -> Option<PathBuf> {
        let mut buffer = [0u16; 1024];
        let mut size = (buffer.len() * std::mem::size_of::<u16>()) as u32;

        // SAFETY: buffer and size describe a writable region owned by this frame.
        let status = unsafe {
            RegGetValueW(
                HKEY_LOCAL_MACHINE,
                w!("SOFTWARE\\Wow6432Node\\Valve\\Steam"),
                w!("InstallPath"),
                RRF_RT_REG_SZ,
                None,
                Some(buffer.as_mut_ptr().cast()),
                Some(&mut size as *mut u32),
            )
        };

        if status != ERROR_SUCCESS {
            log::warn!("Steam install path not found in registry: {:?}", status);
            return None;
        }

        let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
        Some(PathBuf::from(String::from_utf16_lossy(&buffer[..len])))
    }
}
