//! Windows Registry preferences.
//!
//! Persists the setup-complete flag and the optional window/notification
//! flags under `HKCU\Software\MicMute`, plus the Run-key autostart entry.
//! Plain DWORD values, last write wins.

use thiserror::Error;
use windows::core::PCWSTR;
use windows::Win32::System::Registry::{
    RegCloseKey, RegCreateKeyExW, RegDeleteValueW, RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
    HKEY, HKEY_CURRENT_USER, KEY_READ, KEY_WRITE, REG_CREATE_KEY_DISPOSITION, REG_DWORD,
    REG_OPTION_NON_VOLATILE, REG_SZ,
};

/// User preferences.
#[derive(Debug, Clone)]
pub struct UserPreferences {
    /// Initial setup has been completed (the one durable flag the app needs)
    pub setup_complete: bool,

    /// Start minimized to the tray instead of showing the settings window
    pub start_minimized: bool,

    /// Show state-change notifications
    pub show_notifications: bool,

    /// Start application when Windows starts
    pub start_with_windows: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            setup_complete: false,
            start_minimized: true,
            show_notifications: true,
            start_with_windows: false,
        }
    }
}

/// Preferences store error types.
#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Failed to access registry: {0}")]
    RegistryAccess(String),

    #[error("Failed to write preference: {key}")]
    WriteFailed { key: String },
}

/// Registry-backed preferences store.
pub struct RegistryPreferences {
    app_key_path: Vec<u16>,
    run_key_path: Vec<u16>,
    run_value_name: Vec<u16>,
}

impl RegistryPreferences {
    const APP_KEY: &'static str = r"Software\MicMute";
    const RUN_KEY: &'static str = r"Software\Microsoft\Windows\CurrentVersion\Run";
    const APP_NAME: &'static str = "MicMute";

    const SETUP_COMPLETE_VALUE: &'static str = "SetupComplete";
    const START_MINIMIZED_VALUE: &'static str = "StartMinimized";
    const SHOW_NOTIFICATIONS_VALUE: &'static str = "ShowNotifications";

    pub fn new() -> Self {
        Self {
            app_key_path: Self::to_wide(Self::APP_KEY),
            run_key_path: Self::to_wide(Self::RUN_KEY),
            run_value_name: Self::to_wide(Self::APP_NAME),
        }
    }

    fn to_wide(s: &str) -> Vec<u16> {
        s.encode_utf16().chain(std::iter::once(0)).collect()
    }

    /// Load preferences, falling back to defaults for anything unreadable.
    pub fn load(&self) -> UserPreferences {
        let defaults = UserPreferences::default();
        UserPreferences {
            setup_complete: self
                .read_bool(Self::SETUP_COMPLETE_VALUE)
                .unwrap_or(defaults.setup_complete),
            start_minimized: self
                .read_bool(Self::START_MINIMIZED_VALUE)
                .unwrap_or(defaults.start_minimized),
            show_notifications: self
                .read_bool(Self::SHOW_NOTIFICATIONS_VALUE)
                .unwrap_or(defaults.show_notifications),
            start_with_windows: self.is_startup_enabled().unwrap_or(false),
        }
    }

    /// Save all preferences.
    pub fn save(&self, preferences: &UserPreferences) -> Result<(), PreferencesError> {
        self.write_bool(Self::SETUP_COMPLETE_VALUE, preferences.setup_complete)?;
        self.write_bool(Self::START_MINIMIZED_VALUE, preferences.start_minimized)?;
        self.write_bool(
            Self::SHOW_NOTIFICATIONS_VALUE,
            preferences.show_notifications,
        )?;
        self.set_startup_enabled(preferences.start_with_windows)?;
        Ok(())
    }

    /// Check if initial setup has been completed.
    pub fn is_setup_complete(&self) -> bool {
        self.read_bool(Self::SETUP_COMPLETE_VALUE).unwrap_or(false)
    }

    /// Mark setup as complete.
    pub fn set_setup_complete(&self, complete: bool) -> Result<(), PreferencesError> {
        self.write_bool(Self::SETUP_COMPLETE_VALUE, complete)
    }

    fn read_bool(&self, value_name: &str) -> Option<bool> {
        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.app_key_path.as_ptr()),
                0,
                KEY_READ,
                &mut hkey,
            );

            if result.is_err() {
                return None;
            }

            let value_wide = Self::to_wide(value_name);
            let mut data: u32 = 0;
            let mut data_size = std::mem::size_of::<u32>() as u32;

            let result = RegQueryValueExW(
                hkey,
                PCWSTR::from_raw(value_wide.as_ptr()),
                None,
                None,
                Some(&mut data as *mut u32 as *mut u8),
                Some(&mut data_size),
            );

            let _ = RegCloseKey(hkey);

            if result.is_ok() {
                Some(data != 0)
            } else {
                None
            }
        }
    }

    fn write_bool(&self, value_name: &str, value: bool) -> Result<(), PreferencesError> {
        unsafe {
            let mut hkey = HKEY::default();
            let mut disposition = REG_CREATE_KEY_DISPOSITION::default();

            let result = RegCreateKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.app_key_path.as_ptr()),
                0,
                PCWSTR::null(),
                REG_OPTION_NON_VOLATILE,
                KEY_WRITE,
                None,
                &mut hkey,
                Some(&mut disposition),
            );

            if result.is_err() {
                return Err(PreferencesError::WriteFailed {
                    key: value_name.to_string(),
                });
            }

            let value_wide = Self::to_wide(value_name);
            let data: u32 = if value { 1 } else { 0 };

            let result = RegSetValueExW(
                hkey,
                PCWSTR::from_raw(value_wide.as_ptr()),
                0,
                REG_DWORD,
                Some(std::slice::from_raw_parts(
                    &data as *const u32 as *const u8,
                    std::mem::size_of::<u32>(),
                )),
            );

            let _ = RegCloseKey(hkey);

            if result.is_err() {
                Err(PreferencesError::WriteFailed {
                    key: value_name.to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    /// Check if "Start with Windows" is enabled.
    pub fn is_startup_enabled(&self) -> Result<bool, PreferencesError> {
        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.run_key_path.as_ptr()),
                0,
                KEY_READ,
                &mut hkey,
            );

            if result.is_err() {
                return Ok(false);
            }

            let mut data_size = 0u32;
            let result = RegQueryValueExW(
                hkey,
                PCWSTR::from_raw(self.run_value_name.as_ptr()),
                None,
                None,
                None,
                Some(&mut data_size),
            );

            let _ = RegCloseKey(hkey);

            Ok(result.is_ok() && data_size > 0)
        }
    }

    /// Enable or disable "Start with Windows".
    pub fn set_startup_enabled(&self, enabled: bool) -> Result<(), PreferencesError> {
        unsafe {
            let mut hkey = HKEY::default();
            let result = RegOpenKeyExW(
                HKEY_CURRENT_USER,
                PCWSTR::from_raw(self.run_key_path.as_ptr()),
                0,
                KEY_WRITE,
                &mut hkey,
            );

            if result.is_err() {
                return Err(PreferencesError::RegistryAccess(
                    "Failed to open Run key".to_string(),
                ));
            }

            let result = if enabled {
                let exe_path =
                    std::env::current_exe().map_err(|_| PreferencesError::WriteFailed {
                        key: Self::APP_NAME.to_string(),
                    })?;
                let exe_path_wide = Self::to_wide(&exe_path.to_string_lossy());

                RegSetValueExW(
                    hkey,
                    PCWSTR::from_raw(self.run_value_name.as_ptr()),
                    0,
                    REG_SZ,
                    Some(std::slice::from_raw_parts(
                        exe_path_wide.as_ptr() as *const u8,
                        exe_path_wide.len() * 2,
                    )),
                )
            } else {
                RegDeleteValueW(hkey, PCWSTR::from_raw(self.run_value_name.as_ptr()))
            };

            let _ = RegCloseKey(hkey);

            if result.is_err() && enabled {
                Err(PreferencesError::WriteFailed {
                    key: Self::APP_NAME.to_string(),
                })
            } else {
                Ok(())
            }
        }
    }
}

impl Default for RegistryPreferences {
    fn default() -> Self {
        Self::new()
    }
}
