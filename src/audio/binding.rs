//! Typed Core Audio binding for the default capture endpoint.
//!
//! All COM and endpoint-volume knowledge lives behind this module. The
//! default device is re-resolved on every call, never cached, because the
//! system default can change at any time.

use crate::audio::controller::MuteBackend;
use crate::audio::AudioError;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;
use windows::Win32::Devices::Properties::DEVPKEY_Device_FriendlyName;
use windows::Win32::Media::Audio::{
    eCapture, eConsole, Endpoints::IAudioEndpointVolume, IMMDevice, IMMDeviceEnumerator,
    MMDeviceEnumerator,
};
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, CLSCTX_ALL, COINIT_APARTMENTTHREADED, STGM,
};
use windows::Win32::UI::Shell::PropertiesSystem::{IPropertyStore, PROPERTYKEY};

/// Set once the process has initialized COM through a [`ComGuard`].
static COM_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Process-wide COM initialization guard.
///
/// Idempotent: only the first guard in the process actually initializes, and
/// only that guard uninitializes on drop. `S_FALSE` (apartment already
/// initialized by the host) counts as success.
pub struct ComGuard {
    owns_init: bool,
}

impl ComGuard {
    pub fn new() -> Result<Self, AudioError> {
        if COM_INITIALIZED.swap(true, Ordering::SeqCst) {
            return Ok(Self { owns_init: false });
        }

        unsafe {
            // Use apartment-threaded for UI compatibility; S_FALSE passes
            // through .ok() as success.
            if let Err(e) = CoInitializeEx(None, COINIT_APARTMENTTHREADED).ok() {
                COM_INITIALIZED.store(false, Ordering::SeqCst);
                return Err(AudioError::InitFailed(e.message()));
            }
        }

        Ok(Self { owns_init: true })
    }
}

impl Drop for ComGuard {
    fn drop(&mut self) {
        if self.owns_init {
            COM_INITIALIZED.store(false, Ordering::SeqCst);
            unsafe {
                CoUninitialize();
            }
        }
    }
}

/// Stateless binding to the Core Audio endpoint-volume interface.
///
/// COM must be initialized (see [`ComGuard`]) before any method is called.
#[derive(Default)]
pub struct CoreAudioBinding;

impl CoreAudioBinding {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the current default capture device.
    pub fn default_capture_endpoint(&self) -> Result<IMMDevice, AudioError> {
        unsafe {
            let enumerator: IMMDeviceEnumerator =
                CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL)
                    .map_err(|e| AudioError::QueryFailed(e.message()))?;

            enumerator
                .GetDefaultAudioEndpoint(eCapture, eConsole)
                .map_err(|_| AudioError::DeviceUnavailable)
        }
    }

    /// Friendly name of the current default capture device, for tooltips.
    pub fn default_capture_name(&self) -> Option<String> {
        let device = self.default_capture_endpoint().ok()?;

        unsafe {
            let props: IPropertyStore = device.OpenPropertyStore(STGM(0)).ok()?;

            // Convert DEVPROPKEY to PROPERTYKEY
            let key = PROPERTYKEY {
                fmtid: DEVPKEY_Device_FriendlyName.fmtid,
                pid: DEVPKEY_Device_FriendlyName.pid,
            };

            let prop = props.GetValue(&key).ok()?;
            let name = prop.to_string();
            if name.is_empty() {
                None
            } else {
                Some(name)
            }
        }
    }

    fn endpoint_volume(&self, device: &IMMDevice) -> windows::core::Result<IAudioEndpointVolume> {
        unsafe { device.Activate(CLSCTX_ALL, None) }
    }
}

impl MuteBackend for CoreAudioBinding {
    fn get_mute(&self) -> Result<bool, AudioError> {
        let device = self.default_capture_endpoint()?;
        let volume = self
            .endpoint_volume(&device)
            .map_err(|e| AudioError::QueryFailed(e.message()))?;

        unsafe {
            let muted = volume
                .GetMute()
                .map_err(|e| AudioError::QueryFailed(e.message()))?;
            debug!(muted = muted.as_bool(), "queried endpoint mute");
            Ok(muted.as_bool())
        }
    }

    fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
        let device = self.default_capture_endpoint()?;
        let volume = self
            .endpoint_volume(&device)
            .map_err(|e| AudioError::SetFailed(e.message()))?;

        unsafe {
            volume
                .SetMute(muted, std::ptr::null())
                .map_err(|e| AudioError::SetFailed(e.message()))?;
        }
        debug!(muted, "set endpoint mute");
        Ok(())
    }
}
