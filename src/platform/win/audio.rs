//! Master volume mute through the Core Audio endpoint volume interface.
//!
//! The default render endpoint is looked up on every call, so switching
//! between speakers and headphones is followed without a restart.

use sysmute_core::{AudioEnvironment, EnvError};
use tracing::info;
use windows::{
    Win32::{
        Media::Audio::{
            Endpoints::IAudioEndpointVolume, IMMDeviceEnumerator, MMDeviceEnumerator, eConsole,
            eRender,
        },
        System::Com::{CLSCTX_ALL, CoCreateInstance},
    },
    core::{BOOL, Result},
};

/// Must be created and used on a thread that holds a `ComApartment`.
#[derive(Clone)]
pub struct WinAudio {
    enumerator: IMMDeviceEnumerator,
}

impl WinAudio {
    pub fn new() -> Result<Self> {
        let enumerator: IMMDeviceEnumerator =
            unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }?;
        Ok(Self { enumerator })
    }

    fn endpoint_volume(&self) -> Result<IAudioEndpointVolume> {
        unsafe {
            let device = self.enumerator.GetDefaultAudioEndpoint(eRender, eConsole)?;
            device.Activate::<IAudioEndpointVolume>(CLSCTX_ALL, None)
        }
    }

    pub fn is_muted(&self) -> Result<bool> {
        let volume = self.endpoint_volume()?;
        let muted = unsafe { volume.GetMute() }?;
        Ok(muted.as_bool())
    }

    pub fn set_muted(&self, muted: bool) -> Result<()> {
        let volume = self.endpoint_volume()?;
        unsafe { volume.SetMute(BOOL::from(muted), std::ptr::null()) }
    }
}

impl AudioEnvironment for WinAudio {
    fn master_mute(&self) -> std::result::Result<bool, EnvError> {
        self.is_muted().map_err(|e| EnvError::ReadMute(Box::new(e)))
    }

    fn set_master_mute(&self, muted: bool) -> std::result::Result<(), EnvError> {
        if muted {
            info!(msg = "muting_master_volume");
        } else {
            info!(msg = "unmuting_master_volume");
        }

        self.set_muted(muted)
            .map_err(|e| EnvError::SetMute(Box::new(e)))
    }
}
