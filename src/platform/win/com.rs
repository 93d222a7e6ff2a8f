use windows::Win32::System::Com::{
    COINIT, COINIT_APARTMENTTHREADED, COINIT_MULTITHREADED, CoInitializeEx, CoUninitialize,
};

/// Per-thread COM apartment, released on drop.
///
/// The polling thread joins the MTA since it never pumps messages; the tray
/// thread owns a window and uses an STA.
pub struct ComApartment {
    initialized: bool,
}

impl ComApartment {
    pub fn multithreaded() -> windows::core::Result<Self> {
        Self::init(COINIT_MULTITHREADED)
    }

    pub fn single_threaded() -> windows::core::Result<Self> {
        Self::init(COINIT_APARTMENTTHREADED)
    }

    fn init(model: COINIT) -> windows::core::Result<Self> {
        unsafe {
            CoInitializeEx(None, model).ok()?;
        }
        Ok(Self { initialized: true })
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.initialized {
            unsafe { CoUninitialize() };
        }
    }
}
