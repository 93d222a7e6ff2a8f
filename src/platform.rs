#[cfg(windows)]
pub mod win;

#[cfg(windows)]
pub use win::run;

/// No master-volume or cursor backend exists outside Windows.
#[cfg(not(windows))]
pub fn run(_schedule: sysmute_core::Schedule) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "sysmute only supports Windows",
    ))
}
