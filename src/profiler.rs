//! System USB profiler for getting the flat list of attached devices
//!
//! A [`Profiler`] returns every device it could find in enumeration order. The outer [`Result`] fails only if enumeration cannot start; each device is its own [`Result`] so one unreadable descriptor does not lose the rest.
//!
//! ```no_run
//! use usbtree::profiler;
//!
//! let devices = profiler::get_devices().unwrap();
//! for device in devices.iter().filter_map(|d| d.as_ref().ok()) {
//!     println!("{}", device.location_key());
//! }
//! ```
use crate::error::Result;

// separate module but import all
pub mod types;
pub use types::*;

#[cfg(feature = "libusb")]
pub mod libusb;

/// OS level USB Profiler trait for enumerating USB devices
pub trait Profiler: std::fmt::Debug {
    /// All devices present at call time; no ordering guarantee
    fn get_devices(&mut self) -> Result<Vec<Result<Device>>>;
}

impl Profiler for SystemDump {
    fn get_devices(&mut self) -> Result<Vec<Result<Device>>> {
        Ok(self.probed())
    }
}

/// Enumerate the live system with the profiler of the enabled feature
pub fn get_devices() -> Result<Vec<Result<Device>>> {
    #[cfg(feature = "libusb")]
    {
        let mut profiler = libusb::LibUsbProfiler;
        profiler.get_devices()
    }

    #[cfg(not(feature = "libusb"))]
    {
        Err(crate::error::Error::new(
            crate::error::ErrorKind::Unsupported,
            "libusb feature is required to do this, install with `cargo install --features libusb`",
        ))
    }
}
