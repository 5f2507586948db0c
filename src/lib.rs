//! Print system USB devices as a tree of their physical bus, hub and port topology; a Rust `lsusb --tree`.
//!
//! Devices from a [`profiler::Profiler`] are each placed by a [`usb::LocationKey`], rendered to lines with [`lsusb::tree`] and sorted by key into depth first tree order.
#![warn(missing_docs)]
use simple_logger::SimpleLogger;

pub mod config;
pub mod error;
pub mod lsusb;
pub mod profiler;
pub mod usb;

/// Set usbtree module and binary log level
pub fn set_log_level(debug: u8) -> crate::error::Result<()> {
    match debug {
        // just use env if not passed
        0 => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Error.to_level_filter())
            .env(),
        1 => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Info.to_level_filter()),
        2 => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Debug.to_level_filter()),
        _ => SimpleLogger::new()
            .with_utc_timestamps()
            .with_level(log::Level::Trace.to_level_filter()),
    }
    .init()
    .map_err(|e| {
        crate::error::Error::new(
            crate::error::ErrorKind::Other("simple_logger"),
            &format!("Failed to set log level: {}", e),
        )
    })?;

    #[cfg(feature = "libusb")]
    profiler::libusb::set_log_level(debug);

    Ok(())
}

// run any Rust code as doctest
#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
