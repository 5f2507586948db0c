//! Uses rusb (upto date libusb fork) to get system USB information - same lib as lsusb. Requires 'libusb' feature.
use super::*;
use crate::error::{Error, ErrorKind};
use crate::usb;
use rusb as libusb;

/// Live system [`Profiler`] using libusb
#[derive(Debug, Default)]
pub struct LibUsbProfiler;

/// Set log level for rusb
pub fn set_log_level(debug: u8) {
    let log_level = match debug {
        0 => rusb::LogLevel::None,
        1 => rusb::LogLevel::Warning,
        2 => rusb::LogLevel::Info,
        _ => rusb::LogLevel::Debug,
    };

    rusb::set_log_level(log_level);
}

impl From<libusb::Error> for Error {
    fn from(error: libusb::Error) -> Self {
        Error {
            kind: ErrorKind::LibUSB,
            message: format!(
                "Failed to gather system USB data from libusb: Error({})",
                &error.to_string()
            ),
        }
    }
}

/// Covert to our crate speed; SuperPlus and faster show as unknown like lsusb
impl From<libusb::Speed> for usb::Speed {
    fn from(libusb: libusb::Speed) -> Self {
        match libusb {
            libusb::Speed::Super => usb::Speed::SuperSpeed,
            libusb::Speed::High => usb::Speed::HighSpeed,
            libusb::Speed::Full => usb::Speed::FullSpeed,
            libusb::Speed::Low => usb::Speed::LowSpeed,
            _ => usb::Speed::Unknown,
        }
    }
}

impl LibUsbProfiler {
    /// Interfaces of `config_desc` in descriptor order, first alternate setting of each
    fn build_interfaces(config_desc: &libusb::ConfigDescriptor) -> Vec<Interface> {
        config_desc
            .interfaces()
            .filter_map(|interface| interface.descriptors().next())
            .map(|interface_desc| Interface {
                class: interface_desc.class_code(),
                sub_class: interface_desc.sub_class_code(),
                protocol: interface_desc.protocol_code(),
            })
            .collect()
    }

    fn build_configurations<T: libusb::UsbContext>(
        device: &libusb::Device<T>,
        device_desc: &libusb::DeviceDescriptor,
    ) -> Vec<Configuration> {
        let mut ret: Vec<Configuration> =
            Vec::with_capacity(device_desc.num_configurations() as usize);

        for n in 0..device_desc.num_configurations() {
            match device.config_descriptor(n) {
                Ok(config_desc) => ret.push(Configuration {
                    number: config_desc.number(),
                    interfaces: Self::build_interfaces(&config_desc),
                }),
                Err(e) => {
                    eprintln!(
                        "Couldn't get configuration descriptor {}, some information will be missing",
                        n
                    );
                    log::debug!("Config descriptor {} of {:?}: {}", n, device, e);
                }
            }
        }

        ret
    }

    /// Build a [`Device`] from the libusb device; fails if the device descriptor or port path cannot be read or the path cannot be placed in the tree
    fn build_device<T: libusb::UsbContext>(device: &libusb::Device<T>) -> Result<Device> {
        let device_desc = device.device_descriptor()?;
        let ports = device.port_numbers()?;

        let ret = Device {
            bus: device.bus_number(),
            ports,
            address: device.address(),
            speed: device.speed().into(),
            configurations: Self::build_configurations(device, &device_desc),
        };
        ret.validate()?;
        log::trace!("Built {:?} at {}", ret, ret.location_key());

        Ok(ret)
    }
}

impl Profiler for LibUsbProfiler {
    fn get_devices(&mut self) -> Result<Vec<Result<Device>>> {
        let devices = libusb::DeviceList::new()?;

        Ok(devices
            .iter()
            .map(|device| {
                Self::build_device(&device).map_err(|e| {
                    Error::new(
                        ErrorKind::Opening,
                        &format!(
                            "Failed to get device descriptor for bus {} device {}: {:#}",
                            device.bus_number(),
                            device.address(),
                            e
                        ),
                    )
                })
            })
            .collect())
    }
}
