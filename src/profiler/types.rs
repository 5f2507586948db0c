//! Types for holding enumerated USB devices and the dump format used by `--json` and `--from-json`
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;

use crate::error::{Error, ErrorKind, Result};
use crate::lsusb::sysfs::{driver_node, Sidecar};
use crate::usb::{ClassCode, LocationKey, Speed, MAX_PORT_DEPTH};

/// Class triple of an interface; from the first alternate setting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    /// bInterfaceClass
    pub class: u8,
    /// bInterfaceSubClass
    #[serde(default)]
    pub sub_class: u8,
    /// bInterfaceProtocol
    #[serde(default)]
    pub protocol: u8,
}

impl Interface {
    /// The [`ClassCode`] of `class`
    pub fn class_code(&self) -> ClassCode {
        ClassCode::from(self.class)
    }
}

/// A device configuration and its interfaces in descriptor order
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// bConfigurationValue
    #[serde(default)]
    pub number: u8,
    /// Interfaces of the configuration
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

/// USB device as enumerated; read only once built
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// Bus number the device is on
    pub bus: u8,
    /// Port path from the bus root; empty for a root hub
    #[serde(default)]
    pub ports: Vec<u8>,
    /// Device address on the bus
    pub address: u8,
    /// Negotiated speed
    #[serde(default)]
    pub speed: Speed,
    /// All configurations that could be read
    #[serde(default)]
    pub configurations: Vec<Configuration>,
}

impl Device {
    /// [`LocationKey`] of the device
    ///
    /// ```
    /// use usbtree::profiler::Device;
    ///
    /// let d = Device { bus: 1, ports: vec![3, 1], address: 7, ..Default::default() };
    /// assert_eq!(d.location_key().value(), 0x0131_0000);
    /// ```
    pub fn location_key(&self) -> LocationKey {
        LocationKey::new(self.bus, &self.ports)
    }

    /// Is the device a root hub: no port path
    pub fn is_root_hub(&self) -> bool {
        self.location_key().is_root_hub()
    }

    /// Check the port path is one the tree can place: at most [`MAX_PORT_DEPTH`] ports, each 1 to 15
    ///
    /// Port 0 would end the path early in the [`LocationKey`] so is rejected.
    pub fn validate(&self) -> Result<()> {
        if self.ports.len() > MAX_PORT_DEPTH {
            return Err(Error::new(
                ErrorKind::InvalidArg,
                &format!(
                    "Port path {:?} of bus {} device {} is deeper than {} levels",
                    self.ports, self.bus, self.address, MAX_PORT_DEPTH
                ),
            ));
        }
        if let Some(p) = self.ports.iter().find(|p| **p == 0 || **p > 0xf) {
            return Err(Error::new(
                ErrorKind::InvalidArg,
                &format!(
                    "Port {} of bus {} device {} is not in 1..=15",
                    p, self.bus, self.address
                ),
            ));
        }
        Ok(())
    }
}

/// Entry in a [`SystemDump`]; either a device or the error from probing one
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DumpDevice {
    /// Device that failed to probe; tried first as `error` is required
    Failed {
        /// Bus number if known
        bus: Option<u8>,
        /// Device address if known
        address: Option<u8>,
        /// Reason the descriptor could not be read
        error: String,
    },
    /// Probed device
    Device(Device),
}

impl From<DumpDevice> for Result<Device> {
    fn from(d: DumpDevice) -> Self {
        match d {
            DumpDevice::Device(device) => device.validate().map(|_| device),
            DumpDevice::Failed {
                bus,
                address,
                error,
            } => Err(Error::new(
                ErrorKind::Opening,
                &match (bus, address) {
                    (None, None) => error,
                    (b, a) => format!(
                        "Failed to get device descriptor for bus {} device {}: {}",
                        b.map_or(String::from("?"), |b| b.to_string()),
                        a.map_or(String::from("?"), |a| a.to_string()),
                        error
                    ),
                },
            )),
        }
    }
}

/// Dump of a system: devices in enumeration order plus the sysfs sidecar values seen at capture
///
/// `drivers` is keyed by the sysfs node name from [`driver_node`] and `maxchild` by [`LocationKey::sysfs_name`] so the dump can stand in for sysfs when rendering the tree.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemDump {
    /// Devices in enumeration order
    pub devices: Vec<DumpDevice>,
    /// Bound driver per sysfs node
    #[serde(default)]
    pub drivers: BTreeMap<String, String>,
    /// Downstream port count per hub sysfs name
    #[serde(default)]
    pub maxchild: BTreeMap<String, u8>,
}

impl SystemDump {
    /// Capture `probed` devices with the driver and maxchild values `sidecar` resolves for them
    pub fn capture(probed: &[Result<Device>], sidecar: &dyn Sidecar) -> Self {
        let mut dump = SystemDump::default();

        for p in probed {
            match p {
                Ok(device) => {
                    let key = device.location_key();
                    if let Some(m) = sidecar.maxchild(key) {
                        dump.maxchild.insert(key.sysfs_name(), m);
                    }
                    let interface_count = device
                        .configurations
                        .iter()
                        .map(|c| c.interfaces.len())
                        .max()
                        .unwrap_or(0)
                        .max(1);
                    for i in 0..interface_count.min(u8::MAX as usize) as u8 {
                        if let Some(d) = sidecar.driver(key, i) {
                            dump.drivers.insert(driver_node(key, i), d);
                        }
                        if key.is_root_hub() {
                            break;
                        }
                    }
                    dump.devices.push(DumpDevice::Device(device.to_owned()));
                }
                Err(e) => dump.devices.push(DumpDevice::Failed {
                    bus: None,
                    address: None,
                    error: e.message().to_owned(),
                }),
            }
        }

        dump
    }

    /// Devices as the probe results they were captured from
    pub fn probed(&self) -> Vec<Result<Device>> {
        self.devices.iter().cloned().map(Result::<Device>::from).collect()
    }
}

impl Sidecar for SystemDump {
    fn driver(&self, key: LocationKey, interface: u8) -> Option<String> {
        self.drivers.get(&driver_node(key, interface)).cloned()
    }

    fn maxchild(&self, key: LocationKey) -> Option<u8> {
        self.maxchild.get(&key.sysfs_name()).copied()
    }
}

/// Reads a json dump at `file_path` with serde deserializer - from `usbtree --json`
pub fn read_json_dump(file_path: &str) -> Result<SystemDump> {
    let mut file = fs::File::options().read(true).open(file_path)?;

    let mut data = String::new();
    file.read_to_string(&mut data)?;

    let json_dump: SystemDump = serde_json::from_str(&data).map_err(|e| {
        Error::new(
            ErrorKind::Parsing,
            &format!("Failed to parse dump at {:?}; Error({})", file_path, e),
        )
    })?;

    Ok(json_dump)
}
