//! Helper functions for USB sysfs style paths
//!
//! Used to find the sysfs entries of a device from its [`LocationKey`] for driver and hub port lookups.
use itertools::Itertools;

use super::LocationKey;

/// Builds a replica of sysfs path of a device below a root hub; excludes config.interface
///
/// ```
/// use usbtree::usb::get_port_path;
///
/// assert_eq!(get_port_path(1, &[1, 3, 2]), String::from("1-1.3.2"));
/// assert_eq!(get_port_path(1, &[2]), String::from("1-2"));
/// ```
///
/// [ref](http://gajjarpremal.blogspot.com/2015/04/sysfs-structures-for-linux-usb.html)
/// The devices are named by a scheme like this:
///
///  bus-port.port.port ...
pub fn get_port_path(bus: u8, ports: &[u8]) -> String {
    format!("{}-{}", bus, ports.iter().format("."))
}

/// Build replica of sysfs path with interface
///
/// ```
/// use usbtree::usb::get_interface_path;
///
/// assert_eq!(get_interface_path(1, &[1, 3], 1, 0), String::from("1-1.3:1.0"));
/// ```
pub fn get_interface_path(bus: u8, ports: &[u8], config: u8, interface: u8) -> String {
    format!("{}:{}.{}", get_port_path(bus, ports), config, interface)
}

/// Builds a replica of sysfs name for reading attributes such as `maxchild`
///
/// Like [`get_port_path`] but root_hubs use the USB controller name (usbX)
///
/// ```
/// use usbtree::usb::get_sysfs_name;
///
/// assert_eq!(get_sysfs_name(1, &[1, 3, 2]), String::from("1-1.3.2"));
/// assert_eq!(get_sysfs_name(1, &[2]), String::from("1-2"));
/// // special case for root_hub
/// assert_eq!(get_sysfs_name(2, &[]), String::from("usb2"));
/// ```
pub fn get_sysfs_name(bus: u8, ports: &[u8]) -> String {
    if ports.is_empty() {
        format!("usb{}", bus)
    } else {
        get_port_path(bus, ports)
    }
}

impl LocationKey {
    /// sysfs name of the device at this key, see [`get_sysfs_name`]
    ///
    /// Built from the encoded path so a port deeper than the key holds is not included.
    ///
    /// ```
    /// use usbtree::usb::LocationKey;
    ///
    /// assert_eq!(LocationKey::new(3, &[]).sysfs_name(), "usb3");
    /// assert_eq!(LocationKey::new(3, &[2, 4]).sysfs_name(), "3-2.4");
    /// ```
    pub fn sysfs_name(&self) -> String {
        get_sysfs_name(self.bus(), &self.ports())
    }

    /// sysfs name of `interface` within `config` at this key, see [`get_interface_path`]
    ///
    /// ```
    /// use usbtree::usb::LocationKey;
    ///
    /// assert_eq!(LocationKey::new(1, &[4]).interface_path(1, 2), "1-4:1.2");
    /// ```
    pub fn interface_path(&self, config: u8, interface: u8) -> String {
        get_interface_path(self.bus(), &self.ports(), config, interface)
    }
}
