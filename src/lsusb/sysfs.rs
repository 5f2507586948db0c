//! Driver and hub port lookups for a tree node, keyed by its [`LocationKey`]
//!
//! On Linux these come from sysfs: `maxchild` is an attribute of the device node and the driver is the name of the `driver` link of the interface node. Root hubs are special; their driver is that of the host controller, the parent of the `usbN` node.
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind, Result};
use crate::usb::LocationKey;

/// Default location of USB device nodes in sysfs
pub const SYSFS_USB_PREFIX: &str = "/sys/bus/usb/devices/";

/// Source of driver bindings and hub port counts
pub trait Sidecar {
    /// Driver bound to `interface` of the device at `key`; for a root hub the host controller driver
    fn driver(&self, key: LocationKey, interface: u8) -> Option<String>;
    /// Number of downstream ports of the hub at `key`
    fn maxchild(&self, key: LocationKey) -> Option<u8>;
}

/// Name of the sysfs node that holds the driver link for `interface` at `key`
///
/// Root hubs use the controller name since their driver is found through it. Interfaces are always in configuration 1 like lsusb.
///
/// ```
/// use usbtree::lsusb::sysfs::driver_node;
/// use usbtree::usb::LocationKey;
///
/// assert_eq!(driver_node(LocationKey::new(2, &[]), 0), "usb2");
/// assert_eq!(driver_node(LocationKey::new(2, &[1, 4]), 1), "2-1.4:1.1");
/// ```
pub fn driver_node(key: LocationKey, interface: u8) -> String {
    if key.is_root_hub() {
        key.sysfs_name()
    } else {
        key.interface_path(1, interface)
    }
}

/// File name of the target of link `path`
fn link_name(path: &Path) -> Result<String> {
    fs::read_link(path)?
        .file_name()
        .and_then(|f| f.to_str())
        .map(|f| f.to_string())
        .ok_or_else(|| {
            Error::new(
                ErrorKind::NotFound,
                &format!("Link {:?} has no file name", path),
            )
        })
}

/// [`Sidecar`] reading Linux sysfs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysfsSidecar {
    root: PathBuf,
}

impl Default for SysfsSidecar {
    fn default() -> Self {
        SysfsSidecar::new(SYSFS_USB_PREFIX)
    }
}

impl SysfsSidecar {
    /// Sidecar with USB device nodes under `root`
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        SysfsSidecar {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Directory containing the USB device nodes
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read `maxchild` attribute of the device at `key`
    pub fn read_maxchild(&self, key: LocationKey) -> Result<u8> {
        let path = self.root.join(key.sysfs_name()).join("maxchild");
        let value = fs::read_to_string(&path)?;
        value.trim().parse::<u8>().map_err(|e| {
            Error::new(
                ErrorKind::Parsing,
                &format!("Invalid maxchild {:?} at {:?}: {}", value.trim(), path, e),
            )
        })
    }

    /// Read the driver name of `interface` at `key`
    pub fn read_driver(&self, key: LocationKey, interface: u8) -> Result<String> {
        if key.is_root_hub() {
            // usbN links to the root hub node within the host controller device
            let controller_link = fs::read_link(self.root.join(key.sysfs_name()))?;
            let controller = controller_link.parent().ok_or_else(|| {
                Error::new(
                    ErrorKind::NotFound,
                    &format!("No host controller above {:?}", controller_link),
                )
            })?;
            link_name(&self.root.join(controller).join("driver"))
        } else {
            link_name(&self.root.join(driver_node(key, interface)).join("driver"))
        }
    }
}

impl Sidecar for SysfsSidecar {
    fn driver(&self, key: LocationKey, interface: u8) -> Option<String> {
        self.read_driver(key, interface)
            .map_err(|e| log::debug!("No driver for {} interface {}: {}", key, interface, e))
            .ok()
    }

    fn maxchild(&self, key: LocationKey) -> Option<u8> {
        self.read_maxchild(key)
            .map_err(|e| log::debug!("No maxchild for {}: {}", key, e))
            .ok()
    }
}
