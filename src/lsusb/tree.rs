//! Build and print the lsusb `--tree` view of a flat device list
//!
//! Each device renders to a [`TreeEntry`] tagged with its [`LocationKey`]. Sorting the entries by key puts them in depth first tree order; the key is then dropped and the text printed.
//!
//! ```
//! use std::collections::BTreeMap;
//! use usbtree::lsusb::tree::Tree;
//! use usbtree::profiler::{Configuration, Device, Interface, SystemDump};
//! use usbtree::usb::Speed;
//!
//! let storage = Device {
//!     bus: 1,
//!     ports: vec![3],
//!     address: 2,
//!     speed: Speed::HighSpeed,
//!     configurations: vec![Configuration {
//!         number: 1,
//!         interfaces: vec![Interface { class: 8, sub_class: 6, protocol: 80 }],
//!     }],
//! };
//! let root = Device { bus: 1, address: 1, speed: Speed::HighSpeed, ..Default::default() };
//! let names = BTreeMap::from([(8, String::from("Mass Storage"))]);
//!
//! let tree = Tree::build(vec![Ok(storage), Ok(root)], &names, &SystemDump::default());
//! assert_eq!(
//!     tree.to_string(),
//!     "/:  Bus 01.Port 1: Dev 1, Class=root_hub, Driver=Unknown/0p, 480M\n    |__ Port 3: Dev 2, If 0, Class=Mass Storage, Driver=Unknown, 480M\n"
//! );
//! ```
use std::fmt;
use std::io;

use super::names::Names;
use super::sysfs::Sidecar;
use crate::error::Error;
use crate::profiler::{Device, Interface};
use crate::usb::LocationKey;

/// Prefix of a root hub line
pub const TREE_LSUSB_BUS: &str = "/:  ";
/// Branch of a device line
pub const TREE_LSUSB_DEVICE: &str = "|__ ";
/// Indent per tree level
pub const TREE_LSUSB_SPACE: &str = "    ";

/// Placeholder for a driver that cannot be found
const UNKNOWN_DRIVER: &str = "Unknown";

/// Rendered lines of one device with the key that places it in the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Position in the tree
    pub key: LocationKey,
    /// Enumeration order; breaks ties between equal keys
    pub index: usize,
    /// One or more newline terminated lines
    pub text: String,
}

/// Indent and branch for a node at `key`: a level of [`TREE_LSUSB_SPACE`] per depth then [`TREE_LSUSB_DEVICE`], or [`TREE_LSUSB_BUS`] for a root hub
///
/// ```
/// use usbtree::lsusb::tree::tree_prefix;
/// use usbtree::usb::LocationKey;
///
/// assert_eq!(tree_prefix(LocationKey::new(1, &[])), "/:  ");
/// assert_eq!(tree_prefix(LocationKey::new(1, &[2])), "    |__ ");
/// assert_eq!(tree_prefix(LocationKey::new(1, &[2, 1])), "        |__ ");
/// ```
pub fn tree_prefix(key: LocationKey) -> String {
    match key.depth() {
        0 => TREE_LSUSB_BUS.to_string(),
        d => format!("{}{}", TREE_LSUSB_SPACE.repeat(d), TREE_LSUSB_DEVICE),
    }
}

/// Port number shown for the node at `key` as the single hex digit of its nibble; root hubs are always port 1
///
/// ```
/// use usbtree::lsusb::tree::tree_port;
/// use usbtree::usb::LocationKey;
///
/// assert_eq!(tree_port(LocationKey::new(1, &[])), "1");
/// assert_eq!(tree_port(LocationKey::new(1, &[2, 11])), "b");
/// ```
pub fn tree_port(key: LocationKey) -> String {
    format!("{:x}", key.port().unwrap_or(1))
}

/// The single line of a root hub
fn root_hub_line(device: &Device, key: LocationKey, sidecar: &dyn Sidecar) -> String {
    format!(
        "{}Bus {:02}.Port {}: Dev {}, Class=root_hub, Driver={}/{}p, {}M\n",
        tree_prefix(key),
        device.bus,
        tree_port(key),
        device.address,
        sidecar
            .driver(key, 0)
            .unwrap_or_else(|| UNKNOWN_DRIVER.to_string()),
        sidecar.maxchild(key).unwrap_or(0),
        device.speed.to_lsusb_speed(),
    )
}

/// Line for interface `number` of a device; hub interfaces also show downstream ports
fn interface_line(
    device: &Device,
    key: LocationKey,
    number: u8,
    interface: &Interface,
    names: &dyn Names,
    sidecar: &dyn Sidecar,
) -> String {
    let driver = sidecar
        .driver(key, number)
        .unwrap_or_else(|| UNKNOWN_DRIVER.to_string());
    let driver = if interface.class_code().is_hub() {
        format!("{}/{}p", driver, sidecar.maxchild(key).unwrap_or(0))
    } else {
        driver
    };

    format!(
        "{}Port {}: Dev {}, If {}, Class={}, Driver={}, {}M\n",
        tree_prefix(key),
        tree_port(key),
        device.address,
        number,
        names.class(interface.class).unwrap_or_default(),
        driver,
        device.speed.to_lsusb_speed(),
    )
}

/// Render `device`, enumerated at `index`, into a [`TreeEntry`]
///
/// A root hub is one line. Any other device is a line per interface of every configuration, with the interface number counting from 0 within each configuration.
pub fn build_entry(
    index: usize,
    device: &Device,
    names: &dyn Names,
    sidecar: &dyn Sidecar,
) -> TreeEntry {
    let key = device.location_key();

    let text = if key.depth() == 0 {
        root_hub_line(device, key, sidecar)
    } else {
        device
            .configurations
            .iter()
            .flat_map(|config| config.interfaces.iter().enumerate())
            .map(|(n, interface)| {
                let number = u8::try_from(n).unwrap_or(u8::MAX);
                interface_line(device, key, number, interface, names, sidecar)
            })
            .collect()
    };

    TreeEntry { key, index, text }
}

/// Sort `entries` into tree order and return their text with keys dropped
///
/// The sort is stable and equal keys keep enumeration order.
pub fn assemble(mut entries: Vec<TreeEntry>) -> Vec<String> {
    sort_entries(&mut entries);
    entries.into_iter().map(|e| e.text).collect()
}

fn sort_entries(entries: &mut [TreeEntry]) {
    entries.sort_by_key(|e| (e.key, e.index));
    if log::log_enabled!(log::Level::Trace) {
        for e in entries.iter() {
            log::trace!("{} ({}) #{}", e.key, e.key.sort_tag(), e.index);
        }
    }
}

/// Devices rendered and sorted into tree order, with the errors of any that could not be probed
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
    errors: Vec<Error>,
}

impl Tree {
    /// Sort `entries` into a tree
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        sort_entries(&mut entries);
        Tree {
            entries,
            errors: Vec::new(),
        }
    }

    /// Render every probed device; a device that failed to probe is skipped and its error kept for [`Tree::errors`]
    ///
    /// Enumeration index is the position in `probed`, counting failures.
    pub fn build(
        probed: Vec<crate::error::Result<Device>>,
        names: &dyn Names,
        sidecar: &dyn Sidecar,
    ) -> Self {
        let mut entries = Vec::with_capacity(probed.len());
        let mut errors = Vec::new();

        for (index, p) in probed.into_iter().enumerate() {
            match p {
                Ok(device) => entries.push(build_entry(index, &device, names, sidecar)),
                Err(e) => {
                    log::warn!("Skipping device {}: {}", index, e);
                    errors.push(e);
                }
            }
        }

        let mut tree = Tree::new(entries);
        tree.errors = errors;
        tree
    }

    /// Entries in tree order
    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    /// Errors of devices left out of the tree
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// All output lines in order, without line endings
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|e| e.text.lines())
    }

    /// Write the tree to `w`
    pub fn write_to<W: io::Write>(&self, mut w: W) -> io::Result<()> {
        for e in &self.entries {
            w.write_all(e.text.as_bytes())?;
        }
        w.flush()
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for e in &self.entries {
            write!(f, "{}", e.text)?;
        }
        Ok(())
    }
}
