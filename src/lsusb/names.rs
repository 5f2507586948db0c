//! Port of the class lookup in names.c in usbutils, using the USB IDs repository.
//!
//! The lookup is a [`Names`] implementation that is passed to the tree builder rather than global state, so user overrides and test tables can stand in for it.
use std::collections::BTreeMap;
use usb_ids::{self, FromId};

/// Lookup of human readable names for USB codes
pub trait Names {
    /// Name of base class `id`; `None` if unknown
    fn class(&self, id: u8) -> Option<String>;
}

/// Get name of class from [`usb_ids::Class`]
///
/// ```
/// use usbtree::lsusb::names;
/// assert_eq!(names::class(0x03), Some("Human Interface Device".to_owned()));
/// assert_eq!(names::class(0x09), Some("Hub".to_owned()));
/// ```
pub fn class(id: u8) -> Option<String> {
    usb_ids::Class::from_id(id).map(|v| v.name().to_owned())
}

/// [`Names`] from the USB IDs repository with optional user supplied overrides
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UsbIdsNames {
    overrides: BTreeMap<u8, String>,
}

impl UsbIdsNames {
    /// Lookup with no overrides
    pub fn new() -> Self {
        Default::default()
    }

    /// Lookup where `overrides` take precedence over USB IDs
    ///
    /// ```
    /// use usbtree::lsusb::names::{Names, UsbIdsNames};
    /// use std::collections::BTreeMap;
    ///
    /// let names = UsbIdsNames::with_overrides(BTreeMap::from([(0x08, String::from("Disk"))]));
    /// assert_eq!(names.class(0x08), Some("Disk".into()));
    /// assert_eq!(names.class(0x09), Some("Hub".into()));
    /// ```
    pub fn with_overrides(overrides: BTreeMap<u8, String>) -> Self {
        UsbIdsNames { overrides }
    }
}

impl Names for UsbIdsNames {
    fn class(&self, id: u8) -> Option<String> {
        self.overrides.get(&id).cloned().or_else(|| class(id))
    }
}

impl Names for BTreeMap<u8, String> {
    fn class(&self, id: u8) -> Option<String> {
        self.get(&id).cloned()
    }
}
