//! lsusb `--tree` style output of USB devices
//!
//! The [lsusb-t source code](https://github.com/gregkh/usbutils/blob/master/lsusb-t.c) was used as a reference for the styling and content of the tree. Name lookups and sysfs reads are behind the [`names::Names`] and [`sysfs::Sidecar`] traits so the tree can be built from a dump or test data as well as the live system.
pub mod names;
pub mod sysfs;
pub mod tree;
