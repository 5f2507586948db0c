//! Defines for USB, mainly those covered at [usb.org](https://www.usb.org), and the location/path helpers used to place a device in the bus tree
use serde::{Deserialize, Serialize};

pub mod location;
pub mod path;

pub use location::*;
pub use path::*;

/// USB class code defines [ref](https://www.usb.org/defined-class-codes)
///
/// Only the hub class changes how a tree node renders; anything else is kept as [`ClassCode::Other`] and named through the lookup
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum ClassCode {
    /// Hub; nodes of this class report their downstream port count
    Hub,
    /// Any other base class
    Other(u8),
}

impl From<u8> for ClassCode {
    fn from(b: u8) -> ClassCode {
        match b {
            9 => ClassCode::Hub,
            b => ClassCode::Other(b),
        }
    }
}

impl ClassCode {
    /// Is the class a hub, which has downstream ports
    ///
    /// ```
    /// use usbtree::usb::ClassCode;
    ///
    /// assert!(ClassCode::from(9).is_hub());
    /// assert!(!ClassCode::from(8).is_hub());
    /// ```
    pub fn is_hub(&self) -> bool {
        matches!(self, ClassCode::Hub)
    }
}

/// USB Speed as shown by the lsusb tree
///
/// Speeds above SuperSpeed are reported as [`Speed::Unknown`] like lsusb `-t`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    #[default]
    /// Speed not reported or not one lsusb names
    Unknown,
    /// 1.5 Mb/s
    LowSpeed,
    /// 12 Mb/s
    FullSpeed,
    /// 480 Mb/s
    HighSpeed,
    /// 5 Gb/s
    SuperSpeed,
}

impl Speed {
    /// lsusb tree speed in Mb/s, printed with an 'M' suffix by the tree
    ///
    /// ```
    /// use usbtree::usb::Speed;
    ///
    /// assert_eq!(Speed::LowSpeed.to_lsusb_speed(), "1.5");
    /// assert_eq!(Speed::SuperSpeed.to_lsusb_speed(), "5000");
    /// assert_eq!(Speed::Unknown.to_lsusb_speed(), "Unknown");
    /// ```
    pub fn to_lsusb_speed(&self) -> String {
        match self {
            Speed::LowSpeed => "1.5",
            Speed::FullSpeed => "12",
            Speed::HighSpeed => "480",
            Speed::SuperSpeed => "5000",
            Speed::Unknown => "Unknown",
        }
        .to_string()
    }
}
