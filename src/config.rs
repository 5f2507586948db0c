//! Config for usbtree binary
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind, Result};
use crate::lsusb::names::UsbIdsNames;
use crate::lsusb::sysfs::SysfsSidecar;

const CONF_DIR: &str = "usbtree";
const CONF_NAME: &str = "usbtree.json";

/// User settings for where sidecar data is read from and how classes are named
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory of USB device nodes; default is [`crate::lsusb::sysfs::SYSFS_USB_PREFIX`]
    pub sysfs_root: Option<PathBuf>,
    /// User supplied class names - will merge with and take precedence over USB IDs
    pub class_names: BTreeMap<u8, String>,
}

impl Config {
    /// Default new
    pub fn new() -> Config {
        Config {
            ..Default::default()
        }
    }

    /// Get example [`Config`]
    pub fn example() -> Config {
        Config {
            class_names: BTreeMap::from([(0xe0, String::from("Wireless"))]),
            ..Default::default()
        }
    }

    /// Attempt to read from .json format config at `file_path`
    pub fn from_file<P: AsRef<Path>>(file_path: P) -> Result<Config> {
        let f = File::open(file_path.as_ref())?;
        let mut br = BufReader::new(f);
        let mut data = String::new();

        br.read_to_string(&mut data)?;
        serde_json::from_str::<Config>(&data).map_err(|e| {
            Error::new(
                ErrorKind::Config,
                &format!(
                    "Failed to parse config at {:?}; Error({})",
                    file_path.as_ref(),
                    e
                ),
            )
        })
    }

    /// Path of the system config file: `usbtree/usbtree.json` in the user config directory
    pub fn sys_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONF_DIR).join(CONF_NAME))
    }

    /// Load the system config if it exists, otherwise the default
    pub fn sys_config() -> Result<Config> {
        match Self::sys_config_path() {
            Some(p) if p.exists() => {
                log::info!("Loading config from {:?}", p);
                Self::from_file(p)
            }
            _ => {
                log::debug!("No system config, using default");
                Ok(Config::new())
            }
        }
    }

    /// Class name lookup with the user overrides applied
    pub fn names(&self) -> UsbIdsNames {
        UsbIdsNames::with_overrides(self.class_names.to_owned())
    }

    /// Sysfs sidecar at `sysfs_root` or the default location
    pub fn sidecar(&self) -> SysfsSidecar {
        self.sysfs_root
            .as_ref()
            .map(SysfsSidecar::new)
            .unwrap_or_default()
    }
}
