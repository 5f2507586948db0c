//! Location key: a single `u32` that places a device on the bus tree
//!
//! Layout is `0xBBDDDDDD`: `BB` is the bus number and each `D` nibble is the port on that tree level, first hop most significant. A zero nibble terminates the path so ordering keys as unsigned integers gives depth first (pre-order) tree order.
use std::fmt;

/// Number of port levels held in a [`LocationKey`]
///
/// Ports deeper than this are not encoded so will sort with their ancestor at this level.
pub const MAX_KEY_DEPTH: usize = 6;
/// Maximum number of port levels a USB device can have, as reported by libusb
pub const MAX_PORT_DEPTH: usize = 7;

const BUS_SHIFT: u32 = 24;
/// Used by lsusb to order keys as hex strings with the bus inverted
const BUS_INVERT: u32 = 0xff00_0000;

/// Encoded bus number and port path of a device, see module docs for layout
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationKey(u32);

impl LocationKey {
    /// Encode `bus` and `ports` into a key
    ///
    /// Only the low nibble of each port is kept and ports past [`MAX_KEY_DEPTH`] are dropped.
    ///
    /// ```
    /// use usbtree::usb::LocationKey;
    ///
    /// assert_eq!(LocationKey::new(2, &[]).value(), 0x0200_0000);
    /// assert_eq!(LocationKey::new(2, &[1, 2]).value(), 0x0212_0000);
    /// assert_eq!(LocationKey::new(1, &[1, 2, 3, 4, 5, 6, 7]).value(), 0x0112_3456);
    /// ```
    pub fn new(bus: u8, ports: &[u8]) -> Self {
        let path = ports
            .iter()
            .take(MAX_KEY_DEPTH)
            .enumerate()
            .fold(0u32, |acc, (i, p)| {
                acc | ((*p as u32 & 0xf) << (20 - 4 * i as u32))
            });

        LocationKey(((bus as u32) << BUS_SHIFT) | path)
    }

    /// The raw key
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Bus number in the top byte
    pub fn bus(&self) -> u8 {
        (self.0 >> BUS_SHIFT) as u8
    }

    /// Port nibbles of the key, first hop first; all six including trailing zeros
    fn nibbles(&self) -> [u8; MAX_KEY_DEPTH] {
        let mut ret = [0u8; MAX_KEY_DEPTH];
        for (i, n) in ret.iter_mut().enumerate() {
            *n = ((self.0 >> (20 - 4 * i as u32)) & 0xf) as u8;
        }
        ret
    }

    /// Number of tree levels below the bus root
    ///
    /// Count of port nibbles before the first zero nibble, so 0 is a root hub and a full key is [`MAX_KEY_DEPTH`].
    ///
    /// ```
    /// use usbtree::usb::LocationKey;
    ///
    /// assert_eq!(LocationKey::new(3, &[]).depth(), 0);
    /// assert_eq!(LocationKey::new(3, &[4]).depth(), 1);
    /// assert_eq!(LocationKey::new(3, &[4, 1, 2]).depth(), 3);
    /// ```
    pub fn depth(&self) -> usize {
        self.nibbles()
            .iter()
            .position(|n| *n == 0)
            .unwrap_or(MAX_KEY_DEPTH)
    }

    /// Is the key a root hub: [`LocationKey::depth`] is 0
    pub fn is_root_hub(&self) -> bool {
        self.depth() == 0
    }

    /// Port on the parent hub; the nibble before the first zero nibble. `None` for a root hub
    ///
    /// ```
    /// use usbtree::usb::LocationKey;
    ///
    /// assert_eq!(LocationKey::new(1, &[]).port(), None);
    /// assert_eq!(LocationKey::new(1, &[3]).port(), Some(3));
    /// assert_eq!(LocationKey::new(1, &[3, 2, 7]).port(), Some(7));
    /// assert_eq!(LocationKey::new(1, &[1, 2, 3, 4, 5, 6]).port(), Some(6));
    /// ```
    pub fn port(&self) -> Option<u8> {
        match self.depth() {
            0 => None,
            d => Some(self.nibbles()[d - 1]),
        }
    }

    /// Decoded port path, up to the first zero nibble
    ///
    /// ```
    /// use usbtree::usb::LocationKey;
    ///
    /// assert_eq!(LocationKey::new(1, &[2, 1]).ports(), vec![2, 1]);
    /// // seventh level is not held by the key
    /// assert_eq!(LocationKey::new(1, &[1, 1, 1, 1, 1, 1, 1]).ports().len(), 6);
    /// ```
    pub fn ports(&self) -> Vec<u8> {
        self.nibbles()[..self.depth()].to_vec()
    }

    /// Key with the bus byte inverted, as used by lsusb to order keys as fixed width hex text
    ///
    /// Not used for ordering here; integer comparison of [`LocationKey`] needs no inversion. Kept for debug output that matches the lsusb sort strings.
    pub fn sort_tag(&self) -> String {
        format!("{:#010x}", self.0 ^ BUS_INVERT)
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_up_to_truncation() {
        let paths: [&[u8]; 7] = [
            &[],
            &[1],
            &[15],
            &[1, 2, 3],
            &[9, 9, 9, 9, 9, 9],
            &[1, 2, 3, 4, 5, 6, 7],
            &[4, 3, 2, 1, 1, 2, 3],
        ];
        for path in paths {
            let key = LocationKey::new(7, path);
            let expected = &path[..path.len().min(MAX_KEY_DEPTH)];
            assert_eq!(key.ports(), expected, "path {:?}", path);
            assert_eq!(key.depth(), expected.len());
            assert_eq!(key.bus(), 7);
        }
    }

    #[test]
    fn test_ascending_keys_are_preorder() {
        let keys: Vec<LocationKey> = [&[][..], &[1], &[1, 2], &[2]]
            .iter()
            .map(|p| LocationKey::new(2, p))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_child_between_parent_and_later_sibling() {
        let parent = LocationKey::new(1, &[2]);
        let deep_child = LocationKey::new(1, &[2, 15, 15]);
        let sibling = LocationKey::new(1, &[3]);
        assert!(parent < deep_child);
        assert!(deep_child < sibling);
    }

    #[test]
    fn test_bus_orders_before_ports() {
        let last_on_bus_one = LocationKey::new(1, &[15, 15, 15, 15, 15, 15]);
        let bus_two = LocationKey::new(2, &[]);
        assert!(last_on_bus_one < bus_two);
    }

    #[test]
    fn test_port_nibble_masked() {
        assert_eq!(LocationKey::new(1, &[0x13]), LocationKey::new(1, &[3]));
    }

    #[test]
    fn test_display_and_sort_tag() {
        let key = LocationKey::new(1, &[3]);
        assert_eq!(key.to_string(), "0x01300000");
        assert_eq!(key.sort_tag(), "0xfe300000");
    }

    #[test]
    fn test_root_hub() {
        let key = LocationKey::new(4, &[]);
        assert!(key.is_root_hub());
        assert_eq!(key.port(), None);
        assert!(key.ports().is_empty());
        assert!(!LocationKey::new(4, &[1]).is_root_hub());
    }

    #[test]
    fn test_leading_zero_port_is_root_depth() {
        let key = LocationKey::new(1, &[0, 3]);
        assert_eq!(key.depth(), 0);
        assert!(key.is_root_hub());
        assert_eq!(key.sysfs_name(), "usb1");
    }
}
