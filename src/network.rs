use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::device::{Device, NetAddress};

/// Undirected graph of devices with a fixed home and a movable current node.
///
/// An edge means the two devices can reach each other directly.
#[derive(Debug, Clone)]
pub struct Network {
    devices: HashMap<NetAddress, Device>,
    links: HashMap<NetAddress, BTreeSet<NetAddress>>,
    home: NetAddress,
    current: NetAddress,
}

impl Network {
    /// Build a network around the player's home device.
    pub fn new(home: Device) -> Self {
        let address = home.address();
        let mut network = Self {
            devices: HashMap::new(),
            links: HashMap::new(),
            home: address,
            current: address,
        };
        network.add_device(home);
        network
    }

    /// The starting world: oracle and one neighbouring server.
    pub fn world() -> Self {
        let mut network = Self::new(Device::oracle());
        let zer0 = Device::generic("zer0's server", NetAddress::new(12345));
        let zer0_address = zer0.address();
        network.add_device(zer0);
        network.add_link(network.home, zer0_address);
        network
    }

    /// Add a device, replacing any device with the same address.
    ///
    /// The home device cannot be replaced.
    pub fn add_device(&mut self, device: Device) {
        let address = device.address();
        if address == self.home && self.devices.contains_key(&address) {
            debug!("refusing to replace home device at {address}");
            return;
        }
        self.links.entry(address).or_default();
        self.devices.insert(address, device);
    }

    /// Link two devices in both directions. Returns `false`, leaving the
    /// graph alone, unless both addresses hold a device.
    pub fn add_link(&mut self, first: NetAddress, second: NetAddress) -> bool {
        if !self.devices.contains_key(&first) || !self.devices.contains_key(&second) {
            debug!("add_link: ignoring {first} <-> {second}, missing device");
            return false;
        }
        self.links.entry(first).or_default().insert(second);
        self.links.entry(second).or_default().insert(first);
        true
    }

    pub fn current(&self) -> NetAddress {
        self.current
    }

    pub fn is_home(&self) -> bool {
        self.current == self.home
    }

    pub fn device(&self, address: NetAddress) -> Option<&Device> {
        self.devices.get(&address)
    }

    pub fn current_device(&self) -> &Device {
        &self.devices[&self.current]
    }

    pub fn current_device_mut(&mut self) -> &mut Device {
        self.devices
            .get_mut(&self.current)
            .expect("current address always names a device")
    }

    /// Addresses directly linked to the current device, in ascending order.
    pub fn scan(&self) -> Vec<NetAddress> {
        self.links
            .get(&self.current)
            .map(|neighbours| neighbours.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Move to any known device. Returns `false` for unknown addresses.
    pub fn connect(&mut self, address: NetAddress) -> bool {
        if self.devices.contains_key(&address) {
            debug!("connect: {} -> {}", self.current, address);
            self.current = address;
            true
        } else {
            debug!("connect: no device at {address}");
            false
        }
    }

    /// Return to the home device.
    pub fn disconnect(&mut self) {
        debug!("disconnect: {} -> {}", self.current, self.home);
        self.current = self.home;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_network() -> (Network, NetAddress, NetAddress) {
        let home = Device::generic("home", NetAddress::new(1));
        let other = Device::generic("other", NetAddress::new(2));
        let (home_address, other_address) = (home.address(), other.address());

        let mut network = Network::new(home);
        network.add_device(other);
        network.add_link(home_address, other_address);
        (network, home_address, other_address)
    }

    #[test]
    fn scan_from_home_lists_single_neighbour() {
        let (network, _, other) = two_node_network();
        assert_eq!(network.scan(), vec![other]);
    }

    #[test]
    fn links_are_symmetric() {
        let (mut network, home, other) = two_node_network();
        assert!(network.connect(other));
        assert_eq!(network.scan(), vec![home]);
    }

    #[test]
    fn scan_without_links_is_empty() {
        let network = Network::new(Device::generic("lonely", NetAddress::new(7)));
        assert!(network.scan().is_empty());
    }

    #[test]
    fn links_need_a_device_at_both_ends() {
        // Arrange
        let (mut network, home, other) = two_node_network();
        let ghost = NetAddress::new(404);

        // Act
        let linked = network.add_link(home, ghost);

        // Assert
        assert!(!linked);
        assert_eq!(network.scan(), vec![other]);
        assert!(network.connect(other));
        assert!(!network.add_link(ghost, other));
        assert_eq!(network.scan(), vec![home]);
    }

    #[test]
    fn connect_to_known_address_moves_current() {
        let (mut network, _, other) = two_node_network();

        assert!(network.connect(other));

        assert_eq!(network.current(), other);
        assert_eq!(network.current_device().name, "other");
    }

    #[test]
    fn connect_does_not_require_adjacency() {
        let (mut network, _, _) = two_node_network();
        network.add_device(Device::generic("far away", NetAddress::new(99)));

        assert!(network.connect(NetAddress::new(99)));
    }

    #[test]
    fn connect_to_unknown_address_fails_and_stays() {
        let (mut network, home, other) = two_node_network();
        assert!(network.connect(other));

        assert!(!network.connect(NetAddress::new(404)));

        assert_eq!(network.current(), other);
        assert_ne!(network.current(), home);
    }

    #[test]
    fn disconnect_always_returns_home() {
        let (mut network, home, other) = two_node_network();

        network.disconnect();
        assert_eq!(network.current(), home);

        network.connect(other);
        network.disconnect();
        assert_eq!(network.current(), home);
        assert!(network.is_home());
    }

    #[test]
    fn home_device_cannot_be_replaced() {
        let (mut network, home, _) = two_node_network();
        network.add_device(Device::generic("impostor", NetAddress::new(1)));
        assert_eq!(network.device(home).map(|d| d.name.as_str()), Some("home"));
    }

    #[test]
    fn world_links_oracle_to_zer0() {
        let network = Network::world();
        assert_eq!(network.current_device().name, "oracle");
        assert_eq!(network.scan(), vec![NetAddress::new(12345)]);
    }

    #[test]
    fn devices_keep_separate_file_systems() -> anyhow::Result<()> {
        let (mut network, _, other) = two_node_network();
        network.current_device_mut().file_system.cd("/home")?;

        network.connect(other);
        assert_eq!(network.current_device().file_system.pwd(), "/");

        network.disconnect();
        assert_eq!(network.current_device().file_system.pwd(), "/home");
        Ok(())
    }
}
