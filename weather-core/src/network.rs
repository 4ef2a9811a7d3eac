use std::fmt::Debug;

/// Transport of the currently active network, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Wifi,
    Cellular,
    Ethernet,
    Bluetooth,
    Vpn,
    Other,
}

/// Host network-status service.
pub trait NetworkStatus: Send + Sync + Debug {
    /// Transport of the active network, or `None` when there is no active network.
    fn active_transport(&self) -> Option<Transport>;
}

/// Only Wi-Fi, cellular and ethernet count as usable connectivity.
pub fn is_network_available(status: &dyn NetworkStatus) -> bool {
    matches!(
        status.active_transport(),
        Some(Transport::Wifi | Transport::Cellular | Transport::Ethernet)
    )
}

/// Network status that always reports the same transport.
#[derive(Debug, Clone, Copy)]
pub struct StaticNetwork(pub Option<Transport>);

impl NetworkStatus for StaticNetwork {
    fn active_transport(&self) -> Option<Transport> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wifi_cellular_ethernet_are_available() {
        for transport in [Transport::Wifi, Transport::Cellular, Transport::Ethernet] {
            assert!(is_network_available(&StaticNetwork(Some(transport))));
        }
    }

    #[test]
    fn other_transports_are_unavailable() {
        for transport in [Transport::Bluetooth, Transport::Vpn, Transport::Other] {
            assert!(!is_network_available(&StaticNetwork(Some(transport))));
        }
        assert!(!is_network_available(&StaticNetwork(None)));
    }
}
