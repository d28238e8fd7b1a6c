use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

/*
    Compiled-in settings. The mapping itself lives in cue_mapping.
*/

pub struct BridgeConfig {
    pub client_name: String,
    pub local_addr: SocketAddrV4,
    pub remote_addr: SocketAddrV4,
    pub port_retry: Duration,
    pub pipe_capacity: usize,
    pub poll_interval: Duration,
    pub listen_timeout: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            client_name: "midi2osc".to_string(),
            local_addr: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8011),
            remote_addr: SocketAddrV4::new(Ipv4Addr::LOCALHOST, 8010),
            port_retry: Duration::from_secs(5),
            pipe_capacity: 100,
            poll_interval: Duration::from_micros(500),
            listen_timeout: Duration::from_millis(100),
        }
    }
}
