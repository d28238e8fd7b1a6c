use std::io::ErrorKind;
use std::net::{SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};
use rosc::{decoder, encoder, OscPacket};

use crate::error::BridgeError;
use crate::osc_model;
use crate::translator::OscOutput;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum LinkState {
    Closed,
    Ready,
}

pub struct OscClient {
    socket: Option<UdpSocket>,
    target_addr: SocketAddrV4,
    state: LinkState,
}

impl OscClient {
    pub fn new(target_addr: SocketAddrV4) -> OscClient {
        OscClient {
            socket: None,
            target_addr,
            state: LinkState::Closed,
        }
    }

    // Ready as soon as the bind returns, nothing is exchanged with the target first
    pub fn open(&mut self, local_addr: SocketAddrV4) -> Result<(), BridgeError> {
        let socket = UdpSocket::bind(local_addr)?;
        socket.set_write_timeout(Some(Duration::from_millis(1)))?;

        self.socket = Some(socket);
        self.state = LinkState::Ready;
        Ok(())
    }

    pub fn close(&mut self) {
        self.socket = None;
        self.state = LinkState::Closed;
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.socket.as_ref().and_then(|socket| socket.local_addr().ok())
    }

    /// Dropped without error while the link is closed.
    pub fn send_packet(&mut self, packet: &OscPacket) -> Result<(), BridgeError> {
        let socket = match (&self.socket, self.state) {
            (Some(socket), LinkState::Ready) => socket,
            _ => return Ok(()),
        };

        let msg_buf = encoder::encode(packet)?;
        socket.send_to(&msg_buf, self.target_addr)?;
        Ok(())
    }

    /// Log whatever arrives on the bound port until `shutdown` is raised.
    pub fn listen(
        &self,
        read_timeout: Duration,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Option<JoinHandle<()>>, BridgeError> {
        let socket = match &self.socket {
            Some(socket) => socket.try_clone()?,
            None => return Ok(None),
        };
        socket.set_read_timeout(Some(read_timeout))?;

        let handle = thread::spawn(move || {
            let mut buf = [0u8; decoder::MTU];

            while !shutdown.load(Ordering::SeqCst) {
                match socket.recv_from(&mut buf) {
                    Ok((size, from)) => match decoder::decode_udp(&buf[..size]) {
                        Ok((_, packet)) => info!("Received OSC from {}: {:?}", from, packet),
                        Err(err) => warn!("Undecodable OSC datagram from {}: {}", from, err),
                    },
                    Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {}
                    Err(err) => {
                        warn!("OSC listener stopped: {}", err);
                        break;
                    }
                }
            }
        });

        Ok(Some(handle))
    }
}

impl OscOutput for OscClient {
    fn is_ready(&self) -> bool {
        self.state == LinkState::Ready
    }

    fn send(&mut self, address: &str, value: f32) -> Result<(), BridgeError> {
        self.send_packet(&osc_model::create_value_message(address, value))
    }
}
