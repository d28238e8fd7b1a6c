use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, info, trace, warn};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
use ringbuf::traits::Producer;
use ringbuf::HeapProd;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::midi_mapping::RawMessage;

const WAIT_SLICE: Duration = Duration::from_millis(50);

pub type MidiPublisher = HeapProd<RawMessage>;

pub struct MidiConnection {
    // Must stay alive for the callback to keep firing
    inner: MidiInputConnection<()>,
    port_name: String,
}

impl MidiConnection {
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    pub fn close(self) {
        let _ = self.inner.close();
    }
}

// Sleep for `total` in short slices. False if shutdown was raised meanwhile.
fn wait_unless(shutdown: &AtomicBool, total: Duration) -> bool {
    let deadline = Instant::now() + total;

    loop {
        if shutdown.load(Ordering::SeqCst) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        sleep(WAIT_SLICE.min(deadline - now));
    }
}

/// Poll until something turns up, sleeping `retry` between empty polls.
/// Only an interrupt ends the wait early.
pub fn wait_for_port<T, F>(
    mut poll: F,
    retry: Duration,
    shutdown: &AtomicBool,
) -> Result<Option<T>, BridgeError>
where
    F: FnMut() -> Result<Option<T>, BridgeError>,
{
    loop {
        if shutdown.load(Ordering::SeqCst) {
            return Ok(None);
        }

        if let Some(found) = poll()? {
            return Ok(Some(found));
        }

        info!("No MIDI ports available.");
        info!("Waiting for MIDI device to be connected...");

        if !wait_unless(shutdown, retry) {
            return Ok(None);
        }
    }
}

fn first_port(client_name: &str) -> Result<Option<(MidiInput, MidiInputPort, String)>, BridgeError> {
    let mut midi_in = MidiInput::new(client_name)?;
    midi_in.ignore(Ignore::None);

    let ports = midi_in.ports();
    debug!(
        "Found {} MIDI ports: [{}]",
        ports.len(),
        ports
            .iter()
            .filter_map(|port| midi_in.port_name(port).ok())
            .join(", ")
    );

    match ports.into_iter().next() {
        Some(port) => {
            let name = midi_in.port_name(&port)?;
            Ok(Some((midi_in, port, name)))
        }
        None => Ok(None),
    }
}

/// Open the first available input and push everything it sends into `publisher`.
pub fn connect_first(
    config: &BridgeConfig,
    mut publisher: MidiPublisher,
    shutdown: &AtomicBool,
) -> Result<Option<MidiConnection>, BridgeError> {
    let found = wait_for_port(
        || first_port(&config.client_name),
        config.port_retry,
        shutdown,
    )?;

    let (midi_in, port, port_name) = match found {
        Some(found) => found,
        None => return Ok(None),
    };

    info!("Opening MIDI port: {}", port_name);

    let inner = midi_in
        .connect(
            &port,
            "midi2osc-input",
            move |stamp, message, _| {
                trace!("{}: {:?} (len = {})", stamp, message, message.len());

                if let Some(raw) = RawMessage::from_bytes(message) {
                    if publisher.try_push(raw).is_err() {
                        warn!("MIDI pipe full, dropping {:?}", raw);
                    }
                }
            },
            (),
        )
        .map_err(|err| BridgeError::MidiConnect {
            port: port_name.clone(),
            reason: err.to_string(),
        })?;

    Ok(Some(MidiConnection { inner, port_name }))
}
