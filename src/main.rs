use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{sleep, JoinHandle};

use env_logger::Env;
use log::{debug, error, info, warn};
use ringbuf::traits::{Consumer, Split};
use ringbuf::HeapRb;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::midi_mapping::RawMessage;
use crate::midi_reading::MidiConnection;
use crate::osc_client::OscClient;
use crate::translator::Translator;

mod config;
mod cue_mapping;
mod error;
mod event_model;
mod mapping_table;
mod midi_mapping;
mod midi_reading;
mod osc_client;
mod osc_model;
mod translator;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    match run() {
        Ok(_) => (),
        Err(err) => {
            error!("Error: {}", err);
            process::exit(1);
        }
    }
}

fn run() -> Result<(), BridgeError> {
    let config = BridgeConfig::default();

    let table = cue_mapping::table();
    if table.is_empty() {
        warn!("Mapping table is empty, nothing will be forwarded");
    } else {
        info!("Loaded {} mappings", table.len());
    }
    for (category, controller, mapping) in table.entries() {
        debug!(
            "{:?} {} -> {} ({:?})",
            category, controller, mapping.address, mapping.transform
        );
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    let handler_flag = shutdown.clone();
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
    })?;

    // midir callback thread -> translation loop
    let (midi_pub, mut midi_sub) = HeapRb::<RawMessage>::new(config.pipe_capacity).split();

    info!("Opening OSC port...");
    let mut client = OscClient::new(config.remote_addr);
    client.open(config.local_addr)?;
    if let Some(local) = client.local_addr() {
        info!("OSC port open on {}, sending to {}", local, config.remote_addr);
    }
    let listener = client.listen(config.listen_timeout, shutdown.clone())?;

    let connection = match midi_reading::connect_first(&config, midi_pub, &shutdown) {
        Ok(connection) => connection,
        Err(err) => {
            shutdown.store(true, Ordering::SeqCst);
            close_all(None, &mut client, listener);
            return Err(err);
        }
    };

    if let Some(connection) = &connection {
        info!("Listening for MIDI messages on '{}'...", connection.port_name());
    }

    // Readiness is only ever read and written on this thread
    let translator = Translator::new(table);
    while !shutdown.load(Ordering::SeqCst) {
        while let Some(raw) = midi_sub.try_pop() {
            if let Err(err) = translator.translate(raw, &mut client) {
                warn!("Could not forward {:?}: {}", raw, err);
            }
        }

        sleep(config.poll_interval);
    }

    close_all(connection, &mut client, listener);
    Ok(())
}

fn close_all(
    connection: Option<MidiConnection>,
    client: &mut OscClient,
    listener: Option<JoinHandle<()>>,
) {
    info!("Closing MIDI port...");
    if let Some(connection) = connection {
        connection.close();
    }

    info!("Closing OSC port...");
    client.close();
    debug!("OSC link {:?}", client.state());

    if let Some(listener) = listener {
        if listener.join().is_err() {
            warn!("OSC listener panicked");
        }
    }
}
