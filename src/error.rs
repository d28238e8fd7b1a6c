use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("could not initialise MIDI input: {0}")]
    MidiInit(#[from] midir::InitError),

    #[error("could not read MIDI port info: {0}")]
    PortInfo(#[from] midir::PortInfoError),

    #[error("could not connect MIDI port '{port}': {reason}")]
    MidiConnect { port: String, reason: String },

    #[error("OSC socket error: {0}")]
    Socket(#[from] std::io::Error),

    #[error("could not encode OSC packet: {0}")]
    Encode(#[from] rosc::OscError),

    #[error("could not install interrupt handler: {0}")]
    Signal(#[from] ctrlc::Error),
}
