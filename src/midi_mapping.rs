use crate::event_model::{classify, MidiEvent};

/*
    midir hands us whatever the device sent, so lengths vary:
        [status, data1, data2] for notes and CC
        [status, program] for a real program change
        [status] for realtime/system bytes
    Missing data bytes read as 0, anything past the third byte is ignored.
*/

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct RawMessage {
    pub status: u8,
    pub data1: u8,
    pub data2: u8,
}

impl RawMessage {
    pub fn new(status: u8, data1: u8, data2: u8) -> RawMessage {
        RawMessage {
            status,
            data1,
            data2,
        }
    }

    pub fn from_bytes(message: &[u8]) -> Option<RawMessage> {
        let (&status, data) = message.split_first()?;

        Some(RawMessage::new(
            status,
            data.first().copied().unwrap_or(0),
            data.get(1).copied().unwrap_or(0),
        ))
    }
}

pub fn decode(raw: RawMessage) -> Option<MidiEvent> {
    classify(raw.status).map(|category| MidiEvent {
        category,
        controller: raw.data1,
        data: raw.data2,
    })
}
