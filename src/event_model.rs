/*
    Status bytes, high nibble only (low nibble is the channel):
        note off: 0x80, note on: 0x90, control change: 0xB0, program change: 0xC0
    Everything else (aftertouch, pitch bend, system messages) is unhandled.
*/

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, PartialOrd, Ord)]
pub enum MidiEventCategory {
    NoteOn,
    NoteOff,
    ControlChange,
    ProgramChange,
}

/// Classify a raw status byte. `None` means the message is not one we translate.
pub fn classify(status: u8) -> Option<MidiEventCategory> {
    match status & 0xF0 {
        0x90 => Some(MidiEventCategory::NoteOn),
        0x80 => Some(MidiEventCategory::NoteOff),
        0xB0 => Some(MidiEventCategory::ControlChange),
        0xC0 => Some(MidiEventCategory::ProgramChange),
        _ => None,
    }
}

// controller is the note, CC or program number; data is velocity or CC value
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct MidiEvent {
    pub category: MidiEventCategory,
    pub controller: u8,
    pub data: u8,
}

impl MidiEvent {
    /// Program change carries no data byte worth reading.
    pub fn data_arg(&self) -> Option<u8> {
        match self.category {
            MidiEventCategory::ProgramChange => None,
            _ => Some(self.data),
        }
    }
}
