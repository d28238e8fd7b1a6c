use log::{debug, info};

use crate::error::BridgeError;
use crate::event_model::{MidiEvent, MidiEventCategory};
use crate::mapping_table::MappingTable;
use crate::midi_mapping::{self, RawMessage};

/// The sending end as seen by the translator.
pub trait OscOutput {
    fn is_ready(&self) -> bool;
    fn send(&mut self, address: &str, value: f32) -> Result<(), BridgeError>;
}

/// What happened to one incoming message.
#[derive(PartialEq, Debug)]
pub enum Translation {
    Unhandled(u8),
    Unmapped(MidiEvent),
    NotReady { address: String, value: f32 },
    Sent { address: String, value: f32 },
}

pub struct Translator<'a> {
    table: &'a MappingTable,
}

impl<'a> Translator<'a> {
    pub fn new(table: &'a MappingTable) -> Translator<'a> {
        Translator { table }
    }

    /// At most one send per call. Nothing is remembered between calls.
    pub fn translate<O: OscOutput>(
        &self,
        raw: RawMessage,
        output: &mut O,
    ) -> Result<Translation, BridgeError> {
        let event = match midi_mapping::decode(raw) {
            Some(event) => event,
            None => {
                debug!("Ignoring unhandled status {:#04x}", raw.status);
                return Ok(Translation::Unhandled(raw.status));
            }
        };

        log_event(&event);

        let mapping = match self.table.lookup(event.category, event.controller) {
            Some(mapping) if mapping.has_target() => mapping,
            _ => {
                debug!("No mapping for {:?} {}", event.category, event.controller);
                return Ok(Translation::Unmapped(event));
            }
        };

        let value = mapping.transform.apply(event.data_arg());
        let address = mapping.address.clone();

        if !output.is_ready() {
            debug!("OSC port not ready, dropping {} {}", address, value);
            return Ok(Translation::NotReady { address, value });
        }

        output.send(&address, value)?;
        info!("Sent OSC message: {} {}", address, value);

        Ok(Translation::Sent { address, value })
    }
}

fn log_event(event: &MidiEvent) {
    match event.category {
        MidiEventCategory::NoteOn => {
            info!("Note On: {} Velocity: {}", event.controller, event.data)
        }
        MidiEventCategory::NoteOff => {
            info!("Note Off: {} Velocity: {}", event.controller, event.data)
        }
        MidiEventCategory::ControlChange => {
            info!("Control Change: {} Value: {}", event.controller, event.data)
        }
        MidiEventCategory::ProgramChange => info!("Program Change: {}", event.controller),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue_mapping;
    use crate::mapping_table::{Mapping, ValueTransform};
    use std::io;

    #[derive(Default)]
    struct Recorder {
        ready: bool,
        sent: Vec<(String, f32)>,
    }

    impl Recorder {
        fn ready() -> Recorder {
            Recorder {
                ready: true,
                sent: Vec::new(),
            }
        }
    }

    impl OscOutput for Recorder {
        fn is_ready(&self) -> bool {
            self.ready
        }

        fn send(&mut self, address: &str, value: f32) -> Result<(), BridgeError> {
            self.sent.push((address.to_string(), value));
            Ok(())
        }
    }

    struct Failing;

    impl OscOutput for Failing {
        fn is_ready(&self) -> bool {
            true
        }

        fn send(&mut self, _: &str, _: f32) -> Result<(), BridgeError> {
            Err(BridgeError::Socket(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "refused",
            )))
        }
    }

    fn test_table() -> MappingTable {
        MappingTable::from_entries([
            (MidiEventCategory::NoteOn, 40, Mapping::trigger("/cues/col_1")),
            (MidiEventCategory::ControlChange, 16, Mapping::trigger("/cues/col_9")),
            (MidiEventCategory::ControlChange, 73, Mapping::fader("/master")),
            (MidiEventCategory::ProgramChange, 4, Mapping::trigger("/cues/col_17")),
            (MidiEventCategory::NoteOn, 50, Mapping::trigger("")),
        ])
    }

    #[test]
    fn unhandled_status_never_sends() {
        let table = test_table();
        let translator = Translator::new(&table);
        let mut out = Recorder::ready();

        for status in [0xA0u8, 0xD0, 0xE0, 0xF0, 0xF8, 0x00, 0x7F] {
            let result = translator
                .translate(RawMessage::new(status, 40, 100), &mut out)
                .unwrap();
            assert_eq!(result, Translation::Unhandled(status));
        }
        assert!(out.sent.is_empty());
    }

    #[test]
    fn unmapped_controller_never_sends() {
        let table = test_table();
        let translator = Translator::new(&table);
        let mut out = Recorder::ready();

        for data in [0u8, 64, 127] {
            translator
                .translate(RawMessage::new(0x90, 41, data), &mut out)
                .unwrap();
            translator
                .translate(RawMessage::new(0xB0, 40, data), &mut out)
                .unwrap();
            // Note off shares the note number but not the category
            translator
                .translate(RawMessage::new(0x80, 40, data), &mut out)
                .unwrap();
        }
        assert!(out.sent.is_empty());
    }

    #[test]
    fn empty_address_is_treated_as_unmapped() {
        let table = test_table();
        let translator = Translator::new(&table);
        let mut out = Recorder::ready();

        let result = translator
            .translate(RawMessage::new(0x90, 50, 100), &mut out)
            .unwrap();
        assert!(matches!(result, Translation::Unmapped(_)));
        assert!(out.sent.is_empty());
    }

    #[test]
    fn note_on_sends_constant_only_when_ready() {
        let table = test_table();
        let translator = Translator::new(&table);

        let mut ready = Recorder::ready();
        translator
            .translate(RawMessage::new(0x90, 40, 37), &mut ready)
            .unwrap();
        assert_eq!(ready.sent, vec![("/cues/col_1".to_string(), 1.0)]);

        let mut closed = Recorder::default();
        let result = translator
            .translate(RawMessage::new(0x90, 40, 37), &mut closed)
            .unwrap();
        assert_eq!(
            result,
            Translation::NotReady {
                address: "/cues/col_1".to_string(),
                value: 1.0
            }
        );
        assert!(closed.sent.is_empty());
    }

    #[test]
    fn control_change_normalizes() {
        let table = test_table();
        let translator = Translator::new(&table);
        let mut out = Recorder::ready();

        translator
            .translate(RawMessage::new(0xB0, 73, 127), &mut out)
            .unwrap();
        translator
            .translate(RawMessage::new(0xB0, 73, 0), &mut out)
            .unwrap();

        assert_eq!(out.sent.len(), 2);
        assert!((out.sent[0].1 - 1.0).abs() < 1e-6);
        assert_eq!(out.sent[1].1, 0.0);
    }

    #[test]
    fn program_change_ignores_data() {
        let table = test_table();
        let translator = Translator::new(&table);
        let mut out = Recorder::ready();

        translator
            .translate(RawMessage::new(0xC0, 4, 0), &mut out)
            .unwrap();
        translator
            .translate(RawMessage::new(0xC0, 4, 127), &mut out)
            .unwrap();

        assert_eq!(
            out.sent,
            vec![
                ("/cues/col_17".to_string(), 1.0),
                ("/cues/col_17".to_string(), 1.0)
            ]
        );
    }

    #[test]
    fn program_change_passes_no_data_to_transform() {
        let table = MappingTable::from_entries([(
            MidiEventCategory::ProgramChange,
            2,
            Mapping {
                address: "/identity".to_string(),
                transform: ValueTransform::Identity,
            },
        )]);
        let translator = Translator::new(&table);
        let mut out = Recorder::ready();

        translator
            .translate(RawMessage::new(0xC0, 2, 90), &mut out)
            .unwrap();
        assert_eq!(out.sent, vec![("/identity".to_string(), 0.0)]);
    }

    #[test]
    fn same_message_twice_sends_twice() {
        let table = test_table();
        let translator = Translator::new(&table);
        let mut out = Recorder::ready();

        let raw = RawMessage::new(0xB0, 16, 127);
        let first = translator.translate(raw, &mut out).unwrap();
        let second = translator.translate(raw, &mut out).unwrap();

        assert_eq!(first, second);
        assert_eq!(out.sent.len(), 2);
        assert_eq!(out.sent[0], out.sent[1]);
    }

    #[test]
    fn send_errors_are_returned_once() {
        let table = test_table();
        let translator = Translator::new(&table);

        let result = translator.translate(RawMessage::new(0x90, 40, 100), &mut Failing);
        assert!(matches!(result, Err(BridgeError::Socket(_))));
    }

    #[test]
    fn pad_press_hits_first_cell() {
        let translator = Translator::new(cue_mapping::table());
        let mut out = Recorder::ready();

        translator
            .translate(RawMessage::new(0x90, 40, 100), &mut out)
            .unwrap();
        assert_eq!(
            out.sent,
            vec![("/cues/selected/scenes/by_cell/col_1".to_string(), 1.0)]
        );
    }

    #[test]
    fn master_knob_sets_level() {
        let translator = Translator::new(cue_mapping::table());
        let mut out = Recorder::ready();

        translator
            .translate(RawMessage::new(0xB0, 73, 64), &mut out)
            .unwrap();
        assert_eq!(out.sent.len(), 1);
        assert_eq!(out.sent[0].0, "/master/master_dmx_level");
        assert!((out.sent[0].1 - 0.504).abs() < 1e-3);
    }

    #[test]
    fn channel_nibble_does_not_matter() {
        let translator = Translator::new(cue_mapping::table());
        let mut out = Recorder::ready();

        translator
            .translate(RawMessage::new(0x9F, 40, 1), &mut out)
            .unwrap();
        translator
            .translate(RawMessage::new(0xC9, 0, 0), &mut out)
            .unwrap();
        assert_eq!(
            out.sent,
            vec![
                ("/cues/selected/scenes/by_cell/col_1".to_string(), 1.0),
                ("/cues/selected/scenes/by_cell/col_21".to_string(), 1.0)
            ]
        );
    }
}
