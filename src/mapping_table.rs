use std::collections::HashMap;

use crate::event_model::MidiEventCategory;

/// How the incoming data byte becomes the OSC argument.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum ValueTransform {
    /// Button-style trigger, data is ignored.
    Constant(f32),
    /// `data / divisor`, e.g. 127 for a 0.0-1.0 fader.
    LinearNormalize { divisor: f32 },
    /// Raw data byte as a float.
    Identity,
}

impl Default for ValueTransform {
    fn default() -> Self {
        ValueTransform::Constant(1.0)
    }
}

impl ValueTransform {
    /// `None` is the no-argument form used by program change. Always returns a finite value.
    pub fn apply(&self, data: Option<u8>) -> f32 {
        let value = match (self, data) {
            (ValueTransform::Constant(value), _) => *value,
            (ValueTransform::LinearNormalize { divisor }, Some(data)) => data as f32 / divisor,
            (ValueTransform::Identity, Some(data)) => data as f32,
            (_, None) => 0.0,
        };

        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

#[derive(PartialEq, Clone, Debug)]
pub struct Mapping {
    pub address: String,
    pub transform: ValueTransform,
}

impl Mapping {
    pub fn trigger(address: &str) -> Mapping {
        Mapping {
            address: address.to_string(),
            transform: ValueTransform::default(),
        }
    }

    pub fn fader(address: &str) -> Mapping {
        Mapping {
            address: address.to_string(),
            transform: ValueTransform::LinearNormalize { divisor: 127.0 },
        }
    }

    /// Empty addresses are placeholders with nowhere to send to.
    pub fn has_target(&self) -> bool {
        !self.address.is_empty()
    }
}

#[derive(Default, Debug)]
pub struct MappingTable {
    entries: HashMap<(MidiEventCategory, u8), Mapping>,
}

impl MappingTable {
    // Later entries for the same (category, controller) replace earlier ones
    pub fn from_entries<I>(entries: I) -> MappingTable
    where
        I: IntoIterator<Item = (MidiEventCategory, u8, Mapping)>,
    {
        let entries = entries
            .into_iter()
            .map(|(category, controller, mapping)| ((category, controller), mapping))
            .collect();

        MappingTable { entries }
    }

    pub fn lookup(&self, category: MidiEventCategory, controller: u8) -> Option<&Mapping> {
        self.entries.get(&(category, controller))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sorted by category then controller, for stable logging.
    pub fn entries(&self) -> Vec<(MidiEventCategory, u8, &Mapping)> {
        let mut sorted: Vec<_> = self
            .entries
            .iter()
            .map(|(&(category, controller), mapping)| (category, controller, mapping))
            .collect();
        sorted.sort_by_key(|(category, controller, _)| (*category, *controller));
        sorted
    }
}
