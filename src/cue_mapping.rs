use std::sync::OnceLock;

use crate::event_model::MidiEventCategory::{self, ControlChange, NoteOn, ProgramChange};
use crate::mapping_table::{Mapping, MappingTable};

/*
    Controller layout:
        pads (note on): 40-43 top row, 36-39 bottom row -> cells 1-8
        buttons (cc):   16-19 top row, 12-15 bottom row -> cells 9-16
        knob (cc 73):   master dmx level
        programs:       4-7 top row, 0-3 bottom row     -> cells 17-24
    Note off is never mapped.
*/

const CELL_PREFIX: &str = "/cues/selected/scenes/by_cell/col_";

const PAD_NOTES: [u8; 8] = [40, 41, 42, 43, 36, 37, 38, 39];
const BUTTON_CCS: [u8; 8] = [16, 17, 18, 19, 12, 13, 14, 15];
const PROGRAMS: [u8; 8] = [4, 5, 6, 7, 0, 1, 2, 3];

const MASTER_LEVEL_CC: u8 = 73;
const MASTER_LEVEL_ADDR: &str = "/master/master_dmx_level";

fn cell(column: usize) -> Mapping {
    Mapping::trigger(&format!("{}{}", CELL_PREFIX, column))
}

// Consecutive cells starting at first_column, in controller order
fn cell_row(
    category: MidiEventCategory,
    controllers: &'static [u8],
    first_column: usize,
) -> impl Iterator<Item = (MidiEventCategory, u8, Mapping)> {
    controllers
        .iter()
        .enumerate()
        .map(move |(offset, &controller)| (category, controller, cell(first_column + offset)))
}

pub fn build() -> MappingTable {
    let faders = [(
        ControlChange,
        MASTER_LEVEL_CC,
        Mapping::fader(MASTER_LEVEL_ADDR),
    )];

    // CC 70 -> col_25 is left out on purpose
    MappingTable::from_entries(
        cell_row(NoteOn, &PAD_NOTES, 1)
            .chain(cell_row(ControlChange, &BUTTON_CCS, 9))
            .chain(faders)
            .chain(cell_row(ProgramChange, &PROGRAMS, 17)),
    )
}

/// The process-wide table, built on first use.
pub fn table() -> &'static MappingTable {
    static TABLE: OnceLock<MappingTable> = OnceLock::new();
    TABLE.get_or_init(build)
}
