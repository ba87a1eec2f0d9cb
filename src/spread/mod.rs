pub mod chip_table;
pub mod modulator;

pub use chip_table::{ChipCodes, ChipTable};
pub use modulator::{Spreader, spread};
