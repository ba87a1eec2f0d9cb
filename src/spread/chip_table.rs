//! PRN / BOC(1,1) chip lookup table.
//!
//! The table holds the four precomputed chip sequences: the PRN code and its
//! inverse, and the same pair already sub-modulated with the BOC(1,1) square
//! sub-carrier (twice as many chips).

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::io::Bit;

/// Raw chip table record as stored in `codes.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipCodes {
    pub prn_sequence: Vec<f64>,
    pub prn_sequence_inverse: Vec<f64>,
    pub boc_sequence: Vec<f64>,
    pub boc_sequence_inverse: Vec<f64>,
    #[serde(alias = "prn_lenght")]
    pub prn_length: usize,
}

/// Validated, immutable chip table
#[derive(Debug, Clone)]
pub struct ChipTable {
    codes: ChipCodes,
}

impl ChipTable {
    pub fn new(codes: ChipCodes) -> SimResult<Self> {
        let prn_length = codes.prn_length;
        if prn_length == 0 {
            return Err(SimError::config("prn_length must be positive"));
        }

        let expected = [
            ("prn_sequence", &codes.prn_sequence, prn_length),
            ("prn_sequence_inverse", &codes.prn_sequence_inverse, prn_length),
            ("boc_sequence", &codes.boc_sequence, 2 * prn_length),
            ("boc_sequence_inverse", &codes.boc_sequence_inverse, 2 * prn_length),
        ];
        for (name, sequence, length) in expected {
            if sequence.len() != length {
                return Err(SimError::config(format!(
                    "{} has {} chips, expected {}",
                    name,
                    sequence.len(),
                    length
                )));
            }
            if sequence.iter().any(|c| !c.is_finite()) {
                return Err(SimError::config(format!(
                    "{} contains a non-finite chip",
                    name
                )));
            }
        }

        Ok(Self { codes })
    }

    /// Chip sequence for `bit`; `spread` selects the BOC(1,1) version.
    /// A one bit maps to the inverted sequence.
    pub fn lookup(&self, bit: Bit, spread: bool) -> &[f64] {
        match (spread, bit.is_one()) {
            (false, false) => &self.codes.prn_sequence,
            (false, true) => &self.codes.prn_sequence_inverse,
            (true, false) => &self.codes.boc_sequence,
            (true, true) => &self.codes.boc_sequence_inverse,
        }
    }

    pub fn prn_length(&self) -> usize {
        self.codes.prn_length
    }

    pub fn boc_length(&self) -> usize {
        2 * self.codes.prn_length
    }
}
