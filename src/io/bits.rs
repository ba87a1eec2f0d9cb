//! Message bit stream input.
//!
//! The message file holds one ASCII `'0'` or `'1'` per bit. The first byte
//! that is neither ends the stream, so a trailing newline is harmless.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    pub fn from_ascii(byte: u8) -> Option<Self> {
        match byte {
            b'0' => Some(Bit::Zero),
            b'1' => Some(Bit::One),
            _ => None,
        }
    }

    pub fn is_one(self) -> bool {
        matches!(self, Bit::One)
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value { Bit::One } else { Bit::Zero }
    }
}

pub fn parse_bits(data: &[u8]) -> Vec<Bit> {
    data.iter()
        .map_while(|&b| Bit::from_ascii(b))
        .collect()
}

pub fn read_bits<R: Read>(reader: R) -> io::Result<Vec<Bit>> {
    let mut bits = Vec::new();
    for byte in BufReader::new(reader).bytes() {
        match Bit::from_ascii(byte?) {
            Some(bit) => bits.push(bit),
            None => break,
        }
    }
    Ok(bits)
}

pub fn read_bits_file(path: &Path) -> io::Result<Vec<Bit>> {
    read_bits(File::open(path)?)
}
