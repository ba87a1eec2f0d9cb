use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::SimResult;
use crate::spread::ChipCodes;

pub fn load_chip_codes(path: &Path) -> SimResult<ChipCodes> {
    parse_chip_codes(File::open(path)?)
}

pub fn parse_chip_codes<R: Read>(reader: R) -> SimResult<ChipCodes> {
    let codes = serde_json::from_reader(BufReader::new(reader))?;
    Ok(codes)
}
