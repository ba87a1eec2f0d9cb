pub mod bits;
pub mod codes;

pub use bits::{Bit, parse_bits, read_bits, read_bits_file};
pub use codes::load_chip_codes;
