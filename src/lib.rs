pub mod channel;
pub mod error;
pub mod io;
pub mod quant;
pub mod sim;
pub mod spread;
pub mod ui;
pub mod utils;

pub use error::{SimError, SimResult};
