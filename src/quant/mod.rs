pub mod quantizer;
pub mod writer;

pub use quantizer::{Quantizer, quantize};
pub use writer::{IqWriter, SampleSink, read_samples};
