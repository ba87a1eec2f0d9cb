pub mod config;
pub mod pipeline;
pub mod report;

pub use config::SimConfig;
pub use pipeline::{ChannelPlan, Pipeline, RunSummary};
pub use report::{NullReporter, Reporter, Stage, WavReporter};
