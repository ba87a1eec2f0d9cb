use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::utils::consts::PROGRESS_UPDATE_INTERVAL_MS;

/// Progress bar over message bits fed into the pipeline
pub fn bit_progress(total_bits: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bits);
    let style = ProgressStyle::default_bar()
        .template(templates::MODULATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(PROGRESS_UPDATE_INTERVAL_MS));
    pb
}

pub mod templates {
    pub const MODULATE: &str =
        "\u{f048a} TX   [{bar:30.cyan}] {percent}% ({pos}/{len} bits) {msg}";
}
