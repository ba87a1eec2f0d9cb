//! Interactive parameter collection. Every prompt is pre-filled with the
//! current value, so pressing enter keeps it.

use dialoguer::{Confirm, Input};

use crate::error::SimResult;
use crate::sim::SimConfig;

fn ask_f64(prompt: &str, current: f64) -> SimResult<f64> {
    let value = Input::<f64>::new()
        .with_prompt(prompt)
        .default(current)
        .interact_text()?;
    Ok(value)
}

fn ask_bool(prompt: &str, current: bool) -> SimResult<bool> {
    let value = Confirm::new()
        .with_prompt(prompt)
        .default(current)
        .interact()?;
    Ok(value)
}

pub fn prompt_config(config: &SimConfig) -> SimResult<SimConfig> {
    let mut config = config.clone();

    config.doppler_update_period_s =
        ask_f64("Doppler shift update period [s]", config.doppler_update_period_s)?;
    config.pathloss_update_period_s =
        ask_f64("Path loss update period [s]", config.pathloss_update_period_s)?;
    config.doppler_freq_max_hz = ask_f64("Doppler shift max freq [Hz]", config.doppler_freq_max_hz)?;
    config.doppler_freq_min_hz = ask_f64("Doppler shift min freq [Hz]", config.doppler_freq_min_hz)?;
    config.pathloss_min_db = ask_f64("Path loss gain min value [dB]", config.pathloss_min_db)?;
    config.pathloss_max_db = ask_f64("Path loss gain max value [dB]", config.pathloss_max_db)?;
    config.snr_db = ask_f64("SNR [dB]", config.snr_db)?;
    config.apply_pathloss = ask_bool("Insert path loss?", config.apply_pathloss)?;
    config.apply_awgn = ask_bool("Insert AWGN?", config.apply_awgn)?;

    Ok(config)
}

pub fn prompt_write_output(current: bool) -> SimResult<bool> {
    ask_bool("Write IQ samples output?", current)
}
