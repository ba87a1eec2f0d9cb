use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use satlink_rs::quant::read_samples;
use satlink_rs::utils::consts::{DEFAULT_OUTPUT_PATH, DEFAULT_QUANTIZATION_BITS};

#[derive(Parser)]
#[command(author, version, about = "Summarise an IQ sample file", long_about = None)]
struct Cli {
    #[arg(default_value = DEFAULT_OUTPUT_PATH)]
    input: PathBuf,
    /// Quantizer width the file was written with
    #[arg(short, long, default_value_t = DEFAULT_QUANTIZATION_BITS, value_parser = clap::value_parser!(u32).range(1..=16))]
    bits: u32,
}

fn main() -> std::io::Result<()> {
    let cli = Cli::parse();
    let samples = read_samples(BufReader::new(File::open(&cli.input)?))?;

    if samples.is_empty() {
        println!("{}: no samples", cli.input.display());
        return Ok(());
    }

    let n = samples.len() as f64;
    let min_code = -(1i32 << (cli.bits - 1));
    let max_code = (1i32 << (cli.bits - 1)) - 1;

    let mean_i = samples.iter().map(|&(i, _)| i as f64).sum::<f64>() / n;
    let mean_q = samples.iter().map(|&(_, q)| q as f64).sum::<f64>() / n;
    let rms_i = (samples.iter().map(|&(i, _)| (i as f64).powi(2)).sum::<f64>() / n).sqrt();
    let rms_q = (samples.iter().map(|&(_, q)| (q as f64).powi(2)).sum::<f64>() / n).sqrt();
    let saturated = samples
        .iter()
        .flat_map(|&(i, q)| [i as i32, q as i32])
        .filter(|&c| c <= min_code || c >= max_code)
        .count();

    println!("File:       {}", cli.input.display());
    println!("Samples:    {}", samples.len());
    println!("Mean I/Q:   {:.2} / {:.2}", mean_i, mean_q);
    println!("RMS I/Q:    {:.2} / {:.2}", rms_i, rms_q);
    println!(
        "Saturated:  {:.4}% of components",
        saturated as f64 / (2.0 * n) * 100.0
    );

    Ok(())
}
