use clap::Parser;
use indicatif::ProgressIterator;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{error, info};

use satlink_rs::SimResult;
use satlink_rs::io::{load_chip_codes, read_bits_file};
use satlink_rs::quant::{IqWriter, SampleSink};
use satlink_rs::sim::{NullReporter, Pipeline, Reporter, SimConfig, WavReporter};
use satlink_rs::spread::ChipTable;
use satlink_rs::ui::print_banner;
use satlink_rs::ui::progress::bit_progress;
use satlink_rs::ui::prompt::{prompt_config, prompt_write_output};
use satlink_rs::utils::consts::*;
use satlink_rs::utils::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about = "Satellite transmitter channel simulator", long_about = None)]
struct Cli {
    /// Chip table with PRN and BOC(1,1) sequences (JSON)
    #[arg(short, long, default_value = DEFAULT_CODES_PATH)]
    codes: PathBuf,
    /// Message as ASCII '0'/'1' characters
    #[arg(short, long, default_value = DEFAULT_MESSAGE_PATH)]
    message: PathBuf,
    /// IQ sample output; no samples are written when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Channel configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Ask for every channel parameter
    #[arg(short, long)]
    interactive: bool,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    no_pathloss: bool,
    #[arg(long)]
    no_awgn: bool,
    /// Directory for per-stage IQ WAV captures
    #[arg(long)]
    report_dir: Option<PathBuf>,
}

fn main() {
    init_logging();
    print_banner();

    if let Err(err) = run(Cli::parse()) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> SimResult<()> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::default(),
    };

    let mut write_output = cli.output.is_some();
    if cli.interactive {
        config = prompt_config(&config)?;
        write_output = prompt_write_output(write_output)?;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.no_pathloss {
        config.apply_pathloss = false;
    }
    if cli.no_awgn {
        config.apply_awgn = false;
    }

    let table = ChipTable::new(load_chip_codes(&cli.codes)?)?;
    info!(
        "Loaded chip table: PRN length {}, BOC length {}",
        table.prn_length(),
        table.boc_length()
    );
    let pipeline = Pipeline::new(config, table)?;
    info!(
        "Quantizer: {} bits over +/-{:.4}",
        pipeline.quantizer().bits(),
        pipeline.quantizer().v_sat()
    );

    let bits = read_bits_file(&cli.message)?;
    info!("Read {} message bits from {}", bits.len(), cli.message.display());

    let mut sink: Box<dyn SampleSink> = if write_output {
        let path = cli
            .output
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH));
        info!("Writing IQ samples to {}", path.display());
        Box::new(IqWriter::new(BufWriter::new(File::create(&path)?)))
    } else {
        Box::new(IqWriter::new(std::io::sink()))
    };

    let mut reporter: Box<dyn Reporter> = match &cli.report_dir {
        Some(dir) => Box::new(WavReporter::new(
            dir,
            pipeline.config().sample_rate_hz,
            REPORT_MAX_SAMPLES,
        )?),
        None => Box::new(NullReporter),
    };

    let mut rng = pipeline.seeded_rng();
    let plan = pipeline.plan(bits.len(), &mut rng)?;

    let pb = bit_progress(bits.len() as u64, "modulating");
    let summary = pipeline.execute(
        plan,
        bits.iter().copied().progress_with(pb.clone()),
        sink.as_mut(),
        reporter.as_mut(),
    )?;
    pb.finish_with_message("done");

    println!(
        "{} bits -> {} chips -> {} IQ samples ({:.3} s at {:.3} MHz)",
        summary.bits,
        summary.chips,
        summary.output_samples,
        summary.signal_duration_s,
        pipeline.config().sample_rate_hz / 1e6
    );
    Ok(())
}
