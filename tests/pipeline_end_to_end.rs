use num_complex::Complex64;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use satlink_rs::SimError;
use satlink_rs::SimResult;
use satlink_rs::channel::ChipResampler;
use satlink_rs::io::{Bit, parse_bits};
use satlink_rs::quant::{IqWriter, read_samples};
use satlink_rs::sim::{NullReporter, Pipeline, Reporter, SimConfig, Stage};
use satlink_rs::spread::{ChipCodes, ChipTable, spread};

fn short_codes() -> ChipCodes {
    ChipCodes {
        prn_sequence: vec![1.0, -1.0],
        prn_sequence_inverse: vec![-1.0, 1.0],
        boc_sequence: vec![1.0, 1.0, -1.0, -1.0],
        boc_sequence_inverse: vec![-1.0, -1.0, 1.0, 1.0],
        prn_length: 2,
    }
}

/// Pseudo-random ±1 code of `length` chips with its BOC(1,1) expansion.
fn long_codes(length: usize) -> ChipCodes {
    let mut state: u16 = 0b1010_1100_1110_0001;
    let prn: Vec<f64> = (0..length)
        .map(|_| {
            let bit = (state ^ (state >> 2) ^ (state >> 3) ^ (state >> 5)) & 1;
            state = (state >> 1) | (bit << 15);
            if bit == 1 { -1.0 } else { 1.0 }
        })
        .collect();
    let boc: Vec<f64> = prn.iter().flat_map(|&c| [c, -c]).collect();

    ChipCodes {
        prn_sequence_inverse: prn.iter().map(|c| -c).collect(),
        boc_sequence_inverse: boc.iter().map(|c| -c).collect(),
        prn_sequence: prn,
        boc_sequence: boc,
        prn_length: length,
    }
}

fn message(n: usize) -> Vec<Bit> {
    (0..n).map(|i| Bit::from((i * 7 + 3) % 5 < 2)).collect()
}

#[derive(Default)]
struct Capture {
    batches: Vec<(Stage, Vec<Complex64>)>,
}

impl Capture {
    fn stage(&self, stage: Stage) -> Vec<Complex64> {
        self.batches
            .iter()
            .filter(|(s, _)| *s == stage)
            .flat_map(|(_, b)| b.iter().copied())
            .collect()
    }
}

impl Reporter for Capture {
    fn report(&mut self, stage: Stage, batch: &[Complex64]) -> SimResult<()> {
        self.batches.push((stage, batch.to_vec()));
        Ok(())
    }
}

#[test]
fn clean_channel_reproduces_boc_chips() {
    let config = SimConfig {
        doppler_freq_min_hz: 0.0,
        doppler_freq_max_hz: 0.0,
        pathloss_min_db: -3.0,
        pathloss_max_db: 0.0,
        apply_pathloss: false,
        apply_awgn: false,
        chip_rate_hz: 1.023e6,
        sample_rate_hz: 2.046e6,
        seed: Some(0),
        ..SimConfig::default()
    };
    let pipeline = Pipeline::new(config, ChipTable::new(short_codes()).unwrap()).unwrap();
    let bits = parse_bits(b"101\n");

    let mut rng = ChaCha8Rng::seed_from_u64(0);
    let mut writer = IqWriter::new(Vec::new());
    let mut capture = Capture::default();
    let summary = pipeline
        .run(bits.into_iter(), &mut rng, &mut writer, &mut capture)
        .unwrap();

    let expected = [
        1.0, 1.0, -1.0, -1.0, -1.0, -1.0, 1.0, 1.0, 1.0, 1.0, -1.0, -1.0,
    ];
    let signal: Vec<f64> = capture
        .stage(Stage::DopplerShifted)
        .iter()
        .map(|c| {
            assert_eq!(c.im, 0.0);
            c.re
        })
        .collect();
    assert_eq!(signal, expected);
    assert_eq!(summary.bits, 3);
    assert_eq!(summary.chips, 12);
    assert_eq!(summary.output_samples, 12);

    let codes = read_samples(&writer.into_inner()[..]).unwrap();
    let expected_codes: Vec<(i16, i16)> = expected
        .iter()
        .map(|&c| if c > 0.0 { (32767, 0) } else { (-32768, 0) })
        .collect();
    assert_eq!(codes, expected_codes);
}

#[test]
fn seeded_runs_are_byte_identical() {
    let config = SimConfig {
        seed: Some(1234),
        ..SimConfig::default()
    };
    let pipeline = Pipeline::new(config, ChipTable::new(long_codes(31)).unwrap()).unwrap();
    let bits = message(40);

    let render = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut writer = IqWriter::new(Vec::new());
        pipeline
            .run(bits.iter().copied(), &mut rng, &mut writer, &mut NullReporter)
            .unwrap();
        writer.into_inner()
    };

    let first = render(1234);
    let second = render(1234);
    assert!(!first.is_empty());
    assert_eq!(first, second);
    assert_ne!(first, render(4321));

    let mut rng_a = pipeline.seeded_rng();
    let mut rng_b = pipeline.seeded_rng();
    let mut a = IqWriter::new(Vec::new());
    let mut b = IqWriter::new(Vec::new());
    let plan_a = pipeline.plan(bits.len(), &mut rng_a).unwrap();
    let plan_b = pipeline.plan(bits.len(), &mut rng_b).unwrap();
    pipeline.execute(plan_a, bits.iter().copied(), &mut a, &mut NullReporter).unwrap();
    pipeline.execute(plan_b, bits.iter().copied(), &mut b, &mut NullReporter).unwrap();
    assert_eq!(a.into_inner(), b.into_inner());
}

#[test]
fn output_length_is_shortest_of_channel_vectors() {
    let config = SimConfig {
        doppler_update_period_s: 0.001,
        pathloss_update_period_s: 0.0007,
        ..SimConfig::default()
    };
    let pipeline = Pipeline::new(config.clone(), ChipTable::new(long_codes(1023)).unwrap()).unwrap();
    let bits = message(12);
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let plan = pipeline.plan(bits.len(), &mut rng).unwrap();

    let carrier_len = plan.doppler.carrier_len(config.sample_rate_hz);
    let path_loss_len = plan.path_loss.len();
    assert_eq!(path_loss_len, plan.total_samples);

    let resampled_len =
        ChipResampler::new(&plan.doppler, config.chip_rate_hz, config.sample_rate_hz)
            .unwrap()
            .resample(spread(pipeline.table(), bits.iter().copied()).chips())
            .count();

    let mut writer = IqWriter::new(Vec::new());
    let summary = pipeline
        .execute(plan, bits.iter().copied(), &mut writer, &mut NullReporter)
        .unwrap();

    let expected = resampled_len.min(carrier_len).min(path_loss_len);
    assert_eq!(summary.output_samples, expected);
    assert_eq!(writer.samples_written(), expected);
    assert_eq!(writer.into_inner().len(), 4 * expected);
}

#[test]
fn zero_doppler_gives_nominal_sample_count() {
    let config = SimConfig {
        doppler_freq_min_hz: 0.0,
        doppler_freq_max_hz: 0.0,
        ..SimConfig::default()
    };
    let prn_length = 127;
    let bit_count = 50;
    let pipeline = Pipeline::new(config.clone(), ChipTable::new(long_codes(prn_length)).unwrap()).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut writer = IqWriter::new(std::io::sink());
    let summary = pipeline
        .run(message(bit_count).into_iter(), &mut rng, &mut writer, &mut NullReporter)
        .unwrap();

    let nominal = prn_length as f64 * 2.0 * bit_count as f64 * config.sample_rate_hz
        / (2.0 * config.chip_rate_hz);
    assert!(
        (summary.output_samples as f64 - nominal).abs() <= 1.0,
        "{} samples, nominal {}",
        summary.output_samples,
        nominal
    );
}

#[test]
fn noisy_channel_stays_within_quantizer_range() {
    let pipeline = Pipeline::new(SimConfig::default(), ChipTable::new(long_codes(255)).unwrap()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let mut writer = IqWriter::new(Vec::new());
    let mut capture = Capture::default();

    let summary = pipeline
        .run(message(30).into_iter(), &mut rng, &mut writer, &mut capture)
        .unwrap();

    assert!(summary.output_samples > 0);
    let noisy = capture.stage(Stage::Noisy);
    let attenuated = capture.stage(Stage::PathLoss);
    assert_eq!(noisy.len(), summary.output_samples);
    assert_eq!(attenuated.len(), summary.output_samples);

    // Received power is roughly the mean path gain plus N0
    let v_sat = pipeline.config().v_sat();
    let power = noisy.iter().map(|c| c.norm_sqr()).sum::<f64>() / noisy.len() as f64;
    assert!(power > 0.0 && power < 2.0 * v_sat * v_sat);

    let codes = read_samples(&writer.into_inner()[..]).unwrap();
    assert_eq!(codes.len(), summary.output_samples);
}

#[test]
fn malformed_chip_table_is_a_config_error() {
    let mut codes = short_codes();
    codes.boc_sequence.pop();
    assert!(matches!(ChipTable::new(codes), Err(SimError::Config(_))));
}
