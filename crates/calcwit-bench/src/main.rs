//! Quick timing of witness computations without criterion.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use calcwit::{EngineConfig, Fr, WitnessCalculator};
use calcwit_circuits::harness::sample_inputs;
use calcwit_circuits::{multiplier_array_circuit, sample_circuit};

const RUNS: u32 = 1000;

fn time_array<const K: usize>() -> anyhow::Result<()> {
    let circuit = Arc::new(multiplier_array_circuit::<K>().context("building array circuit")?);
    let calculator = WitnessCalculator::new(circuit);
    let inputs: Vec<Fr> = (1..=2 * K as u64).map(Fr::from).collect();

    let start = Instant::now();
    for _ in 0..RUNS {
        calculator.calculate_ordered(&inputs)?;
    }
    let elapsed = start.elapsed();
    println!("K = {K:5}: {:?} per witness", elapsed / RUNS);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    println!("=== Quick witness timing ===\n");

    let inputs = sample_inputs([1, 2, 3], [4, 5, 6], 5, true);
    for (name, config) in [
        ("plain", EngineConfig::default()),
        ("traced", EngineConfig::diagnostic()),
    ] {
        let calculator = WitnessCalculator::new(sample_circuit()?).with_config(config);
        let start = Instant::now();
        for _ in 0..RUNS {
            calculator
                .calculate(&inputs)
                .with_context(|| format!("sample circuit ({name})"))?;
        }
        println!("sample {name:>6}: {:?} per witness", start.elapsed() / RUNS);
        log::debug!("sample {name} finished {RUNS} runs");
    }

    println!();
    time_array::<10>()?;
    time_array::<100>()?;
    time_array::<1000>()?;
    Ok(())
}
