use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use dtv_seq::{generate, write_trials_csv, PropositionTable, SequenceConfig, SequenceManifest};

#[derive(Args, Debug)]
pub struct TrialsArgs {
    /// Proposition table CSV.
    #[arg(long)]
    pub propositions: PathBuf,
    /// Optional YAML config overriding the standard session.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Master seed for the sequence.
    #[arg(long, default_value_t = 539)]
    pub seed: u64,
    /// Output directory for the sequence and its manifest.
    #[arg(long, default_value = "out")]
    pub out: PathBuf,
}

pub fn run(args: &TrialsArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let config = load_config(args.config.as_deref())?;
    let table = PropositionTable::load(&args.propositions)?;
    let sequence = generate(&config, &table, args.seed)?;

    write_trials_csv(&args.out.join("trials.csv"), sequence.trials())?;
    let manifest = SequenceManifest::describe(&config, &table, &sequence)?;
    manifest.write(&args.out.join("manifest.json"))?;

    println!(
        "generated {} trials ({} practice, {} test blocks) from seed {}",
        sequence.len(),
        sequence.practice_len(),
        sequence.test_block_count(),
        args.seed
    );
    Ok(())
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<SequenceConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(SequenceConfig::load(path)?),
        None => Ok(SequenceConfig::default()),
    }
}
