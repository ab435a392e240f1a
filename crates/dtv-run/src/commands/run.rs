use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::{derive_subject_seed, RngHandle};
use dtv_core::types::{Response, Trial, TrialOutcome};
use dtv_seq::{
    generate, run_session, DataFile, Participant, PropositionTable, SimulatedPresenter,
    TrialPresenter,
};

use super::trials::load_config;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Participant identifier; names the data file.
    #[arg(long = "subj-id")]
    pub subj_id: String,
    /// Proposition table CSV.
    #[arg(long)]
    pub propositions: PathBuf,
    /// Optional YAML config overriding the standard session.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Master seed; derived from the subject id when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Directory the data file is written into.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,
    /// Answer trials with the scripted presenter instead of the console.
    #[arg(long)]
    pub simulate: bool,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let config = load_config(args.config.as_deref())?;
    let table = PropositionTable::load(&args.propositions)?;
    let seed = args
        .seed
        .unwrap_or_else(|| derive_subject_seed(&args.subj_id));
    let participant = Participant::new(args.subj_id.clone(), seed);
    let sequence = generate(&config, &table, seed)?;
    let mut data = DataFile::create(&participant.data_file(&args.data_dir))?;

    let completed = if args.simulate {
        // Stream 1 keeps scripted answers off the generation stream.
        let rng = RngHandle::from_seed(seed).substream(1);
        let mut presenter = SimulatedPresenter::new(rng, config.session.max_wait_ms);
        run_session(&sequence, &participant, &mut data, &mut presenter)?
    } else {
        println!("welcome, {}.", participant.subj_id);
        println!("answer each question about the cued object with y or n.");
        println!("the session starts with a short practice block.");
        let mut presenter = ConsolePresenter::new(config.session.max_wait_ms);
        run_session(&sequence, &participant, &mut data, &mut presenter)?
    };

    let test_total = completed.iter().filter(|t| !t.is_practice()).count();
    let test_correct = completed
        .iter()
        .filter(|t| !t.is_practice())
        .filter(|t| t.outcome.as_ref().is_some_and(|o| o.is_correct))
        .count();
    println!(
        "session complete: {}/{} test trials correct (seed {})",
        test_correct, test_total, seed
    );
    Ok(())
}

/// Text-mode presenter reading y/n answers from stdin.
///
/// Latency is measured from probe onset to the submitted line, so an
/// answer arriving after the deadline still records as a timeout.
struct ConsolePresenter {
    max_wait_ms: f64,
}

impl ConsolePresenter {
    fn new(max_wait_ms: f64) -> Self {
        Self { max_wait_ms }
    }

    fn pause(&self, message: &str) -> Result<(), DtvError> {
        println!();
        println!("{message}");
        print!("press enter to continue ");
        io::stdout()
            .flush()
            .map_err(|err| console_error("console-write", err.to_string()))?;
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .map_err(|err| console_error("console-read", err.to_string()))?;
        Ok(())
    }
}

impl TrialPresenter for ConsolePresenter {
    fn run_trial(&mut self, trial: &Trial) -> Result<TrialOutcome, DtvError> {
        println!();
        println!("trial {} (block {})", trial.trial, trial.block);
        println!("cue: {}", trial.cue);
        match &trial.pic {
            Some(pic) => println!("picture: {pic}"),
            None => println!("question: {}", trial.question_slug),
        }

        let started = Instant::now();
        loop {
            print!("answer [y/n]: ");
            io::stdout()
                .flush()
                .map_err(|err| console_error("console-write", err.to_string()))?;
            let mut line = String::new();
            let read = io::stdin()
                .lock()
                .read_line(&mut line)
                .map_err(|err| console_error("console-read", err.to_string()))?;
            if read == 0 {
                return Err(console_error("console-closed", "stdin closed mid-session"));
            }
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            if elapsed_ms >= self.max_wait_ms {
                println!("too slow");
                return Ok(TrialOutcome::timed_out(self.max_wait_ms));
            }
            match line.trim().to_lowercase().as_str() {
                "y" | "yes" => {
                    return Ok(TrialOutcome::scored(
                        Response::Yes,
                        elapsed_ms,
                        trial.correct_response,
                    ))
                }
                "n" | "no" => {
                    return Ok(TrialOutcome::scored(
                        Response::No,
                        elapsed_ms,
                        trial.correct_response,
                    ))
                }
                _ => continue,
            }
        }
    }

    fn end_of_practice(&mut self) -> Result<(), DtvError> {
        self.pause("practice complete. the test blocks start now.")
    }

    fn block_break(&mut self, block: u32) -> Result<(), DtvError> {
        self.pause(&format!("end of block {block}. take a short break."))
    }

    fn end_of_session(&mut self) -> Result<(), DtvError> {
        println!();
        println!("session finished, thank you.");
        Ok(())
    }
}

fn console_error(code: &str, message: impl Into<String>) -> DtvError {
    DtvError::Session(ErrorInfo::new(code, message))
}
