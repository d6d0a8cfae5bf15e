// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses arguments with clap and routes to a use case:
//
//   1. `extract` - MIDI directory → saved token corpus
//   2. `train`   - full pipeline with checkpointing
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, CorpusArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "midi-lstm",
    version = "0.1.0",
    about = "Extract notes and chords from MIDI files, then train an LSTM to predict the next one."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Extract(args) => run_extract(args),
            Commands::Train(args)   => run_train(args),
        }
    }
}

fn run_extract(args: CorpusArgs) -> Result<()> {
    use crate::application::extract_use_case::ExtractUseCase;

    let tokens = ExtractUseCase::new(args.midi_dir, args.corpus_path.clone()).execute()?;
    println!("Extracted {} tokens to '{}'.", tokens.len(), args.corpus_path);
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on MIDI files in: {}", args.corpus.midi_dir);

    let summary = TrainUseCase::new(args.into()).execute()?;

    match summary.best {
        Some(best) => println!(
            "Training done. Best loss {:.4} at epoch {} ({}).",
            best.loss, best.epoch, best.file
        ),
        None => println!("Training done. No checkpoint was saved."),
    }
    Ok(())
}
