// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `extract` and `train`, and all
// their configurable flags. Defaults reproduce the fixed
// conventions of a plain run: midi_files/ in, 50-token windows,
// 100 epochs at batch size 64.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse the MIDI directory and save the token corpus
    Extract(CorpusArgs),

    /// Extract the corpus, then train the LSTM with checkpointing
    Train(TrainArgs),
}

/// Where the corpus comes from and where it is saved
#[derive(Args, Debug)]
pub struct CorpusArgs {
    /// Directory containing .mid files
    #[arg(long, default_value = "midi_files")]
    pub midi_dir: String,

    /// File the extracted token list is written to
    #[arg(long, default_value = "data/music.json")]
    pub corpus_path: String,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub corpus: CorpusArgs,

    /// Load the saved token list instead of parsing MIDI files again
    #[arg(long)]
    pub reuse_corpus: bool,

    /// Directory for weight checkpoints, configs and metrics.csv
    #[arg(long, default_value = ".")]
    pub checkpoint_dir: String,

    /// Number of preceding tokens the model sees per prediction
    #[arg(long, default_value_t = 50)]
    pub window_len: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Number of windows per gradient step
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// RMSProp learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Units in each of the three LSTM layers
    #[arg(long, default_value_t = 512)]
    pub hidden_size: usize,

    /// Units in the dense layer before the output
    #[arg(long, default_value_t = 256)]
    pub dense_size: usize,

    /// Dropout probability after each hidden block
    #[arg(long, default_value_t = 0.2)]
    pub dropout: f64,

    /// Seed for batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Boundary between Layer 1 and Layer 2 -
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            midi_dir:       a.corpus.midi_dir,
            corpus_path:    a.corpus.corpus_path,
            checkpoint_dir: a.checkpoint_dir,
            reuse_corpus:   a.reuse_corpus,
            window_len:     a.window_len,
            epochs:         a.epochs,
            batch_size:     a.batch_size,
            lr:             a.lr,
            hidden_size:    a.hidden_size,
            dense_size:     a.dense_size,
            dropout:        a.dropout,
            seed:           a.seed,
        }
    }
}
