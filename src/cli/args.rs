//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Recombine parsed sentences into new ones from a bank of phrases
#[derive(Parser, Debug)]
#[command(name = "comeback")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Project directory holding .comeback.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate variants for every utterance in the inputs
    Generate {
        /// Input files or directories, one bracketed tree per line
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        inputs: Vec<PathBuf>,

        /// Corpus file or directory (overrides bank.corpus)
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        corpus: Option<PathBuf>,

        /// Output directory (overrides output.dir)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Skip templates whose power set exceeds this
        #[arg(long)]
        powerset_ceiling: Option<u64>,

        /// Skip antichains with more combinations than this
        #[arg(long)]
        combination_ceiling: Option<u64>,
    },

    /// Show the substitution bank built from the corpus
    Bank {
        /// Corpus file or directory (overrides bank.corpus)
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        corpus: Option<PathBuf>,

        /// List the candidates under this key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Render a bracketed tree with its positions
    Show {
        /// Tree in bracket notation, e.g. "(S (NP (PRP he)) (VP (VBZ sings)))"
        tree: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Print a commented config template
    Template,

    /// Show config paths
    Path,
}
