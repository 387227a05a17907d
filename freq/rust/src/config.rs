use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use clap::Parser;
use freq::chart::Scaling;
use freq::tokenize::Mode;

/// Ranks the most frequent words or characters across files.
#[derive(Parser, Debug)]
#[command(name = "freq", version)]
pub(crate) struct Args {
    /// Number of entries to chart
    #[arg(short, long, default_value_t = 10)]
    length: usize,

    /// Count whitespace separated words (default)
    #[arg(short, long, group = "mode")]
    words: bool,

    /// Count single characters
    #[arg(short, long, group = "mode")]
    chars: bool,

    /// Scale bars to the most frequent entry instead of the token total
    #[arg(long)]
    scaled: bool,

    /// Files to read, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct Config {
    pub length: usize,
    pub mode: Mode,
    pub scaling: Scaling,
    pub files: Vec<PathBuf>,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            length: args.length,
            mode: match (args.words, args.chars) {
                (false, true) => Mode::Character,
                _ => Mode::Word,
            },
            scaling: if args.scaled { Scaling::TopEntry } else { Scaling::Total },
            files: args.files,
        }
    }
}

impl Display for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "length={} mode={} scaling={:?} files={}",
            self.length,
            self.mode,
            self.scaling,
            self.files.len()
        )
    }
}

pub(crate) fn get() -> Config {
    Args::parse().into()
}
