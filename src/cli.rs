//! Command-line arguments and the process-wide run configuration.

use std::path::PathBuf;

use clap::Parser;

/// Default target: the solved puzzle-30 key.
pub const DEFAULT_PUBKEY: &str =
    "030d282cf2ff536d2c42f105d0b8588821a915dc3f9a05bd98bb23af67a2e92a5b";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bsgs",
    version,
    about = "Baby-Step Giant-Step private key search over secp256k1 puzzle ranges"
)]
pub struct Args {
    /// Puzzle number: the key lies in [2^(n-1), 2^n - 1]
    #[arg(short = 'p', long = "puzzle", value_name = "N", default_value_t = 30)]
    pub puzzle: u32,

    /// Compressed public key (66 hex characters, 02/03 prefix)
    #[arg(short = 'k', long = "pubkey", value_name = "HEX", default_value = DEFAULT_PUBKEY)]
    pub pubkey: String,

    /// Number of CPU cores to use (default: all available)
    #[arg(short = 't', long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Immutable configuration, set once at startup and threaded through the
/// builder, loader, and search. Range bounds are validated by the driver so
/// bad input exits with code 1 rather than clap's usage error.
#[derive(Debug, Clone)]
pub struct Config {
    pub puzzle: u32,
    pub pubkey: String,
    pub threads: usize,
    pub verbose: bool,
    /// Directory holding the baby-table shards.
    pub table_dir: PathBuf,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            puzzle: args.puzzle,
            pubkey: args.pubkey,
            threads: args.threads.unwrap_or_else(num_cpus::get),
            verbose: args.verbose,
            table_dir: PathBuf::from("."),
        }
    }
}
