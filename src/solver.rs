//! Driver: range and m computation, then build -> load -> search.

use std::sync::Arc;
use std::time::{Duration, Instant};

use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};

use crate::cli::Config;
use crate::error::{Result, SolverError};
use crate::math::curve;
use crate::{search, table};

#[derive(Debug)]
pub struct Outcome {
    /// The recovered private key, or `None` when the range is exhausted.
    pub key: Option<BigInt>,
    /// Wall time of the giant-step search.
    pub elapsed: Duration,
}

/// Over-provisioning factor for the baby table: quadruples the baby steps to
/// quarter the expected giant steps.
const BABY_FACTOR: u32 = 4;

pub fn solve(config: &Config) -> Result<Outcome> {
    if config.puzzle < 1 || config.puzzle > 256 {
        return Err(SolverError::InvalidRange(format!(
            "puzzle number must be between 1 and 256, got {}",
            config.puzzle
        )));
    }
    if config.threads < 1 {
        return Err(SolverError::InvalidRange(
            "thread count must be at least 1".into(),
        ));
    }

    let target = curve::parse_pubkey(&config.pubkey)?;

    let start: BigInt = BigInt::one() << (config.puzzle - 1) as usize;
    let end: BigInt = (BigInt::one() << config.puzzle as usize) - 1;
    let range = &end - &start;

    // m = 4 * floor(sqrt(range)), clamped so the degenerate puzzle-1 range
    // still gets a table
    let m_big = (range.sqrt() * BABY_FACTOR).max(BigInt::one());
    let m = match m_big.to_u64() {
        Some(v) if v < (1u64 << 32) => v,
        _ => {
            return Err(SolverError::InvalidRange(format!(
                "puzzle {} needs {} baby steps, beyond the 32-bit baby index",
                config.puzzle, m_big
            )))
        }
    };

    if config.verbose {
        println!("[+] Range: 2^{} to 2^{}-1", config.puzzle - 1, config.puzzle);
        println!("[+] Baby-step count (m): {m}");
    }

    println!("[+] Generating baby table...");
    table::builder::build(config, m)?;

    println!("[+] Loading baby table...");
    let baby = Arc::new(table::loader::load(&config.table_dir, config.verbose)?);

    println!("[+] Starting BSGS search...");
    let timer = Instant::now();
    let key = search::run(&target, baby, &start, &range, m, config.threads);
    Ok(Outcome {
        key,
        elapsed: timer.elapsed(),
    })
}
