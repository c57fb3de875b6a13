use clap::Parser;

use bsgs::cli::{Args, Config};
use bsgs::solver;

fn main() {
    let config = Config::from(Args::parse());

    let started = chrono::Local::now();
    println!(
        "\n\x1b[01;33m[+]\x1b[32m BSGS Started: \x1b[01;33m{}\x1b[0m",
        started.format("%a %b %e %H:%M:%S %Y")
    );
    println!("[+] Puzzle: {}", config.puzzle);
    println!("[+] Public Key: {}", config.pubkey);
    println!("[+] Using {} CPU cores", config.threads);

    match solver::solve(&config) {
        Ok(outcome) => match outcome.key {
            Some(key) => {
                println!("\n\x1b[01;32m[+] Solution found!\x1b[0m");
                println!("[+] Private key: {key}");
                println!("[+] Hex: 0x{key:x}");
                println!(
                    "[+] Time elapsed: {:.3} seconds",
                    outcome.elapsed.as_secs_f64()
                );
            }
            None => {
                println!("\n\x1b[01;31m[!] Key not found in the specified range\x1b[0m");
                println!(
                    "[+] Time elapsed: {:.3} seconds",
                    outcome.elapsed.as_secs_f64()
                );
            }
        },
        Err(e) => {
            eprintln!("\x1b[01;31m[error]\x1b[0m {e}");
            std::process::exit(1);
        }
    }
}
