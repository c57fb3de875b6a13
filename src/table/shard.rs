//! Shard file lifecycle and the external compressor boundary.
//!
//! Shards are plain files of 12-byte records named `baby_table_part_<N>`,
//! replaced by `baby_table_part_<N>.gz` once handed to the compressor.
//! Compression runs out of process: `pigz -9 -b 128` when available,
//! plain `gzip` otherwise. Both sides of the contract are byte-stream
//! gzip filters, one child process per shard.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use once_cell::sync::Lazy;

use crate::error::{Result, SolverError};

/// Uncompressed size cap per shard.
pub const MAX_SHARD_BYTES: u64 = 200 * 1024 * 1024;

/// Rotation threshold: 99% of the cap, so the record that would cross the
/// limit always lands in a fresh shard.
pub fn default_threshold() -> u64 {
    (MAX_SHARD_BYTES as f64 * 0.99) as u64
}

pub fn raw_path(dir: &Path, part: u32) -> PathBuf {
    dir.join(format!("baby_table_part_{part}"))
}

pub fn gz_path(dir: &Path, part: u32) -> PathBuf {
    dir.join(format!("baby_table_part_{part}.gz"))
}

/// Remove every shard left over from a previous run, compressed or not.
pub fn delete_existing(dir: &Path, verbose: bool) -> Result<()> {
    let mut part = 1u32;
    loop {
        let mut found = false;
        for path in [raw_path(dir, part), gz_path(dir, part)] {
            if path.exists() {
                std::fs::remove_file(&path)?;
                found = true;
            }
        }
        if !found {
            if part == 1 && verbose {
                println!("[+] No existing table parts found to delete");
            }
            return Ok(());
        }
        part += 1;
    }
}

static COMPRESSOR: Lazy<&'static str> = Lazy::new(|| {
    let probe = Command::new("pigz")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match probe {
        Ok(status) if status.success() => "pigz",
        _ => "gzip",
    }
});

/// Hand a closed shard to the compressor, which replaces it with `<name>.gz`.
/// The child runs detached from the shard mutex; callers reap it later.
pub fn spawn_compress(path: &Path) -> Result<Child> {
    let mut cmd = Command::new(*COMPRESSOR);
    if *COMPRESSOR == "pigz" {
        cmd.args(["-9", "-b", "128", "-f"]);
    } else {
        cmd.args(["-9", "-f"]);
    }
    cmd.arg(path)
        .spawn()
        .map_err(|e| SolverError::Compressor(format!("failed to spawn {}: {e}", *COMPRESSOR)))
}

/// Open a streaming decompressor over a compressed shard; the caller reads
/// records from the child's stdout, then reaps it with [`wait_child`].
pub fn spawn_decompress(path: &Path) -> Result<Child> {
    Command::new(*COMPRESSOR)
        .args(["-d", "-c"])
        .arg(path)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|e| SolverError::Compressor(format!("failed to spawn {}: {e}", *COMPRESSOR)))
}

pub fn wait_child(child: &mut Child) -> Result<()> {
    let status = child.wait()?;
    if !status.success() {
        return Err(SolverError::Compressor(format!(
            "{} exited with {status}",
            *COMPRESSOR
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shard_names_match_on_disk_contract() {
        let dir = Path::new("/work");
        assert_eq!(
            raw_path(dir, 3),
            PathBuf::from("/work/baby_table_part_3")
        );
        assert_eq!(
            gz_path(dir, 12),
            PathBuf::from("/work/baby_table_part_12.gz")
        );
    }

    #[test]
    fn threshold_sits_just_under_the_cap() {
        assert!(default_threshold() < MAX_SHARD_BYTES);
        assert!(default_threshold() > MAX_SHARD_BYTES - MAX_SHARD_BYTES / 50);
    }

    #[test]
    fn delete_existing_stops_at_first_gap() {
        let dir = std::env::temp_dir().join(format!("bsgs_shard_del_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        std::fs::write(raw_path(&dir, 1), b"x").unwrap();
        std::fs::write(gz_path(&dir, 2), b"y").unwrap();
        // part 4 is unreachable past the gap at part 3
        std::fs::write(raw_path(&dir, 4), b"z").unwrap();

        delete_existing(&dir, false).unwrap();
        assert!(!raw_path(&dir, 1).exists());
        assert!(!gz_path(&dir, 2).exists());
        assert!(raw_path(&dir, 4).exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
