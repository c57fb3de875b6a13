//! Parallel baby-table construction.
//!
//! [0, m) is split into one contiguous lane per worker. A worker seeds its
//! lane with a single scalar multiplication and then walks it by point
//! addition, so each baby step costs one add. Records accumulate in a
//! thread-local buffer and are flushed to the single active shard under one
//! mutex acquisition; the shard rotates only between flushes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::Child;
use std::sync::{Arc, Mutex};
use std::thread;

use num_bigint::BigInt;

use crate::cli::Config;
use crate::error::Result;
use crate::fingerprint::Fingerprint;
use crate::math::curve::{add, compress, mul, G};

use super::{encode_record, shard, RECORD_LEN};

/// Records a worker buffers locally before taking the shard mutex.
const BUFFER_RECORDS: usize = 100_000;

pub struct BuildStats {
    pub parts: u32,
    pub entries: u64,
}

/// The single active shard. Exactly one exists at a time; workers append
/// whole buffers, so records never straddle a rotation.
pub struct ShardWriter {
    dir: PathBuf,
    out: BufWriter<File>,
    part: u32,
    part_bytes: u64,
    threshold: u64,
    entries: u64,
    compressors: Vec<Child>,
    verbose: bool,
}

impl ShardWriter {
    pub fn create(dir: &Path, threshold: u64, verbose: bool) -> Result<Self> {
        let out = BufWriter::new(File::create(shard::raw_path(dir, 1))?);
        Ok(ShardWriter {
            dir: dir.to_path_buf(),
            out,
            part: 1,
            part_bytes: 0,
            threshold,
            entries: 0,
            compressors: Vec::new(),
            verbose,
        })
    }

    pub fn append(&mut self, records: &[(Fingerprint, u32)]) -> Result<()> {
        for &(fp, index) in records {
            self.out.write_all(&encode_record(fp, index))?;
        }
        self.part_bytes += (records.len() * RECORD_LEN) as u64;
        self.entries += records.len() as u64;
        if self.part_bytes >= self.threshold {
            self.rotate()?;
        }
        Ok(())
    }

    fn rotate(&mut self) -> Result<()> {
        let next = BufWriter::new(File::create(shard::raw_path(&self.dir, self.part + 1))?);
        let mut prev = std::mem::replace(&mut self.out, next);
        prev.flush()?;
        drop(prev);
        if self.verbose {
            println!(
                "[+] Saved baby table part {} with {} entries",
                self.part,
                self.part_bytes / RECORD_LEN as u64
            );
        }
        self.compressors
            .push(shard::spawn_compress(&shard::raw_path(&self.dir, self.part))?);
        self.part += 1;
        self.part_bytes = 0;
        Ok(())
    }

    /// Seal the final shard (dropping it when empty) and reap every
    /// compressor child, so no shard is ever left uncompressed.
    pub fn finish(self) -> Result<(u32, u64)> {
        let ShardWriter {
            dir,
            mut out,
            part,
            part_bytes,
            entries,
            mut compressors,
            verbose,
            ..
        } = self;

        out.flush()?;
        drop(out);

        let mut parts = part;
        if part_bytes > 0 {
            if verbose {
                println!(
                    "[+] Saved baby table part {} with {} entries",
                    part,
                    part_bytes / RECORD_LEN as u64
                );
            }
            compressors.push(shard::spawn_compress(&shard::raw_path(&dir, part))?);
        } else {
            std::fs::remove_file(shard::raw_path(&dir, part))?;
            parts -= 1;
        }

        for child in compressors.iter_mut() {
            shard::wait_child(child)?;
        }
        Ok((parts, entries))
    }
}

/// Build the on-disk baby table for m baby steps.
pub fn build(config: &Config, m: u64) -> Result<BuildStats> {
    shard::delete_existing(&config.table_dir, config.verbose)?;

    println!("[+] Generating {m} baby steps");

    let writer = Arc::new(Mutex::new(ShardWriter::create(
        &config.table_dir,
        shard::default_threshold(),
        config.verbose,
    )?));
    let workers = config.threads.min(m as usize).max(1) as u64;

    let mut handles = Vec::with_capacity(workers as usize);
    for w in 0..workers {
        let writer = Arc::clone(&writer);
        let lo = m * w / workers;
        let hi = m * (w + 1) / workers;
        handles.push(thread::spawn(move || -> Result<()> {
            let mut point = mul(&BigInt::from(lo), &G);
            let mut buf = Vec::with_capacity(BUFFER_RECORDS.min((hi - lo) as usize));
            for i in lo..hi {
                buf.push((Fingerprint::of_cpub(&compress(&point)), i as u32));
                point = add(&point, &G);
                if buf.len() >= BUFFER_RECORDS {
                    writer.lock().unwrap().append(&buf)?;
                    buf.clear();
                }
            }
            if !buf.is_empty() {
                writer.lock().unwrap().append(&buf)?;
            }
            Ok(())
        }));
    }
    for handle in handles {
        handle.join().expect("builder worker panicked")?;
    }

    let writer = Arc::try_unwrap(writer)
        .ok()
        .expect("all builder workers joined")
        .into_inner()
        .unwrap();
    let (parts, entries) = writer.finish()?;

    println!("[+] Generated {parts} compressed parts ({entries} total entries)");
    Ok(BuildStats { parts, entries })
}
