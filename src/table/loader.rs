//! Reassemble the in-memory baby table from on-disk shards.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{Result, SolverError};

use super::{decode_record, shard, BabyTable, RECORD_LEN};

/// Load shards 1, 2, ... until neither a compressed nor a raw part exists.
/// A missing first shard is fatal; a trailing partial record is ignored.
pub fn load(dir: &Path, verbose: bool) -> Result<BabyTable> {
    let mut table = BabyTable::default();
    let mut part = 1u32;
    loop {
        let gz = shard::gz_path(dir, part);
        let raw = shard::raw_path(dir, part);

        let loaded = if gz.exists() {
            let mut child = shard::spawn_decompress(&gz)?;
            let stdout = child.stdout.take().expect("decompressor stdout is piped");
            let count = read_records(BufReader::new(stdout), &mut table)?;
            shard::wait_child(&mut child)?;
            count
        } else if raw.exists() {
            read_records(BufReader::new(File::open(&raw)?), &mut table)?
        } else {
            if part == 1 {
                return Err(SolverError::Io(std::io::Error::new(
                    ErrorKind::NotFound,
                    format!("no baby table parts found in {}", dir.display()),
                )));
            }
            break;
        };

        if verbose {
            println!("[+] Loaded part {part} with {loaded} entries");
        }
        part += 1;
    }

    println!("[+] Loaded baby table with {} total entries", table.len());
    Ok(table)
}

fn read_records<R: Read>(mut reader: R, table: &mut BabyTable) -> Result<u64> {
    let mut rec = [0u8; RECORD_LEN];
    let mut count = 0u64;
    while read_full(&mut reader, &mut rec)? == RECORD_LEN {
        if let Some((fp, index)) = decode_record(&rec) {
            table.insert(fp, index);
            count += 1;
        }
    }
    Ok(count)
}

/// Read until `buf` is full or the stream ends; returns the bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
