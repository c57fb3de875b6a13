//! On-disk baby table: sharded 12-byte records, rebuilt in memory as a
//! fingerprint -> baby-index multimap.

pub mod builder;
pub mod loader;
pub mod shard;

use fxhash::FxHashMap;

use crate::fingerprint::Fingerprint;

/// 8 ASCII-hex fingerprint bytes followed by a little-endian u32 baby index.
pub const RECORD_LEN: usize = 12;

/// Fingerprint -> baby indices. A multimap: every index sharing a
/// fingerprint is retained, so a collision with the true baby index can
/// never hide it from the search.
#[derive(Default)]
pub struct BabyTable {
    map: FxHashMap<u32, Vec<u32>>,
    len: usize,
}

impl BabyTable {
    pub fn insert(&mut self, fp: Fingerprint, index: u32) {
        self.map.entry(fp.0).or_default().push(index);
        self.len += 1;
    }

    pub fn candidates(&self, fp: Fingerprint) -> &[u32] {
        self.map.get(&fp.0).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of entries (not distinct fingerprints).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

pub fn encode_record(fp: Fingerprint, index: u32) -> [u8; RECORD_LEN] {
    let mut rec = [0u8; RECORD_LEN];
    rec[..8].copy_from_slice(&fp.to_hex_bytes());
    rec[8..].copy_from_slice(&index.to_le_bytes());
    rec
}

pub fn decode_record(rec: &[u8; RECORD_LEN]) -> Option<(Fingerprint, u32)> {
    let mut hex = [0u8; 8];
    hex.copy_from_slice(&rec[..8]);
    let fp = Fingerprint::from_hex_bytes(&hex)?;
    let index = u32::from_le_bytes([rec[8], rec[9], rec[10], rec[11]]);
    Some((fp, index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trip() {
        for (fp, index) in [
            (Fingerprint(0), 0u32),
            (Fingerprint(0x00ff00ff), 1),
            (Fingerprint(u32::MAX), u32::MAX),
        ] {
            let rec = encode_record(fp, index);
            assert_eq!(decode_record(&rec), Some((fp, index)));
        }
    }

    #[test]
    fn record_layout_is_hex_then_le_index() {
        let rec = encode_record(Fingerprint(0xdeadbeef), 0x0102_0304);
        assert_eq!(&rec[..8], b"deadbeef");
        assert_eq!(&rec[8..], &[0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn multimap_retains_colliding_indices() {
        let mut table = BabyTable::default();
        table.insert(Fingerprint(7), 10);
        table.insert(Fingerprint(7), 99);
        table.insert(Fingerprint(8), 3);
        assert_eq!(table.candidates(Fingerprint(7)), &[10, 99]);
        assert_eq!(table.candidates(Fingerprint(8)), &[3]);
        assert!(table.candidates(Fingerprint(9)).is_empty());
        assert_eq!(table.len(), 3);
    }
}
