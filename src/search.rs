//! Strided parallel giant-step search.
//!
//! After shifting the target by start*G, the unknown scalar lies in
//! [0, end - start]. Worker w owns giant steps w, w + W, w + 2W, ...: it
//! starts from S0 - w*mG and subtracts W*mG per iteration, so coverage is
//! disjoint with no shared counter. Every fingerprint hit is verified by
//! recomputing the candidate's public key; the first verified scalar is
//! published and the found flag drains all workers within one iteration.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use num_bigint::BigInt;

use crate::fingerprint::Fingerprint;
use crate::math::curve::{compress, mul, sub, Point, G};
use crate::table::BabyTable;

pub fn run(
    target: &Point,
    table: Arc<BabyTable>,
    start: &BigInt,
    range: &BigInt,
    m: u64,
    workers: usize,
) -> Option<BigInt> {
    let target_cpub = compress(target);
    let s0 = sub(target, &mul(start, &G));
    let stride_scalar = BigInt::from(m) * workers as u64;
    let stride_point = mul(&stride_scalar, &G);

    let found = Arc::new(AtomicBool::new(false));
    let result = Arc::new(Mutex::new(None::<BigInt>));

    let mut handles = Vec::with_capacity(workers);
    for w in 0..workers {
        let table = Arc::clone(&table);
        let found = Arc::clone(&found);
        let result = Arc::clone(&result);
        let start = start.clone();
        let range = range.clone();
        let stride_point = stride_point.clone();
        let stride_scalar = stride_scalar.clone();
        let mut step = BigInt::from(w as u64) * m;
        let mut s = sub(&s0, &mul(&step, &G));

        handles.push(thread::spawn(move || {
            // inclusive bound: the final giant step still carries baby
            // offsets, and a zero-width range (puzzle 1) needs one probe
            while step <= range {
                if found.load(Ordering::Relaxed) {
                    break;
                }
                let fp = Fingerprint::of_cpub(&compress(&s));
                let mut published = false;
                for &b in table.candidates(fp) {
                    let candidate = &start + &step + b;
                    // the fingerprint is lossy; only an exact public-key
                    // match is a solution
                    if compress(&mul(&candidate, &G)) == target_cpub {
                        let mut slot = result.lock().unwrap();
                        if slot.is_none() {
                            *slot = Some(candidate);
                        }
                        drop(slot);
                        found.store(true, Ordering::SeqCst);
                        published = true;
                        break;
                    }
                }
                if published {
                    break;
                }
                s = sub(&s, &stride_point);
                step += &stride_scalar;
            }
        }));
    }
    for handle in handles {
        handle.join().expect("search worker panicked");
    }

    Arc::try_unwrap(result)
        .ok()
        .expect("all search workers joined")
        .into_inner()
        .unwrap()
}
