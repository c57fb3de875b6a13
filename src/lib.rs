//! bsgs: Baby-Step Giant-Step solver for secp256k1 puzzle keys
//!
//! Recovers a private key k from its compressed public key P = k*G when k is
//! known to lie in a puzzle range [2^(n-1), 2^n - 1]. The meet-in-the-middle
//! search precomputes m baby points i*G into a sharded, gzip-compressed
//! on-disk table keyed by a lossy 64-bit-hash fingerprint, then walks giant
//! steps P - start*G - j*m*G across worker threads until a fingerprint probe
//! verifies against the target key.
//!
//! - `math`: field and curve primitives over the secp256k1 prime field
//! - `fingerprint`: the lossy baby-table key
//! - `table`: shard format, parallel builder, loader
//! - `search`: strided parallel giant-step loop
//! - `solver`: driver wiring range computation through build/load/search

pub mod cli;
pub mod error;
pub mod fingerprint;
pub mod math;
pub mod search;
pub mod solver;
pub mod table;
