//! Fixed-depth sparse Merkle trees whose leaves are identified by truncated
//! Keccak-256 digests.
//!
//! A tree of depth `D` has `2^D` leaf positions; a leaf sits at the position
//! given by the `D`-bit binary expansion of its index, most significant bit
//! first from the root. Positions that were never filled hold the all-zero
//! digest, and whole empty subtrees collapse to precomputed default nodes, so
//! only the paths of the inserted leaves are ever hashed.
//!
//! ```
//! use ethereum_types::U256;
//! use plasma_smt::{config::SmtConfig, db::MemoryDb, smt::Smt};
//!
//! let config = SmtConfig::default();
//! let smt = Smt::<MemoryDb>::new(config, [(U256::from(3), b"coin".to_vec())]).unwrap();
//! let proof = smt.prove(U256::from(3)).unwrap();
//!
//! assert!(proof.verify(&config, &smt.root(), b"coin"));
//! assert!(!proof.verify(&config, &smt.root(), b"other coin"));
//! ```

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]

pub mod bits;
pub mod config;
pub mod db;
pub mod digest;
pub mod error;
pub mod proof;
pub mod smt;
pub mod utils;

pub use error::{SmtError, SmtResult};
