//! # Threshold RSA Core
//!
//! Core primitives for Shoup-style threshold RSA signatures.
//!
//! An RSA private key is split among `l` parties so that any `k` of them can
//! jointly produce a standard RSA signature, while no coalition smaller than
//! `k` learns the key. This crate provides the building blocks for:
//! - Key generation over safe-prime moduli with per-share verification keys
//! - Partial signing with a non-interactive proof of correct computation
//! - Proof verification against public data only
//! - Combination of `k` verified shares into a full RSA signature
//!
//! ## Protocol Overview
//!
//! A dealer runs [`keygen::generate_keys`] once and hands each party its
//! [`KeyShare`]; the group parameters ([`KeyMetaInfo`]) are public. Each
//! signing round, a party calls [`sign::sign_share`] on the prepared
//! document, anyone can check the result with [`verify::verify_share`], and
//! any `k` verified shares go through [`combine::combine_shares`] to yield a
//! signature checkable with plain `y^e mod n`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use trsa_core::{keygen, sign, verify, combine, pkcs1, KeyParams};
//!
//! let params = KeyParams::new(512, 3, 5)?;
//! let (shares, info) = keygen::generate_keys(&params, &mut rng)?;
//!
//! let doc = pkcs1::prepare_document(b"Hello world!", pkcs1::HashKind::Sha256, &info)?;
//! let x = trsa_core::wire::int_from_bytes(&doc);
//!
//! let sig = sign::sign_share(&shares[0], &x, &info, &mut rng)?;
//! assert!(verify::verify_share(&sig, &x, &info));
//! ```
//!
//! ## Warning
//!
//! The proof system is a minimal two-message Fiat-Shamir construction; its
//! soundness holds only under the random-oracle assumption for SHA-256.

mod arith;

pub mod combine;
pub mod error;
pub mod keygen;
pub mod pkcs1;
pub mod poly;
pub mod sign;
pub mod types;
pub mod verify;
pub mod wire;

pub use error::{Error, Result};
pub use types::{KeyMetaInfo, KeyParams, KeyShare, PublicKey, SignatureShare};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest supported RSA modulus size in bits
pub const MIN_BIT_SIZE: u32 = 512;

/// Largest supported RSA modulus size in bits
pub const MAX_BIT_SIZE: u32 = 8192;
