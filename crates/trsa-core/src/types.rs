//! Core types for the threshold RSA protocol

use num_bigint::BigUint;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::arith;
use crate::{Error, Result, MAX_BIT_SIZE, MIN_BIT_SIZE};

/// Unique identifier for a party, in `[1, l]`
pub type ShareId = u16;

/// RSA public key of the group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Modulus, product of two safe primes
    pub n: BigUint,
    /// Public exponent, prime and larger than the group size
    pub e: BigUint,
}

/// Public group parameters, one per key set.
///
/// The group order `m = p'q'` is used only during generation and is never
/// part of this structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMetaInfo {
    /// RSA public key
    pub public_key: PublicKey,

    /// Threshold: number of shares needed to sign
    pub k: u16,

    /// Total number of parties
    pub l: u16,

    /// Verification-scheme generator, a random quadratic residue mod `n`
    pub v: BigUint,

    /// Residue mapper with Jacobi symbol -1 mod `n`
    pub u: BigUint,

    /// Per-party verification keys, `vk[i-1] = v^{s_i} mod n`
    pub vk: Vec<BigUint>,
}

impl KeyMetaInfo {
    /// Verification key of the party with the given id.
    pub fn verification_key(&self, id: ShareId) -> Result<&BigUint> {
        if id == 0 || id > self.l {
            return Err(Error::InvalidShareId(id));
        }
        Ok(&self.vk[(id - 1) as usize])
    }

    /// Map a document into the quadratic-residue subgroup.
    ///
    /// Returns the reduced document and whether the `u^e` mapping was
    /// applied. Signing is only invertible inside the subgroup; documents
    /// with Jacobi symbol -1 are multiplied by `u^e`, which flips the symbol
    /// to +1 without disturbing the final `y^e` check (the combiner undoes
    /// the factor).
    pub fn map_to_residue(&self, document: &BigUint) -> (BigUint, bool) {
        let n = &self.public_key.n;
        let x = document % n;
        if arith::jacobi(&x, n) == -1 {
            let u_e = self.u.modpow(&self.public_key.e, n);
            ((x * u_e) % n, true)
        } else {
            (x, false)
        }
    }
}

/// Secret key share held by one party.
///
/// Owned exclusively by that party; the secret exponent is wiped on drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyShare {
    /// This party's id, in `[1, l]`
    pub id: ShareId,

    /// Secret exponent share, in `[0, m)`
    pub s_i: BigUint,

    /// Copy of the group modulus
    pub n: BigUint,
}

impl Zeroize for KeyShare {
    fn zeroize(&mut self) {
        // BigUint does not expose its limbs; resetting to zero drops the
        // allocation holding the secret.
        self.s_i.set_zero();
    }
}

impl Drop for KeyShare {
    fn drop(&mut self) {
        self.zeroize();
    }
}

/// Partial signature with its proof of correct computation.
///
/// Created fresh per signing request and never reused across documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureShare {
    /// Producing party's id
    pub id: ShareId,

    /// Partial signature, `x^{2 s_i} mod n`
    pub x_i: BigUint,

    /// Proof challenge
    pub c: BigUint,

    /// Proof response, `c * s_i + r` unreduced
    pub z: BigUint,
}

/// Validated key-generation parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyParams {
    /// RSA modulus size in bits
    pub bit_size: u32,

    /// Threshold (k-of-l)
    pub k: u16,

    /// Number of parties
    pub l: u16,

    /// Caller-supplied public exponent; must be prime and larger than `l`
    pub public_exponent: Option<BigUint>,
}

impl KeyParams {
    /// Create a validated parameter set.
    pub fn new(bit_size: u32, k: u16, l: u16) -> Result<Self> {
        if k == 0 || k > l {
            return Err(Error::InvalidParams(format!(
                "threshold must satisfy 0 < k <= l, got k={k}, l={l}"
            )));
        }
        if k < l / 2 + 1 {
            return Err(Error::InvalidParams(format!(
                "threshold must satisfy l/2 + 1 <= k, got k={k}, l={l}"
            )));
        }
        if !(MIN_BIT_SIZE..=MAX_BIT_SIZE).contains(&bit_size) {
            return Err(Error::InvalidParams(format!(
                "bit size must be in [{MIN_BIT_SIZE}, {MAX_BIT_SIZE}], got {bit_size}"
            )));
        }

        Ok(Self {
            bit_size,
            k,
            l,
            public_exponent: None,
        })
    }

    /// Use a caller-supplied public exponent instead of the default choice.
    pub fn with_public_exponent(mut self, e: BigUint) -> Self {
        self.public_exponent = Some(e);
        self
    }
}
