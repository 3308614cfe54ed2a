//! Safe-prime generation

use num_bigint::{BigUint, RandBigInt};
use rand_core::{CryptoRng, RngCore};
use tracing::debug;

use crate::arith::{is_probable_prime, MR_ROUNDS};

/// Uniform random probable prime of exactly `bits` bits.
///
/// The top bit is forced so the result has the requested length; candidates
/// get 25 Miller-Rabin rounds.
pub fn random_prime<R: CryptoRng + RngCore>(bits: u64, rng: &mut R) -> BigUint {
    debug_assert!(bits >= 2);
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if is_probable_prime(&candidate, MR_ROUNDS, rng) {
            return candidate;
        }
    }
}

/// Random safe prime: `p` prime with `(p-1)/2` also prime.
///
/// Draws a random prime `p` and tests both `q = (p-1)/2` and `r = 2p+1`.
/// Accepting `r` when it is prime (then `p` is its Sophie Germain partner)
/// halves the expected work versus testing two independent candidates,
/// because `p` is already known prime. When `r` wins, the result is one bit
/// longer than requested.
pub fn generate_safe_prime<R: CryptoRng + RngCore>(bits: u64, rng: &mut R) -> BigUint {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let p = random_prime(bits, rng);
        let r = (&p << 1u32) + 1u32;
        if is_probable_prime(&r, MR_ROUNDS, rng) {
            debug!(attempts, bits = r.bits(), "safe prime found (2p+1)");
            return r;
        }
        let q = (&p - 1u32) >> 1u32;
        if is_probable_prime(&q, MR_ROUNDS, rng) {
            debug!(attempts, bits = p.bits(), "safe prime found");
            return p;
        }
    }
}
