//! Partial signing with proof of correctness

use num_bigint::{BigUint, RandBigInt};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::types::{KeyMetaInfo, KeyShare, SignatureShare};
use crate::wire::int_to_bytes;
use crate::Result;

/// Bits of the proof hash output
const HASH_BITS: u64 = 256;

/// Produce this party's signature share over a prepared document.
///
/// `document` is the padded document as an integer in `[0, n)`. The share
/// carries a Fiat-Shamir proof that the partial signature was computed with
/// the exponent committed in this party's verification key, so a combiner
/// can drop malformed contributions without talking to the signer.
pub fn sign_share<R: CryptoRng + RngCore>(
    share: &KeyShare,
    document: &BigUint,
    info: &KeyMetaInfo,
    rng: &mut R,
) -> Result<SignatureShare> {
    let n = &info.public_key.n;
    let vk_i = info.verification_key(share.id)?;

    let (x, mapped) = info.map_to_residue(document);

    // x_i = x^(2 s_i)
    let x_i = x.modpow(&(&share.s_i << 1u32), n);
    let xi2 = x_i.modpow(&BigUint::from(2u32), n);

    // The blinding factor is oversized by two hash lengths so that z leaks
    // nothing about s_i given the 256-bit challenge.
    let r = rng.gen_biguint(n.bits() + 2 * HASH_BITS);

    let v_prime = info.v.modpow(&r, n);
    let x_tilde = x.modpow(&BigUint::from(4u32), n);
    let x_prime = x_tilde.modpow(&r, n);

    let c = proof_challenge(info, &x_tilde, vk_i, &xi2, &v_prime, &x_prime);
    let z = &c * &share.s_i + &r;

    debug!(id = share.id, mapped, "signature share produced");

    Ok(SignatureShare {
        id: share.id,
        x_i,
        c,
        z,
    })
}

/// Fiat-Shamir challenge for the equality-of-exponents proof.
///
/// Operand order and the minimal big-endian encoding must match the
/// verifier byte for byte.
pub(crate) fn proof_challenge(
    info: &KeyMetaInfo,
    x_tilde: &BigUint,
    vk_i: &BigUint,
    xi2: &BigUint,
    v_prime: &BigUint,
    x_prime: &BigUint,
) -> BigUint {
    let mut hasher = Sha256::new();
    hasher.update(int_to_bytes(&info.v));
    hasher.update(int_to_bytes(&info.u));
    hasher.update(int_to_bytes(x_tilde));
    hasher.update(int_to_bytes(vk_i));
    hasher.update(int_to_bytes(xi2));
    hasher.update(int_to_bytes(v_prime));
    hasher.update(int_to_bytes(x_prime));

    BigUint::from_bytes_be(&hasher.finalize()) % &info.public_key.n
}
