//! Signature share verification

use num_bigint::BigUint;
use tracing::debug;

use crate::arith::mod_inverse;
use crate::sign::proof_challenge;
use crate::types::{KeyMetaInfo, SignatureShare};

/// Check a signature share's proof against public data only.
///
/// Recomputes the prover's first message from `(c, z)` and accepts iff the
/// challenge matches. A bad proof, an unknown id, or a share containing a
/// non-invertible element all verify as `false`; the caller decides whether
/// to drop the share or abort the round.
pub fn verify_share(sig: &SignatureShare, document: &BigUint, info: &KeyMetaInfo) -> bool {
    let n = &info.public_key.n;
    let vk_i = match info.verification_key(sig.id) {
        Ok(vk) => vk,
        Err(_) => return false,
    };

    let (x, _) = info.map_to_residue(document);

    let x_tilde = x.modpow(&BigUint::from(4u32), n);
    let xi2 = sig.x_i.modpow(&BigUint::from(2u32), n);

    // v' = v^z * vk_i^{-c}
    let vk_c = vk_i.modpow(&sig.c, n);
    let v_prime = match mod_inverse(&vk_c, n) {
        Some(inv) => (info.v.modpow(&sig.z, n) * inv) % n,
        None => return false,
    };

    // x' = x~^z * x_i^{-2c}
    let xi_2c = sig.x_i.modpow(&(&sig.c << 1u32), n);
    let x_prime = match mod_inverse(&xi_2c, n) {
        Some(inv) => (x_tilde.modpow(&sig.z, n) * inv) % n,
        None => return false,
    };

    let expected = proof_challenge(info, &x_tilde, vk_i, &xi2, &v_prime, &x_prime);
    let ok = expected == sig.c;
    debug!(id = sig.id, ok, "signature share checked");
    ok
}
