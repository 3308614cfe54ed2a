//! Dealer-based key generation
//!
//! Builds the safe-prime modulus, shares the private exponent with a random
//! polynomial over the secret group order `m = p'q'`, and publishes the
//! verification data. `m` never leaves this module.

mod primes;

pub use primes::{generate_safe_prime, random_prime};

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand_core::{CryptoRng, RngCore};
use tracing::{debug, info};

use crate::arith::{self, is_probable_prime, MR_ROUNDS};
use crate::poly::Polynomial;
use crate::types::{KeyMetaInfo, KeyParams, KeyShare, PublicKey};
use crate::{Error, Result};

/// Generate a fresh threshold key set.
///
/// Returns `l` key shares (one per party, to be distributed over a secure
/// channel) and the public group parameters. Consumes entropy proportional
/// to the bit size and the number of parties.
pub fn generate_keys<R: CryptoRng + RngCore>(
    params: &KeyParams,
    rng: &mut R,
) -> Result<(Vec<KeyShare>, KeyMetaInfo)> {
    info!(
        bit_size = params.bit_size,
        k = params.k,
        l = params.l,
        "generating threshold key set"
    );

    // Reject a bad caller-supplied exponent before burning entropy on primes.
    if let Some(e) = &params.public_exponent {
        if *e <= BigUint::from(params.l) || !is_probable_prime(e, MR_ROUNDS, rng) {
            return Err(Error::InvalidParams(
                "public exponent must be a prime larger than the group size".into(),
            ));
        }
    }

    let prime_bits = (params.bit_size / 2) as u64;
    let p = generate_safe_prime(prime_bits, rng);
    let q = generate_safe_prime(prime_bits, rng);

    let n = &p * &q;
    let p_prime = (&p - 1u32) >> 1u32;
    let q_prime = (&q - 1u32) >> 1u32;
    let m = &p_prime * &q_prime;

    let (e, d) = choose_public_exponent(params, &m, rng)?;
    debug!(n_bits = n.bits(), e = %e, "modulus fixed");

    let v = generate_group_verifier(&n, rng);
    let u = generate_residue_mapper(&n, rng);

    let delta = arith::factorial(params.l as u64);
    let delta_inv = arith::mod_inverse(&delta, &m).ok_or_else(|| {
        // Cannot happen while l fits in 16 bits and the primes are at least
        // 128 bits, but a plain division here would silently break shares.
        Error::InvalidParams("l! is not invertible modulo the group order".into())
    })?;

    let poly = Polynomial::random(d, (params.k - 1) as usize, &m, rng);

    let mut shares = Vec::with_capacity(params.l as usize);
    let mut vk = Vec::with_capacity(params.l as usize);
    for id in 1..=params.l {
        let s_i = (poly.eval(id as u64) * &delta_inv) % &m;
        vk.push(v.modpow(&s_i, &n));
        shares.push(KeyShare {
            id,
            s_i,
            n: n.clone(),
        });
    }

    info!(k = params.k, l = params.l, "key set generated");

    let info = KeyMetaInfo {
        public_key: PublicKey { n, e },
        k: params.k,
        l: params.l,
        v,
        u,
        vk,
    };

    Ok((shares, info))
}

/// Pick the public exponent and its inverse mod `m`.
///
/// Order of preference: caller-supplied prime, the Fermat prime 65537 when
/// the group is small enough, otherwise a random prime one bit longer than
/// `l`. The exponent must exceed `l` so it is automatically coprime to `l!`,
/// which the combiner relies on.
fn choose_public_exponent<R: CryptoRng + RngCore>(
    params: &KeyParams,
    m: &BigUint,
    rng: &mut R,
) -> Result<(BigUint, BigUint)> {
    if let Some(e) = &params.public_exponent {
        let d = arith::mod_inverse(e, m).ok_or_else(|| {
            Error::Crypto("public exponent is not coprime to the group order".into())
        })?;
        return Ok((e.clone(), d));
    }

    let l = BigUint::from(params.l);
    if params.l as u32 <= 65537 {
        let e = BigUint::from(65537u32);
        // p' and q' are primes of at least 255 bits, so the inverse exists
        // for every supported modulus size.
        let d = arith::mod_inverse(&e, m)
            .ok_or_else(|| Error::Crypto("65537 is not coprime to the group order".into()))?;
        return Ok((e, d));
    }

    loop {
        let e = random_prime(l.bits() + 1, rng);
        if let Some(d) = arith::mod_inverse(&e, m) {
            return Ok((e, d));
        }
    }
}

/// Random quadratic residue generating the verification subgroup.
fn generate_group_verifier<R: CryptoRng + RngCore>(n: &BigUint, rng: &mut R) -> BigUint {
    loop {
        let r = rng.gen_biguint_below(n);
        if r.gcd(n).is_one() {
            return r.modpow(&BigUint::from(2u32), n);
        }
    }
}

/// Random value with Jacobi symbol exactly -1, used to pull non-residue
/// documents into the residue subgroup.
fn generate_residue_mapper<R: CryptoRng + RngCore>(n: &BigUint, rng: &mut R) -> BigUint {
    loop {
        let r = rng.gen_biguint_below(n);
        if arith::jacobi(&r, n) == -1 {
            return r;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_integer::Integer as _;
    use rand::rngs::OsRng;

    #[test]
    fn rejects_composite_supplied_exponent() {
        let params = KeyParams::new(512, 3, 5)
            .unwrap()
            .with_public_exponent(BigUint::from(65536u32));
        assert!(generate_keys(&params, &mut OsRng).is_err());
    }

    #[test]
    fn rejects_small_supplied_exponent() {
        // 3 is prime but not larger than l
        let params = KeyParams::new(512, 3, 5)
            .unwrap()
            .with_public_exponent(BigUint::from(3u32));
        assert!(generate_keys(&params, &mut OsRng).is_err());
    }

    /// For k=2, l=3 the Lagrange coefficients at 0 over ids {1,2} are
    /// {2*delta, -delta}, so `(2*delta*s_1 - delta*s_2) * e == 1 (mod m)`.
    #[test]
    fn shares_interpolate_private_exponent() {
        let mut rng = OsRng;
        let p = generate_safe_prime(128, &mut rng);
        let q = generate_safe_prime(128, &mut rng);
        let m = ((&p - 1u32) >> 1u32) * ((&q - 1u32) >> 1u32);

        let e = BigUint::from(65537u32);
        let d = arith::mod_inverse(&e, &m).unwrap();

        let delta = arith::factorial(3);
        let delta_inv = arith::mod_inverse(&delta, &m).unwrap();

        let poly = Polynomial::random(d, 1, &m, &mut rng);
        let s1 = (poly.eval(1) * &delta_inv) % &m;
        let s2 = (poly.eval(2) * &delta_inv) % &m;

        let delta = BigInt::from(delta);
        let recombined = BigInt::from(s1) * 2u32 * &delta - BigInt::from(s2) * &delta;
        let product = (recombined * BigInt::from(e)).mod_floor(&BigInt::from(m));
        assert!(product.is_one());
    }

    #[test]
    fn generated_verifiers_are_well_formed() {
        let mut rng = OsRng;
        let params = KeyParams::new(512, 3, 5).unwrap();
        let (shares, info) = generate_keys(&params, &mut rng).unwrap();

        assert_eq!(shares.len(), 5);
        assert_eq!(info.vk.len(), 5);
        assert_eq!(info.public_key.e, BigUint::from(65537u32));

        let n = &info.public_key.n;
        assert!(n.bits() >= 512 && n.bits() <= 514);
        assert_eq!(arith::jacobi(&info.v, n), 1);
        assert_eq!(arith::jacobi(&info.u, n), -1);

        for (share, vk) in shares.iter().zip(&info.vk) {
            assert_eq!(&info.v.modpow(&share.s_i, n), vk);
        }
    }
}
