//! Number-theoretic helpers shared across the protocol
//!
//! Everything here works on owned arbitrary-precision values; callers decide
//! when to reduce.

use num_bigint::{BigInt, BigUint, RandBigInt, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand_core::{CryptoRng, RngCore};

/// Miller-Rabin rounds used throughout key generation
pub(crate) const MR_ROUNDS: u32 = 25;

/// Jacobi symbol `(a/n)` for odd `n > 0`.
///
/// Returns 1, -1, or 0 (when `gcd(a, n) != 1`).
pub(crate) fn jacobi(a: &BigUint, n: &BigUint) -> i32 {
    debug_assert!(n.is_odd() && !n.is_zero());

    let mut a = a % n;
    let mut n = n.clone();
    let mut t = 1i32;

    while !a.is_zero() {
        while a.is_even() {
            a >>= 1u32;
            let r = (&n % 8u32).to_u32().unwrap_or(0);
            if r == 3 || r == 5 {
                t = -t;
            }
        }
        std::mem::swap(&mut a, &mut n);
        if (&a % 4u32).to_u32().unwrap_or(0) == 3 && (&n % 4u32).to_u32().unwrap_or(0) == 3 {
            t = -t;
        }
        a %= &n;
    }

    if n.is_one() {
        t
    } else {
        0
    }
}

/// Modular inverse of `a` mod `n`, if `gcd(a, n) = 1`.
pub(crate) fn mod_inverse(a: &BigUint, n: &BigUint) -> Option<BigUint> {
    let a = BigInt::from_biguint(Sign::Plus, a % n);
    let n = BigInt::from_biguint(Sign::Plus, n.clone());
    let ext = a.extended_gcd(&n);
    if !ext.gcd.is_one() {
        return None;
    }
    ext.x.mod_floor(&n).to_biguint()
}

/// `base^exp mod n` where `exp` may be negative.
///
/// A negative exponent goes through the modular inverse of `base`; `None`
/// means the inverse does not exist.
pub(crate) fn powmod_signed(base: &BigUint, exp: &BigInt, n: &BigUint) -> Option<BigUint> {
    match exp.sign() {
        Sign::NoSign => Some(BigUint::one()),
        Sign::Plus => {
            let e = exp.to_biguint()?;
            Some(base.modpow(&e, n))
        }
        Sign::Minus => {
            let e = (-exp).to_biguint()?;
            let inv = mod_inverse(base, n)?;
            Some(inv.modpow(&e, n))
        }
    }
}

/// `n!` as an unbounded integer.
pub(crate) fn factorial(n: u64) -> BigUint {
    let mut acc = BigUint::one();
    for i in 2..=n {
        acc *= i;
    }
    acc
}

/// Probabilistic primality test, `rounds` Miller-Rabin iterations with
/// uniformly random bases.
pub(crate) fn is_probable_prime<R: CryptoRng + RngCore>(
    n: &BigUint,
    rounds: u32,
    rng: &mut R,
) -> bool {
    let two = BigUint::from(2u32);
    let three = BigUint::from(3u32);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // n - 1 = 2^s * d with d odd
    let n_minus_one = n - 1u32;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
        }
        return false;
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn jacobi_matches_known_values() {
        // (a/7): 1, 2, 4 are residues; 3, 5, 6 are not
        let n = BigUint::from(7u32);
        assert_eq!(jacobi(&BigUint::from(1u32), &n), 1);
        assert_eq!(jacobi(&BigUint::from(2u32), &n), 1);
        assert_eq!(jacobi(&BigUint::from(3u32), &n), -1);
        assert_eq!(jacobi(&BigUint::from(4u32), &n), 1);
        assert_eq!(jacobi(&BigUint::from(5u32), &n), -1);
        assert_eq!(jacobi(&BigUint::from(6u32), &n), -1);
        assert_eq!(jacobi(&BigUint::from(7u32), &n), 0);

        // composite modulus: (2/15) = (2/3)(2/5) = (-1)(-1) = 1
        let n = BigUint::from(15u32);
        assert_eq!(jacobi(&BigUint::from(2u32), &n), 1);
        assert_eq!(jacobi(&BigUint::from(3u32), &n), 0);
    }

    #[test]
    fn mod_inverse_round_trips() {
        let n = BigUint::from(101u32);
        for a in [2u32, 3, 50, 100] {
            let a = BigUint::from(a);
            let inv = mod_inverse(&a, &n).unwrap();
            assert_eq!((&a * &inv) % &n, BigUint::one());
        }
        // 6 and 15 share a factor
        assert!(mod_inverse(&BigUint::from(6u32), &BigUint::from(15u32)).is_none());
    }

    #[test]
    fn powmod_signed_handles_negative_exponents() {
        let n = BigUint::from(101u32);
        let base = BigUint::from(7u32);
        let pos = powmod_signed(&base, &BigInt::from(13), &n).unwrap();
        let neg = powmod_signed(&base, &BigInt::from(-13), &n).unwrap();
        assert_eq!((pos * neg) % &n, BigUint::one());
    }

    #[test]
    fn miller_rabin_classifies_small_numbers() {
        let mut rng = OsRng;
        let primes = [2u32, 3, 5, 7, 65537, 7919];
        for p in primes {
            assert!(is_probable_prime(&BigUint::from(p), MR_ROUNDS, &mut rng), "{p}");
        }
        // Carmichael numbers must still be rejected
        let composites = [1u32, 4, 561, 6601, 65536, 7917];
        for c in composites {
            assert!(!is_probable_prime(&BigUint::from(c), MR_ROUNDS, &mut rng), "{c}");
        }
    }

    #[test]
    fn factorial_small_values() {
        assert_eq!(factorial(0), BigUint::one());
        assert_eq!(factorial(1), BigUint::one());
        assert_eq!(factorial(5), BigUint::from(120u32));
        assert_eq!(factorial(10), BigUint::from(3_628_800u32));
    }
}
