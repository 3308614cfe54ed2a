//! Combining verified shares into a full RSA signature

use std::collections::HashSet;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use tracing::{debug, info};

use crate::arith::{factorial, mod_inverse, powmod_signed};
use crate::types::{KeyMetaInfo, ShareId, SignatureShare};
use crate::{Error, Result};

/// Merge at least `k` signature shares into a standard RSA signature.
///
/// Shares are trusted to have passed [`crate::verify::verify_share`]; no
/// re-verification happens here. Ids must be pairwise distinct but carry no
/// ordering requirement. The result satisfies `y^e mod n == document mod n`
/// and can be checked by any RSA implementation.
///
/// Because `delta^{-1}` is folded into the key shares at generation time,
/// the interpolated exponent is `4d` and the combining identity used is
/// `a*4 + b*e = 1`.
pub fn combine_shares(
    shares: &[SignatureShare],
    document: &BigUint,
    info: &KeyMetaInfo,
) -> Result<BigUint> {
    if shares.len() < info.k as usize {
        return Err(Error::ThresholdNotMet {
            required: info.k as usize,
            actual: shares.len(),
        });
    }

    let mut seen = HashSet::new();
    for share in shares {
        if share.id == 0 || share.id > info.l {
            return Err(Error::InvalidShareId(share.id));
        }
        if !seen.insert(share.id) {
            return Err(Error::DuplicateShareId(share.id));
        }
    }

    let n = &info.public_key.n;
    let e = BigInt::from(info.public_key.e.clone());

    let (x, mapped) = info.map_to_residue(document);

    let delta = BigInt::from(factorial(info.l as u64));
    let ids: Vec<ShareId> = shares.iter().map(|s| s.id).collect();

    // w = prod x_i^(2 lambda_i), exponents interpolating 4d at zero
    let mut w = BigUint::one();
    for share in shares {
        let lambda = lagrange_coefficient(share.id, &ids, &delta);
        let exponent = lambda << 1u32;
        let factor = powmod_signed(&share.x_i, &exponent, n)
            .ok_or_else(|| Error::Crypto("signature share is not invertible mod n".into()))?;
        w = (w * factor) % n;
    }

    // a*4 + b*e = 1; e is an odd prime so the gcd is 1
    let e_prime = BigInt::from(4u32);
    let ext = e_prime.extended_gcd(&e);
    if !ext.gcd.is_one() {
        return Err(Error::Crypto("public exponent shares a factor with 4".into()));
    }
    debug!(a = %ext.x, b = %ext.y, "combining exponents fixed");

    let wa = powmod_signed(&w, &ext.x, n)
        .ok_or_else(|| Error::Crypto("combined share product is not invertible mod n".into()))?;
    let xb = powmod_signed(&x, &ext.y, n)
        .ok_or_else(|| Error::Crypto("document is not invertible mod n".into()))?;

    let mut y = (wa * xb) % n;

    if mapped {
        let u_inv = mod_inverse(&info.u, n)
            .ok_or_else(|| Error::Crypto("residue mapper is not invertible mod n".into()))?;
        y = (y * u_inv) % n;
    }

    info!(shares = shares.len(), mapped, "signature combined");
    Ok(y)
}

/// Lagrange coefficient at 0 for the share `j`, scaled by `delta = l!`.
///
/// The scaling makes the quotient exact for every subset of `[1, l]`, so the
/// whole computation stays in integers.
fn lagrange_coefficient(j: ShareId, ids: &[ShareId], delta: &BigInt) -> BigInt {
    let mut num = BigInt::one();
    let mut den = BigInt::one();

    for &id in ids {
        if id != j {
            num *= -BigInt::from(id);
            den *= BigInt::from(j) - BigInt::from(id);
        }
    }

    let scaled = delta * num;
    debug_assert!((&scaled % &den).is_zero());
    scaled / den
}
