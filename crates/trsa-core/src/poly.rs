//! Random-coefficient polynomials for secret sharing

use num_bigint::{BigUint, RandBigInt};
use num_traits::Zero;
use rand_core::{CryptoRng, RngCore};

/// Polynomial over `Z_m` with a fixed constant term.
///
/// Coefficient 0 carries the shared secret; the others are uniform in
/// `[0, modulus)`. Evaluation is plain Horner over unbounded integers, so
/// callers reduce results themselves.
pub struct Polynomial {
    coeffs: Vec<BigUint>,
}

impl Polynomial {
    /// Build a polynomial of the given degree with `secret` as constant
    /// term.
    ///
    /// Degree 0 yields the constant polynomial, which the degenerate
    /// one-party configuration relies on.
    pub fn random<R: CryptoRng + RngCore>(
        secret: BigUint,
        degree: usize,
        modulus: &BigUint,
        rng: &mut R,
    ) -> Self {
        debug_assert!(!modulus.is_zero());

        let mut coeffs = Vec::with_capacity(degree + 1);
        coeffs.push(secret);
        for _ in 0..degree {
            coeffs.push(rng.gen_biguint_below(modulus));
        }

        Self { coeffs }
    }

    /// Polynomial degree (number of coefficients minus one).
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluate at `x` via Horner's method, without reduction.
    pub fn eval(&self, x: u64) -> BigUint {
        let mut y = BigUint::zero();
        for coeff in self.coeffs.iter().rev() {
            y = y * x + coeff;
        }
        y
    }
}
