use num_bigint::BigInt;
use num_traits::Zero;
use rand::RngCore;
use thiserror::Error;

use crate::arith::normalize;
use crate::functions::random_mod;

#[derive(Error, Debug)]
pub enum PolynomialError {
    #[error("random number generation failed: {0}")]
    RandomNumberGeneration(String),
    #[error("polynomial has no coefficients")]
    Empty,
}

/// A polynomial over Z_q, ephemeral: it exists only while shares are being
/// generated. The shared secret sits in the constant term, so the secret is
/// the evaluation at x = 0 and the remaining `degree` coefficients are
/// independent uniform field elements.
pub struct Polynomial {
    coefficients: Vec<BigInt>,
}

impl Polynomial {
    pub fn with_secret(
        secret: &BigInt,
        degree: usize,
        q: &BigInt,
        rng: &mut impl RngCore,
    ) -> Result<Self, PolynomialError> {
        let mut coefficients = Vec::with_capacity(degree + 1);
        coefficients.push(normalize(secret, q));
        for _ in 0..degree {
            let coeff = random_mod(q, rng)
                .map_err(|e| PolynomialError::RandomNumberGeneration(e.to_string()))?;
            coefficients.push(coeff);
        }
        Ok(Polynomial { coefficients })
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Horner evaluation of the polynomial at `x`, mod `q`.
    pub fn evaluate(&self, x: &BigInt, q: &BigInt) -> Result<BigInt, PolynomialError> {
        if self.coefficients.is_empty() {
            return Err(PolynomialError::Empty);
        }
        let mut result = BigInt::zero();
        for coeff in self.coefficients.iter().rev() {
            result = normalize(&(result * x + coeff), q);
        }
        Ok(result)
    }
}
