//! Shamir secret sharing over a prime field: a degree-`f` polynomial hides
//! the secret in its constant term, shares are evaluations at x = 1..n, and
//! any f+1 distinct shares recover the secret by Lagrange interpolation at
//! x = 0. f or fewer shares reveal nothing about the secret.

use std::collections::HashSet;

use num_bigint::BigInt;
use num_traits::Zero;
use rand::RngCore;
use thiserror::Error;

use crate::arith::{mod_inverse_prime, normalize};
use crate::polynomial::{Polynomial, PolynomialError};

#[derive(Error, Debug)]
pub enum SharingError {
    #[error("threshold must be at least 1, got {0}")]
    ThresholdTooSmall(u32),
    #[error("{parties} parties cannot reach threshold {threshold}")]
    TooFewParties { parties: u32, threshold: u32 },
    #[error("party count {0} does not fit in the field")]
    PartyCountExceedsField(u32),
    #[error("secret is not a field element")]
    SecretOutOfRange,
    #[error("share index must be a positive integer")]
    InvalidShareIndex,
    #[error("share value is not a field element")]
    ShareValueOutOfRange,
    #[error("insufficient shares: got {0}")]
    InsufficientShares(usize),
    #[error("degenerate share set: duplicate or colliding x-coordinate {0}")]
    DegenerateShareSet(u32),
    #[error(transparent)]
    Polynomial(#[from] PolynomialError),
}

/// One party's share of a secret: the evaluation of the sharing polynomial
/// at this party's x-coordinate. A share belongs to exactly one party and is
/// never reused across secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub index: u32,
    pub value: BigInt,
}

impl Share {
    pub fn new(index: u32, value: BigInt, q: &BigInt) -> Result<Self, SharingError> {
        if index == 0 {
            return Err(SharingError::InvalidShareIndex);
        }
        if value < BigInt::zero() || &value >= q {
            return Err(SharingError::ShareValueOutOfRange);
        }
        Ok(Share { index, value })
    }
}

/// Splits `secret` into `n` shares of which any `threshold + 1` suffice to
/// reconstruct. Requires `threshold >= 1` for any secrecy and
/// `n >= threshold + 1` for reconstruction to be possible at all.
pub fn split(
    secret: &BigInt,
    threshold: u32,
    parties: u32,
    q: &BigInt,
    rng: &mut impl RngCore,
) -> Result<Vec<Share>, SharingError> {
    if threshold < 1 {
        return Err(SharingError::ThresholdTooSmall(threshold));
    }
    if parties < threshold + 1 {
        return Err(SharingError::TooFewParties { parties, threshold });
    }
    if &BigInt::from(parties) >= q {
        return Err(SharingError::PartyCountExceedsField(parties));
    }
    if secret < &BigInt::zero() || secret >= q {
        return Err(SharingError::SecretOutOfRange);
    }

    let poly = Polynomial::with_secret(secret, threshold as usize, q, rng)?;
    let mut shares = Vec::with_capacity(parties as usize);
    for index in 1..=parties {
        let value = poly.evaluate(&BigInt::from(index), q)?;
        shares.push(Share::new(index, value, q)?);
    }
    Ok(shares)
}

/// Lagrange coefficients at x = 0 for the given x-coordinates, mod `q`:
/// `lambda_i = prod_{j != i} x_j * (x_j - x_i)^-1`. Duplicate coordinates
/// would put a zero in a denominator, so they are rejected up front instead
/// of silently interpolating a wrong value.
pub fn lagrange_coefficients(indices: &[u32], q: &BigInt) -> Result<Vec<BigInt>, SharingError> {
    let mut seen = HashSet::new();
    for &index in indices {
        if !seen.insert(index) {
            return Err(SharingError::DegenerateShareSet(index));
        }
    }

    let mut coefficients = Vec::with_capacity(indices.len());
    for &xi in indices {
        let mut numerator = BigInt::from(1);
        let mut denominator = BigInt::from(1);
        for &xj in indices {
            if xi != xj {
                numerator = normalize(&(numerator * BigInt::from(xj)), q);
                let diff = BigInt::from(xj as i64 - xi as i64);
                denominator = normalize(&(denominator * diff), q);
            }
        }
        let inverse =
            mod_inverse_prime(&denominator, q).ok_or(SharingError::DegenerateShareSet(xi))?;
        coefficients.push(normalize(&(numerator * inverse), q));
    }
    Ok(coefficients)
}

/// Reconstructs the secret from a set of shares with pairwise distinct
/// x-coordinates: `secret = sum_i lambda_i * y_i mod q`. The caller is
/// responsible for supplying at least threshold + 1 shares; fewer distinct
/// shares determine a different polynomial and therefore a wrong value.
pub fn reconstruct(shares: &[Share], q: &BigInt) -> Result<BigInt, SharingError> {
    if shares.is_empty() {
        return Err(SharingError::InsufficientShares(0));
    }
    let indices: Vec<u32> = shares.iter().map(|s| s.index).collect();
    let lambdas = lagrange_coefficients(&indices, q)?;

    let mut secret = BigInt::zero();
    for (share, lambda) in shares.iter().zip(&lambdas) {
        secret = normalize(&(secret + &share.value * lambda), q);
    }
    Ok(secret)
}
