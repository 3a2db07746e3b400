//! Dynamic accumulator over an RSA modulus `N = p*q` with per-slot
//! membership witnesses.
//!
//! The accumulator holds a fixed number of slots, each carrying a string
//! value (the empty string is the vacant sentinel). Every slot's value is
//! mapped to a prime exponent by [`hash_to_prime`], and the invariant
//! `w[i]^H(i, x[i]) == alpha (mod N)` is maintained across updates: changing
//! one slot re-exponentiates the accumulator value and every *other* slot's
//! witness, an O(n) batch of modular exponentiations per update.

use num_bigint::{BigInt, Sign};
use num_traits::{One, Zero};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

use crate::arith::{mod_inverse, mod_pow};
use crate::functions::{from_rug, random_mod, to_rug, PRIME_CHECK_ROUNDS};

#[derive(Error, Debug)]
pub enum AccumulatorError {
    #[error("slot {slot} out of range for capacity {capacity}")]
    SlotOutOfRange { slot: usize, capacity: usize },
    #[error("capacity must be positive")]
    ZeroCapacity,
    #[error("element exponent is not invertible modulo phi(N)")]
    NonInvertibleExponent,
    #[error("random number generation failed: {0}")]
    RandomNumberError(String),
}

/// Deterministically maps `(slot, value, seed)` to a prime: the SHA-256
/// digest of the triple is shifted up by 64 bits, made odd, and advanced to
/// the next probable prime. The result exceeds 2^256, so it never divides
/// phi(N) for moduli of practical size.
pub fn hash_to_prime(slot: usize, value: &str, seed: u64) -> BigInt {
    let mut hash = Sha256::new();
    hash.update(slot.to_string().as_bytes());
    hash.update(value.as_bytes());
    hash.update(seed.to_be_bytes());
    let digest = hash.finalize();

    let candidate = (BigInt::from_bytes_be(Sign::Plus, &digest) << 64u32) + BigInt::one();
    let candidate = to_rug(&candidate);
    if candidate.is_probably_prime(PRIME_CHECK_ROUNDS) != rug::integer::IsPrime::No {
        from_rug(&candidate)
    } else {
        from_rug(&candidate.next_prime())
    }
}

/// Accumulator state: modulus, current value `alpha`, and one
/// (value, witness) pair per slot. `phi` is used internally for exponent
/// inversion and is never exposed; anyone who learns it can compute
/// arbitrary roots mod N and forge membership.
pub struct Accumulator {
    modulus: BigInt,
    phi: BigInt,
    seed: u64,
    alpha: BigInt,
    values: Vec<String>,
    witnesses: Vec<BigInt>,
}

impl Zeroize for Accumulator {
    fn zeroize(&mut self) {
        self.phi = BigInt::zero();
    }
}

impl Drop for Accumulator {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Accumulator {
    /// Initializes all `capacity` slots to the vacant sentinel over the
    /// modulus `N = p*q`. The factors are supplied by the caller and
    /// trusted; they are only used to derive `phi = (p-1)(q-1)`.
    ///
    /// The base is sampled coprime to N, the initial accumulator value is
    /// `r` raised to the product of every slot's inverted vacant exponent,
    /// and each witness is `alpha` re-raised by its own slot's inverted
    /// exponent.
    pub fn new(
        p: &BigInt,
        q: &BigInt,
        capacity: usize,
        seed: u64,
        rng: &mut impl RngCore,
    ) -> Result<Self, AccumulatorError> {
        if capacity == 0 {
            return Err(AccumulatorError::ZeroCapacity);
        }
        let modulus = p * q;
        let phi = (p - BigInt::one()) * (q - BigInt::one());

        let r = loop {
            let r = random_mod(&modulus, rng)
                .map_err(|e| AccumulatorError::RandomNumberError(e.to_string()))?;
            if num_integer::gcd(r.clone(), modulus.clone()) == BigInt::one() {
                break r;
            }
        };

        let mut inverses = Vec::with_capacity(capacity);
        for slot in 0..capacity {
            let exponent = hash_to_prime(slot, "", seed);
            let inverse = mod_inverse(&exponent, &phi)
                .ok_or(AccumulatorError::NonInvertibleExponent)?;
            inverses.push(inverse);
        }

        // The aggregate exponent stays unreduced: collapsing it mod phi is
        // only sound when p and q are prime, which is not checked here.
        let mut aggregate = BigInt::one();
        for inverse in &inverses {
            aggregate *= inverse;
        }
        let alpha = mod_pow(&r, &aggregate, &modulus);

        let witnesses = inverses
            .iter()
            .map(|inverse| mod_pow(&alpha, inverse, &modulus))
            .collect();

        Ok(Accumulator {
            modulus,
            phi,
            seed,
            alpha,
            values: vec![String::new(); capacity],
            witnesses,
        })
    }

    pub fn capacity(&self) -> usize {
        self.values.len()
    }

    /// Current accumulator value.
    pub fn value(&self) -> &BigInt {
        &self.alpha
    }

    fn check_slot(&self, slot: usize) -> Result<(), AccumulatorError> {
        if slot >= self.values.len() {
            return Err(AccumulatorError::SlotOutOfRange {
                slot,
                capacity: self.values.len(),
            });
        }
        Ok(())
    }

    /// Replaces the value in `slot`, returning `false` without touching any
    /// state when the slot already holds `value`.
    ///
    /// The re-exponentiation factor is `delta = H(slot, old)^-1 * H(slot,
    /// new)`: the accumulator and every other slot's witness absorb it,
    /// while the updated slot's own witness already excludes its own
    /// contribution and stays as it is. `delta` is kept as a full integer
    /// rather than reduced mod phi, matching the initialization. All
    /// inversions happen before the first mutation, so a failed update
    /// leaves the accumulator unchanged.
    pub fn update(&mut self, slot: usize, value: &str) -> Result<bool, AccumulatorError> {
        self.check_slot(slot)?;
        if self.values[slot] == value {
            return Ok(false);
        }

        let new_exponent = hash_to_prime(slot, value, self.seed);
        let old_exponent = hash_to_prime(slot, &self.values[slot], self.seed);
        let old_inverse = mod_inverse(&old_exponent, &self.phi)
            .ok_or(AccumulatorError::NonInvertibleExponent)?;
        let delta = old_inverse * new_exponent;

        self.alpha = mod_pow(&self.alpha, &delta, &self.modulus);
        for (j, witness) in self.witnesses.iter_mut().enumerate() {
            if j != slot {
                *witness = mod_pow(witness, &delta, &self.modulus);
            }
        }
        self.values[slot] = value.to_owned();
        Ok(true)
    }

    /// Membership proof for `(slot, value)`: the stored witness raised to
    /// the claimed value's prime exponent. Repeated calls without an
    /// intervening update return the same value.
    pub fn proof(&self, slot: usize, value: &str) -> Result<BigInt, AccumulatorError> {
        self.check_slot(slot)?;
        let exponent = hash_to_prime(slot, value, self.seed);
        Ok(mod_pow(&self.witnesses[slot], &exponent, &self.modulus))
    }

    /// True iff `slot` currently holds `value` and its witness proves it
    /// against the accumulator value. The stored-value comparison is a
    /// cheap short-circuit, not a cryptographic check.
    pub fn is_member(&self, slot: usize, value: &str) -> Result<bool, AccumulatorError> {
        self.check_slot(slot)?;
        if self.values[slot] != value {
            return Ok(false);
        }
        Ok(self.proof(slot, value)? == self.alpha)
    }
}
