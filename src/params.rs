use num_bigint::BigInt;
use num_traits::One;
use rand::RngCore;
use rug::{integer::Order, rand::RandState, Integer};
use thiserror::Error;

use crate::arith::mod_pow;
use crate::functions::{
    from_rug, is_probably_prime, random_range, FunctionError, PRIME_CHECK_ROUNDS,
};

/// Retry bound for the subgroup generator search.
pub const MAX_GENERATOR_ATTEMPTS: usize = 10_000;
/// Retry bound for the `p = m*q + 1` modulus search.
pub const MAX_MODULUS_ATTEMPTS: usize = 100_000;

#[derive(Error, Debug)]
pub enum ParamError {
    #[error("invalid bit lengths: q_bits={0}, p_bits={1}")]
    InvalidBitLength(usize, usize),
    #[error("modulus search exceeded {0} attempts")]
    ModulusSearchExhausted(usize),
    #[error("subgroup generator search exceeded {0} attempts")]
    GeneratorSearchExhausted(usize),
    #[error("random number generation failed: {0}")]
    Random(#[from] FunctionError),
}

/// Schnorr group parameters: `g` generates the subgroup of prime order `q`
/// inside the multiplicative group modulo the prime `p`, with `q | p - 1`.
#[derive(Debug, Clone)]
pub struct GroupParams {
    pub g: BigInt,
    pub q: BigInt,
    pub p: BigInt,
}

impl GroupParams {
    /// Generates fresh parameters: a random `q_bits`-bit prime `q`, a prime
    /// `p = m*q + 1` for random `m` of `p_bits - q_bits - 1` bits, and a
    /// generator of the order-`q` subgroup. Both searches are bounded so a
    /// pathological input fails with an error instead of spinning forever.
    pub fn generate(
        q_bits: usize,
        p_bits: usize,
        rng: &mut impl RngCore,
    ) -> Result<Self, ParamError> {
        if q_bits < 2 || p_bits < q_bits + 2 {
            return Err(ParamError::InvalidBitLength(q_bits, p_bits));
        }
        let m_bits = (p_bits - q_bits - 1) as u32;

        let mut seed = [0u8; 32];
        rng.fill_bytes(&mut seed);
        let mut rand_state = RandState::new();
        rand_state.seed(&Integer::from_digits(&seed, Order::Msf));

        let q: Integer = Integer::random_bits(q_bits as u32, &mut rand_state).into();
        let q = q.next_prime();

        let mut attempts = 0;
        let p = loop {
            if attempts >= MAX_MODULUS_ATTEMPTS {
                return Err(ParamError::ModulusSearchExhausted(MAX_MODULUS_ATTEMPTS));
            }
            attempts += 1;
            let m: Integer = Integer::random_bits(m_bits, &mut rand_state).into();
            if m == 0 {
                continue;
            }
            let p: Integer = Integer::from(&m * &q) + 1;
            if p.is_probably_prime(PRIME_CHECK_ROUNDS) != rug::integer::IsPrime::No {
                break p;
            }
        };

        let q = from_rug(&q);
        let p = from_rug(&p);
        let g = random_subgroup_generator(&q, &p, rng)?;
        Ok(GroupParams { g, q, p })
    }

    /// Checks the group structure: `p` and `q` prime, `q | p - 1`, and `g` a
    /// non-trivial element of the order-`q` subgroup.
    pub fn validate(&self) -> bool {
        let one = BigInt::one();
        is_probably_prime(&self.p)
            && is_probably_prime(&self.q)
            && (&self.p - &one) % &self.q == BigInt::from(0)
            && self.g > one
            && self.g < self.p
            && mod_pow(&self.g, &self.q, &self.p) == one
    }
}

/// Samples a generator of the order-`q` subgroup mod `p`: draws `h` in
/// `[2, p)` and keeps `g = h^((p-1)/q)` once it differs from 1.
pub fn random_subgroup_generator(
    q: &BigInt,
    p: &BigInt,
    rng: &mut impl RngCore,
) -> Result<BigInt, ParamError> {
    let one = BigInt::one();
    let exponent = (p - &one) / q;
    for _ in 0..MAX_GENERATOR_ATTEMPTS {
        let h = random_range(&BigInt::from(2), p, rng)?;
        let g = mod_pow(&h, &exponent, p);
        if g != one {
            return Ok(g);
        }
    }
    Err(ParamError::GeneratorSearchExhausted(MAX_GENERATOR_ATTEMPTS))
}
