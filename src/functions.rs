use num_bigint::{BigInt, Sign};
use num_traits::Zero;
use rand::RngCore;
use rug::{integer::Order, Integer};
use thiserror::Error;

/// Miller-Rabin round count used for every probabilistic primality check.
pub const PRIME_CHECK_ROUNDS: u32 = 40;

#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("random number generation failed")]
    RandomNumberGeneration,
    #[error("empty sampling range")]
    EmptyRange,
}

/// Samples a uniform integer in `[0, n)` by rejection sampling.
pub fn random_mod(n: &BigInt, rng: &mut impl RngCore) -> Result<BigInt, FunctionError> {
    if n <= &BigInt::zero() {
        return Err(FunctionError::RandomNumberGeneration);
    }
    let mut bytes = vec![0u8; (n.bits() as usize + 7) / 8];
    let mut result;
    loop {
        rng.fill_bytes(&mut bytes);
        result = BigInt::from_bytes_be(Sign::Plus, &bytes);
        if result < *n {
            break;
        }
    }
    Ok(result)
}

/// Samples a uniform integer in `[low, high)`.
pub fn random_range(
    low: &BigInt,
    high: &BigInt,
    rng: &mut impl RngCore,
) -> Result<BigInt, FunctionError> {
    if high <= low {
        return Err(FunctionError::EmptyRange);
    }
    let width = high - low;
    Ok(low + random_mod(&width, rng)?)
}

pub fn to_rug(n: &BigInt) -> Integer {
    let (_, bytes) = n.to_bytes_be();
    Integer::from_digits(&bytes, Order::Msf)
}

pub fn from_rug(n: &Integer) -> BigInt {
    BigInt::from_bytes_be(Sign::Plus, &n.to_digits::<u8>(Order::Msf))
}

/// Probabilistic primality check; callers must pass non-negative inputs.
pub fn is_probably_prime(n: &BigInt) -> bool {
    to_rug(n).is_probably_prime(PRIME_CHECK_ROUNDS) != rug::integer::IsPrime::No
}
