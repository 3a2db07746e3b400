//! Modular arithmetic over big integers: exponentiation with the textbook
//! zero-base convention, and modular inverses for prime and composite moduli.

use num_bigint::BigInt;
use num_traits::{One, Signed, Zero};

/// Reduces `a` into `[0, modulus)`, mapping negative values by adding the
/// modulus.
pub fn normalize(a: &BigInt, modulus: &BigInt) -> BigInt {
    let r = a % modulus;
    if r.is_negative() {
        r + modulus
    } else {
        r
    }
}

/// Computes `base^exponent mod modulus` by square-and-multiply.
///
/// If `base` reduces to zero the result is zero for every exponent,
/// including zero. The exponent must be non-negative; negative exponents
/// have to be converted through a modular inverse first.
pub fn mod_pow(base: &BigInt, exponent: &BigInt, modulus: &BigInt) -> BigInt {
    debug_assert!(!exponent.is_negative());
    debug_assert!(modulus > &BigInt::zero());
    let base = normalize(base, modulus);
    if base.is_zero() {
        return BigInt::zero();
    }
    base.modpow(exponent, modulus)
}

/// Inverse of `value` modulo a prime `q` via Fermat's little theorem:
/// `value^(q-2) mod q`. Returns `None` when `value` reduces to zero, which
/// has no inverse; the shortcut is only valid for prime `q`.
pub fn mod_inverse_prime(value: &BigInt, q: &BigInt) -> Option<BigInt> {
    let value = normalize(value, q);
    if value.is_zero() {
        return None;
    }
    Some(mod_pow(&value, &(q - BigInt::from(2)), q))
}

/// Inverse of `a` modulo an arbitrary `m` via the extended Euclidean
/// algorithm. Returns `None` when `gcd(a, m) != 1`.
pub fn mod_inverse(a: &BigInt, m: &BigInt) -> Option<BigInt> {
    let (g, x, _) = extended_gcd(&normalize(a, m), m);
    if g != BigInt::one() {
        None
    } else {
        Some(normalize(&x, m))
    }
}

fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b == &BigInt::zero() {
        (a.clone(), BigInt::one(), BigInt::zero())
    } else {
        let (g, x, y) = extended_gcd(b, &(a % b));
        (g, y.clone(), x - (a / b) * y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow_small() {
        let p = BigInt::from(23);
        assert_eq!(mod_pow(&BigInt::from(5), &BigInt::from(3), &p), BigInt::from(10));
        assert_eq!(mod_pow(&BigInt::from(2), &BigInt::from(11), &p), BigInt::from(1));
    }

    #[test]
    fn test_mod_pow_zero_base() {
        let p = BigInt::from(23);
        assert_eq!(mod_pow(&BigInt::zero(), &BigInt::zero(), &p), BigInt::zero());
        assert_eq!(mod_pow(&BigInt::from(46), &BigInt::from(5), &p), BigInt::zero());
    }

    #[test]
    fn test_mod_pow_negative_base() {
        let p = BigInt::from(23);
        // -1 == 22 mod 23
        assert_eq!(mod_pow(&BigInt::from(-1), &BigInt::from(2), &p), BigInt::one());
    }

    #[test]
    fn test_mod_inverse_prime() {
        let q = BigInt::from(7919);
        for v in [1i64, 2, 17, 7918, -3] {
            let v = BigInt::from(v);
            let inv = mod_inverse_prime(&v, &q).expect("inverse must exist");
            assert_eq!(normalize(&(v * inv), &q), BigInt::one());
        }
        assert!(mod_inverse_prime(&BigInt::zero(), &q).is_none());
        assert!(mod_inverse_prime(&q, &q).is_none());
    }

    #[test]
    fn test_mod_inverse_composite_modulus() {
        let m = BigInt::from(26);
        let inv = mod_inverse(&BigInt::from(3), &m).expect("3 is invertible mod 26");
        assert_eq!(inv, BigInt::from(9));
        assert!(mod_inverse(&BigInt::from(4), &BigInt::from(32)).is_none());
    }

    #[test]
    fn test_normalize() {
        let m = BigInt::from(7);
        assert_eq!(normalize(&BigInt::from(-1), &m), BigInt::from(6));
        assert_eq!(normalize(&BigInt::from(15), &m), BigInt::from(1));
        assert_eq!(normalize(&BigInt::from(0), &m), BigInt::zero());
    }
}
