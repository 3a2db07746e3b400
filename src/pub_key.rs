use std::collections::HashMap;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::arith::{mod_inverse_prime, mod_pow, normalize};
use crate::decryption_share::PartialDecryption;
use crate::functions::random_range;
use crate::params::GroupParams;
use crate::sharing::{lagrange_coefficients, SharingError};

#[derive(Error, Debug)]
pub enum PubKeyError {
    #[error("message is not a field element")]
    MessageOutOfRange,
    #[error("empty ciphertext list")]
    EmptyCiphertextList,
    #[error("insufficient partial decryptions: got {0}, need {1}")]
    InsufficientShares(usize, u32),
    #[error("repeated partial decryption index: {0}")]
    RepeatedShareIndex(u32),
    #[error("partial decryption set produced a non-invertible mask")]
    NonInvertibleMask,
    #[error("discrete log not found within bound {0}")]
    DiscreteLogNotFound(u64),
    #[error("random number generation failed: {0}")]
    RandomNumberError(String),
    #[error(transparent)]
    Sharing(#[from] SharingError),
}

/// ElGamal ciphertext `(R, C)`: `R = g^r mod p` and `C` is the message
/// blinded by the shared mask `K = y^r mod p`. There is no integrity
/// protection: recombining against a tampered `R` silently yields garbage,
/// which is inherent to the textbook scheme.
#[derive(Debug, Clone)]
pub struct Ciphertext {
    pub r: BigInt,
    pub c: BigInt,
}

/// Hash-masked ciphertext for arbitrary-length byte messages:
/// `C = m XOR H(K)` with `H` a SHA-256 keystream of the message's length.
#[derive(Debug, Clone)]
pub struct MaskedCiphertext {
    pub r: BigInt,
    pub c: Vec<u8>,
}

/// Joint public key of a threshold ElGamal deployment: `y = g^x mod p` for a
/// secret exponent `x` that exists only as `l` shares, any `k` of which
/// suffice to decrypt.
#[derive(Debug, Clone)]
pub struct PublicKey {
    pub params: GroupParams,
    pub y: BigInt,
    /// total parties
    pub l: u32,
    /// partial decryptions required (threshold + 1)
    pub k: u32,
}

impl PublicKey {
    fn random_exponent(&self, rng: &mut impl RngCore) -> Result<BigInt, PubKeyError> {
        random_range(&BigInt::from(2), &self.params.q, rng)
            .map_err(|e| PubKeyError::RandomNumberError(e.to_string()))
    }

    /// Encrypts a field element `m` in `[0, p)` multiplicatively:
    /// `C = y^r * m mod p`.
    pub fn encrypt(&self, m: &BigInt, rng: &mut impl RngCore) -> Result<Ciphertext, PubKeyError> {
        if m < &BigInt::zero() || m >= &self.params.p {
            return Err(PubKeyError::MessageOutOfRange);
        }
        let r = self.random_exponent(rng)?;
        let big_r = mod_pow(&self.params.g, &r, &self.params.p);
        let mask = mod_pow(&self.y, &r, &self.params.p);
        let c = normalize(&(mask * m), &self.params.p);
        Ok(Ciphertext { r: big_r, c })
    }

    /// Encrypts an arbitrary-length byte message under a SHA-256 keystream
    /// derived from the shared mask.
    pub fn encrypt_masked(
        &self,
        m: &[u8],
        rng: &mut impl RngCore,
    ) -> Result<MaskedCiphertext, PubKeyError> {
        let r = self.random_exponent(rng)?;
        let big_r = mod_pow(&self.params.g, &r, &self.params.p);
        let mask = mod_pow(&self.y, &r, &self.params.p);
        let c = xor_mask(m, &mask);
        Ok(MaskedCiphertext { r: big_r, c })
    }

    /// Encrypts a small non-negative integer in the exponent:
    /// `C = g^m * y^r mod p`. Ciphertexts in this encoding are additively
    /// homomorphic under [`PublicKey::add`]; decryption requires a bounded
    /// discrete-log search, so it only suits short messages.
    pub fn encrypt_exponent(
        &self,
        m: &BigInt,
        rng: &mut impl RngCore,
    ) -> Result<Ciphertext, PubKeyError> {
        if m < &BigInt::zero() {
            return Err(PubKeyError::MessageOutOfRange);
        }
        let r = self.random_exponent(rng)?;
        let big_r = mod_pow(&self.params.g, &r, &self.params.p);
        let g_m = mod_pow(&self.params.g, m, &self.params.p);
        let mask = mod_pow(&self.y, &r, &self.params.p);
        let c = normalize(&(g_m * mask), &self.params.p);
        Ok(Ciphertext { r: big_r, c })
    }

    /// Component-wise product of ciphertexts. On exponent-encoded
    /// ciphertexts this adds the underlying plaintexts.
    pub fn add(&self, c_list: &[Ciphertext]) -> Result<Ciphertext, PubKeyError> {
        if c_list.is_empty() {
            return Err(PubKeyError::EmptyCiphertextList);
        }
        let p = &self.params.p;
        let mut sum = c_list[0].clone();
        for ct in &c_list[1..] {
            sum.r = normalize(&(&sum.r * &ct.r), p);
            sum.c = normalize(&(&sum.c * &ct.c), p);
        }
        Ok(sum)
    }

    /// Recombines partial decryptions into the shared mask `K = y^r`.
    ///
    /// The Lagrange coefficients live in the exponent group, so their
    /// arithmetic is mod `q`, while the partial values are multiplied mod
    /// `p`: `K = prod_i di^(lambda_i mod q) mod p`.
    fn combined_mask(&self, partials: &[PartialDecryption]) -> Result<BigInt, PubKeyError> {
        let k = self.k as usize;
        if partials.len() < k {
            return Err(PubKeyError::InsufficientShares(partials.len(), self.k));
        }

        let mut indexes = HashMap::new();
        for (i, partial) in partials.iter().enumerate() {
            if indexes.insert(partial.index, i).is_some() {
                return Err(PubKeyError::RepeatedShareIndex(partial.index));
            }
        }

        let partials = &partials[..k];
        let indices: Vec<u32> = partials.iter().map(|d| d.index).collect();
        let lambdas = lagrange_coefficients(&indices, &self.params.q)?;

        let mut mask = BigInt::one();
        for (partial, lambda) in partials.iter().zip(&lambdas) {
            let term = mod_pow(&partial.di, lambda, &self.params.p);
            mask = normalize(&(mask * term), &self.params.p);
        }
        Ok(mask)
    }

    /// Recovers a multiplicatively encrypted message: `m = C * K^-1 mod p`.
    pub fn combine_shares(
        &self,
        partials: &[PartialDecryption],
        ciphertext: &Ciphertext,
    ) -> Result<BigInt, PubKeyError> {
        let mask = self.combined_mask(partials)?;
        let inverse =
            mod_inverse_prime(&mask, &self.params.p).ok_or(PubKeyError::NonInvertibleMask)?;
        Ok(normalize(&(&ciphertext.c * inverse), &self.params.p))
    }

    /// Recovers a hash-masked message by regenerating the keystream.
    pub fn combine_shares_masked(
        &self,
        partials: &[PartialDecryption],
        ciphertext: &MaskedCiphertext,
    ) -> Result<Vec<u8>, PubKeyError> {
        let mask = self.combined_mask(partials)?;
        Ok(xor_mask(&ciphertext.c, &mask))
    }

    /// Recovers an exponent-encoded message by brute-forcing
    /// `g^m == C * K^-1` for `m` up to `max_message`.
    pub fn combine_shares_exponent(
        &self,
        partials: &[PartialDecryption],
        ciphertext: &Ciphertext,
        max_message: u64,
    ) -> Result<BigInt, PubKeyError> {
        let target = self.combine_shares(partials, ciphertext)?;
        let p = &self.params.p;
        let mut current = BigInt::one();
        for m in 0..=max_message {
            if current == target {
                return Ok(BigInt::from(m));
            }
            current = normalize(&(current * &self.params.g), p);
        }
        Err(PubKeyError::DiscreteLogNotFound(max_message))
    }
}

/// XORs `data` with a SHA-256 keystream derived from the mask value:
/// block `i` is `SHA-256(mask_bytes || i)`.
fn xor_mask(data: &[u8], mask: &BigInt) -> Vec<u8> {
    let (_, mask_bytes) = mask.to_bytes_be();
    let mut stream = Vec::with_capacity(data.len() + 32);
    let mut counter: u32 = 0;
    while stream.len() < data.len() {
        let mut hash = Sha256::new();
        hash.update(&mask_bytes);
        hash.update(counter.to_be_bytes());
        stream.extend_from_slice(&hash.finalize());
        counter += 1;
    }
    data.iter().zip(&stream).map(|(d, s)| d ^ s).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key_share::KeyShare;
    use crate::sharing::split;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    // order-11 subgroup of Z_23*, g = 2, secret key x = 7
    fn test_key(rng: &mut StdRng) -> (PublicKey, Vec<KeyShare>) {
        let params = GroupParams {
            g: BigInt::from(2),
            q: BigInt::from(11),
            p: BigInt::from(23),
        };
        let x = BigInt::from(7);
        let y = mod_pow(&params.g, &x, &params.p);
        let pub_key = PublicKey {
            params: params.clone(),
            y,
            l: 5,
            k: 3,
        };
        let shares = split(&x, 2, 5, &params.q, rng).unwrap();
        let key_shares = shares
            .into_iter()
            .map(|s| KeyShare::new(pub_key.clone(), s.index, s.value.clone()))
            .collect();
        (pub_key, key_shares)
    }

    fn decrypt_with(
        key_shares: &[KeyShare],
        picks: &[usize],
        big_r: &BigInt,
    ) -> Vec<PartialDecryption> {
        picks
            .iter()
            .map(|&i| key_shares[i].partial_decrypt(big_r).unwrap())
            .collect()
    }

    #[test]
    fn test_multiplicative_round_trip() {
        let mut rng = StdRng::seed_from_u64(21);
        let (pub_key, key_shares) = test_key(&mut rng);
        let m = BigInt::from(19);
        let ct = pub_key.encrypt(&m, &mut rng).unwrap();
        let partials = decrypt_with(&key_shares, &[0, 2, 4], &ct.r);
        assert_eq!(pub_key.combine_shares(&partials, &ct).unwrap(), m);
    }

    #[test]
    fn test_round_trip_every_subset() {
        let mut rng = StdRng::seed_from_u64(22);
        let (pub_key, key_shares) = test_key(&mut rng);
        let m = BigInt::from(5);
        let ct = pub_key.encrypt(&m, &mut rng).unwrap();
        for a in 0..5 {
            for b in (a + 1)..5 {
                for c in (b + 1)..5 {
                    let partials = decrypt_with(&key_shares, &[a, b, c], &ct.r);
                    assert_eq!(pub_key.combine_shares(&partials, &ct).unwrap(), m);
                }
            }
        }
    }

    #[test]
    fn test_masked_round_trip() {
        let mut rng = StdRng::seed_from_u64(23);
        let (pub_key, key_shares) = test_key(&mut rng);
        let m = b"attack at dawn, bring more than 32 bytes of text";
        let ct = pub_key.encrypt_masked(m, &mut rng).unwrap();
        assert_ne!(&ct.c[..], &m[..]);
        let partials = decrypt_with(&key_shares, &[1, 2, 3], &ct.r);
        assert_eq!(
            pub_key.combine_shares_masked(&partials, &ct).unwrap(),
            m.to_vec()
        );
    }

    #[test]
    fn test_exponent_homomorphic_addition() {
        let mut rng = StdRng::seed_from_u64(24);
        let (pub_key, key_shares) = test_key(&mut rng);
        let c1 = pub_key.encrypt_exponent(&BigInt::from(3), &mut rng).unwrap();
        let c2 = pub_key.encrypt_exponent(&BigInt::from(9), &mut rng).unwrap();
        let sum = pub_key.add(&[c1, c2]).unwrap();
        let partials = decrypt_with(&key_shares, &[0, 1, 4], &sum.r);
        assert_eq!(
            pub_key
                .combine_shares_exponent(&partials, &sum, 100)
                .unwrap(),
            BigInt::from(12)
        );
    }

    #[test]
    fn test_discrete_log_bound() {
        let mut rng = StdRng::seed_from_u64(25);
        let (pub_key, key_shares) = test_key(&mut rng);
        let ct = pub_key.encrypt_exponent(&BigInt::from(8), &mut rng).unwrap();
        let partials = decrypt_with(&key_shares, &[0, 1, 2], &ct.r);
        assert!(matches!(
            pub_key.combine_shares_exponent(&partials, &ct, 4),
            Err(PubKeyError::DiscreteLogNotFound(4))
        ));
    }

    #[test]
    fn test_insufficient_partials_rejected() {
        let mut rng = StdRng::seed_from_u64(26);
        let (pub_key, key_shares) = test_key(&mut rng);
        let ct = pub_key.encrypt(&BigInt::from(4), &mut rng).unwrap();
        let partials = decrypt_with(&key_shares, &[0, 1], &ct.r);
        assert!(matches!(
            pub_key.combine_shares(&partials, &ct),
            Err(PubKeyError::InsufficientShares(2, 3))
        ));
    }

    #[test]
    fn test_repeated_partial_index_rejected() {
        let mut rng = StdRng::seed_from_u64(27);
        let (pub_key, key_shares) = test_key(&mut rng);
        let ct = pub_key.encrypt(&BigInt::from(4), &mut rng).unwrap();
        let partials = decrypt_with(&key_shares, &[0, 1, 1], &ct.r);
        assert!(matches!(
            pub_key.combine_shares(&partials, &ct),
            Err(PubKeyError::RepeatedShareIndex(2))
        ));
    }

    #[test]
    fn test_encrypt_rejects_out_of_range_message() {
        let mut rng = StdRng::seed_from_u64(28);
        let (pub_key, _) = test_key(&mut rng);
        assert!(pub_key.encrypt(&BigInt::from(23), &mut rng).is_err());
        assert!(pub_key.encrypt(&BigInt::from(-1), &mut rng).is_err());
    }

    #[test]
    fn test_add_rejects_empty_list() {
        let mut rng = StdRng::seed_from_u64(29);
        let (pub_key, _) = test_key(&mut rng);
        assert!(matches!(
            pub_key.add(&[]),
            Err(PubKeyError::EmptyCiphertextList)
        ));
    }
}
