use num_bigint::BigInt;
use rand::RngCore;
use thiserror::Error;

use crate::arith::mod_pow;
use crate::functions::random_range;
use crate::key_share::KeyShare;
use crate::params::GroupParams;
use crate::pub_key::PublicKey;
use crate::sharing::{split, SharingError};

#[derive(Error, Debug)]
pub enum KeyGenError {
    #[error("random number generation failed: {0}")]
    RandomNumberError(String),
    #[error(transparent)]
    Sharing(#[from] SharingError),
}

/// A dealt threshold ElGamal instance: the joint public key and one key
/// share per party. Produced by a trusted dealer; the dealt secret exponent
/// exists only inside [`ThresholdElGamal::new`] and is not retained.
pub struct ThresholdElGamal {
    pub pub_key: PublicKey,
    pub key_shares: Vec<KeyShare>,
}

impl ThresholdElGamal {
    /// Samples a secret exponent `x` uniform in `[2, q)`, publishes
    /// `y = g^x mod p` and deals `parties` shares of `x`, any
    /// `threshold + 1` of which decrypt. Knowledge of `threshold` or fewer
    /// shares reveals nothing about `x`.
    pub fn new(
        params: &GroupParams,
        threshold: u32,
        parties: u32,
        rng: &mut impl RngCore,
    ) -> Result<Self, KeyGenError> {
        let x = random_range(&BigInt::from(2), &params.q, rng)
            .map_err(|e| KeyGenError::RandomNumberError(e.to_string()))?;
        let shares = split(&x, threshold, parties, &params.q, rng)?;
        let y = mod_pow(&params.g, &x, &params.p);

        let pub_key = PublicKey {
            params: params.clone(),
            y,
            l: parties,
            k: threshold + 1,
        };
        let key_shares = shares
            .into_iter()
            .map(|share| KeyShare::new(pub_key.clone(), share.index, share.value))
            .collect();

        Ok(ThresholdElGamal {
            pub_key,
            key_shares,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sharing::{reconstruct, Share};
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn small_params(rng: &mut StdRng) -> GroupParams {
        GroupParams::generate(16, 48, rng).expect("parameter generation failed")
    }

    #[test]
    fn test_keygen_share_count_and_indices() {
        let mut rng = StdRng::seed_from_u64(31);
        let params = small_params(&mut rng);
        let te = ThresholdElGamal::new(&params, 2, 5, &mut rng).unwrap();
        assert_eq!(te.key_shares.len(), 5);
        for (i, ks) in te.key_shares.iter().enumerate() {
            assert_eq!(ks.index, i as u32 + 1);
        }
        assert_eq!(te.pub_key.k, 3);
        assert_eq!(te.pub_key.l, 5);
    }

    #[test]
    fn test_public_key_matches_reconstructed_secret() {
        let mut rng = StdRng::seed_from_u64(32);
        let params = small_params(&mut rng);
        let te = ThresholdElGamal::new(&params, 2, 5, &mut rng).unwrap();

        // any threshold + 1 shares determine the same exponent behind y
        let subset: Vec<Share> = te.key_shares[1..4]
            .iter()
            .map(|ks| Share::new(ks.index, ks.xi.clone(), &params.q).unwrap())
            .collect();
        let x = reconstruct(&subset, &params.q).unwrap();
        assert_eq!(mod_pow(&params.g, &x, &params.p), te.pub_key.y);
        assert!(x > BigInt::one());
    }

    #[test]
    fn test_keygen_rejects_bad_threshold() {
        let mut rng = StdRng::seed_from_u64(33);
        let params = small_params(&mut rng);
        assert!(matches!(
            ThresholdElGamal::new(&params, 0, 5, &mut rng),
            Err(KeyGenError::Sharing(SharingError::ThresholdTooSmall(0)))
        ));
        assert!(matches!(
            ThresholdElGamal::new(&params, 3, 3, &mut rng),
            Err(KeyGenError::Sharing(SharingError::TooFewParties { .. }))
        ));
    }
}
