use num_bigint::BigInt;
use num_traits::Zero;
use thiserror::Error;
use zeroize::Zeroize;

use crate::arith::mod_pow;
use crate::decryption_share::PartialDecryption;
use crate::pub_key::PublicKey;

#[derive(Error, Debug)]
pub enum KeyShareError {
    #[error("masking value out of bounds")]
    InvalidMaskingValue,
}

/// One party's share of the joint secret key. Holding up to `threshold`
/// of these reveals nothing about the key; the share is wiped on drop.
#[derive(Debug, Clone)]
pub struct KeyShare {
    pub pub_key: PublicKey,
    pub index: u32,
    pub xi: BigInt,
}

impl Zeroize for KeyShare {
    fn zeroize(&mut self) {
        self.xi = BigInt::zero();
        // pub_key and index are public data
    }
}

impl Drop for KeyShare {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl KeyShare {
    pub fn new(pub_key: PublicKey, index: u32, xi: BigInt) -> Self {
        KeyShare { pub_key, index, xi }
    }

    /// Computes this party's decryption contribution `di = R^xi mod p` for
    /// the masking value `R` of a ciphertext. Pure and side-effect free, so
    /// parties can run it independently and concurrently.
    pub fn partial_decrypt(&self, r: &BigInt) -> Result<PartialDecryption, KeyShareError> {
        let p = &self.pub_key.params.p;
        if r <= &BigInt::zero() || r >= p {
            return Err(KeyShareError::InvalidMaskingValue);
        }
        Ok(PartialDecryption {
            index: self.index,
            di: mod_pow(r, &self.xi, p),
        })
    }
}
