//! Threshold ElGamal encryption over Schnorr groups, built from Shamir
//! secret sharing, together with a dynamic RSA-modulus accumulator.
//!
//! A trusted dealer splits a secret exponent into `n` shares such that any
//! `f + 1` parties can jointly decrypt while `f` or fewer learn nothing
//! (Desmedt and Frankel, 1989). Decryption never reassembles the secret
//! key: each party contributes a partial decryption and the shares are
//! recombined by Lagrange interpolation in the exponent.
//!
//! # Example
//! ```no_run
//! use num_bigint::BigInt;
//! use rand::rngs::OsRng;
//! use threshold_elgamal::{GroupParams, ThresholdElGamal};
//!
//! let mut rng = OsRng;
//! let params = GroupParams::generate(256, 2048, &mut rng)?;
//! let dealt = ThresholdElGamal::new(&params, 2, 5, &mut rng)?;
//!
//! let message = BigInt::from(4242);
//! let ciphertext = dealt.pub_key.encrypt(&message, &mut rng)?;
//! let partials: Vec<_> = dealt.key_shares[..3]
//!     .iter()
//!     .map(|share| share.partial_decrypt(&ciphertext.r).unwrap())
//!     .collect();
//! assert_eq!(dealt.pub_key.combine_shares(&partials, &ciphertext)?, message);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod accumulator;
pub mod arith;
pub mod decryption_share;
pub mod functions;
pub mod key_share;
pub mod params;
pub mod polynomial;
pub mod pub_key;
pub mod sharing;
pub mod threshold;

pub use accumulator::Accumulator;
pub use decryption_share::PartialDecryption;
pub use key_share::KeyShare;
pub use params::GroupParams;
pub use pub_key::{Ciphertext, MaskedCiphertext, PublicKey};
pub use sharing::Share;
pub use threshold::ThresholdElGamal;
