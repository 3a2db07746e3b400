use num_bigint::BigInt;

/// One party's contribution to a threshold decryption: `di = R^xi mod p`,
/// computed independently by the holder of share `xi`.
#[derive(Debug, Clone)]
pub struct PartialDecryption {
    pub index: u32,
    pub di: BigInt,
}
