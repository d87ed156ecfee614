//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::digest::generic_array::GenericArray;
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

/// SHA-256 block size; HMAC keys shorter than this are zero padded
const HMAC_BLOCK_LEN: usize = 64;

/// Generate a random 256-bit secret
pub fn random_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    let mut block = [0u8; HMAC_BLOCK_LEN];
    block[..key.len()].copy_from_slice(key);

    let mut mac = <Hmac<Sha256> as Mac>::new(GenericArray::from_slice(&block));
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Constant-time comparison to prevent timing attacks
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Decode standard base64
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn padded_key(prefix: &[u8]) -> [u8; 32] {
        let mut key = [0u8; 32];
        key[..prefix.len()].copy_from_slice(prefix);
        key
    }

    #[test]
    fn test_random_secret() {
        let a = random_secret();
        let b = random_secret();
        assert!(a.iter().any(|&x| x != 0));
        assert_ne!(a, b);
    }

    #[test]
    fn test_hmac_rfc4231_vectors() {
        // Zero padding a short key does not change the MAC
        let case_1 = hmac_sha256(&padded_key(&[0x0b; 20]), b"Hi There");
        assert_eq!(
            hex::encode(case_1),
            "b0344c61d8db38535ca8afceaf0bf12b881dc200c9833da726e9376c2e32cff7"
        );

        let case_2 = hmac_sha256(&padded_key(b"Jefe"), b"what do ya want for nothing?");
        assert_eq!(
            hex::encode(case_2),
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn test_hmac_key_sensitivity() {
        let data = b"account data";
        assert_eq!(hmac_sha256(&[1u8; 32], data), hmac_sha256(&[1u8; 32], data));
        assert_ne!(hmac_sha256(&[1u8; 32], data), hmac_sha256(&[2u8; 32], data));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abcd", b"abcd"));
        assert!(!constant_time_eq(b"abcd", b"abce"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }

    #[test]
    fn test_from_base64() {
        assert_eq!(from_base64("aGVsbG8=\n").unwrap(), b"hello");
        assert!(from_base64("not base64!").is_err());
    }
}
