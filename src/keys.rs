/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Canonical form of public keys used as account signatories and peer identities.
//!
//! Keys arrive from outside as hex strings in any letter case. They are decoded once, at the
//! boundary, into a fixed-length [PublicKey]. Everything past this module (storage, comparison,
//! removal) works on the decoded bytes only, so `"ABCD.."` and `"abcd.."` are the same identity.

use std::{fmt, str::FromStr};

use hex::FromHex;

/// Length in bytes of a canonical (ed25519) public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Canonical byte representation of a public key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| DecodeError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Lowercase hex rendering. Used for logs and responses, never for comparison.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl FromStr for PublicKey {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        canonicalize(s)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

/// Malformed key material. Always local to the caller, never a ledger state change.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Hex input has an odd number of digits.
    #[error("hex string has odd length")]
    OddLength,

    /// Hex input contains a character outside `[0-9a-fA-F]`.
    #[error("invalid hex character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },

    /// Decoded bytes do not have the length of a public key.
    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl From<hex::FromHexError> for DecodeError {
    fn from(error: hex::FromHexError) -> Self {
        match error {
            hex::FromHexError::OddLength => DecodeError::OddLength,
            hex::FromHexError::InvalidHexCharacter { c, index } => DecodeError::InvalidCharacter {
                character: c,
                index,
            },
            hex::FromHexError::InvalidStringLength => DecodeError::InvalidLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: 0,
            },
        }
    }
}

/// Decode an externally supplied hex string into its canonical key.
/// Upper and lower case digits decode to identical bytes.
pub fn canonicalize(hex_string: &str) -> Result<PublicKey, DecodeError> {
    if hex_string.len() % 2 != 0 {
        return Err(DecodeError::OddLength);
    }
    <[u8; PUBLIC_KEY_LENGTH]>::from_hex(hex_string)
        .map(PublicKey)
        .map_err(|e| match DecodeError::from(e) {
            DecodeError::InvalidLength { expected, .. } => DecodeError::InvalidLength {
                expected,
                actual: hex_string.len() / 2,
            },
            e => e,
        })
}

/// The only key comparison used by the stores and commands.
#[inline]
pub fn equals(a: &PublicKey, b: &PublicKey) -> bool {
    a.as_bytes() == b.as_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "2f99cf46f1299e8985541f3c75dda648dfe40f1218685b4c88ef17bd74c5f2ab";

    #[test]
    fn case_does_not_change_decoded_bytes() {
        let lower = canonicalize(KEY).unwrap();
        let upper = canonicalize(&KEY.to_uppercase()).unwrap();
        let mixed: String = KEY
            .chars()
            .enumerate()
            .map(|(i, c)| if i % 3 == 0 { c.to_ascii_uppercase() } else { c })
            .collect();
        let mixed = canonicalize(&mixed).unwrap();

        assert_eq!(lower, upper);
        assert!(equals(&lower, &mixed));
        assert_eq!(upper.to_hex(), KEY);
    }

    #[test]
    fn rejects_odd_length() {
        assert_eq!(canonicalize(&KEY[1..]), Err(DecodeError::OddLength));
    }

    #[test]
    fn rejects_non_hex() {
        let bad = format!("zz{}", &KEY[2..]);
        assert_eq!(
            canonicalize(&bad),
            Err(DecodeError::InvalidCharacter { character: 'z', index: 0 })
        );
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            canonicalize("abcd"),
            Err(DecodeError::InvalidLength { expected: 32, actual: 2 })
        );
        assert!(PublicKey::from_bytes(&[0u8; 31]).is_err());
    }

    #[test]
    fn different_keys_are_not_equal() {
        let a = canonicalize(KEY).unwrap();
        let b = PublicKey::from([7u8; 32]);
        assert!(!equals(&a, &b));
    }
}
