//! Content digests for scanned artifacts.
//!
//! The algorithm is an explicit value chosen once per run and passed to every component that
//! hashes or compares digests. There is no process-wide setting.

#![forbid(unsafe_code)]

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

/// Chunk size used when streaming artifact bytes into the hasher.
const CHUNK_SIZE: usize = 8 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("unsupported digest algorithm: {0} (expected SHA-1, SHA-256, SHA-384 or SHA-512)")]
    UnsupportedAlgorithm(String),

    #[error("invalid hex digest '{value}': {reason}")]
    InvalidHex { value: String, reason: String },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    Sha1,
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl DigestAlgorithm {
    pub fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "SHA-1",
            DigestAlgorithm::Sha256 => "SHA-256",
            DigestAlgorithm::Sha384 => "SHA-384",
            DigestAlgorithm::Sha512 => "SHA-512",
        }
    }

    /// Byte length of digests produced by this algorithm.
    pub fn digest_length(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 20,
            DigestAlgorithm::Sha256 => 32,
            DigestAlgorithm::Sha384 => 48,
            DigestAlgorithm::Sha512 => 64,
        }
    }

    /// Read `reader` to the end and return its digest.
    pub fn digest<R: Read>(self, mut reader: R) -> std::io::Result<DigestValue> {
        let mut hasher = Hasher::new(self);
        let mut buf = [0u8; CHUNK_SIZE];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        Ok(hasher.finish())
    }

    pub fn digest_bytes(self, bytes: &[u8]) -> DigestValue {
        let mut hasher = Hasher::new(self);
        hasher.update(bytes);
        hasher.finish()
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_uppercase();
        match key.as_str() {
            "SHA1" => Ok(DigestAlgorithm::Sha1),
            "SHA256" => Ok(DigestAlgorithm::Sha256),
            "SHA384" => Ok(DigestAlgorithm::Sha384),
            "SHA512" => Ok(DigestAlgorithm::Sha512),
            _ => Err(DigestError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

enum Hasher {
    Sha1(sha1::Sha1),
    Sha256(sha2::Sha256),
    Sha384(sha2::Sha384),
    Sha512(sha2::Sha512),
}

impl Hasher {
    fn new(algorithm: DigestAlgorithm) -> Self {
        match algorithm {
            DigestAlgorithm::Sha1 => Hasher::Sha1(<sha1::Sha1 as sha1::Digest>::new()),
            DigestAlgorithm::Sha256 => Hasher::Sha256(<sha2::Sha256 as sha2::Digest>::new()),
            DigestAlgorithm::Sha384 => Hasher::Sha384(<sha2::Sha384 as sha2::Digest>::new()),
            DigestAlgorithm::Sha512 => Hasher::Sha512(<sha2::Sha512 as sha2::Digest>::new()),
        }
    }

    fn update(&mut self, bytes: &[u8]) {
        match self {
            Hasher::Sha1(h) => sha1::Digest::update(h, bytes),
            Hasher::Sha256(h) => sha2::Digest::update(h, bytes),
            Hasher::Sha384(h) => sha2::Digest::update(h, bytes),
            Hasher::Sha512(h) => sha2::Digest::update(h, bytes),
        }
    }

    fn finish(self) -> DigestValue {
        let bytes = match self {
            Hasher::Sha1(h) => sha1::Digest::finalize(h).as_slice().to_vec(),
            Hasher::Sha256(h) => sha2::Digest::finalize(h).as_slice().to_vec(),
            Hasher::Sha384(h) => sha2::Digest::finalize(h).as_slice().to_vec(),
            Hasher::Sha512(h) => sha2::Digest::finalize(h).as_slice().to_vec(),
        };
        DigestValue(bytes)
    }
}

/// Digest bytes. Equality is byte equality; the text form is upper-case hex.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DigestValue(Vec<u8>);

impl DigestValue {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Parse a hex digest; either case is accepted.
    pub fn from_hex(s: &str) -> Result<Self, DigestError> {
        hex::decode(s.trim())
            .map(DigestValue)
            .map_err(|e| DigestError::InvalidHex {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DigestValue({})", self.to_hex())
    }
}

impl fmt::Display for DigestValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for DigestValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for DigestValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        DigestValue::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Cursor;

    #[test]
    fn known_sha256_of_empty_input() {
        let d = DigestAlgorithm::Sha256.digest_bytes(b"");
        assert_eq!(
            d.to_hex(),
            "E3B0C44298FC1C149AFBF4C8996FB92427AE41E4649B934CA495991B7852B855"
        );
    }

    #[test]
    fn known_sha1_of_abc() {
        let d = DigestAlgorithm::Sha1.digest_bytes(b"abc");
        assert_eq!(d.to_hex(), "A9993E364706816ABA3E25717850C26C9CD0D89D");
    }

    #[test]
    fn streaming_matches_in_memory_across_chunk_boundaries() {
        let data: Vec<u8> = (0..(CHUNK_SIZE * 3 + 17)).map(|i| (i % 251) as u8).collect();
        for alg in [
            DigestAlgorithm::Sha1,
            DigestAlgorithm::Sha256,
            DigestAlgorithm::Sha384,
            DigestAlgorithm::Sha512,
        ] {
            let streamed = alg.digest(Cursor::new(&data)).expect("digest");
            assert_eq!(streamed, alg.digest_bytes(&data));
            assert_eq!(streamed.len(), alg.digest_length());
        }
    }

    #[test]
    fn algorithm_names_parse_loosely() {
        assert_eq!("SHA-256".parse::<DigestAlgorithm>().ok(), Some(DigestAlgorithm::Sha256));
        assert_eq!("sha1".parse::<DigestAlgorithm>().ok(), Some(DigestAlgorithm::Sha1));
        assert_eq!("Sha_512".parse::<DigestAlgorithm>().ok(), Some(DigestAlgorithm::Sha512));
    }

    #[test]
    fn unsupported_algorithm_is_an_error() {
        let err = "MD2".parse::<DigestAlgorithm>().unwrap_err();
        assert!(matches!(err, DigestError::UnsupportedAlgorithm(ref s) if s == "MD2"));
    }

    #[test]
    fn from_hex_accepts_lower_case_and_rejects_garbage() {
        let d = DigestValue::from_hex("0aff").expect("hex");
        assert_eq!(d.as_bytes(), &[0x0a, 0xff]);
        assert_eq!(d.to_hex(), "0AFF");
        assert!(DigestValue::from_hex("xyz").is_err());
    }

    #[test]
    fn serde_uses_the_hex_form() {
        let d = DigestValue::from_bytes(vec![0xde, 0xad]);
        let json = serde_json::to_string(&d).expect("serialize");
        assert_eq!(json, "\"DEAD\"");
        let back: DigestValue = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, d);
    }

    proptest! {
        #[test]
        fn hex_round_trip_of_digests(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let d = DigestAlgorithm::Sha256.digest_bytes(&data);
            let back = DigestValue::from_hex(&d.to_hex()).expect("hex");
            prop_assert_eq!(back, d);
        }

        #[test]
        fn digest_is_deterministic(data in prop::collection::vec(any::<u8>(), 0..512)) {
            let a = DigestAlgorithm::Sha1.digest_bytes(&data);
            let b = DigestAlgorithm::Sha1.digest(Cursor::new(&data)).expect("digest");
            prop_assert_eq!(a, b);
        }
    }
}
