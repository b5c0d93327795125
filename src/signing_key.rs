use {
    crate::{
        constants::{AUTHENTICATION_SCHEME, ID_TERMINATOR, ISO8601_DATE_FORMAT, SHA256_OUTPUT_LEN},
        crypto::hmac_sha256,
        SignatureError,
    },
    chrono::NaiveDate,
    std::fmt::{Debug, Display, Formatter, Result as FmtResult},
};

/// A raw SAuthc1 secret key (`kSecret`): the API secret key prefixed with the scheme name.
///
/// The `Debug` and `Display` implementations never reveal key material.
#[derive(Clone, PartialEq, Eq)]
pub struct KSecretKey {
    /// The secret key, prefixed with "SAuthc1".
    prefixed_key: Vec<u8>,
}

/// The `kDate` key: `HMAC_SHA256(kSecret, "YYYYMMDD")`, scoping the secret to a single day.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KDateKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kNonce` key: a `kDate` key, HMAC-SHA256 hashed with the per-request nonce.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KNonceKey {
    /// The raw key.
    key: [u8; SHA256_OUTPUT_LEN],
}

/// The `kSigning` key: a `kNonce` key, HMAC-SHA256 hashed with the "sauthc1_request" terminator.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KSigningKey {
    /// The resulting raw signing key.
    key: [u8; SHA256_OUTPUT_LEN],
}

impl Debug for KSecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSecretKey")
    }
}

impl Debug for KDateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KDateKey")
    }
}

impl Debug for KNonceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KNonceKey")
    }
}

impl Debug for KSigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSigningKey")
    }
}

impl Display for KSecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSecretKey")
    }
}

impl Display for KDateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KDateKey")
    }
}

impl Display for KNonceKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KNonceKey")
    }
}

impl Display for KSigningKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str("KSigningKey")
    }
}

impl KSecretKey {
    /// Create a new `KSecretKey` from a raw API secret key.
    pub fn new(raw: &str) -> Self {
        let mut prefixed_key = Vec::with_capacity(AUTHENTICATION_SCHEME.len() + raw.len());
        prefixed_key.extend_from_slice(AUTHENTICATION_SCHEME.as_bytes());
        prefixed_key.extend_from_slice(raw.as_bytes());
        Self {
            prefixed_key,
        }
    }

    /// Create a new `KDateKey` from this `KSecretKey` and a date.
    pub fn to_kdate(&self, date: NaiveDate) -> Result<KDateKey, SignatureError> {
        let date = date.format(ISO8601_DATE_FORMAT).to_string();
        let key = hmac_sha256(self.prefixed_key.as_slice(), date.as_bytes())?;
        Ok(KDateKey {
            key,
        })
    }

    /// Create a new `KSigningKey` from this `KSecretKey`, a date, and a nonce.
    pub fn to_ksigning(&self, date: NaiveDate, nonce: &str) -> Result<KSigningKey, SignatureError> {
        self.to_kdate(date)?.to_knonce(nonce)?.to_ksigning()
    }
}

impl KDateKey {
    /// Create a new `KNonceKey` from this `KDateKey` and a per-request nonce.
    pub fn to_knonce(&self, nonce: &str) -> Result<KNonceKey, SignatureError> {
        let key = hmac_sha256(self.key.as_slice(), nonce.as_bytes())?;
        Ok(KNonceKey {
            key,
        })
    }
}

impl KNonceKey {
    /// Create a new `KSigningKey` from this `KNonceKey` and the "sauthc1_request" terminator.
    pub fn to_ksigning(&self) -> Result<KSigningKey, SignatureError> {
        let key = hmac_sha256(self.key.as_slice(), ID_TERMINATOR.as_bytes())?;
        Ok(KSigningKey {
            key,
        })
    }
}

impl KSigningKey {
    /// Sign a string-to-sign, returning the lower-case hex-encoded signature. This is the only
    /// point in the chain where a MAC output is hex-encoded.
    pub fn sign(&self, string_to_sign: &str) -> Result<String, SignatureError> {
        let tag = hmac_sha256(self.key.as_slice(), string_to_sign.as_bytes())?;
        Ok(hex::encode(tag))
    }
}

#[cfg(test)]
mod tests {
    use {super::KSecretKey, chrono::NaiveDate};

    #[test_log::test]
    fn test_chain_is_deterministic() {
        let date = NaiveDate::from_ymd_opt(2013, 7, 1).unwrap();
        let nonce = "a43a9d25-ab06-421e-8605-33fd1e760825";
        let k1 = KSecretKey::new("Shush!").to_ksigning(date, nonce).unwrap();
        let k2 = KSecretKey::new("Shush!").to_ksigning(date, nonce).unwrap();
        assert_eq!(k1, k2);

        let other = KSecretKey::new("Shush?").to_ksigning(date, nonce).unwrap();
        assert!(k1 != other);
    }

    #[test_log::test]
    fn test_key_material_not_leaked_by_debug() {
        let key = KSecretKey::new("Shush!");
        assert_eq!(format!("{:?}", key), "KSecretKey");
        assert_eq!(key.to_string(), "KSecretKey");

        let date = NaiveDate::from_ymd_opt(2013, 7, 1).unwrap();
        let kdate = key.to_kdate(date).unwrap();
        assert_eq!(format!("{:?}", kdate), "KDateKey");
        let knonce = kdate.to_knonce("nonce").unwrap();
        assert_eq!(format!("{:?}", knonce), "KNonceKey");
        let ksigning = knonce.to_ksigning().unwrap();
        assert_eq!(format!("{:?}", ksigning), "KSigningKey");
    }
}
