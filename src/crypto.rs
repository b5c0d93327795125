use {
    crate::{constants::SHA256_OUTPUT_LEN, SignatureError},
    hmac::{Hmac, Mac},
    sha2::{Digest, Sha256},
};

/// Compute the SHA-256 digest of `value`.
#[inline(always)]
pub(crate) fn sha256(value: &[u8]) -> [u8; SHA256_OUTPUT_LEN] {
    Sha256::digest(value).into()
}

/// Compute the SHA-256 digest of `value`, lower-case hex-encoded.
#[inline(always)]
pub(crate) fn sha256_hex(value: &[u8]) -> String {
    hex::encode(sha256(value))
}

/// Wrapper function to form a HMAC-SHA256 operation. The raw tag is returned; only the final
/// request signature is ever hex-encoded.
pub(crate) fn hmac_sha256(key: &[u8], value: &[u8]) -> Result<[u8; SHA256_OUTPUT_LEN], SignatureError> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| SignatureError::HashingFailure(format!("Invalid HMAC key: {}", e)))?;
    mac.update(value);
    Ok(mac.finalize().into_bytes().into())
}

#[cfg(test)]
mod tests {
    use super::{hmac_sha256, sha256_hex};

    #[test_log::test]
    fn test_sha256_empty() {
        assert_eq!(sha256_hex(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }

    #[test_log::test]
    fn test_hmac_rfc4231_case_2() {
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(hex::encode(tag), "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843");
    }
}
