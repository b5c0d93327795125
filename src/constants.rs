//! Common constants used throughout the crate.
//!
//! This was consolidated here because we started redefining this in separate modules accidentally.
//! This helps ensure the entire crate is on the same page about these constant values. If a value
//! is spelled incorrectly, at least it can be fixed in one spot.
//!
//! Tests that are testing the content of an error code or message should not use these constants;
//! they should use hard-coded strings so the tests are also testing for misspellings.
//!
//! Please keep this file organized alphabetically.

/// Name of the MAC algorithm, embedded as the first line of the string to sign.
pub(crate) const ALGORITHM: &str = "HMAC-SHA-256";

/// The authentication scheme. Also the prefix applied to the raw API secret key to form the
/// initial key of the signing key chain.
pub(crate) const AUTHENTICATION_SCHEME: &str = "SAuthc1";

/// Number of PBKDF2 iterations used when deriving secret-cipher key material.
pub(crate) const CIPHER_ITERATIONS: u32 = 1024;

/// Length of the derived secret-cipher key material: a 16-byte IV followed by a 16-byte AES key.
pub(crate) const CIPHER_KEY_MATERIAL_LEN: usize = 32;

/// Fixed, process-wide PBKDF2 salt (base64). Shared by every secret on purpose: rotating the
/// passphrase invalidates all previously encrypted secrets at once. Changing this value breaks
/// decryption of existing records.
pub(crate) const CIPHER_SALT_B64: &str = "RwKwsDB3qUo6RD8YwHLoy+UkHTcgitWGLriAoGBXt30=";

/// Error code: DecryptionFailure
pub(crate) const ERR_CODE_DECRYPTION_FAILURE: &str = "DecryptionFailure";

/// Error code: HashingFailure
pub(crate) const ERR_CODE_HASHING_FAILURE: &str = "HashingFailure";

/// Error code: InternalFailure
pub(crate) const ERR_CODE_INTERNAL_FAILURE: &str = "InternalFailure";

/// Error code: InvalidRequestURL
pub(crate) const ERR_CODE_INVALID_REQUEST_URL: &str = "InvalidRequestURL";

/// Error code: MalformedAuthorizationHeader
pub(crate) const ERR_CODE_MALFORMED_AUTHORIZATION_HEADER: &str = "MalformedAuthorizationHeader";

/// Error code: MissingCredentials
pub(crate) const ERR_CODE_MISSING_CREDENTIALS: &str = "MissingCredentials";

/// Error code: SecretNotFound
pub(crate) const ERR_CODE_SECRET_NOT_FOUND: &str = "SecretNotFound";

/// Error code: SignatureDoesNotMatch
pub(crate) const ERR_CODE_SIGNATURE_DOES_NOT_MATCH: &str = "SignatureDoesNotMatch";

/// Error code: StoreUnavailable
pub(crate) const ERR_CODE_STORE_UNAVAILABLE: &str = "StoreUnavailable";

/// Header for the assembled authorization value.
pub(crate) const HDR_AUTHORIZATION: &str = "Authorization";

/// Header for the request host, injected by the signer.
pub(crate) const HDR_HOST: &str = "Host";

/// Header for the request timestamp, injected by the signer.
pub(crate) const HDR_STORMPATH_DATE: &str = "X-Stormpath-Date";

/// String included at the end of the SAuthc1 credential id and used as the final stage of the
/// signing key chain.
pub(crate) const ID_TERMINATOR: &str = "sauthc1_request";

/// Compact ISO8601 format used for the timestamp header and the string to sign.
pub(crate) const ISO8601_COMPACT_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Short date format used for key scoping.
pub(crate) const ISO8601_DATE_FORMAT: &str = "%Y%m%d";

/// Error message: `"The request signature we calculated does not match the signature you provided."`
pub(crate) const MSG_REQUEST_SIGNATURE_MISMATCH: &str =
    "The request signature we calculated does not match the signature you provided.";

/// Authorization field carrying the credential id.
pub(crate) const SAUTHC1_ID: &str = "sauthc1Id";

/// Authorization field carrying the final signature.
pub(crate) const SAUTHC1_SIGNATURE: &str = "sauthc1Signature";

/// Authorization field listing the signed header names.
pub(crate) const SAUTHC1_SIGNED_HEADERS: &str = "sauthc1SignedHeaders";

/// Name of the hash field holding the encrypted secret in the key-value store.
pub(crate) const SECRET_KEY_FIELD: &str = "apiSecretKey";

/// The length of a SHA-256 digest in bytes.
pub(crate) const SHA256_OUTPUT_LEN: usize = 32;
