//! Server-side verification of SAuthc1-signed requests.
//!
//! A verifying server parses the incoming `Authorization` header to recover the API key id (and
//! from there the decrypted secret key, via [`ApiKeyService`][crate::ApiKeyService]), re-signs
//! the received request at the timestamp it carries, and compares signatures in constant time.

use {
    crate::{
        constants::{HDR_STORMPATH_DATE, ID_TERMINATOR, ISO8601_COMPACT_FORMAT, MSG_REQUEST_SIGNATURE_MISMATCH},
        signer::{Credentials, SignRequest},
        SignatureError,
    },
    chrono::{NaiveDateTime, TimeZone, Utc},
    lazy_static::lazy_static,
    log::debug,
    regex::Regex,
    std::collections::BTreeMap,
    subtle::ConstantTimeEq,
    tower::BoxError,
};

lazy_static! {
    /// Pattern for a SAuthc1 Authorization header.
    static ref SAUTHC1_AUTHORIZATION_RE: Regex = Regex::new(
        r"^\s*SAuthc1\s+sauthc1Id=(?P<id>[^,\s]+),\s*sauthc1SignedHeaders=(?P<signed_headers>[^,\s]*),\s*sauthc1Signature=(?P<signature>[0-9a-f]{64})\s*$"
    ).unwrap();
}

/// The fields carried by a SAuthc1 `Authorization` header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    /// The API key id from the credential id.
    api_key_id: String,

    /// The `YYYYMMDD` date stamp from the credential id.
    date_stamp: String,

    /// The per-request nonce from the credential id.
    nonce: String,

    /// The lower-cased, `;`-joined signed header names.
    signed_headers: String,

    /// The hex-encoded signature.
    signature: String,
}

impl Authorization {
    /// Retrieve the API key id.
    #[inline]
    pub fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    /// Retrieve the date stamp.
    #[inline]
    pub fn date_stamp(&self) -> &str {
        &self.date_stamp
    }

    /// Retrieve the nonce.
    #[inline]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Retrieve the signed header names.
    #[inline]
    pub fn signed_headers(&self) -> &str {
        &self.signed_headers
    }

    /// Retrieve the hex-encoded signature.
    #[inline]
    pub fn signature(&self) -> &str {
        &self.signature
    }
}

/// Parse a SAuthc1 `Authorization` header value into its fields.
///
/// # Errors
/// Returns [`SignatureError::MalformedAuthorizationHeader`] if the value does not match the
/// SAuthc1 grammar or the credential id does not have the form
/// `apiKeyId/YYYYMMDD/nonce/sauthc1_request`.
pub fn parse_authorization(header: &str) -> Result<Authorization, SignatureError> {
    let captures = SAUTHC1_AUTHORIZATION_RE.captures(header).ok_or_else(|| {
        SignatureError::MalformedAuthorizationHeader("Authorization header does not match the SAuthc1 scheme".to_string())
    })?;

    let id = &captures["id"];
    let parts: Vec<&str> = id.split('/').collect();
    if parts.len() != 4 || parts[3] != ID_TERMINATOR {
        return Err(SignatureError::MalformedAuthorizationHeader(format!(
            "Credential id must have the form apiKeyId/YYYYMMDD/nonce/{}: {}",
            ID_TERMINATOR, id
        )));
    }

    Ok(Authorization {
        api_key_id: parts[0].to_string(),
        date_stamp: parts[1].to_string(),
        nonce: parts[2].to_string(),
        signed_headers: captures["signed_headers"].to_string(),
        signature: captures["signature"].to_string(),
    })
}

/// Verify a received request against its SAuthc1 `Authorization` header.
///
/// `headers` is the received header set, including the `Authorization`, `Host`, and
/// `X-Stormpath-Date` headers, with names cased as they were signed. The request is re-signed
/// with `api_secret_key` at the carried timestamp and the signatures are compared in constant
/// time.
///
/// # Errors
/// * [`SignatureError::MalformedAuthorizationHeader`] if the authorization or timestamp header
///   is missing or unparsable.
/// * [`SignatureError::SignatureDoesNotMatch`] if the timestamp disagrees with the credential id
///   date or the recomputed signature differs.
pub fn verify_request(
    method: &str,
    url: &str,
    body: &str,
    headers: &BTreeMap<String, String>,
    api_secret_key: &str,
) -> Result<Authorization, SignatureError> {
    let authorization = find_header(headers, "authorization").ok_or_else(|| {
        SignatureError::MalformedAuthorizationHeader("Request is missing an Authorization header".to_string())
    })?;
    let authorization = parse_authorization(authorization)?;

    let timestamp = find_header(headers, "x-stormpath-date").ok_or_else(|| {
        SignatureError::MalformedAuthorizationHeader(format!("Request is missing the {} header", HDR_STORMPATH_DATE))
    })?;
    if !timestamp.starts_with(authorization.date_stamp()) {
        return Err(SignatureError::SignatureDoesNotMatch(Some(format!(
            "Timestamp {} does not match credential date {}",
            timestamp,
            authorization.date_stamp()
        ))));
    }
    let naive = NaiveDateTime::parse_from_str(timestamp, ISO8601_COMPACT_FORMAT).map_err(|e| {
        SignatureError::MalformedAuthorizationHeader(format!("Unable to parse timestamp {}: {}", timestamp, e))
    })?;
    let date = Utc.from_utc_datetime(&naive);

    // Re-sign with the received headers, minus the ones the signer injects itself.
    let mut base_headers = BTreeMap::new();
    for (name, value) in headers {
        match name.to_lowercase().as_str() {
            "authorization" | "host" | "x-stormpath-date" => {}
            _ => {
                base_headers.insert(name.clone(), value.clone());
            }
        }
    }

    let expected = SignRequest::builder()
        .method(method)
        .url(url)
        .body(body)
        .date(date)
        .credentials(Credentials::new(authorization.api_key_id(), api_secret_key))
        .nonce(authorization.nonce())
        .headers(base_headers)
        .build()
        .map_err(|e| SignatureError::from(Box::new(e) as BoxError))?
        .sign()?;
    let expected = parse_authorization(expected.authorization())?;

    let matches: bool = expected.signature().as_bytes().ct_eq(authorization.signature().as_bytes()).into();
    if !matches {
        debug!("Signature mismatch for API key id {}", authorization.api_key_id());
        return Err(SignatureError::SignatureDoesNotMatch(Some(MSG_REQUEST_SIGNATURE_MISMATCH.to_string())));
    }
    Ok(authorization)
}

/// Find a header by lower-cased name, regardless of the casing it was sent with.
fn find_header<'a>(headers: &'a BTreeMap<String, String>, lower_name: &str) -> Option<&'a str> {
    headers.iter().find(|(name, _)| name.to_lowercase() == lower_name).map(|(_, value)| value.as_str())
}
