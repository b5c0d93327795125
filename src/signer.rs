//! The SAuthc1 signing pipeline.
//!
//! Signing is a one-shot, synchronous pipeline: canonicalize the request, hash it, derive the
//! scoped signing key chain, and assemble the authorization header. Nothing here performs I/O and
//! no caller state is mutated; the finalized header set is returned as a [`SignedRequest`].

use {
    crate::{
        canonical::{canonical_headers_string, canonical_query_string, canonical_uri_path, signed_headers_string},
        constants::*,
        crypto::sha256_hex,
        signing_key::KSecretKey,
        SignatureError,
    },
    chrono::{DateTime, Utc},
    derive_builder::Builder,
    http::uri::Uri,
    log::trace,
    std::{
        collections::BTreeMap,
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

/// An API key id and secret key pair.
///
/// The `Debug` implementation redacts the secret key; the secret must never be logged or
/// persisted in plaintext.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The public API key identifier.
    api_key_id: String,

    /// The API secret key.
    api_secret_key: String,
}

impl Credentials {
    /// Create a new `Credentials` from an API key id and secret key.
    pub fn new(api_key_id: impl Into<String>, api_secret_key: impl Into<String>) -> Self {
        Self {
            api_key_id: api_key_id.into(),
            api_secret_key: api_secret_key.into(),
        }
    }

    /// Retrieve the API key id.
    #[inline]
    pub fn api_key_id(&self) -> &str {
        &self.api_key_id
    }

    /// Retrieve the API secret key.
    #[inline]
    pub fn api_secret_key(&self) -> &str {
        &self.api_secret_key
    }
}

impl Debug for Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Credentials").field("api_key_id", &self.api_key_id).field("api_secret_key", &"<redacted>").finish()
    }
}

/// A request to be signed with the SAuthc1 scheme.
///
/// `SignRequest` structs are immutable. Use [`SignRequestBuilder`] to programmatically construct
/// a request, then call [`sign`][SignRequest::sign].
#[derive(Builder, Clone, Debug)]
pub struct SignRequest {
    /// The HTTP method. Upper-cased during canonicalization.
    #[builder(setter(into))]
    method: String,

    /// The absolute request URL, including scheme and host.
    #[builder(setter(into))]
    url: String,

    /// The request body, or the empty string for body-less requests.
    #[builder(setter(into), default)]
    body: String,

    /// The point in time the request is signed at, in UTC.
    date: DateTime<Utc>,

    /// The credentials to sign with.
    credentials: Credentials,

    /// The caller-supplied, per-request nonce. Must be unpredictable; reusing a nonce under the
    /// same date and credentials defeats replay protection.
    #[builder(setter(into))]
    nonce: String,

    /// Headers to include in the signature, in addition to the injected `Host` and
    /// `X-Stormpath-Date` headers. Names must be unique modulo case.
    #[builder(default)]
    headers: BTreeMap<String, String>,
}

/// The finalized result of signing: the complete header set and the authorization header value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedRequest {
    /// The caller headers plus the injected `Host`, `X-Stormpath-Date`, and `Authorization`
    /// headers.
    headers: BTreeMap<String, String>,

    /// The assembled authorization header value.
    authorization: String,
}

impl SignedRequest {
    /// Retrieve the complete header set to send with the request.
    #[inline]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Retrieve the authorization header value.
    #[inline]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }

    /// Consume the result, returning the header set.
    #[inline]
    pub fn into_headers(self) -> BTreeMap<String, String> {
        self.headers
    }
}

impl SignRequest {
    /// Create a [SignRequestBuilder] to construct a [SignRequest].
    #[inline]
    pub fn builder() -> SignRequestBuilder {
        SignRequestBuilder::default()
    }

    /// Retrieve the HTTP method.
    #[inline]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Retrieve the request URL.
    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retrieve the request body.
    #[inline]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Retrieve the signing timestamp.
    #[inline]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Retrieve the credentials.
    #[inline]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Retrieve the nonce.
    #[inline]
    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    /// Retrieve the caller-supplied headers.
    #[inline]
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    /// Sign this request, producing the finalized header set and authorization header.
    ///
    /// The pipeline follows the SAuthc1 scheme exactly: the canonical request and every HMAC
    /// input must match the verifying party's computation bit-for-bit.
    ///
    /// # Errors
    /// Returns [`SignatureError::MissingCredentials`] if the key id or secret is empty, and
    /// [`SignatureError::InvalidRequestUrl`] if the URL cannot be parsed or has no host. No
    /// partially signed result is ever returned.
    pub fn sign(&self) -> Result<SignedRequest, SignatureError> {
        if self.credentials.api_key_id().is_empty() {
            return Err(SignatureError::MissingCredentials("API key id must not be empty".to_string()));
        }
        if self.credentials.api_secret_key().is_empty() {
            return Err(SignatureError::MissingCredentials("API secret key must not be empty".to_string()));
        }

        let timestamp = self.date.format(ISO8601_COMPACT_FORMAT).to_string();
        let date_stamp = self.date.format(ISO8601_DATE_FORMAT).to_string();

        let uri: Uri = self
            .url
            .parse()
            .map_err(|e| SignatureError::InvalidRequestUrl(format!("Unable to parse URL {}: {}", self.url, e)))?;
        let host = match uri.host() {
            None => return Err(SignatureError::InvalidRequestUrl(format!("URL {} has no host", self.url))),
            Some(host) => match uri.port_u16() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            },
        };

        let mut headers = self.headers.clone();
        headers.insert(HDR_HOST.to_string(), host);
        headers.insert(HDR_STORMPATH_DATE.to_string(), timestamp.clone());

        // The authorization header is inserted after canonicalization, so it is never signed.
        let signed_headers = signed_headers_string(&headers);

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            self.method.to_uppercase(),
            canonical_uri_path(uri.path()),
            canonical_query_string(uri.query()),
            canonical_headers_string(&headers),
            signed_headers,
            sha256_hex(self.body.as_bytes())
        );
        trace!("Created canonical request: {:?}", canonical_request);

        let id = format!("{}/{}/{}/{}", self.credentials.api_key_id(), date_stamp, self.nonce, ID_TERMINATOR);
        let string_to_sign =
            format!("{}\n{}\n{}\n{}", ALGORITHM, timestamp, id, sha256_hex(canonical_request.as_bytes()));
        trace!("Created string to sign: {:?}", string_to_sign);

        let signing_key =
            KSecretKey::new(self.credentials.api_secret_key()).to_ksigning(self.date.date_naive(), &self.nonce)?;
        let signature = signing_key.sign(&string_to_sign)?;

        let authorization = format!(
            "{} {}={}, {}={}, {}={}",
            AUTHENTICATION_SCHEME, SAUTHC1_ID, id, SAUTHC1_SIGNED_HEADERS, signed_headers, SAUTHC1_SIGNATURE, signature
        );
        headers.insert(HDR_AUTHORIZATION.to_string(), authorization.clone());

        Ok(SignedRequest {
            headers,
            authorization,
        })
    }
}
