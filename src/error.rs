use {
    crate::constants::*,
    http::status::StatusCode,
    std::{
        error::Error,
        fmt::{Display, Formatter, Result as FmtResult},
    },
    tower::BoxError,
};

/// Error returned when signing a request, verifying a signature, or resolving an encrypted API
/// secret key fails.
#[derive(Debug)]
#[non_exhaustive]
pub enum SignatureError {
    /// The stored ciphertext could not be deciphered: bad base64, bad block length, or a padding
    /// error. A wrong passphrase that happens to unpad cleanly is *not* detected here; CBC mode
    /// carries no integrity check and the garbage plaintext is returned to the caller.
    DecryptionFailure(/* message */ String),

    /// The underlying hash/MAC primitive rejected its input. Unexpected in practice; treated as
    /// fatal.
    HashingFailure(/* message */ String),

    /// Signing or lookup failed due to an internal service error.
    InternalServiceError(Box<dyn Error + Send + Sync>),

    /// The request URL could not be parsed, or is missing a host component.
    InvalidRequestUrl(/* message */ String),

    /// An incoming `Authorization` header did not match the SAuthc1 grammar.
    MalformedAuthorizationHeader(/* message */ String),

    /// The API key id or secret key was empty.
    MissingCredentials(/* message */ String),

    /// The key-value store has no record for the requested API key id. Distinct from
    /// [`StoreUnavailable`][Self::StoreUnavailable].
    SecretNotFound(/* message */ String),

    /// Signature did not match the calculated signature value.
    SignatureDoesNotMatch(Option</* message */ String>),

    /// The key-value store backend failed. Distinct from absence; potentially retryable by the
    /// caller (no retries are performed here).
    StoreUnavailable(BoxError),
}

impl SignatureError {
    /// A stable, machine-readable code for this error kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DecryptionFailure(_) => ERR_CODE_DECRYPTION_FAILURE,
            Self::HashingFailure(_) => ERR_CODE_HASHING_FAILURE,
            Self::InternalServiceError(_) => ERR_CODE_INTERNAL_FAILURE,
            Self::InvalidRequestUrl(_) => ERR_CODE_INVALID_REQUEST_URL,
            Self::MalformedAuthorizationHeader(_) => ERR_CODE_MALFORMED_AUTHORIZATION_HEADER,
            Self::MissingCredentials(_) => ERR_CODE_MISSING_CREDENTIALS,
            Self::SecretNotFound(_) => ERR_CODE_SECRET_NOT_FOUND,
            Self::SignatureDoesNotMatch(_) => ERR_CODE_SIGNATURE_DOES_NOT_MATCH,
            Self::StoreUnavailable(_) => ERR_CODE_STORE_UNAVAILABLE,
        }
    }

    /// The HTTP status a server should return when surfacing this error to a client.
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidRequestUrl(_) | Self::MalformedAuthorizationHeader(_) | Self::MissingCredentials(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::SecretNotFound(_) | Self::SignatureDoesNotMatch(_) => StatusCode::FORBIDDEN,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for SignatureError {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::DecryptionFailure(msg) => f.write_str(msg),
            Self::HashingFailure(msg) => f.write_str(msg),
            Self::InternalServiceError(ref e) => Display::fmt(e, f),
            Self::InvalidRequestUrl(msg) => f.write_str(msg),
            Self::MalformedAuthorizationHeader(msg) => f.write_str(msg),
            Self::MissingCredentials(msg) => f.write_str(msg),
            Self::SecretNotFound(msg) => f.write_str(msg),
            Self::SignatureDoesNotMatch(msg) => {
                if let Some(msg) = msg {
                    f.write_str(msg)
                } else {
                    Ok(())
                }
            }
            Self::StoreUnavailable(ref e) => Display::fmt(e, f),
        }
    }
}

impl Error for SignatureError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StoreUnavailable(ref e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<BoxError> for SignatureError {
    fn from(e: BoxError) -> SignatureError {
        match e.downcast::<SignatureError>() {
            Ok(sig_err) => *sig_err,
            Err(e) => SignatureError::InternalServiceError(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use {crate::SignatureError, std::error::Error, tower::BoxError};

    #[test_log::test]
    fn test_codes_and_statuses() {
        let e = SignatureError::InvalidRequestUrl("not-a-url".to_string());
        assert_eq!(e.error_code(), "InvalidRequestURL");
        assert_eq!(e.http_status(), 400);
        assert_eq!(format!("{}", e), "not-a-url");

        let e = SignatureError::SecretNotFound("No secret for key id MyId".to_string());
        assert_eq!(e.error_code(), "SecretNotFound");
        assert_eq!(e.http_status(), 403);

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let e = SignatureError::StoreUnavailable(Box::new(io));
        assert_eq!(e.error_code(), "StoreUnavailable");
        assert_eq!(e.http_status(), 503);
        assert!(e.source().is_some());
    }

    #[test_log::test]
    fn test_from_box_error() {
        // This just exercises a few codepaths that aren't usually exercised.
        let utf8_error = Box::new(String::from_utf8(b"\x80".to_vec()).unwrap_err());
        let e: SignatureError = (utf8_error as BoxError).into();
        assert_eq!(e.error_code(), "InternalFailure");
        assert_eq!(e.http_status(), 500);

        let e = SignatureError::MissingCredentials("API secret key must not be empty".to_string());
        let e2 = SignatureError::from(Box::new(e) as BoxError);
        assert_eq!(e2.to_string(), "API secret key must not be empty");
        assert_eq!(e2.error_code(), "MissingCredentials");
    }
}
