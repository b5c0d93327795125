//! SAuthc1 request signing and encrypted API secret key lookup.
//!
//! This crate implements the SAuthc1 authentication scheme: deterministic canonicalization of an
//! HTTP request (method, path, query string, headers), a multi-stage HMAC-SHA256 signing key
//! derivation scoped to a date and a per-request nonce, and assembly of the final authorization
//! header. It also manages the AES-128-CBC encryption of long-lived API secret keys held in an
//! external key-value store, so a verifying server can resolve an API key id to its plaintext
//! secret.
//!
//! Signing is synchronous and pure; the only suspension point is the store round trip in
//! [`ApiKeyService::get_api_secret_key`]. This crate never performs HTTP transport, it only
//! computes headers.

mod canonical;
mod cipher;
mod config;
mod constants;
mod crypto;
mod error;
mod signer;
mod signing_key;
mod store;
mod verify;

pub use crate::{
    canonical::{canonical_headers_string, canonical_query_string, canonical_uri_path, signed_headers_string},
    cipher::{decrypt, encrypt},
    config::Config,
    error::SignatureError,
    signer::{Credentials, SignRequest, SignRequestBuilder, SignRequestBuilderError, SignedRequest},
    signing_key::{KDateKey, KNonceKey, KSecretKey, KSigningKey},
    store::{ApiKeyService, SecretKeyStore},
    verify::{parse_authorization, verify_request, Authorization},
};
