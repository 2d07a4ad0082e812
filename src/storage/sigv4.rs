/*!
 * AWS Signature Version 4 for S3 requests.
 *
 * Two forms are supported: an `Authorization` header for requests sent by
 * this tool, and query-string presigning for URLs handed to other clients.
 */

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};

use crate::errors::SourceError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

/// Everything but `A-Z a-z 0-9 - _ . ~` is encoded
const UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');
const UNRESERVED_AND_SLASH: &AsciiSet = &UNRESERVED.remove(b'/');

/// SHA-256 of an empty body
pub const EMPTY_PAYLOAD_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Access key pair, optionally with a session token
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
    pub session_token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Credentials {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            session_token: None,
        }
    }

    /// Flags first, then `AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY` / `AWS_SESSION_TOKEN`
    pub fn resolve(
        access_key: Option<String>,
        secret_key: Option<String>,
    ) -> Result<Option<Self>, SourceError> {
        Self::resolve_with(access_key, secret_key, |name| std::env::var(name).ok())
    }

    /// Same as [`Credentials::resolve`] with an explicit variable lookup
    ///
    /// Returns `Ok(None)` when neither key is available, which means
    /// anonymous requests. Only one half of the pair is an error.
    pub fn resolve_with<F>(
        access_key: Option<String>,
        secret_key: Option<String>,
        lookup: F,
    ) -> Result<Option<Self>, SourceError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let access_key = non_empty(access_key).or_else(|| non_empty(lookup("AWS_ACCESS_KEY_ID")));
        let secret_key = non_empty(secret_key).or_else(|| non_empty(lookup("AWS_SECRET_ACCESS_KEY")));

        match (access_key, secret_key) {
            (Some(access_key), Some(secret_key)) => Ok(Some(Self {
                access_key,
                secret_key,
                session_token: non_empty(lookup("AWS_SESSION_TOKEN")),
            })),
            (None, None) => Ok(None),
            (Some(_), None) => Err(SourceError::MissingCredentials(
                "access key given without a secret key".to_string(),
            )),
            (None, Some(_)) => Err(SourceError::MissingCredentials(
                "secret key given without an access key".to_string(),
            )),
        }
    }
}

/// Request signer bound to one credential set and region
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
}

impl Signer {
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Headers to attach to a request: date, payload hash, token and `Authorization`
    ///
    /// `path` must already be URI-encoded; `query` holds raw pairs.
    pub fn authorization_headers(
        &self,
        method: &str,
        host: &str,
        path: &str,
        query: &[(String, String)],
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> Vec<(String, String)> {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let scope = self.scope(now);

        let mut headers = vec![
            ("host".to_string(), host.to_string()),
            ("x-amz-content-sha256".to_string(), payload_hash.to_string()),
            ("x-amz-date".to_string(), amz_date.clone()),
        ];
        if let Some(token) = &self.credentials.session_token {
            headers.push(("x-amz-security-token".to_string(), token.clone()));
        }
        headers.sort();

        let canonical_headers: String = headers
            .iter()
            .map(|(name, value)| format!("{}:{}\n", name, value.trim()))
            .collect();
        let signed_headers = headers
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(";");

        let canonical_request = format!(
            "{}\n{}\n{}\n{}\n{}\n{}",
            method,
            path,
            canonical_query(query),
            canonical_headers,
            signed_headers,
            payload_hash
        );
        let signature = self.signature(&canonical_request, &amz_date, &scope, now);

        let authorization = format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM, self.credentials.access_key, scope, signed_headers, signature
        );

        let mut out: Vec<(String, String)> = headers
            .into_iter()
            .filter(|(name, _)| name != "host")
            .collect();
        out.push(("authorization".to_string(), authorization));
        out
    }

    /// Canonical query string of a presigned request, signature included
    pub fn presign_query(
        &self,
        method: &str,
        host: &str,
        path: &str,
        expires_secs: u64,
        now: DateTime<Utc>,
    ) -> String {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let scope = self.scope(now);

        let mut query: Vec<(String, String)> = vec![
            ("X-Amz-Algorithm".to_string(), ALGORITHM.to_string()),
            (
                "X-Amz-Credential".to_string(),
                format!("{}/{}", self.credentials.access_key, scope),
            ),
            ("X-Amz-Date".to_string(), amz_date.clone()),
            ("X-Amz-Expires".to_string(), expires_secs.to_string()),
            ("X-Amz-SignedHeaders".to_string(), "host".to_string()),
        ];
        if let Some(token) = &self.credentials.session_token {
            query.push(("X-Amz-Security-Token".to_string(), token.clone()));
        }

        let canonical_request = format!(
            "{}\n{}\n{}\nhost:{}\n\nhost\n{}",
            method,
            path,
            canonical_query(&query),
            host,
            UNSIGNED_PAYLOAD
        );
        let signature = self.signature(&canonical_request, &amz_date, &scope, now);

        format!("{}&X-Amz-Signature={}", canonical_query(&query), signature)
    }

    fn scope(&self, now: DateTime<Utc>) -> String {
        format!("{}/{}/{}/aws4_request", now.format("%Y%m%d"), self.region, SERVICE)
    }

    fn signature(&self, canonical_request: &str, amz_date: &str, scope: &str, now: DateTime<Utc>) -> String {
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date,
            scope,
            sha256_hex(canonical_request.as_bytes())
        );

        let date = now.format("%Y%m%d").to_string();
        let mut key = hmac_sha256(format!("AWS4{}", self.credentials.secret_key).as_bytes(), date.as_bytes());
        for part in [self.region.as_str(), SERVICE, "aws4_request"] {
            key = hmac_sha256(&key, part.as_bytes());
        }

        hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = match HmacSha256::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC accepts any key length"),
    };
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Percent-encode everything but unreserved characters (and `/` unless told otherwise)
pub fn uri_encode(input: &str, encode_slash: bool) -> String {
    let set = if encode_slash { UNRESERVED } else { UNRESERVED_AND_SLASH };
    utf8_percent_encode(input, set).to_string()
}

/// Encoded `key=value` pairs sorted by key then value, joined with `&`
pub fn canonical_query(query: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (uri_encode(k, true), uri_encode(v, true)))
        .collect();
    pairs.sort();
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}
