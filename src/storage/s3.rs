use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use log::{debug, error, info};
use quick_xml::Reader;
use quick_xml::events::Event;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

use super::DocumentSource;
use super::sigv4::{Credentials, EMPTY_PAYLOAD_SHA256, Signer, canonical_query, uri_encode};
use crate::errors::SourceError;

/// S3 bucket accessed through the REST API
///
/// Without an endpoint override the virtual-hosted address
/// `https://{bucket}.s3.{region}.amazonaws.com` is used; with one, requests go
/// path-style to `{endpoint}/{bucket}`.
#[derive(Debug, Clone)]
pub struct S3Source {
    client: Client,
    bucket: String,
    signer: Option<Signer>,
    scheme: String,
    host: String,
    base_path: String,
}

/// One page of a ListObjectsV2 response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    pub keys: Vec<String>,
    pub is_truncated: bool,
    pub next_token: Option<String>,
}

impl S3Source {
    pub fn new(
        bucket: impl Into<String>,
        region: impl Into<String>,
        endpoint: Option<&str>,
        timeout_secs: u64,
        credentials: Option<Credentials>,
    ) -> Result<Self, SourceError> {
        let bucket = bucket.into();
        let region = region.into();

        let (scheme, host, base_path) = match endpoint {
            Some(endpoint) => {
                let url = Url::parse(endpoint)
                    .map_err(|e| SourceError::ParseError(format!("Invalid endpoint {}: {}", endpoint, e)))?;
                let host = url
                    .host_str()
                    .ok_or_else(|| SourceError::ParseError(format!("Endpoint has no host: {}", endpoint)))?;
                let host = match url.port() {
                    Some(port) => format!("{}:{}", host, port),
                    None => host.to_string(),
                };
                let base = format!("{}/{}", url.path().trim_end_matches('/'), uri_encode(&bucket, true));
                (url.scheme().to_string(), host, base)
            }
            None => (
                "https".to_string(),
                format!("{}.s3.{}.amazonaws.com", bucket, region),
                String::new(),
            ),
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| SourceError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        match &credentials {
            Some(creds) => info!("Using S3 bucket {} ({}) as {}", bucket, region, creds.access_key),
            None => info!("Using S3 bucket {} ({}) without credentials", bucket, region),
        }

        Ok(Self {
            client,
            bucket,
            signer: credentials.map(|c| Signer::new(c, region)),
            scheme,
            host,
            base_path,
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn object_path(&self, key: &str) -> String {
        format!("{}/{}", self.base_path, uri_encode(key.trim_start_matches('/'), false))
    }

    fn url_for(&self, path: &str, query: &str) -> String {
        if query.is_empty() {
            format!("{}://{}{}", self.scheme, self.host, path)
        } else {
            format!("{}://{}{}?{}", self.scheme, self.host, path, query)
        }
    }

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<Response, SourceError> {
        let url = self.url_for(path, &canonical_query(query));
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(signer) = &self.signer {
            for (name, value) in
                signer.authorization_headers("GET", &self.host, path, query, EMPTY_PAYLOAD_SHA256, Utc::now())
            {
                request = request.header(name, value);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(format!("s3://{}{}", self.bucket, path)));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("S3 error ({}): {}", status, message);
            return Err(SourceError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl DocumentSource for S3Source {
    async fn fetch(&self, key: &str) -> Result<Bytes, SourceError> {
        let response = self.get(&self.object_path(key), &[]).await?;
        let body = response.bytes().await?;
        debug!("Fetched {} byte(s) from {}", body.len(), self.describe(key));
        Ok(body)
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, SourceError> {
        let prefix = prefix.trim_start_matches('/');
        let bucket_path = format!("{}/", self.base_path);
        let mut keys = Vec::new();
        let mut token: Option<String> = None;

        loop {
            let mut query = vec![
                ("list-type".to_string(), "2".to_string()),
                ("prefix".to_string(), prefix.to_string()),
            ];
            if let Some(token) = &token {
                query.push(("continuation-token".to_string(), token.clone()));
            }

            let body = self.get(&bucket_path, &query).await?.text().await?;
            let page = parse_list_response(&body)?;
            keys.extend(page.keys);

            match (page.is_truncated, page.next_token) {
                (true, Some(next)) => token = Some(next),
                _ => break,
            }
        }

        keys.sort();
        info!("Found {} object(s) in s3://{}/{}", keys.len(), self.bucket, prefix);
        Ok(keys)
    }

    fn describe(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key.trim_start_matches('/'))
    }

    fn presign(&self, key: &str, expires_secs: u64) -> Option<String> {
        let path = self.object_path(key);
        match &self.signer {
            Some(signer) => {
                let query = signer.presign_query("GET", &self.host, &path, expires_secs, Utc::now());
                Some(self.url_for(&path, &query))
            }
            // Public buckets serve the plain object URL
            None => Some(self.url_for(&path, "")),
        }
    }
}

/// Parse a ListObjectsV2 XML body
pub fn parse_list_response(xml: &str) -> Result<ListPage, SourceError> {
    let mut reader = Reader::from_str(xml);
    let mut page = ListPage::default();
    let mut in_contents = false;
    let mut current: Option<Vec<u8>> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = e.local_name().as_ref().to_vec();
                if name == b"Contents" {
                    in_contents = true;
                }
                current = Some(name);
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| SourceError::ParseError(err.to_string()))?
                    .to_string();
                match current.as_deref() {
                    Some(b"Key") if in_contents => page.keys.push(text),
                    Some(b"IsTruncated") if !in_contents => page.is_truncated = text.trim() == "true",
                    Some(b"NextContinuationToken") => page.next_token = Some(text),
                    _ => {}
                }
            }
            Ok(Event::End(e)) => {
                if e.local_name().as_ref() == b"Contents" {
                    in_contents = false;
                }
                current = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(SourceError::ParseError(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(page)
}
