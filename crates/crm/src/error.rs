use std::path::PathBuf;

use thiserror::Error;

use crate::leads::ApiError;

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("could not read signing key `{path}`: {source}")]
    ReadKey { path: PathBuf, source: std::io::Error },
    #[error("signing key is not a valid RSA PEM key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),
    #[error("assertion signing failed: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("http client could not be built: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error("request to salesforce `{endpoint}` failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("salesforce `{endpoint}` returned {status}: {body}")]
    Status { endpoint: &'static str, status: u16, body: String },
    #[error("salesforce `{endpoint}` response could not be decoded: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("token endpoint returned an empty access token")]
    EmptyToken,
    #[error("salesforce rejected the lead ({status}): {body}")]
    Rejected { status: u16, errors: Vec<ApiError>, body: String },
}
