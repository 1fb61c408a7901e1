// ABOUTME: Blocking HTTP client for the WizNote account and knowledge-base APIs
// ABOUTME: Handles login, token headers, envelope unwrapping, and fail-fast errors

use crate::model::{DocumentMetadata, LoginRequest, ResultEnvelope, Session};
use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_ACCOUNT_SERVER: &str = "https://as.wiz.cn";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const LOGIN_ENDPOINT: &str = "/as/user/login";
const TOKEN_HEADER: &str = "X-Wiz-Token";
const USER_AGENT: &str = concat!("wiz-export/", env!("CARGO_PKG_VERSION"), " (Rust)");

/// Listing is a single page; documents past this count are not returned.
pub const FOLDER_PAGE_SIZE: u32 = 200;

fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.len() <= max_chars {
        return s.to_string();
    }

    // Find a valid UTF-8 boundary at or before max_chars
    let mut boundary = max_chars;
    while boundary > 0 && !s.is_char_boundary(boundary) {
        boundary -= 1;
    }

    if boundary == 0 {
        return String::new();
    }

    format!("{}...", &s[..boundary])
}

pub struct ApiClient {
    client: Client,
    account_server: String,
}

impl ApiClient {
    pub fn new(account_server: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let account_server = account_server
            .unwrap_or_else(|| DEFAULT_ACCOUNT_SERVER.into())
            .trim_end_matches('/')
            .to_string();

        let client = Client::builder()
            .timeout(timeout.unwrap_or(DEFAULT_TIMEOUT))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::transport(&account_server, e))?;

        Ok(ApiClient {
            client,
            account_server,
        })
    }

    /// Exchanges credentials for a session. Every failure mode is reported as `Error::Auth`.
    pub fn login(&self, user_id: &str, password: &str) -> Result<Session> {
        let url = format!("{}{}", self.account_server, LOGIN_ENDPOINT);
        debug!(%url, "login");

        let response = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(&LoginRequest { user_id, password })
            .send()
            .map_err(|e| Error::Auth(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::Auth(format!("HTTP {} from {}", status, url)));
        }

        let body = response
            .text()
            .map_err(|e| Error::Auth(format!("failed to read login response: {}", e)))?;

        let envelope: ResultEnvelope<Session> = serde_json::from_str(&body).map_err(|e| {
            Error::Auth(format!(
                "unreadable login response ({}): {}",
                e,
                truncate_str(&body, 100)
            ))
        })?;

        envelope
            .into_result(LOGIN_ENDPOINT)
            .map_err(|e| match e {
                Error::Api { message, .. } => Error::Auth(message),
                other => Error::Auth(other.to_string()),
            })
    }

    /// Authenticated GET returning the fully drained response body.
    fn get(&self, url: &str, token: &str) -> Result<Vec<u8>> {
        debug!(%url, "fetch");

        let response = self
            .client
            .get(url)
            .header(TOKEN_HEADER, token)
            .send()
            .map_err(|e| Error::transport(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().unwrap_or_default();
            return Err(Error::Fetch {
                url: url.into(),
                status: Some(status.as_u16()),
                message: format!("HTTP {}: {}", status, truncate_str(&message, 100)),
            });
        }

        let body = response.bytes().map_err(|e| Error::transport(url, e))?;
        Ok(body.to_vec())
    }

    pub fn list_folder(&self, session: &Session, folder: &str) -> Result<Vec<DocumentMetadata>> {
        let endpoint = format!("/ks/note/list/category/{}", session.kb_guid);
        let url = category_url(session, folder);

        let body = self.get(&url, &session.token)?;
        let envelope: ResultEnvelope<Vec<DocumentMetadata>> =
            serde_json::from_slice(&body).map_err(|source| Error::Parse {
                endpoint: endpoint.clone(),
                source,
            })?;

        // An empty folder may come back with a null result.
        envelope.into_result_or_default(&endpoint)
    }

    /// Rendered markup of a document. The body is not wrapped in an envelope.
    pub fn view_document(&self, session: &Session, doc: &DocumentMetadata) -> Result<Vec<u8>> {
        self.get(&document_url(session, doc), &session.token)
    }

    pub fn view_resource(
        &self,
        session: &Session,
        doc: &DocumentMetadata,
        filename: &str,
    ) -> Result<Vec<u8>> {
        self.get(&resource_url(session, doc, filename), &session.token)
    }
}

fn kb_base(session: &Session) -> &str {
    session.kb_server.trim_end_matches('/')
}

fn category_url(session: &Session, folder: &str) -> String {
    format!(
        "{}/ks/note/list/category/{}?start=0&count={}&category={}&orderBy=created",
        kb_base(session),
        session.kb_guid,
        FOLDER_PAGE_SIZE,
        urlencoding::encode(folder)
    )
}

fn document_url(session: &Session, doc: &DocumentMetadata) -> String {
    format!(
        "{}/ks/note/view/{}/{}?objType=document",
        kb_base(session),
        session.kb_guid,
        doc.doc_guid
    )
}

fn resource_url(session: &Session, doc: &DocumentMetadata, filename: &str) -> String {
    format!(
        "{}/ks/note/view/{}/{}/index_files/{}",
        kb_base(session),
        session.kb_guid,
        doc.doc_guid,
        filename
    )
}
