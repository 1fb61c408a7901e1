// ABOUTME: Serde data models for WizNote API responses
// ABOUTME: Result envelope, login session, and document listing records

use crate::{Error, Result};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Domain-level success code carried inside every envelope.
pub const RETURN_CODE_OK: i64 = 200;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultEnvelope<T> {
    pub return_code: i64,
    #[serde(default)]
    pub return_message: String,
    pub result: Option<T>,
}

impl<T> ResultEnvelope<T> {
    /// Unwraps the payload, turning a non-200 return code into `Error::Api`.
    pub fn into_result(self, endpoint: &str) -> Result<T> {
        if self.return_code != RETURN_CODE_OK {
            return Err(Error::Api {
                endpoint: endpoint.into(),
                code: self.return_code,
                message: self.return_message,
            });
        }

        self.result.ok_or_else(|| Error::Parse {
            endpoint: endpoint.into(),
            source: serde::de::Error::custom("envelope reported success without a result"),
        })
    }

    /// Like `into_result`, but a successful envelope with no result yields `T::default()`.
    pub fn into_result_or_default(self, endpoint: &str) -> Result<T>
    where
        T: Default,
    {
        if self.return_code == RETURN_CODE_OK && self.result.is_none() {
            return Ok(T::default());
        }
        self.into_result(endpoint)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest<'a> {
    pub user_id: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_guid: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub kb_type: Option<String>,
    pub kb_server: String,
    pub kb_guid: String,
    pub token: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    pub doc_guid: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub attachment_count: u32,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub accessed: i64,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
}

impl DocumentMetadata {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        from_millis(self.created)
    }

    pub fn accessed_at(&self) -> Option<DateTime<Utc>> {
        from_millis(self.accessed)
    }
}

fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    if ms <= 0 {
        return None;
    }
    Utc.timestamp_millis_opt(ms).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_unwraps_result() {
        let json = r#"{"returnCode": 200, "returnMessage": "OK", "result": [1, 2, 3]}"#;
        let env: ResultEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert_eq!(env.into_result("/test").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_envelope_failure_carries_message() {
        let json = r#"{"returnCode": 500, "returnMessage": "internal failure"}"#;
        let env: ResultEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        match env.into_result("/test") {
            Err(Error::Api { code, message, .. }) => {
                assert_eq!(code, 500);
                assert_eq!(message, "internal failure");
            }
            other => panic!("Expected API error, got {:?}", other),
        }
    }

    #[test]
    fn test_envelope_failure_ignores_present_result() {
        let json = r#"{"returnCode": 31001, "returnMessage": "invalid token", "result": []}"#;
        let env: ResultEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert!(matches!(env.into_result("/test"), Err(Error::Api { code: 31001, .. })));
    }

    #[test]
    fn test_envelope_success_without_result_is_parse_error() {
        let json = r#"{"returnCode": 200, "returnMessage": "OK"}"#;
        let env: ResultEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert!(matches!(env.into_result("/test"), Err(Error::Parse { .. })));
    }

    #[test]
    fn test_envelope_null_result_defaults_when_allowed() {
        let json = r#"{"returnCode": 200, "returnMessage": "OK", "result": null}"#;
        let env: ResultEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert!(env.into_result_or_default("/test").unwrap().is_empty());
    }

    #[test]
    fn test_envelope_default_still_reports_api_error() {
        let json = r#"{"returnCode": 500, "returnMessage": "internal failure"}"#;
        let env: ResultEnvelope<Vec<u32>> = serde_json::from_str(json).unwrap();
        assert!(matches!(
            env.into_result_or_default("/test"),
            Err(Error::Api { code: 500, .. })
        ));
    }

    #[test]
    fn test_session_deserialize() {
        let json = r#"{
            "userGuid": "u-1",
            "email": "me@example.com",
            "mobile": null,
            "displayName": "Me",
            "kbType": "person",
            "kbServer": "https://kb.example.com",
            "kbGuid": "kb-1",
            "token": "tok",
            "extraField": "ignored"
        }"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.kb_server, "https://kb.example.com");
        assert_eq!(session.kb_guid, "kb-1");
        assert_eq!(session.token, "tok");
        assert!(session.mobile.is_none());
    }

    #[test]
    fn test_login_request_serializes_camel_case() {
        let body = serde_json::to_value(LoginRequest {
            user_id: "me@example.com",
            password: "secret",
        })
        .unwrap();
        assert_eq!(body["userId"], "me@example.com");
        assert_eq!(body["password"], "secret");
    }

    #[test]
    fn test_document_metadata_minimal() {
        let json = r#"{"docGuid": "d-1", "title": "Plan"}"#;
        let doc: DocumentMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(doc.doc_guid, "d-1");
        assert_eq!(doc.attachment_count, 0);
        assert!(doc.created_at().is_none());
    }

    #[test]
    fn test_document_metadata_timestamps() {
        let json = r#"{
            "docGuid": "d-1",
            "title": "Plan",
            "category": "/Notes/",
            "attachmentCount": 2,
            "created": 1700000000000,
            "accessed": 1700000500000,
            "keywords": "",
            "coverImage": null
        }"#;
        let doc: DocumentMetadata = serde_json::from_str(json).unwrap();
        let created = doc.created_at().unwrap();
        assert_eq!(created.to_rfc3339(), "2023-11-14T22:13:20+00:00");
        assert!(doc.accessed_at().unwrap() > created);
    }
}
