//! Response body classification.
//!
//! Decides how a base64 body should be displayed based on the
//! `content-type` header, and how large it is.

use base64::Engine;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::spec::HttpResponse;
use crate::error::{DomainError, DomainResult};
use crate::request::CONTENT_TYPE_JSON;

/// Standard alphabet, tolerant of missing padding.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &base64::alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How a response body is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyCategory {
    /// Parsed and pretty-printed JSON.
    Json,
    /// Opaque bytes, left encoded.
    #[default]
    Binary,
    /// Decoded text.
    Text,
}

impl BodyCategory {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "binary",
            Self::Text => "text",
        }
    }
}

/// The display form of a response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseBodyResult {
    /// Display category.
    pub category: BodyCategory,
    /// Display data: pretty JSON, decoded text, or the base64 body.
    pub data: String,
    /// Body size in bytes.
    pub size: i64,
    /// Parsed JSON, present only for the JSON category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<Value>,
}

/// Decodes a base64 body into text, replacing invalid UTF-8.
///
/// # Errors
///
/// Returns an error if the body is not valid base64.
pub fn decode_body(body: &str) -> DomainResult<String> {
    let bytes = LENIENT
        .decode(body.trim())
        .map_err(|e| DomainError::InvalidBase64(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Estimates the decoded size of a base64 string, rounding up.
#[must_use]
pub fn estimate_size(encoded: &str) -> i64 {
    let len = i64::try_from(encoded.len()).unwrap_or(i64::MAX / 3);
    (len * 3 + 3) / 4
}

fn is_text(content_type: &str) -> bool {
    let lower = content_type.to_ascii_lowercase();
    lower.contains(mime::TEXT.as_str()) || lower.contains(mime::JAVASCRIPT.as_str())
}

/// Classifies the body of a response.
///
/// # Errors
///
/// Returns an error when the content type declares JSON and the body does
/// not decode or parse.
pub fn classify(resp: &HttpResponse) -> DomainResult<ResponseBodyResult> {
    let mut result = ResponseBodyResult {
        category: BodyCategory::Binary,
        data: resp.body.clone(),
        size: -1,
        json: None,
    };

    let content_type = resp.header_values("content-type").join(" ");
    if content_type.contains(CONTENT_TYPE_JSON) {
        let text = decode_body(&resp.body)?;
        let json: Value =
            serde_json::from_str(&text).map_err(|e| DomainError::InvalidJson(e.to_string()))?;
        result.data =
            serde_json::to_string_pretty(&json).map_err(|e| DomainError::InvalidJson(e.to_string()))?;
        result.category = BodyCategory::Json;
        result.json = Some(json);
    } else if is_text(&content_type) {
        result.data = decode_body(&resp.body)?;
        result.category = BodyCategory::Text;
    }

    if let Some(length) = resp
        .header_values("content-length")
        .first()
        .and_then(|v| v.trim().parse::<i64>().ok())
    {
        result.size = length;
    }
    if result.size < 0 {
        result.size = estimate_size(&resp.body);
    }

    Ok(result)
}
