//! OCS response envelope decoding.
//!
//! Every response is wrapped as
//! `{"ocs":{"meta":{"statuscode":..,"message":..},"data":..}}`. The meta
//! block is checked before the payload is touched, so error envelopes whose
//! `data` is an empty array still surface as [`ApiError`] rather than a
//! parse failure.

use crate::error::{ApiError, ClientError, Result};
use crate::transport::RawResponse;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Application-level success code.
pub const OCS_OK: i32 = 100;

#[derive(Debug, Deserialize)]
struct Envelope {
    ocs: Ocs,
}

#[derive(Debug, Deserialize)]
struct Ocs {
    meta: Meta,
    #[serde(default)]
    data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
struct Meta {
    #[serde(default)]
    status: String,
    statuscode: i32,
    #[serde(default)]
    message: Option<String>,
}

impl Meta {
    fn into_error(self) -> ApiError {
        ApiError::new(self.statuscode, self.message.unwrap_or_default())
    }
}

/// Decode a response and return its payload.
pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    decode_text(response, &response.body)
}

/// Decode a response after running [`repair_json`] over the body.
///
/// Only for endpoints known to emit the malformed user shape.
pub fn decode_repaired<T: DeserializeOwned>(response: &RawResponse) -> Result<T> {
    let repaired = repair_json(&response.body);
    decode_text(response, &repaired)
}

/// Decode a response whose payload is irrelevant, checking only the meta block.
pub fn decode_unit(response: &RawResponse) -> Result<()> {
    open(response, &response.body).map(|_| ())
}

fn decode_text<T: DeserializeOwned>(response: &RawResponse, text: &str) -> Result<T> {
    let data = open(response, text)?;
    serde_json::from_value(data)
        .map_err(|e| ClientError::ParseError(format!("Failed to parse payload: {}", e)))
}

/// Parse the envelope, map non-100 codes to errors, and hand back `data`.
fn open(response: &RawResponse, text: &str) -> Result<serde_json::Value> {
    let envelope: Envelope = match serde_json::from_str(text) {
        Ok(envelope) => envelope,
        Err(_) if !response.is_success() => {
            return Err(ClientError::ServerError {
                status: response.status,
                message: response.body.clone(),
            });
        }
        Err(e) => {
            return Err(ClientError::ParseError(format!(
                "Failed to parse envelope: {}",
                e
            )));
        }
    };

    let meta = envelope.ocs.meta;
    if meta.statuscode != OCS_OK {
        return Err(meta.into_error().into());
    }

    Ok(envelope.ocs.data)
}

// The server sends an empty PHP array instead of an object for users that
// never logged in.
static EMPTY_QUOTA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(^|[^\\])"quota"(\s*):(\s*)\[\s*\]"#).expect("valid regex"));

// Booleans quoted as strings in known boolean positions.
static QUOTED_BOOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(^|[^\\])"(enabled|setDisplayName|setPassword)"(\s*):(\s*)"(true|false)""#)
        .expect("valid regex")
});

/// Rewrite the known-malformed tokens of the user detail payload into valid JSON.
///
/// Patterns only match unescaped key positions, so string values containing
/// the same text are left alone. Applying it twice yields the same text.
pub fn repair_json(text: &str) -> String {
    let text = EMPTY_QUOTA.replace_all(text, r#"${1}"quota"${2}:${3}{}"#);
    QUOTED_BOOL
        .replace_all(&text, r#"${1}"${2}"${3}:${4}${5}"#)
        .into_owned()
}
