//! Response normalization: raw reply → native value or typed error.
//!
//! Classification happens once, here, and downstream code only ever sees
//! `Result<Value, Error>`. The rules, applied in order:
//!
//! | Reply | Result |
//! |-------|--------|
//! | empty body, 2xx | `Ok({})` |
//! | empty body, non-2xx | [`Error::Remote`] `"HTTP <status>"` |
//! | body is not JSON | [`Error::MalformedResponse`] |
//! | object with non-empty `errors` array | [`Error::Remote`] from the first entry |
//! | object with an `error` key | [`Error::Remote`] from it |
//! | non-2xx, no error indicator | [`Error::Remote`] from `message` or the status |
//! | object with `data` and `errors` keys | `Ok(data)` |
//! | anything else | `Ok(body)` verbatim |
//!
//! The payload's business meaning is never looked at.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Error, RemoteError};
use crate::transport::RawResponse;

/// Turn a raw reply into a value or an error.
pub fn normalize(raw: &RawResponse) -> Result<Value, Error> {
    if raw.body.trim().is_empty() {
        return if raw.is_success() {
            Ok(Value::Object(Map::new()))
        } else {
            Err(RemoteError::new(format!("HTTP {}", raw.status))
                .with_status(raw.status)
                .into())
        };
    }

    let body: Value = serde_json::from_str(&raw.body)
        .map_err(|e| Error::malformed(Some(raw.status), format!("body is not JSON: {e}"), &raw.body))?;

    if let Some(err) = error_indicator(&body) {
        let err = match (err.status, raw.is_success()) {
            (None, false) => err.with_status(raw.status),
            _ => err,
        };
        return Err(err.into());
    }

    if !raw.is_success() {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", raw.status));
        return Err(RemoteError::new(message)
            .with_status(raw.status)
            .with_detail(body)
            .into());
    }

    Ok(unwrap_envelope(body))
}

/// Decode a normalized value into a typed shape, reporting a mismatch as
/// [`Error::MalformedResponse`].
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    let text = value.to_string();
    serde_json::from_value(value).map_err(|e| {
        Error::malformed(
            None,
            format!("unexpected shape for {}: {e}", std::any::type_name::<T>()),
            &text,
        )
    })
}

// --- helpers -----------------------------------------------------------------

fn error_indicator(body: &Value) -> Option<RemoteError> {
    let obj = body.as_object()?;

    if let Some(first) = obj
        .get("errors")
        .and_then(Value::as_array)
        .and_then(|errors| errors.first())
    {
        return Some(from_ci_entry(first));
    }

    let error = obj.get("error")?;
    if error.is_null() {
        return None;
    }
    Some(from_error_key(obj, error))
}

/// `{"status": 404, "type": "urn:…", "message": "…", "link": "…"}` or a bare string.
fn from_ci_entry(entry: &Value) -> RemoteError {
    let Some(fields) = entry.as_object() else {
        return RemoteError::new(scalar_text(entry)).with_detail(entry.clone());
    };

    let message = fields
        .get("message")
        .map(scalar_text)
        .unwrap_or_else(|| "remote operation failed".to_string());
    let mut err = RemoteError::new(message).with_detail(entry.clone());
    if let Some(status) = fields.get("status").and_then(Value::as_u64).and_then(|s| u16::try_from(s).ok()) {
        err = err.with_status(status);
    }
    if let Some(code) = fields.get("type").and_then(Value::as_str) {
        err = err.with_code(code);
    }
    err
}

/// `{"error": "…", "code": "…"}` or `{"error": {"message": "…", "code": …, "stack": …}}`.
fn from_error_key(obj: &Map<String, Value>, error: &Value) -> RemoteError {
    let nested = error.as_object();

    let message = match nested {
        Some(inner) => inner
            .get("message")
            .map(scalar_text)
            .unwrap_or_else(|| error.to_string()),
        None => scalar_text(error),
    };

    let code = nested
        .and_then(|inner| inner.get("code"))
        .or_else(|| obj.get("code"))
        .map(scalar_text);

    let detail = ["stack", "trace", "detail"]
        .iter()
        .find_map(|key| nested.and_then(|inner| inner.get(*key)).or_else(|| obj.get(*key)))
        .cloned()
        .or_else(|| nested.map(|_| error.clone()));

    let mut err = RemoteError::new(message);
    if let Some(code) = code {
        err = err.with_code(code);
    }
    if let Some(detail) = detail {
        err = err.with_detail(detail);
    }
    err
}

fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut obj) if obj.contains_key("data") && obj.contains_key("errors") => {
            obj.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
