//! Normalizes backend response shapes at the client boundary.
//!
//! Backends answer either `{ success, data, message }` or the bare payload,
//! and lists arrive as `[..]`, `{ content: [..] }`, `{ data: [..] }` or a
//! page nested under `data`. Callers only ever see the inner value.

use reqwest::{header::RETRY_AFTER, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

use crate::error::ClientError;

#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Flat(T),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListShape<T> {
    Items(Vec<T>),
    Paged { content: Vec<T> },
    Wrapped { data: Option<Box<ListShape<T>>> },
}

impl<T> ListShape<T> {
    fn into_items(self) -> Vec<T> {
        match self {
            ListShape::Items(items) | ListShape::Paged { content: items } => items,
            ListShape::Wrapped { data } => data.map(|inner| inner.into_items()).unwrap_or_default(),
        }
    }
}

/// Reads a response into JSON, turning non-2xx statuses and
/// `success: false` envelopes into errors. An empty 2xx body is `Null`.
pub async fn read_body(response: reqwest::Response) -> Result<Value, ClientError> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok());

    let text = response.text().await?;
    let body = if text.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(&text).ok()
    };

    if !status.is_success() {
        return Err(error_for_status(status, retry_after, body.as_ref()));
    }

    match body {
        Some(value) if value.get("success") == Some(&Value::Bool(false)) => Err(ClientError::Http {
            status: status.as_u16(),
            message: server_message(&value).unwrap_or_else(|| "Request was not successful".into()),
        }),
        Some(value) => Ok(value),
        None if text.trim().is_empty() => Ok(Value::Null),
        None => Err(ClientError::Decode(format!(
            "expected JSON body, got {} bytes of text",
            text.len()
        ))),
    }
}

/// Maps a non-2xx response to the error taxonomy. 423 is the lockout signal.
pub fn error_for_status(
    status: StatusCode,
    retry_after: Option<u64>,
    body: Option<&Value>,
) -> ClientError {
    let message = body
        .and_then(server_message)
        .unwrap_or_else(|| status.to_string());

    if status == StatusCode::LOCKED {
        let retry_after_seconds = retry_after.or_else(|| body.and_then(retry_after_from_body));
        return ClientError::AccountLocked {
            retry_after_seconds,
            message,
        };
    }

    ClientError::Http {
        status: status.as_u16(),
        message,
    }
}

/// Removes the `{ success, data }` wrapper if present.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ClientError> {
    let envelope: Envelope<T> = serde_json::from_value(value)?;
    Ok(match envelope {
        Envelope::Wrapped { data } | Envelope::Flat(data) => data,
    })
}

/// Extracts a list from any of the list shapes; `null` is an empty list.
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, ClientError> {
    if value.is_null() {
        return Ok(Vec::new());
    }
    let shape: ListShape<T> = serde_json::from_value(value)?;
    Ok(shape.into_items())
}

fn server_message(body: &Value) -> Option<String> {
    ["message", "error", "detail"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .or_else(|| body.get("data").and_then(|data| data.get("message")).and_then(Value::as_str))
        .filter(|message| !message.trim().is_empty())
        .map(str::to_string)
}

fn retry_after_from_body(body: &Value) -> Option<u64> {
    const KEYS: [&str; 2] = ["retryAfterSeconds", "lockoutRemainingSeconds"];

    KEYS.iter()
        .find_map(|key| body.get(*key).and_then(Value::as_u64))
        .or_else(|| {
            let data = body.get("data")?;
            KEYS.iter().find_map(|key| data.get(*key).and_then(Value::as_u64))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u32,
    }

    #[test]
    fn decode_accepts_wrapped_and_flat() {
        let wrapped: Item = decode(json!({ "success": true, "data": { "id": 1 } })).unwrap();
        let flat: Item = decode(json!({ "id": 1 })).unwrap();
        assert_eq!(wrapped, flat);
    }

    #[test]
    fn decode_list_accepts_every_list_shape() {
        let expected = vec![Item { id: 1 }, Item { id: 2 }];
        let shapes = [
            json!([{ "id": 1 }, { "id": 2 }]),
            json!({ "content": [{ "id": 1 }, { "id": 2 }], "totalElements": 2 }),
            json!({ "success": true, "data": [{ "id": 1 }, { "id": 2 }] }),
            json!({ "data": { "content": [{ "id": 1 }, { "id": 2 }] } }),
        ];
        for shape in shapes {
            assert_eq!(decode_list::<Item>(shape).unwrap(), expected);
        }

        assert!(decode_list::<Item>(Value::Null).unwrap().is_empty());
        assert!(decode_list::<Item>(json!({ "data": null })).unwrap().is_empty());
    }

    #[test]
    fn decode_reports_unexpected_shape() {
        let err = decode::<Item>(json!({ "name": "no id" })).unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[test]
    fn error_uses_server_message_when_present() {
        let err = error_for_status(
            StatusCode::BAD_REQUEST,
            None,
            Some(&json!({ "success": false, "message": "Tenure out of range" })),
        );
        match err {
            ClientError::Http { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Tenure out of range");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_falls_back_to_raw_status() {
        let err = error_for_status(StatusCode::BAD_GATEWAY, None, None);
        match err {
            ClientError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "502 Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn locked_reads_retry_after_from_header_then_body() {
        let from_header = error_for_status(StatusCode::LOCKED, Some(120), None);
        assert!(matches!(
            from_header,
            ClientError::AccountLocked {
                retry_after_seconds: Some(120),
                ..
            }
        ));

        let from_body = error_for_status(
            StatusCode::LOCKED,
            None,
            Some(&json!({ "message": "Locked", "data": { "lockoutRemainingSeconds": 900 } })),
        );
        match from_body {
            ClientError::AccountLocked {
                retry_after_seconds,
                message,
            } => {
                assert_eq!(retry_after_seconds, Some(900));
                assert_eq!(message, "Locked");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
