use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::model::outcome::Outcome;

/// Fallback when a failing structured response carries no `error` field.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

/// The parts of an HTTP response the classifier looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn json(status: u16, body: &str) -> Self {
        Reply {
            status,
            content_type: Some("application/json".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn html(status: u16, body: &str) -> Self {
        Reply {
            status,
            content_type: Some("text/html; charset=utf-8".to_string()),
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Deserialize)]
struct LikePayload {
    liked: bool,
    like_count: u64,
}

/// True for `application/json` and `application/*+json`, ignoring parameters.
pub fn is_structured(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return false;
    };
    let essence = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence == "application/json" || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Classify a like response. Pure: nothing is mutated here.
pub fn classify(reply: &Reply) -> Outcome {
    let outcome = classify_inner(reply);
    debug!(status = reply.status, outcome = ?outcome, "classified like response");
    outcome
}

fn classify_inner(reply: &Reply) -> Outcome {
    if !is_structured(reply.content_type.as_deref()) {
        return match reply.status {
            401 | 403 => Outcome::AuthRequired,
            _ => Outcome::MalformedResponse,
        };
    }

    if !reply.is_success() {
        let Ok(body) = serde_json::from_slice::<Value>(&reply.body) else {
            return Outcome::MalformedResponse;
        };
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(GENERIC_SERVER_ERROR)
            .to_string();
        return Outcome::ServerError { message };
    }

    match serde_json::from_slice::<LikePayload>(&reply.body) {
        Ok(payload) => Outcome::Success {
            engaged: payload.liked,
            count: payload.like_count,
        },
        Err(_) => Outcome::MalformedResponse,
    }
}
