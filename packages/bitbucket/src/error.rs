//! Classification of service responses into typed errors.

use reqwest::StatusCode;
use reqwest::header::RETRY_AFTER;
use serde::Deserialize;

use crate::Response;

/// Errors from talking to the Bitbucket REST API.
#[derive(Debug, thiserror::Error)]
pub enum BitbucketError {
    /// 400.
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// 401 or 403.
    #[error("not authorized ({status}): {message}; set BKT_TOKEN or store a credential for bitbucket.org")]
    Unauthorized { status: u16, message: String },

    /// 404.
    #[error("{resource} not found: {message}")]
    NotFound { resource: String, message: String },

    /// 409, e.g. the branch or pull request already exists.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// 429.
    #[error("rate limited by Bitbucket{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<String> },

    /// 5xx. Never retried.
    #[error("Bitbucket server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Any other non-success status.
    #[error("unexpected response ({status}): {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Transport failure or timeout.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The body did not match the expected schema.
    #[error("malformed response: {message}")]
    Malformed { message: String },

    /// A request body could not be serialized.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

#[allow(clippy::ref_option)]
fn retry_hint(retry_after: &Option<String>) -> String {
    retry_after
        .as_ref()
        .map(|seconds| format!("; retry after {seconds} seconds"))
        .unwrap_or_default()
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Extract the human-readable message from an error response body.
pub(crate) fn server_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(body) {
        return match envelope.error.detail {
            Some(serde_json::Value::String(detail)) if !detail.is_empty() => {
                format!("{} ({detail})", envelope.error.message)
            }
            _ => envelope.error.message,
        };
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        text.chars().take(200).collect()
    }
}

/// Name of the resource a request path addresses, for `NotFound` messages.
pub(crate) fn resource_kind(path: &str) -> &'static str {
    let path = path.split('?').next().unwrap_or(path);

    if path.contains("/pullrequests") {
        "pull request"
    } else if path.contains("/refs/branches") {
        "branch"
    } else if path.contains("/projects") {
        "project"
    } else if path.contains("/members") {
        "workspace member"
    } else if path.contains("/users/") {
        "user"
    } else if path.contains("/repositories/") {
        "repository"
    } else {
        "resource"
    }
}

/// Pass 2xx responses through; turn everything else into a `BitbucketError`.
pub(crate) fn classify(path: &str, response: Response) -> Result<Response, BitbucketError> {
    let status = response.status;
    if status.is_success() {
        return Ok(response);
    }

    let message = server_message(status, &response.body);
    log::debug!("Bitbucket API error {status} for {path}: {message}");

    Err(match status.as_u16() {
        400 => BitbucketError::BadRequest { message },
        401 | 403 => BitbucketError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        404 => BitbucketError::NotFound {
            resource: resource_kind(path).to_string(),
            message,
        },
        409 => BitbucketError::Conflict { message },
        429 => BitbucketError::RateLimited {
            retry_after: response
                .headers
                .get(RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .map(ToString::to_string),
        },
        500..=599 => BitbucketError::ServerError {
            status: status.as_u16(),
            message,
        },
        other => BitbucketError::UnexpectedStatus {
            status: other,
            message,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderMap, HeaderValue};

    fn response(status: u16, body: &str) -> Response {
        Response {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn test_success_passes_through() {
        assert!(classify("/x", response(204, "")).is_ok());
    }

    #[test]
    fn test_extracts_service_error_message() {
        let body = r#"{"type":"error","error":{"message":"Bad branch","detail":"source missing"}}"#;
        let err = classify("/repositories/a/b/pullrequests", response(400, body)).unwrap_err();
        match err {
            BitbucketError::BadRequest { message } => {
                assert_eq!(message, "Bad branch (source missing)");
            }
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_classifies_statuses() {
        let path = "/repositories/a/b/pullrequests/5";
        assert!(matches!(
            classify(path, response(401, "")),
            Err(BitbucketError::Unauthorized { status: 401, .. })
        ));
        assert!(matches!(
            classify(path, response(403, "")),
            Err(BitbucketError::Unauthorized { status: 403, .. })
        ));
        assert!(matches!(
            classify(path, response(409, "exists")),
            Err(BitbucketError::Conflict { .. })
        ));
        assert!(matches!(
            classify(path, response(503, "")),
            Err(BitbucketError::ServerError { status: 503, .. })
        ));
        assert!(matches!(
            classify(path, response(418, "")),
            Err(BitbucketError::UnexpectedStatus { status: 418, .. })
        ));
    }

    #[test]
    fn test_not_found_names_resource() {
        let err = classify("/repositories/a/b/refs/branches/x", response(404, "")).unwrap_err();
        assert_eq!(err.to_string(), "branch not found: Not Found");
    }

    #[test]
    fn test_rate_limit_surfaces_retry_after() {
        let mut rate_limited = response(429, "");
        rate_limited
            .headers
            .insert(RETRY_AFTER, HeaderValue::from_static("30"));

        let err = classify("/x", rate_limited).unwrap_err();
        assert_eq!(
            err.to_string(),
            "rate limited by Bitbucket; retry after 30 seconds"
        );
    }

    #[test]
    fn test_resource_kind() {
        assert_eq!(resource_kind("/repositories/a/b"), "repository");
        assert_eq!(resource_kind("/workspaces/a/projects/K"), "project");
        assert_eq!(resource_kind("/workspaces/a/members"), "workspace member");
        assert_eq!(resource_kind("/users/jdoe"), "user");
        assert_eq!(resource_kind("/something"), "resource");
    }
}
