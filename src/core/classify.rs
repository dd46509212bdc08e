//! Error classification.
//!
//! Failures are sorted into a small taxonomy by inspecting structured
//! attributes only: HTTP status codes and concrete error types found along the
//! `source()` chain. Message text is never examined, so a wrapped 401 is still
//! recognized and a message that merely mentions "timeout" is not.

use std::error::Error as StdError;
use std::fmt;
use std::io;

use crate::error::{AppError, GatewayError};

/// Category of a failure, used to pick user-facing guidance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    Network,
    Validation,
    RateLimit,
    MalformedResponse,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [ErrorKind; 6] = [
        ErrorKind::Auth,
        ErrorKind::Network,
        ErrorKind::Validation,
        ErrorKind::RateLimit,
        ErrorKind::MalformedResponse,
        ErrorKind::Unknown,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::Auth => "Auth",
            ErrorKind::Network => "Network",
            ErrorKind::Validation => "Validation",
            ErrorKind::RateLimit => "RateLimit",
            ErrorKind::MalformedResponse => "MalformedResponse",
            ErrorKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A failure tagged with its category. Keeps the original error for display.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedError<'a> {
    pub kind: ErrorKind,
    pub error: &'a AppError,
}

/// Classify a top-level failure
pub fn classify(error: &AppError) -> ClassifiedError<'_> {
    let kind = if error.is_local_validation() {
        ErrorKind::Validation
    } else {
        match error {
            AppError::MissingId | AppError::Render(_) | AppError::Output(_) => ErrorKind::Unknown,
            other => classify_chain(other),
        }
    };

    ClassifiedError { kind, error }
}

/// Classify an arbitrary error by walking its source chain.
///
/// Rules are checked in priority order against every link of the chain;
/// the first rule that matches any link wins.
pub fn classify_chain(error: &(dyn StdError + 'static)) -> ErrorKind {
    let links: Vec<&(dyn StdError + 'static)> =
        std::iter::successors(Some(error), |&e| e.source()).collect();

    if any_link(&links, is_auth) {
        ErrorKind::Auth
    } else if any_link(&links, is_validation) {
        ErrorKind::Validation
    } else if any_link(&links, is_rate_limit) {
        ErrorKind::RateLimit
    } else if any_link(&links, is_network) {
        ErrorKind::Network
    } else if any_link(&links, is_malformed_response) {
        ErrorKind::MalformedResponse
    } else {
        ErrorKind::Unknown
    }
}

type LinkRule = fn(&(dyn StdError + 'static)) -> bool;

fn any_link(links: &[&(dyn StdError + 'static)], rule: LinkRule) -> bool {
    links.iter().any(|link| rule(*link))
}

fn status_of(link: &(dyn StdError + 'static)) -> Option<u16> {
    if let Some(e) = link.downcast_ref::<GatewayError>() {
        return e.status();
    }
    if let Some(e) = link.downcast_ref::<reqwest::Error>() {
        return e.status().map(|s| s.as_u16());
    }
    None
}

fn is_auth(link: &(dyn StdError + 'static)) -> bool {
    matches!(status_of(link), Some(401 | 403))
}

fn is_validation(link: &(dyn StdError + 'static)) -> bool {
    if matches!(status_of(link), Some(400 | 422)) {
        return true;
    }
    if let Some(e) = link.downcast_ref::<GatewayError>() {
        return matches!(
            e,
            GatewayError::MissingArgument { .. }
                | GatewayError::InvalidVersionString(_)
                | GatewayError::UnsupportedApiVersion(_)
                | GatewayError::ServiceLocation { .. }
        );
    }
    if let Some(e) = link.downcast_ref::<reqwest::Error>() {
        return e.is_builder();
    }
    false
}

fn is_rate_limit(link: &(dyn StdError + 'static)) -> bool {
    status_of(link) == Some(429)
}

fn is_network(link: &(dyn StdError + 'static)) -> bool {
    if let Some(e) = link.downcast_ref::<GatewayError>() {
        return matches!(e, GatewayError::Cancelled | GatewayError::TimedOut(_));
    }
    if let Some(e) = link.downcast_ref::<reqwest::Error>() {
        return e.is_timeout() || e.is_connect() || e.is_request() || e.is_body();
    }
    if let Some(e) = link.downcast_ref::<io::Error>() {
        return matches!(
            e.kind(),
            io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::AddrNotAvailable
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::TimedOut
                | io::ErrorKind::UnexpectedEof
        );
    }
    link.is::<tokio::time::error::Elapsed>()
}

fn is_malformed_response(link: &(dyn StdError + 'static)) -> bool {
    if let Some(e) = link.downcast_ref::<serde_json::Error>() {
        return e.is_syntax() || e.is_data() || e.is_eof();
    }
    false
}
