use crate::error::{ErrorKind, ProviderError};
use once_cell::sync::Lazy;
use regex::Regex;

const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "rate limit",
    "rate_limit",
    "ratelimit",
    "resource_exhausted",
    "too many requests",
];

static QUOTA_STATUS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b429\b").unwrap());

/// Label a provider failure for routing.
///
/// Status 429 or a quota marker anywhere in the message wins over the
/// variant itself, since some gateways report quota exhaustion with a
/// generic status or inside a transport error.
pub fn classify(error: &ProviderError) -> ErrorKind {
    if let ProviderError::Http { status: 429, .. } = error {
        return ErrorKind::QuotaExceeded;
    }
    if has_quota_marker(&error.to_string()) {
        return ErrorKind::QuotaExceeded;
    }

    match error {
        ProviderError::MissingCredentials(_)
        | ProviderError::Http { .. }
        | ProviderError::Network(_)
        | ProviderError::Timeout => ErrorKind::Unavailable,
        ProviderError::Parse(_) | ProviderError::EmptyResponse => ErrorKind::ParseFailure,
        ProviderError::Other(_) => ErrorKind::Unknown,
    }
}

fn has_quota_marker(message: &str) -> bool {
    let lowered = message.to_lowercase();
    QUOTA_MARKERS.iter().any(|marker| lowered.contains(marker))
        || QUOTA_STATUS.is_match(&lowered)
}
