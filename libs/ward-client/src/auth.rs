//! Bearer-token request headers.

use crate::error::{Error, Result};
use crate::session::Session;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

/// Build the headers for an authenticated request.
///
/// Fails with [`Error::Unauthenticated`] when there is no session or its token
/// is blank, so callers never reach the network without credentials.
pub fn auth_headers(session: Option<&Session>, json: bool) -> Result<HeaderMap> {
    let session = session
        .filter(|s| s.has_token())
        .ok_or(Error::Unauthenticated)?;

    let mut headers = HeaderMap::new();
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", session.token))
        .map_err(|e| Error::InvalidHeader(e.to_string()))?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);

    if json {
        headers.insert(CONTENT_TYPE, json_content_type());
    }
    Ok(headers)
}

/// Headers for the unauthenticated JSON calls (sign-in, sign-up).
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, json_content_type());
    headers
}

fn json_content_type() -> HeaderValue {
    HeaderValue::from_static("application/json")
}
