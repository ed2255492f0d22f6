//! Per-request access to the caller's Spotify token and cache identity.

use super::error::ApiError;
use super::state::ServerState;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::debug;

pub const COOKIE_ACCESS_TOKEN_KEY: &str = "access_token";
pub const COOKIE_SESSION_ID_KEY: &str = "session_id";
pub const DEFAULT_USER_ID: &str = "default_user";
/// Token used in mock mode when the request carries none.
pub const MOCK_ACCESS_TOKEN: &str = "MOCK_TOKEN";

/// The caller's provider token plus the key their consolidated snapshot is
/// cached under.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotifyAccess {
    pub access_token: String,
    pub user_id: String,
}

fn extract_bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn cookie_value(jar: &CookieJar, key: &str) -> Option<String> {
    jar.get(key)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

fn resolve_access(parts: &Parts, mock_mode: bool) -> Option<SpotifyAccess> {
    let jar = CookieJar::from_headers(&parts.headers);

    let access_token = match cookie_value(&jar, COOKIE_ACCESS_TOKEN_KEY)
        .or_else(|| extract_bearer_token(parts))
    {
        Some(token) => token,
        None if mock_mode => {
            debug!("No access token, using mock token");
            MOCK_ACCESS_TOKEN.to_string()
        }
        None => {
            debug!("No access token in cookies nor headers.");
            return None;
        }
    };

    let user_id =
        cookie_value(&jar, COOKIE_SESSION_ID_KEY).unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    Some(SpotifyAccess {
        access_token,
        user_id,
    })
}

impl FromRequestParts<ServerState> for SpotifyAccess {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        resolve_access(parts, ctx.config.mock_mode)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated with Spotify"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/mcp/spotify/data");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn cookie_token_wins_over_header() {
        let parts = parts(&[
            ("cookie", "access_token=from-cookie; session_id=s-1"),
            ("authorization", "Bearer from-header"),
        ]);
        let access = resolve_access(&parts, false).unwrap();
        assert_eq!(access.access_token, "from-cookie");
        assert_eq!(access.user_id, "s-1");
    }

    #[test]
    fn bearer_header_is_used_without_cookie() {
        let parts = parts(&[("authorization", "Bearer abc123")]);
        let access = resolve_access(&parts, false).unwrap();
        assert_eq!(access.access_token, "abc123");
        assert_eq!(access.user_id, DEFAULT_USER_ID);
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let parts = parts(&[("authorization", "Basic dXNlcjpwYXNz")]);
        assert!(resolve_access(&parts, false).is_none());
    }

    #[test]
    fn missing_token_depends_on_mock_mode() {
        let parts = parts(&[]);
        assert!(resolve_access(&parts, false).is_none());
        let access = resolve_access(&parts, true).unwrap();
        assert_eq!(access.access_token, MOCK_ACCESS_TOKEN);
        assert_eq!(access.user_id, DEFAULT_USER_ID);
    }
}
