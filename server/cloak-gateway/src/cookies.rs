//! Session cookies. The refresh cookie is scoped to the refresh path only,
//! so it never rides along on ordinary API calls.

use axum_extra::extract::cookie::{Cookie, SameSite};
use serde::Deserialize;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CookieConfig {
    pub access_max_age_secs: i64,
    pub refresh_max_age_secs: i64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_max_age_secs: 3600,
            refresh_max_age_secs: 36000,
        }
    }
}

pub fn access_token_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((ACCESS_TOKEN_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

pub fn refresh_token_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build((REFRESH_TOKEN_COOKIE, token))
        .path("/auth/refresh")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age_secs))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_cookie_attributes() {
        let cookie = access_token_cookie("tok".into(), 3600);
        assert_eq!(cookie.name(), "access_token");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[test]
    fn refresh_cookie_is_scoped_to_the_refresh_path() {
        let cookie = refresh_token_cookie("tok".into(), 36000);
        assert_eq!(cookie.name(), "refresh_token");
        assert_eq!(cookie.path(), Some("/auth/refresh"));
        assert_eq!(cookie.http_only(), Some(true));
    }
}
