use axum_extra::extract::CookieJar;

pub const TOKEN_COOKIE: &str = "gh_token";
pub const STATE_COOKIE: &str = "gh_oauth_state";

pub const TOKEN_MAX_AGE: u64 = 60 * 60 * 24 * 7;
pub const STATE_MAX_AGE: u64 = 10 * 60;

/// `Set-Cookie` value for a first-party, script-inaccessible cookie. A
/// `max_age` of zero expires it.
pub fn set_cookie(name: &str, value: &str, max_age: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        name,
        urlencoding::encode(value),
        max_age
    )
}

pub fn expire_cookie(name: &str) -> String {
    set_cookie(name, "", 0)
}

/// Cookie value, percent-decoded by the jar. Empty values count as absent.
pub fn read_cookie(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|cookie| cookie.value().trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

    #[test]
    fn token_cookie_attributes() {
        assert_eq!(
            set_cookie(TOKEN_COOKIE, "gho_abc", TOKEN_MAX_AGE),
            "gh_token=gho_abc; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=604800"
        );
        assert_eq!(
            expire_cookie(TOKEN_COOKIE),
            "gh_token=; Path=/; HttpOnly; Secure; SameSite=Lax; Max-Age=0"
        );
    }

    #[test]
    fn values_are_percent_encoded() {
        assert!(set_cookie("x", "a b;c", 1).starts_with("x=a%20b%3Bc;"));
    }

    #[test]
    fn reads_named_cookie_only() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; gh_token=gho_abc; gh_oauth_state="),
        );
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(read_cookie(&jar, TOKEN_COOKIE).as_deref(), Some("gho_abc"));
        assert_eq!(read_cookie(&jar, STATE_COOKIE), None);
        assert_eq!(read_cookie(&jar, "missing"), None);
    }
}
