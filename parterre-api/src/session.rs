use axum_extra::extract::cookie::{Cookie, SignedCookieJar};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "parterre_session";
pub const ADMIN_COOKIE: &str = "parterre_admin";

fn persistent(name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie
}

/// The caller's session id, minting one on first visit. The id is the sole
/// basis of lock ownership; there are no buyer accounts.
pub fn ensure_session_id(jar: SignedCookieJar) -> (SignedCookieJar, String) {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        let session_id = cookie.value().to_string();
        return (jar, session_id);
    }

    let session_id = Uuid::new_v4().to_string();
    let jar = jar.add(persistent(SESSION_COOKIE, session_id.clone()));
    (jar, session_id)
}

pub fn session_id(jar: &SignedCookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
}

pub fn is_admin(jar: &SignedCookieJar) -> bool {
    jar.get(ADMIN_COOKIE)
        .map(|cookie| cookie.value() == "true")
        .unwrap_or(false)
}

pub fn grant_admin(jar: SignedCookieJar) -> SignedCookieJar {
    jar.add(persistent(ADMIN_COOKIE, "true".to_string()))
}

pub fn revoke_admin(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(persistent(ADMIN_COOKIE, String::new()))
}
