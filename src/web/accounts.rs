//! Signup, login and logout pages.

use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::AppState;
use super::auth::{SessionUser, clear_session_cookie, session_cookie, session_token};
use crate::error::AppError;

const SIGNUP_FORM: &str = r#"
    <h2>Sign Up</h2>
    <form method="post">
        <input name="username" placeholder="Username" required/><br>
        <input name="password" type="password" placeholder="Password" required/><br>
        <button type="submit">Sign Up</button>
    </form>
"#;

const LOGIN_FORM: &str = r#"
    <h2>Login</h2>
    <form method="post">
        <input name="username" placeholder="Username" required/><br>
        <input name="password" type="password" placeholder="Password" required/><br>
        <button type="submit">Login</button>
    </form>
"#;

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// 302 redirect, optionally setting a cookie.
fn found(location: &'static str, cookie: Option<String>) -> Response {
    match cookie {
        Some(cookie) => (
            StatusCode::FOUND,
            [(header::LOCATION, location.to_string()), (header::SET_COOKIE, cookie)],
        )
            .into_response(),
        None => (StatusCode::FOUND, [(header::LOCATION, location)]).into_response(),
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub async fn index(SessionUser(user): SessionUser) -> Html<String> {
    let mut html = String::from("<h1>Welcome to News Scraper</h1>");
    match user {
        Some(user) => {
            html.push_str(&format!("<p>Logged in as: {}</p>", escape_html(&user)));
            html.push_str(r#"<p><a href="/scrape">Go to Scrape</a></p>"#);
            html.push_str(r#"<p><a href="/logout">Logout</a></p>"#);
        }
        None => {
            html.push_str(r#"<p><a href="/signup">Sign Up</a></p>"#);
            html.push_str(r#"<p><a href="/login">Login</a></p>"#);
        }
    }
    Html(html)
}

pub async fn signup_form() -> Html<&'static str> {
    Html(SIGNUP_FORM)
}

pub async fn signup_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    if state.users.find(&form.username).await?.is_some() {
        warn!(username = %form.username, "Signup for existing username");
        return Ok((StatusCode::BAD_REQUEST, "Username already exists").into_response());
    }

    let password_hash = bcrypt::hash(&form.password, state.password_cost)?;
    state.users.insert(&form.username, &password_hash).await?;
    info!(username = %form.username, "Created account");
    Ok(found("/login", None))
}

pub async fn login_form() -> Html<&'static str> {
    Html(LOGIN_FORM)
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<Credentials>,
) -> Result<Response, AppError> {
    let verified = match state.users.find(&form.username).await? {
        Some(user) => bcrypt::verify(&form.password, &user.password_hash)?,
        None => false,
    };
    if !verified {
        warn!(username = %form.username, "Failed login");
        return Ok((StatusCode::BAD_REQUEST, "Invalid username or password").into_response());
    }

    let token = state.sessions.create(&form.username);
    info!(username = %form.username, "Logged in");
    Ok(found("/", Some(session_cookie(&token))))
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    if let Some(username) = session_token(&headers).and_then(|token| state.sessions.remove(token)) {
        info!(%username, "Logged out");
    }
    found("/", Some(clear_session_cookie()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<b>"x" & y</b>"#), "&lt;b&gt;&quot;x&quot; &amp; y&lt;/b&gt;");
    }

    #[tokio::test]
    async fn test_index_links_depend_on_session() {
        let Html(anonymous) = index(SessionUser(None)).await;
        assert!(anonymous.contains("/signup"));
        assert!(!anonymous.contains("/logout"));

        let Html(signed_in) = index(SessionUser(Some("layla".to_string()))).await;
        assert!(signed_in.contains("Logged in as: layla"));
        assert!(signed_in.contains("/scrape"));
    }
}
