use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

pub const SESSION_USER_ID_KEY: &str = "user_id";

/// Protect a route: anonymous callers are bounced to the login page with
/// a `next` parameter pointing back at the page they asked for.
pub async fn require_auth(session: Session, request: Request, next: Next) -> Response {
    if let Ok(Some(_user_id)) = session.get::<i64>(SESSION_USER_ID_KEY).await {
        next.run(request).await
    } else {
        let target = format!(
            "/login?next={}",
            urlencoding::encode(request.uri().path())
        );
        Redirect::to(&target).into_response()
    }
}

/// Registration and login pages are pointless for a signed-in caller;
/// send them to the dashboard without touching the form.
pub async fn redirect_if_authenticated(session: Session, request: Request, next: Next) -> Response {
    if let Ok(Some(_user_id)) = session.get::<i64>(SESSION_USER_ID_KEY).await {
        Redirect::to("/dashboard").into_response()
    } else {
        next.run(request).await
    }
}
