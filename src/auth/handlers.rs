use crate::auth::middleware::SESSION_USER_ID_KEY;
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::forms::{safe_next_target, FieldErrors, LoginForm, RegisterForm};
use crate::middleware::csrf::{get_or_create_csrf_token, validate_csrf_form_field};
use crate::models::User;
use crate::services::{auth, identity};
use crate::AppState;
use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    form: RegisterForm,
    errors: FieldErrors,
    csrf_token: String,
    messages: Vec<Flash>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    email: String,
    next: String,
    errors: FieldErrors,
    error: Option<String>,
    csrf_token: String,
    messages: Vec<Flash>,
}

#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    user: User,
    messages: Vec<Flash>,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    pub next: Option<String>,
}

fn render<T: Template>(template: T) -> Response {
    Html(
        template
            .render()
            .unwrap_or_else(|_| "<html><body><h1>Error rendering page</h1></body></html>".into()),
    )
    .into_response()
}

async fn establish_session(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(SESSION_USER_ID_KEY, user.id).await?;
    session.insert("email", user.email.clone()).await?;
    session
        .insert("auth_timestamp", chrono::Utc::now().timestamp())
        .await
}

/// GET / - signed-in callers land on the dashboard, everyone else on login.
pub async fn index_handler(session: Session) -> impl IntoResponse {
    if let Ok(Some(_user_id)) = session.get::<i64>(SESSION_USER_ID_KEY).await {
        Redirect::to("/dashboard")
    } else {
        Redirect::to("/login")
    }
}

/// GET /register - empty registration form.
pub async fn register_page(session: Session) -> Response {
    let csrf_token = get_or_create_csrf_token(&session)
        .await
        .unwrap_or_else(|_| String::from("error"));
    let messages = flash::take(&session).await;

    render(RegisterTemplate {
        form: RegisterForm::default(),
        errors: FieldErrors::default(),
        csrf_token,
        messages,
    })
}

async fn register_redisplay(session: &Session, form: &RegisterForm, errors: FieldErrors) -> Response {
    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));
    let messages = flash::take(session).await;

    render(RegisterTemplate {
        form: form.redisplay(),
        errors,
        csrf_token,
        messages,
    })
}

/// POST /register - validate, create the account, sign the caller in.
pub async fn register_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        let mut errors = FieldErrors::default();
        errors.add(
            "csrf_token",
            "Invalid security token. Please refresh the page and try again.",
        );
        return register_redisplay(&session, &form, errors).await;
    }

    if let Err(errors) = form.validate() {
        return register_redisplay(&session, &form, errors).await;
    }

    let overrides = identity::UserOverrides {
        first_name: Some(form.first_name.trim().to_string()),
        last_name: Some(form.last_name.trim().to_string()),
        ..Default::default()
    };

    let user = match identity::create_user(
        state.users.as_ref(),
        form.email.trim(),
        &form.password,
        overrides,
    )
    .await
    {
        Ok(user) => user,
        Err(identity::IdentityError::EmailTaken) => {
            let mut errors = FieldErrors::default();
            errors.add("email", "Email already registered");
            return register_redisplay(&session, &form, errors).await;
        }
        Err(err) => {
            tracing::error!("User creation failed: {}", err);
            let mut errors = FieldErrors::default();
            errors.add("email", "Registration failed. Please try again.");
            return register_redisplay(&session, &form, errors).await;
        }
    };

    if establish_session(&session, &user).await.is_err() {
        let mut errors = FieldErrors::default();
        errors.add("email", "Failed to create session. Please log in.");
        return register_redisplay(&session, &form, errors).await;
    }

    let _ = flash::success(
        &session,
        format!(
            "Welcome {}! Your account has been created.",
            user.first_name
        ),
    )
    .await;

    Redirect::to("/dashboard").into_response()
}

/// GET /login - empty login form; a `next` query parameter is carried
/// into a hidden field so the POST can send the caller back.
pub async fn login_page(session: Session, Query(query): Query<LoginQuery>) -> Response {
    let csrf_token = get_or_create_csrf_token(&session)
        .await
        .unwrap_or_else(|_| String::from("error"));
    let messages = flash::take(&session).await;

    render(LoginTemplate {
        email: String::new(),
        next: query.next.unwrap_or_default(),
        errors: FieldErrors::default(),
        error: None,
        csrf_token,
        messages,
    })
}

async fn login_redisplay(
    session: &Session,
    form: &LoginForm,
    errors: FieldErrors,
    error: Option<String>,
) -> Response {
    let csrf_token = get_or_create_csrf_token(session)
        .await
        .unwrap_or_else(|_| String::from("error"));
    let messages = flash::take(session).await;

    render(LoginTemplate {
        email: form.email.clone(),
        next: form.next.clone().unwrap_or_default(),
        errors,
        error,
        csrf_token,
        messages,
    })
}

/// POST /login - structural validation, then the credential check. A bad
/// password and an unknown email produce the same message.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    if validate_csrf_form_field(&session, &form.csrf_token)
        .await
        .is_err()
    {
        return login_redisplay(
            &session,
            &form,
            FieldErrors::default(),
            Some("Invalid security token. Please refresh the page and try again.".to_string()),
        )
        .await;
    }

    if let Err(errors) = form.validate() {
        return login_redisplay(&session, &form, errors, None).await;
    }

    match auth::authenticate(state.users.as_ref(), form.email.trim(), &form.password).await {
        Ok(user) => {
            if establish_session(&session, &user).await.is_err() {
                return login_redisplay(
                    &session,
                    &form,
                    FieldErrors::default(),
                    Some("Failed to create session".to_string()),
                )
                .await;
            }

            let name = if user.first_name.is_empty() {
                user.email.clone()
            } else {
                user.first_name.clone()
            };
            let _ = flash::success(&session, format!("Welcome back, {}", name)).await;

            Redirect::to(safe_next_target(form.next.as_deref())).into_response()
        }
        Err(auth::AuthError::Repository(err)) => {
            tracing::error!("Credential lookup failed: {}", err);
            login_redisplay(
                &session,
                &form,
                FieldErrors::default(),
                Some("An error occurred. Please try again.".to_string()),
            )
            .await
        }
        Err(_) => {
            login_redisplay(
                &session,
                &form,
                FieldErrors::default(),
                Some("Invalid email or password".to_string()),
            )
            .await
        }
    }
}

/// GET /logout - drop the session unconditionally.
pub async fn logout_handler(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    let _ = flash::success(&session, "You have been logged out successfully.").await;
    Redirect::to("/login")
}

/// GET /dashboard - protected by `require_auth`.
pub async fn dashboard_handler(
    State(state): State<AppState>,
    session: Session,
) -> crate::error::Result<Response> {
    let user_id = session
        .get::<i64>(SESSION_USER_ID_KEY)
        .await?
        .ok_or(AppError::Authentication)?;

    let user = auth::get_user_by_id(state.users.as_ref(), user_id).await?;

    let messages = flash::take(&session).await;

    Ok(render(DashboardTemplate { user, messages }))
}
