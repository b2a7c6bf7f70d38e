use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::{
    AppState,
    error::AppError,
    forms::{FormErrors, LoginForm, RegisterForm},
    policy,
    session::{SessionContext, SessionStore, removal_cookie, session_cookie},
    views,
};

use crate::routes::feedback::model::Feedback;

use super::model::{User, unique_violation_field};

#[axum::debug_handler]
pub async fn index() -> Redirect {
    Redirect::to("/register")
}

#[axum::debug_handler]
pub async fn register_form() -> impl IntoResponse {
    views::register_page(&RegisterForm::default(), &FormErrors::default())
}

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let mut errors = form.validate();

    // Duplicates are rejected before any write.
    if errors.is_empty() {
        if User::username_taken(&state.pool, &form.username).await? {
            errors.add("username", "Username already taken.");
        }
        if User::email_taken(&state.pool, &form.email).await? {
            errors.add("email", "Email already registered.");
        }
    }
    if !errors.is_empty() {
        return Ok(views::register_page(&form, &errors).into_response());
    }

    let user = match User::create(&state.pool, &form, state.config.bcrypt_cost).await {
        Ok(user) => user,
        // Lost a race after the pre-check: still a field error, not a 500.
        Err(e) => match unique_violation_field(&e) {
            Some(field) => {
                let mut errors = FormErrors::default();
                errors.add(field, "Already taken.");
                return Ok(views::register_page(&form, &errors).into_response());
            }
            None => return Err(e.into()),
        },
    };

    let session_id = SessionStore::create(
        &state.redis,
        &user.username,
        state.config.session_ttl_secs,
    )
    .await?;

    let jar = jar.add(session_cookie(session_id));
    Ok((jar, Redirect::to(&format!("/users/{}", user.username))).into_response())
}

#[axum::debug_handler]
pub async fn login_form() -> impl IntoResponse {
    views::login_page(&LoginForm::default(), &FormErrors::default())
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let mut errors = form.validate();

    if errors.is_empty() {
        match User::authenticate(&state.pool, &form.username, &form.password).await? {
            Some(user) => {
                let session_id = SessionStore::create(
                    &state.redis,
                    &user.username,
                    state.config.session_ttl_secs,
                )
                .await?;

                let jar = jar.add(session_cookie(session_id));
                return Ok(
                    (jar, Redirect::to(&format!("/users/{}", user.username))).into_response()
                );
            }
            // One message for unknown user and wrong password alike.
            None => errors.add("password", "Bad username/password."),
        }
    }

    Ok(views::login_page(&form, &errors).into_response())
}

#[axum::debug_handler]
pub async fn show_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    if !policy::can_view_user(&ctx, &username) {
        return Ok(Redirect::to("/").into_response());
    }

    let user = User::find_by_username(&state.pool, &username)
        .await?
        .ok_or(AppError::NotFound)?;
    let feedback = Feedback::for_user(&state.pool, &username).await?;
    let is_owner = policy::can_modify_user(&ctx, &username);

    Ok(views::profile_page(&user, &feedback, is_owner).into_response())
}

#[axum::debug_handler]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    jar: CookieJar,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    if ctx.is_anonymous() {
        return Ok(Redirect::to("/login").into_response());
    }
    if !policy::can_modify_user(&ctx, &username) {
        return Ok(Redirect::to(&format!("/users/{}", username)).into_response());
    }

    User::delete(&state.pool, &username).await?;

    if let Some(session_id) = &ctx.session_id {
        SessionStore::destroy(&state.redis, session_id).await?;
    }

    let jar = jar.remove(removal_cookie());
    Ok((jar, Redirect::to("/")).into_response())
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    // Idempotent: logging out an anonymous session is a no-op.
    if let Some(session_id) = &ctx.session_id {
        SessionStore::destroy(&state.redis, session_id).await?;
    }

    let jar = jar.remove(removal_cookie());
    Ok((jar, Redirect::to("/")).into_response())
}
