use axum::{
    extract::{Extension, Form, Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    AppState,
    error::AppError,
    forms::{FeedbackForm, FormErrors},
    policy,
    session::SessionContext,
    views,
};

use super::model::Feedback;

fn owner_profile(username: &str) -> Redirect {
    Redirect::to(&format!("/users/{}", username))
}

#[axum::debug_handler]
pub async fn add_form(
    Extension(ctx): Extension<SessionContext>,
    Path(username): Path<String>,
) -> Response {
    if ctx.is_anonymous() {
        return Redirect::to("/login").into_response();
    }
    if !policy::can_create_feedback(&ctx, &username) {
        return owner_profile(&username).into_response();
    }

    views::feedback_form_page(
        "Add Feedback",
        &format!("/users/{}/feedback/add", username),
        &FeedbackForm::default(),
        &FormErrors::default(),
    )
    .into_response()
}

#[axum::debug_handler]
pub async fn add(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(username): Path<String>,
    Form(form): Form<FeedbackForm>,
) -> Result<Response, AppError> {
    if ctx.is_anonymous() {
        return Ok(Redirect::to("/login").into_response());
    }
    if !policy::can_create_feedback(&ctx, &username) {
        return Ok(owner_profile(&username).into_response());
    }

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(views::feedback_form_page(
            "Add Feedback",
            &format!("/users/{}/feedback/add", username),
            &form,
            &errors,
        )
        .into_response());
    }

    Feedback::create(&state.pool, &username, &form.title, &form.content).await?;
    Ok(owner_profile(&username).into_response())
}

#[axum::debug_handler]
pub async fn update_form(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(feedback_id): Path<i32>,
) -> Result<Response, AppError> {
    let feedback = Feedback::find_by_id(&state.pool, feedback_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if ctx.is_anonymous() {
        return Ok(Redirect::to("/login").into_response());
    }
    if !policy::can_modify_feedback(&ctx, &feedback) {
        return Ok(owner_profile(&feedback.username).into_response());
    }

    let form = FeedbackForm {
        title: feedback.title.clone(),
        content: feedback.content.clone(),
    };
    Ok(views::feedback_form_page(
        "Edit Feedback",
        &format!("/feedback/{}/update", feedback.id),
        &form,
        &FormErrors::default(),
    )
    .into_response())
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(feedback_id): Path<i32>,
    Form(form): Form<FeedbackForm>,
) -> Result<Response, AppError> {
    let feedback = Feedback::find_by_id(&state.pool, feedback_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if ctx.is_anonymous() {
        return Ok(Redirect::to("/login").into_response());
    }
    if !policy::can_modify_feedback(&ctx, &feedback) {
        return Ok(owner_profile(&feedback.username).into_response());
    }

    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(views::feedback_form_page(
            "Edit Feedback",
            &format!("/feedback/{}/update", feedback.id),
            &form,
            &errors,
        )
        .into_response());
    }

    Feedback::update(&state.pool, feedback.id, &form.title, &form.content).await?;
    Ok(owner_profile(&feedback.username).into_response())
}

#[axum::debug_handler]
pub async fn delete(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(feedback_id): Path<i32>,
) -> Result<Response, AppError> {
    let feedback = Feedback::find_by_id(&state.pool, feedback_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if ctx.is_anonymous() {
        return Ok(Redirect::to("/login").into_response());
    }
    if !policy::can_modify_feedback(&ctx, &feedback) {
        return Ok(owner_profile(&feedback.username).into_response());
    }

    Feedback::delete(&state.pool, feedback.id).await?;
    Ok(owner_profile(&feedback.username).into_response())
}
