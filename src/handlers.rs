use crate::dashboard::build_dashboard;
use crate::errors::AppError;
use crate::models::{
    DashboardResponse, LoginRequest, MoodFormView, NameBody, ProfileUpdate, SessionSnapshot,
    SignupBody, StepInput, SubmitBody, SubmitResponse, User,
};
use crate::mood::{Mood, SleepRange};
use crate::mood_form::{MoodForm, Step};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{Json, extract::State, http::StatusCode, response::Html};
use chrono::Local;
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.session.snapshot().await;
    Html(render_index(&today_string(), &snapshot))
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.snapshot().await)
}

pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupBody>,
) -> Result<Json<SessionSnapshot>, AppError> {
    if is_blank(&payload.name) || is_blank(&payload.email) || payload.password.is_empty() {
        return Err(AppError::bad_request("name, email and password are required"));
    }
    let image = payload.profile_image.filter(|image| !image.is_empty());

    state
        .session
        .signup(payload.name.trim(), payload.email.trim(), &payload.password, image)
        .await?;
    Ok(Json(state.session.snapshot().await))
}

pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionSnapshot>, AppError> {
    if is_blank(&payload.email) || payload.password.is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }

    state
        .session
        .login(payload.email.trim(), &payload.password)
        .await?;
    Ok(Json(state.session.snapshot().await))
}

pub async fn logout(State(state): State<AppState>) -> Json<SessionSnapshot> {
    state.session.logout().await;
    *state.mood_form.lock().await = None;
    Json(state.session.snapshot().await)
}

pub async fn refresh(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.refresh().await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, AppError> {
    require_user(&state).await?;
    let user = state.session.update_profile(&update).await?;
    Ok(Json(user))
}

pub async fn update_name(
    State(state): State<AppState>,
    Json(payload): Json<NameBody>,
) -> Result<Json<User>, AppError> {
    if is_blank(&payload.name) {
        return Err(AppError::bad_request("name is required"));
    }
    let user = state.session.update_display_name(payload.name.trim()).await?;
    Ok(Json(user))
}

pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<DashboardResponse>, AppError> {
    require_user(&state).await?;
    let entries = state.session.mood_entries().await?;
    Ok(Json(build_dashboard(&entries)))
}

/// Current wizard, opening a fresh one when none is open.
pub async fn get_mood_form(State(state): State<AppState>) -> Result<Json<MoodFormView>, AppError> {
    require_user(&state).await?;
    let mut slot = state.mood_form.lock().await;
    let form = slot.get_or_insert_with(MoodForm::new);
    Ok(Json(form_view(form)))
}

pub async fn discard_mood_form(State(state): State<AppState>) -> StatusCode {
    *state.mood_form.lock().await = None;
    StatusCode::NO_CONTENT
}

/// Applies the input for the current step, then moves to the next one.
pub async fn continue_mood_form(
    State(state): State<AppState>,
    Json(input): Json<StepInput>,
) -> Result<Json<MoodFormView>, AppError> {
    require_user(&state).await?;
    let mut slot = state.mood_form.lock().await;
    let form = slot.get_or_insert_with(MoodForm::new);

    match form.step() {
        Step::OverallMood => {
            if let Some(value) = input.overall_mood {
                form.select_mood(Mood::from_value(value)?);
            }
        }
        Step::Feelings => {
            if let Some(feelings) = input.feelings {
                form.set_feelings(feelings.as_slice())?;
            }
        }
        Step::Journal => {
            if let Some(text) = input.journal_entry {
                form.set_journal_entry(text);
            }
        }
        Step::SleepHours => {}
    }

    form.advance()?;
    Ok(Json(form_view(form)))
}

/// Sleep step: records the bucket, submits the wizard and creates the entry.
/// The wizard is dropped once the API has been called, whatever it answered.
pub async fn submit_mood_form(
    State(state): State<AppState>,
    Json(payload): Json<SubmitBody>,
) -> Result<Json<SubmitResponse>, AppError> {
    require_user(&state).await?;
    let sleep: SleepRange = payload.sleep_hours.parse()?;

    let submission = {
        let mut slot = state.mood_form.lock().await;
        let form = slot
            .as_mut()
            .ok_or_else(|| AppError::bad_request("no mood form is open"))?;
        form.select_sleep(sleep);
        form.submit(|submission| submission)?
    };

    let result = state.session.create_mood_entry(submission).await;
    *state.mood_form.lock().await = None;

    match result {
        Ok(message) => {
            info!("mood entry submitted");
            Ok(Json(SubmitResponse { message }))
        }
        Err(err) => {
            warn!("mood entry rejected: {err}");
            Err(err.into())
        }
    }
}

async fn require_user(state: &AppState) -> Result<User, AppError> {
    state.session.user().await.ok_or_else(AppError::unauthorized)
}

fn form_view(form: &MoodForm) -> MoodFormView {
    MoodFormView {
        step_number: form.step().number(),
        is_last_step: form.is_last_step(),
        form: form.clone(),
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn today_string() -> String {
    Local::now().format("%A, %B %-d, %Y").to_string()
}
