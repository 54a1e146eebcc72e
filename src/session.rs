//! The signed-in user and their tokens.
//!
//! A [`SessionStore`] is created once at startup, hydrated from the session
//! file, shared with the handlers through [`crate::AppState`] and flushed by
//! [`SessionStore::shutdown`]. Every change to the user or the tokens is
//! written back to the session file while the state lock is held, so writes
//! reach the disk in the order the changes happened.

use crate::api::ApiClient;
use crate::errors::{ApiError, SessionError};
use crate::models::{
    AuthPayload, LoginRequest, MoodEntry, MoodSubmission, NameUpdate, NewMoodEntry,
    ProfileUpdate, SessionSnapshot, SignupRequest, User,
};
use crate::storage::{PersistedSession, load_session, persist_session};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

#[derive(Debug)]
struct SessionState {
    user: Option<User>,
    persisted: PersistedSession,
    loading: bool,
    error: Option<String>,
    /// Bumped whenever the user or the tokens are replaced, so a slow
    /// hydration can tell that a sign-in or sign-out overtook it.
    generation: u64,
}

impl SessionState {
    fn replace_user(&mut self, user: &User) {
        self.persisted.set_user(user);
        self.user = Some(user.clone());
        self.generation += 1;
    }

    fn forget(&mut self) {
        self.user = None;
        self.persisted.clear();
        self.generation += 1;
    }
}

pub struct SessionStore {
    api: ApiClient,
    path: PathBuf,
    state: Mutex<SessionState>,
}

impl SessionStore {
    /// An empty store that still has to be hydrated; `loading` is set.
    pub fn new(api: ApiClient, path: PathBuf) -> Self {
        Self {
            api,
            path,
            state: Mutex::new(SessionState {
                user: None,
                persisted: PersistedSession::default(),
                loading: true,
                error: None,
                generation: 0,
            }),
        }
    }

    /// Builds and hydrates a store in one go.
    pub async fn open(api: ApiClient, path: PathBuf) -> Self {
        let store = Self::new(api, path);
        store.hydrate().await;
        store
    }

    /// Restores the stored user right away, then confirms it against the API
    /// when an access token is stored. Rejected credentials are wiped.
    ///
    /// Runs while requests are already served. If a sign-in or sign-out lands
    /// first, hydration leaves that session alone.
    pub async fn hydrate(&self) {
        let started = self.state.lock().await.generation;
        let mut persisted = load_session(&self.path).await;
        let had_raw_user = persisted.user.is_some();
        let stored_user = persisted.take_user();
        let dropped_user = had_raw_user && persisted.user.is_none();

        let token = {
            let mut state = self.state.lock().await;
            if state.generation != started {
                debug!("session replaced before hydration, keeping it");
                state.loading = false;
                return;
            }
            state.user = stored_user;
            state.persisted = persisted;
            if dropped_user {
                self.save(&state.persisted).await;
            }
            state.persisted.access_token.clone()
        };

        let Some(token) = token else {
            self.state.lock().await.loading = false;
            return;
        };

        let result = self.api.current_user(&token).await;
        let mut state = self.state.lock().await;
        state.loading = false;
        if state.generation != started {
            debug!("session replaced during hydration, dropping the result");
            return;
        }
        match result {
            Ok(user) => {
                debug!(user_id = %user.id, "stored session confirmed");
                state.persisted.set_user(&user);
                state.user = Some(user);
            }
            Err(err) => {
                if err.is_unauthorized() {
                    info!("stored session expired, clearing credentials");
                } else {
                    warn!("could not confirm stored session, clearing credentials: {err}");
                }
                state.forget();
            }
        }
        self.save(&state.persisted).await;
    }

    pub async fn signup(
        &self,
        name: &str,
        email: &str,
        password: &str,
        profile_image: Option<String>,
    ) -> Result<User, SessionError> {
        self.begin().await;
        let request = SignupRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            profile_image,
        };
        let result = self.api.signup(&request).await;
        self.finish_auth(result, "Signup failed").await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, SessionError> {
        self.begin().await;
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = self.api.login(&request).await;
        self.finish_auth(result, "Login failed").await
    }

    /// Tells the API, then forgets the session whatever the API answered.
    pub async fn logout(&self) {
        let token = {
            let mut state = self.state.lock().await;
            state.error = None;
            state.persisted.access_token.clone()
        };

        if let Err(err) = self.api.logout(token.as_deref()).await {
            warn!("logout request failed: {err}");
        }

        let mut state = self.state.lock().await;
        state.forget();
        self.save(&state.persisted).await;
        info!("signed out");
    }

    /// Sends only the fields that are set and takes the user the API returns.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User, SessionError> {
        self.begin().await;
        let token = self.access_token().await;
        let result = self.api.update_profile(token.as_deref(), update).await;

        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(user) => {
                state.replace_user(&user);
                self.save(&state.persisted).await;
                Ok(user)
            }
            Err(err) => {
                state.error = Some(error_message(&err, "Profile update failed"));
                Err(err.into())
            }
        }
    }

    /// Name-only update used by the settings form.
    pub async fn update_display_name(&self, name: &str) -> Result<User, SessionError> {
        let (user_id, token) = self.credentials().await?;
        let update = NameUpdate {
            user_id,
            name: name.to_string(),
        };
        let returned = self.api.update_user_name(token.as_deref(), &update).await?;

        let mut state = self.state.lock().await;
        let user = match (returned, state.user.take()) {
            (Some(user), _) => user,
            (None, Some(mut current)) => {
                current.name = name.to_string();
                current
            }
            (None, None) => return Err(SessionError::NotAuthenticated),
        };
        state.replace_user(&user);
        self.save(&state.persisted).await;
        Ok(user)
    }

    /// Exchanges the stored refresh token for a new token pair.
    pub async fn refresh(&self) -> Result<(), SessionError> {
        let refresh_token = self
            .state
            .lock()
            .await
            .persisted
            .refresh_token
            .clone()
            .ok_or(SessionError::NotAuthenticated)?;
        let tokens = self.api.refresh(&refresh_token).await?;

        let mut state = self.state.lock().await;
        state.persisted.access_token = Some(tokens.access_token);
        state.persisted.refresh_token = Some(tokens.refresh_token);
        state.generation += 1;
        self.save(&state.persisted).await;
        debug!("tokens refreshed");
        Ok(())
    }

    /// Creates today's entry for the signed-in user. Returns the API's message.
    pub async fn create_mood_entry(
        &self,
        submission: MoodSubmission,
    ) -> Result<Option<String>, SessionError> {
        let (user_id, token) = self.credentials().await?;
        let entry = NewMoodEntry {
            user_id,
            submission,
        };
        let message = self.api.create_mood_entry(token.as_deref(), &entry).await?;
        info!(user_id = %entry.user_id, "mood entry created");
        Ok(message)
    }

    pub async fn mood_entries(&self) -> Result<Vec<MoodEntry>, SessionError> {
        let (user_id, token) = self.credentials().await?;
        Ok(self.api.mood_entries(token.as_deref(), &user_id).await?)
    }

    pub async fn user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.user.is_some()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    pub async fn access_token(&self) -> Option<String> {
        self.state.lock().await.persisted.access_token.clone()
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            user: state.user.clone(),
            is_authenticated: state.user.is_some(),
            loading: state.loading,
            error: state.error.clone(),
        }
    }

    /// Writes the current session to disk one last time.
    pub async fn shutdown(&self) {
        let state = self.state.lock().await;
        self.save(&state.persisted).await;
        info!(path = %self.path.display(), "session saved");
    }

    async fn begin(&self) {
        let mut state = self.state.lock().await;
        state.error = None;
        state.loading = true;
    }

    async fn finish_auth(
        &self,
        result: Result<AuthPayload, ApiError>,
        fallback: &str,
    ) -> Result<User, SessionError> {
        let mut state = self.state.lock().await;
        state.loading = false;
        match result {
            Ok(payload) => {
                let tokens = payload.tokens();
                state.persisted.access_token = Some(tokens.access_token);
                state.persisted.refresh_token = Some(tokens.refresh_token);
                state.replace_user(&payload.user);
                self.save(&state.persisted).await;
                info!(user_id = %payload.user.id, "signed in");
                Ok(payload.user)
            }
            Err(err) => {
                state.error = Some(error_message(&err, fallback));
                Err(err.into())
            }
        }
    }

    async fn credentials(&self) -> Result<(String, Option<String>), SessionError> {
        let state = self.state.lock().await;
        let user = state.user.as_ref().ok_or(SessionError::NotAuthenticated)?;
        Ok((user.id.clone(), state.persisted.access_token.clone()))
    }

    async fn save(&self, session: &PersistedSession) {
        if let Err(err) = persist_session(&self.path, session).await {
            error!("failed to write session file: {err}");
        }
    }
}

fn error_message(err: &ApiError, fallback: &str) -> String {
    let message = err.to_string();
    if message.is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
