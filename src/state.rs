use crate::mood_form::MoodForm;
use crate::session::SessionStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<SessionStore>,
    /// The open check-in wizard, if any. Dropped after a submit or on close.
    pub mood_form: Arc<Mutex<Option<MoodForm>>>,
}

impl AppState {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            mood_form: Arc::new(Mutex::new(None)),
        }
    }
}
