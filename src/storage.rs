use crate::models::User;
use serde::{Deserialize, Serialize};
use std::{io, path::Path};
use tokio::fs;
use tracing::{error, warn};

/// On-disk session, one key per value the browser app kept in local storage.
///
/// `user` holds the serialized JSON of the user rather than a nested object
/// so that a corrupt user can be dropped without losing the tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl PersistedSession {
    /// Parses the stored user. A value that does not parse is removed.
    pub fn take_user(&mut self) -> Option<User> {
        let raw = self.user.as_deref()?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(err) => {
                warn!("failed to parse stored user: {err}");
                self.user = None;
                None
            }
        }
    }

    pub fn set_user(&mut self, user: &User) {
        self.user = serde_json::to_string(user).ok();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

pub async fn load_session(path: &Path) -> PersistedSession {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(session) => session,
            Err(err) => {
                error!("failed to parse session file: {err}");
                PersistedSession::default()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => PersistedSession::default(),
        Err(err) => {
            error!("failed to read session file: {err}");
            PersistedSession::default()
        }
    }
}

pub async fn persist_session(path: &Path, session: &PersistedSession) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    let payload = serde_json::to_vec_pretty(session).map_err(io::Error::other)?;
    fs::write(path, payload).await
}
