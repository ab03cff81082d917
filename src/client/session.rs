use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::i18n::Locale;
use super::views::Theme;
use super::ClientError;
use crate::models::UserProfile;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub locale: Locale,
    #[serde(default)]
    pub theme: Theme,
}

/// What survives between console invocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub token: Option<String>,
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub preferences: Preferences,
}

/// JSON-file backed auth, theme and locale context.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    state: SessionState,
}

impl SessionStore {
    /// `<config_dir>/hospital-admin/session.json`, or `./session.json` when the
    /// platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("hospital-admin"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("session.json")
    }

    /// Reads the store at `path`. A missing file yields an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => SessionState::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, state })
    }

    /// Writes to a sibling temp file then renames it over the store.
    pub fn save(&self) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.state.user.as_ref()
    }

    pub fn preferences(&self) -> Preferences {
        self.state.preferences
    }

    pub fn set_auth(&mut self, token: String, user: UserProfile) -> Result<(), ClientError> {
        self.state.token = Some(token);
        self.state.user = Some(user);
        self.save()
    }

    /// Forgets the token and profile. Preferences stay.
    pub fn clear_auth(&mut self) -> Result<(), ClientError> {
        self.state.token = None;
        self.state.user = None;
        self.save()
    }

    pub fn set_preferences(&mut self, preferences: Preferences) -> Result<(), ClientError> {
        self.state.preferences = preferences;
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::TempDir;

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            username: "nurse.joy".to_string(),
            role: Role::Nurse,
            staff_id: Some(4),
            permissions: Vec::new(),
        }
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::load(dir.path().join("session.json")).unwrap();
        assert!(store.token().is_none());
        assert_eq!(store.preferences(), Preferences::default());
    }

    #[test]
    fn auth_and_preferences_persist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut store = SessionStore::load(&path).unwrap();
        store.set_auth("abc".to_string(), profile()).unwrap();
        store
            .set_preferences(Preferences {
                locale: Locale::Fr,
                theme: Theme::Plain,
            })
            .unwrap();

        let reloaded = SessionStore::load(&path).unwrap();
        assert_eq!(reloaded.token(), Some("abc"));
        assert_eq!(reloaded.user().unwrap().username, "nurse.joy");
        assert_eq!(reloaded.preferences().locale, Locale::Fr);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn clear_auth_keeps_preferences() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = SessionStore::load(&path).unwrap();
        store.set_auth("abc".to_string(), profile()).unwrap();
        store
            .set_preferences(Preferences {
                locale: Locale::Fr,
                theme: Theme::Dark,
            })
            .unwrap();
        store.clear_auth().unwrap();

        let reloaded = SessionStore::load(&path).unwrap();
        assert!(reloaded.token().is_none());
        assert!(reloaded.user().is_none());
        assert_eq!(reloaded.preferences().theme, Theme::Dark);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(SessionStore::load(&path), Err(ClientError::Json(_))));
    }
}
