use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::models::User;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// Все, что клиент хранит между перезапусками.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionData {
    user: Option<User>,
    selected_seats: Vec<i64>,
    showtime_id: Option<i64>,
}

/// Локальное состояние клиента, переживающее перезапуск процесса.
///
/// Жизненный цикл - явный контракт, а не побочный эффект:
/// пользователь записывается при входе; `selected_seats` и `showtime_id`
/// записываются только при переходе к подтверждению; выбор мест
/// стирается и при успешной покупке, и при неудачной; `showtime_id` -
/// только при успехе или отмене оформления.
#[derive(Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn load(&self) -> Result<SessionData, SessionError> {
        if !self.path.exists() {
            return Ok(SessionData::default());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save(&self, data: &SessionData) -> Result<(), SessionError> {
        let raw = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    pub fn user(&self) -> Result<Option<User>, SessionError> {
        Ok(self.load()?.user)
    }

    pub fn set_user(&self, user: &User) -> Result<(), SessionError> {
        let mut data = self.load()?;
        data.user = Some(user.clone());
        self.save(&data)
    }

    pub fn clear_user(&self) -> Result<(), SessionError> {
        let mut data = self.load()?;
        data.user = None;
        self.save(&data)
    }

    /// Сохраняет контекст перехода к подтверждению.
    pub fn persist_checkout(&self, showtime_id: i64, seat_ids: &[i64]) -> Result<(), SessionError> {
        let mut data = self.load()?;
        data.showtime_id = Some(showtime_id);
        data.selected_seats = seat_ids.to_vec();
        self.save(&data)?;
        debug!(
            "Persisted checkout: showtime {} with {} seat(s)",
            showtime_id,
            seat_ids.len()
        );
        Ok(())
    }

    /// Сохраненный контекст оформления: сеанс и выбранные места.
    pub fn checkout(&self) -> Result<(Option<i64>, Vec<i64>), SessionError> {
        let data = self.load()?;
        Ok((data.showtime_id, data.selected_seats))
    }

    /// Неудачная покупка: выбор мест стирается, сеанс остается.
    pub fn clear_selection(&self) -> Result<(), SessionError> {
        let mut data = self.load()?;
        data.selected_seats.clear();
        self.save(&data)
    }

    /// Успешная покупка или отмена оформления: стирается весь контекст.
    pub fn clear_checkout(&self) -> Result<(), SessionError> {
        let mut data = self.load()?;
        data.selected_seats.clear();
        data.showtime_id = None;
        self.save(&data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::user;

    fn store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        (dir, store)
    }

    #[test]
    fn missing_file_reads_as_empty_session() {
        let (_dir, store) = store();
        assert!(store.user().unwrap().is_none());
        assert_eq!(store.checkout().unwrap(), (None, vec![]));
    }

    #[test]
    fn checkout_survives_store_reopen() {
        let (_dir, store) = store();
        store.set_user(&user()).unwrap();
        store.persist_checkout(7, &[13, 47]).unwrap();

        // Новый экземпляр на том же пути видит то же состояние.
        let reopened = SessionStore::new(store.path.clone());
        assert_eq!(reopened.user().unwrap().unwrap().id, 5);
        assert_eq!(reopened.checkout().unwrap(), (Some(7), vec![13, 47]));
    }

    #[test]
    fn clear_selection_keeps_showtime() {
        let (_dir, store) = store();
        store.persist_checkout(7, &[13, 47]).unwrap();
        store.clear_selection().unwrap();
        assert_eq!(store.checkout().unwrap(), (Some(7), vec![]));
    }

    #[test]
    fn clear_checkout_drops_both_but_keeps_user() {
        let (_dir, store) = store();
        store.set_user(&user()).unwrap();
        store.persist_checkout(7, &[13]).unwrap();
        store.clear_checkout().unwrap();
        assert_eq!(store.checkout().unwrap(), (None, vec![]));
        assert!(store.user().unwrap().is_some());

        // Выход из аккаунта не трогает остальное состояние.
        store.clear_user().unwrap();
        assert!(store.user().unwrap().is_none());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let (_dir, store) = store();
        std::fs::write(&store.path, "not json").unwrap();
        assert!(matches!(store.checkout(), Err(SessionError::Corrupt(_))));
    }
}
