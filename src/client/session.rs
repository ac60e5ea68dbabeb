use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use crate::models::Account;

use super::ClientError;

pub const SESSION_ENV: &str = "LUNAFLOW_SESSION";

/// The signed-in account as last returned by the server, mirrored to a file.
///
/// Advisory only: it saves a login round trip on start-up and carries no
/// authority of its own.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    account: Option<Account>,
}

impl Session {
    /// `$LUNAFLOW_SESSION`, else `$HOME/.lunaflow/session.json`, else the working directory.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(SESSION_ENV) {
            return PathBuf::from(path);
        }
        env::var("HOME")
            .map(|home| Path::new(&home).join(".lunaflow"))
            .unwrap_or_else(|_| PathBuf::from(".lunaflow"))
            .join("session.json")
    }

    /// Restores the cached account, if any. An unreadable cache is discarded.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ClientError> {
        let path = path.into();

        let account = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(account) => Some(account),
                Err(e) => {
                    tracing::warn!(path = %path.display(), "discarding unreadable session: {}", e);
                    None
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(ClientError::Session(e)),
        };

        Ok(Self { path, account })
    }

    pub fn account(&self) -> Option<&Account> {
        self.account.as_ref()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the cached account after a successful server call.
    pub fn refresh(&mut self, account: Account) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(ClientError::Session)?;
        }
        let bytes = serde_json::to_vec_pretty(&account)?;
        fs::write(&self.path, bytes).map_err(ClientError::Session)?;

        self.account = Some(account);
        Ok(())
    }

    /// Forgets the account and removes the cache file.
    pub fn invalidate(&mut self) -> Result<(), ClientError> {
        self.account = None;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Session(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CycleProfile, HistoryEntry};
    use chrono::NaiveDate;

    fn account() -> Account {
        let mut account = Account::new("luna@example.com".into(), "$argon2id$secret".into());
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        account.cycle_data = CycleProfile { last_period_start: Some(start), cycle_length: 29, period_duration: 4 };
        account.history = vec![HistoryEntry { start_date: start, cycle_length: 29, period_duration: 4 }];
        account
    }

    #[test]
    fn missing_file_is_an_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("session.json")).unwrap();

        assert!(session.account().is_none());
    }

    #[test]
    fn refresh_survives_a_restart_without_the_credential() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let mut session = Session::load(&path).unwrap();
        session.refresh(account()).unwrap();

        let restored = Session::load(&path).unwrap();
        let cached = restored.account().unwrap();
        assert_eq!(cached.email, "luna@example.com");
        assert_eq!(cached.history.len(), 1);
        assert_eq!(cached.cycle_data.cycle_length, 29);
        assert!(cached.password_hash.is_empty());
        assert!(!fs::read_to_string(&path).unwrap().contains("argon2"));
    }

    #[test]
    fn invalidate_removes_the_cache() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load(&path).unwrap();
        session.refresh(account()).unwrap();
        session.invalidate().unwrap();

        assert!(session.account().is_none());
        assert!(!path.exists());
        assert!(Session::load(&path).unwrap().account().is_none());
        session.invalidate().unwrap();
    }

    #[test]
    fn corrupt_cache_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, b"{ not json").unwrap();

        assert!(Session::load(&path).unwrap().account().is_none());
    }
}
