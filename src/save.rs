use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AccountError, SaveError};

/// Money every new profile starts with.
pub const STARTING_MONEY: u64 = 100;

/// Usernames nobody gets to register.
const RESERVED_USERNAMES: &[&str] = &["zer0"];

/// A player profile snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Save {
    pub username: String,
    pub password: String,
    pub money: u64,
    pub programs: Vec<String>,
    pub files: Vec<String>,
}

impl Save {
    pub fn create(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            money: STARTING_MONEY,
            programs: Vec::new(),
            files: Vec::new(),
        }
    }
}

/// Directory of timestamped JSON snapshots, `<username>_<timestamp>.json`.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The most recent snapshot of every user. A missing directory holds no
    /// saves.
    pub fn newest_saves(&self) -> Result<BTreeMap<String, Save>, SaveError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let name = entry?.file_name().to_string_lossy().into_owned();
            if name.ends_with(".json") {
                names.push(name);
            }
        }
        // fixed-width timestamps: descending name order is newest first
        names.sort_unstable_by(|a, b| b.cmp(a));

        let mut saves: BTreeMap<String, Save> = BTreeMap::new();
        for name in names {
            let Some((user, _)) = name.rsplit_once('_') else {
                continue;
            };
            if saves.contains_key(user) {
                continue;
            }
            let path = self.dir.join(&name);
            let text = match fs::read_to_string(&path) {
                Ok(text) => text,
                Err(e) => {
                    warn!("skipping unreadable save {}: {}", path.display(), e);
                    continue;
                }
            };
            match serde_json::from_str::<Save>(&text) {
                Ok(save) => {
                    saves.insert(user.to_string(), save);
                }
                Err(e) => warn!("skipping malformed save {}: {}", path.display(), e),
            }
        }

        Ok(saves)
    }

    pub fn find(&self, username: &str) -> Result<Option<Save>, SaveError> {
        Ok(self.newest_saves()?.remove(username))
    }

    /// Write a new snapshot stamped with the current time.
    pub fn write(&self, save: &Save) -> Result<PathBuf, SaveError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        self.write_at(save, now)
    }

    /// Write a snapshot with an explicit timestamp in milliseconds.
    pub fn write_at(&self, save: &Save, timestamp: u128) -> Result<PathBuf, SaveError> {
        fs::create_dir_all(&self.dir)?;
        let path = self
            .dir
            .join(format!("{}_{:016}.json", save.username, timestamp));
        fs::write(&path, serde_json::to_string(save)?)?;
        info!("saved profile '{}' to {}", save.username, path.display());
        Ok(path)
    }

    /// Validate a new account and write its first snapshot.
    pub fn create_account(&self, username: &str, password: &str) -> Result<Save, SaveError> {
        self.validate_account(username, password)?;
        let save = Save::create(username, password);
        self.write(&save)?;
        Ok(save)
    }

    fn validate_account(&self, username: &str, password: &str) -> Result<(), SaveError> {
        if username.is_empty() {
            return Err(AccountError::EmptyUsername.into());
        }
        if RESERVED_USERNAMES.contains(&username) {
            return Err(AccountError::Reserved.into());
        }
        if self.newest_saves()?.contains_key(username) {
            return Err(AccountError::UsernameTaken.into());
        }
        if !username.chars().all(char::is_alphanumeric) {
            return Err(AccountError::NotAlphanumeric.into());
        }
        if password.is_empty() {
            return Err(AccountError::EmptyPassword.into());
        }
        Ok(())
    }
}
