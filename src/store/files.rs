//! Whole-document JSON persistence for admins, users and AI settings.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::PLACEHOLDER_ADMIN_ID;
use crate::error::Result;

use super::models::{AdminSet, AiSettings, UserMap, UserRecord};

const ADMINS_FILE: &str = "admins.json";
const USERS_FILE: &str = "users.json";
const AI_SETTINGS_FILE: &str = "ai_settings.json";

/// File-backed state. Every load reads a whole document and every save
/// overwrites one.
pub struct StateStore {
    data_dir: PathBuf,
    // Serializes read-modify-write cycles inside this process.
    write_lock: Mutex<()>,
}

impl StateStore {
    /// Open the data directory, seeding any document that does not exist yet.
    pub fn open(data_dir: impl Into<PathBuf>, seed_admin: &str) -> Result<Self> {
        let store = Self {
            data_dir: data_dir.into(),
            write_lock: Mutex::new(()),
        };
        std::fs::create_dir_all(&store.data_dir)?;

        if !store.path(ADMINS_FILE).exists() {
            store.save_admins(&AdminSet::new(vec![seed_admin.to_string()]))?;
            if seed_admin == PLACEHOLDER_ADMIN_ID {
                tracing::warn!(
                    "ADMIN_ID not set; admin list seeded with placeholder id {}",
                    PLACEHOLDER_ADMIN_ID
                );
            } else {
                tracing::info!("Initialized admin list with primary admin {}", seed_admin);
            }
        }
        if !store.path(USERS_FILE).exists() {
            store.save_users(&UserMap::new())?;
        }
        if !store.path(AI_SETTINGS_FILE).exists() {
            store.save_ai_settings(&AiSettings::default())?;
        }

        tracing::debug!("State store opened at {}", store.data_dir.display());
        Ok(store)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, name: &str) -> PathBuf {
        self.data_dir.join(name)
    }

    pub fn load_admins(&self) -> AdminSet {
        self.load_or_default(ADMINS_FILE)
    }

    pub fn save_admins(&self, admins: &AdminSet) -> Result<()> {
        self.save(ADMINS_FILE, admins)
    }

    pub fn load_users(&self) -> UserMap {
        self.load_or_default(USERS_FILE)
    }

    pub fn save_users(&self, users: &UserMap) -> Result<()> {
        self.save(USERS_FILE, users)
    }

    pub fn load_ai_settings(&self) -> AiSettings {
        self.load_or_default(AI_SETTINGS_FILE)
    }

    pub fn save_ai_settings(&self, settings: &AiSettings) -> Result<()> {
        self.save(AI_SETTINGS_FILE, settings)
    }

    pub fn get_user(&self, id: &str) -> Option<UserRecord> {
        self.load_users().remove(id)
    }

    /// Effective AI flag for a user.
    pub fn ai_enabled_for(&self, id: &str) -> bool {
        let user = self.get_user(id);
        self.load_ai_settings().effective_for(user.as_ref())
    }

    /// Load the admin list, apply `f`, and save only if `f` succeeded.
    pub fn update_admins<T, E>(
        &self,
        f: impl FnOnce(&mut AdminSet) -> std::result::Result<T, E>,
    ) -> Result<std::result::Result<T, E>> {
        let _guard = self.lock();
        let mut admins = self.load_admins();
        let outcome = f(&mut admins);
        if outcome.is_ok() {
            self.save_admins(&admins)?;
        }
        Ok(outcome)
    }

    pub fn update_users<T>(&self, f: impl FnOnce(&mut UserMap) -> T) -> Result<T> {
        let _guard = self.lock();
        let mut users = self.load_users();
        let out = f(&mut users);
        self.save_users(&users)?;
        Ok(out)
    }

    pub fn update_ai_settings<T>(&self, f: impl FnOnce(&mut AiSettings) -> T) -> Result<T> {
        let _guard = self.lock();
        let mut settings = self.load_ai_settings();
        let out = f(&mut settings);
        self.save_ai_settings(&settings)?;
        Ok(out)
    }

    /// Insert a record for `user` unless one exists. Returns true when a new
    /// record was written.
    pub fn register_user(&self, user: UserRecord) -> Result<bool> {
        let _guard = self.lock();
        let mut users = self.load_users();
        if users.contains_key(&user.id) {
            return Ok(false);
        }
        tracing::info!("Registered new user {}", user.id);
        users.insert(user.id.clone(), user);
        self.save_users(&users)?;
        Ok(true)
    }

    /// Set the per-user AI override, creating the record if needed.
    pub fn set_user_ai_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        self.update_users(|users| {
            users
                .entry(id.to_string())
                .or_insert_with(|| UserRecord::new(id))
                .ai_enabled = Some(enabled);
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // A poisoned guard protects no data; keep going.
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.path(name);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}, using defaults", path.display(), e);
                return T::default();
            }
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
            T::default()
        })
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value)?;
        std::fs::write(self.path(name), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::AdminChangeError;

    #[test]
    fn test_open_seeds_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path(), "A1").unwrap();

        assert_eq!(store.load_admins().ids(), &["A1".to_string()]);
        assert!(store.load_users().is_empty());
        assert_eq!(store.load_ai_settings(), AiSettings::default());

        // Reopening must not reseed.
        store.update_admins(|a| a.add("A2")).unwrap().unwrap();
        let store = StateStore::open(dir.path(), "other").unwrap();
        assert_eq!(store.load_admins().len(), 2);
    }

    #[test]
    fn test_placeholder_seed_only_for_fresh_admin_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path(), PLACEHOLDER_ADMIN_ID).unwrap();
        assert_eq!(store.load_admins().ids(), &[PLACEHOLDER_ADMIN_ID.to_string()]);

        store.save_admins(&AdminSet::new(vec!["A1".to_string()])).unwrap();
        let store = StateStore::open(dir.path(), PLACEHOLDER_ADMIN_ID).unwrap();
        assert_eq!(store.load_admins().ids(), &["A1".to_string()]);
    }

    #[test]
    fn test_corrupt_documents_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path(), "A1").unwrap();
        std::fs::write(dir.path().join(ADMINS_FILE), "not json").unwrap();
        std::fs::write(dir.path().join(USERS_FILE), "{").unwrap();
        std::fs::remove_file(dir.path().join(AI_SETTINGS_FILE)).unwrap();

        assert!(store.load_admins().is_empty());
        assert!(store.load_users().is_empty());
        assert!(store.load_ai_settings().enabled);
    }

    #[test]
    fn test_failed_admin_update_is_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path(), "A1").unwrap();
        let outcome = store.update_admins(|a| a.remove("A1", Some("A1"))).unwrap();
        assert_eq!(outcome, Err(AdminChangeError::LastAdmin));
        assert!(store.load_admins().contains("A1"));
    }

    #[test]
    fn test_register_and_override() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::open(dir.path(), "A1").unwrap();

        assert!(store.register_user(UserRecord::new("42")).unwrap());
        assert!(!store.register_user(UserRecord::new("42")).unwrap());
        assert!(store.ai_enabled_for("42"));

        store.set_user_ai_enabled("42", false).unwrap();
        store.update_ai_settings(|s| s.enabled = true).unwrap();
        assert!(!store.ai_enabled_for("42"));

        store.update_ai_settings(|s| s.enabled = false).unwrap();
        assert!(!store.ai_enabled_for("7"));

        store.set_user_ai_enabled("7", true).unwrap();
        assert!(store.ai_enabled_for("7"));
        assert_eq!(store.load_users().len(), 2);
    }
}
