//! Persisted opaque user identity.
//!
//! The server scopes tasks by an opaque, client-chosen identifier. The
//! identifier is generated once, stored as a plain-text file under the data
//! directory, and reused on every subsequent run.

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const USER_ID_FILE: &str = "user-id";

/// Load the persisted user id from `dir`, generating and storing a fresh
/// one on first run.
pub fn load_or_create(dir: &Path) -> Result<String> {
    let path = dir.join(USER_ID_FILE);
    if path.exists() {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let user_id = contents.trim();
        if !user_id.is_empty() {
            debug!("loaded user id (path={})", path.display());
            return Ok(user_id.to_string());
        }
    }
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let user_id = Uuid::new_v4().to_string();
    fs::write(&path, &user_id).with_context(|| format!("failed to write {}", path.display()))?;
    info!("generated new user id (path={})", path.display());
    Ok(user_id)
}
