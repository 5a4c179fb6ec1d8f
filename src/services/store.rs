use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use tracing::warn;

use crate::error::CoreResult;

pub const API_KEY_ENTRY: &str = "deepl_apikey";

/// Flat string key-value file, the desktop stand-in for browser local storage.
#[derive(Debug)]
pub struct KeyStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl KeyStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load(&path);
        KeyStore { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) -> CoreResult<()> {
        if self.get(key) == Some(value) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.commit(next)
    }

    pub fn remove(&mut self, key: &str) -> CoreResult<()> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut next = self.entries.clone();
        next.remove(key);
        self.commit(next)
    }

    // memory only follows disk once the write went through
    fn commit(&mut self, next: BTreeMap<String, String>) -> CoreResult<()> {
        let json = serde_json::to_string_pretty(&next)?;
        write_atomic(&self.path, json.as_bytes())?;
        self.entries = next;
        Ok(())
    }
}

fn load(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }

    let data = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read key store");
            return BTreeMap::new();
        }
    };

    match serde_json::from_str(&data) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to parse key store");
            BTreeMap::new()
        }
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> CoreResult<()> {
    let tmp = tmp_path(path);

    if let Some(parent) = tmp.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(&tmp, bytes)?;

    // rename replaces an existing target in one step
    fs::rename(&tmp, path)?;

    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut p = path.to_path_buf();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(n) => n.to_string(),
        None => "store".to_string(),
    };
    p.set_file_name(format!("{file_name}.tmp"));
    p
}
