//! Local persistence for the user's language preference.
//!
//! Web builds use `localStorage`; native builds keep a one-line file in the
//! platform data directory. Persistence is best effort: failures are logged
//! and otherwise ignored.

const LANGUAGE_KEY: &str = "fatturino.language";

pub fn load_language_preference() -> Option<String> {
    let raw = read_value(LANGUAGE_KEY)?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn save_language_preference(code: &str) {
    if let Err(err) = write_value(LANGUAGE_KEY, code) {
        tracing::warn!(%err, language = code, "could not persist language preference");
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn read_value(key: &str) -> Option<String> {
    local_storage()?.get_item(key).ok().flatten()
}

#[cfg(target_arch = "wasm32")]
fn write_value(key: &str, value: &str) -> Result<(), String> {
    let storage = local_storage().ok_or("localStorage unavailable")?;
    storage
        .set_item(key, value)
        .map_err(|_| "localStorage write rejected".to_string())
}

#[cfg(not(target_arch = "wasm32"))]
fn preference_path(key: &str) -> Option<std::path::PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "Fatturino", "Fatturino")?;
    Some(dirs.data_dir().join(key))
}

#[cfg(not(target_arch = "wasm32"))]
fn read_value(key: &str) -> Option<String> {
    std::fs::read_to_string(preference_path(key)?).ok()
}

#[cfg(not(target_arch = "wasm32"))]
fn write_value(key: &str, value: &str) -> Result<(), String> {
    let path = preference_path(key).ok_or("Unable to determine data directory")?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|err| err.to_string())?;
    }
    std::fs::write(&path, value).map_err(|err| err.to_string())
}
