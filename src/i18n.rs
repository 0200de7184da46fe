// i18n.rs
//
// Runtime string tables:
// - Strings live in assets/i18n/<lang>.json (flat { "key": "value" } map)
// - Lookup order: selected lang -> en file -> built-in English table -> key
// - tr("key") / tr_with("key", [("name", "...")]) with {name} placeholders

use once_cell::sync::{Lazy, OnceCell};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

pub const FALLBACK_LANG: &str = "en";

/// Languages offered in the View menu: (code, native name).
pub const LANGUAGES: [(&str, &str); 2] = [("en", "English"), ("zh-Hans", "简体中文")];

static BUILTIN_EN: Lazy<HashMap<String, String>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../assets/i18n/en.json")).unwrap_or_default()
});

#[derive(Debug, Clone)]
pub struct I18n {
    pub lang: String,
    map: HashMap<String, String>,
    fallback_map: HashMap<String, String>,
}

impl I18n {
    fn lookup(&self, key: &str) -> Option<&String> {
        self.map
            .get(key)
            .or_else(|| self.fallback_map.get(key))
            .or_else(|| BUILTIN_EN.get(key))
    }
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&text) {
        Ok(map) => Some(map),
        Err(err) => {
            log::warn!("ignoring malformed translation file {}: {err}", path.display());
            None
        }
    }
}

/// Search <exe_dir>/assets/i18n first, then ./assets/i18n.
fn find_lang_file(lang: &str) -> Option<PathBuf> {
    let file = format!("{lang}.json");

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    exe_dir
        .into_iter()
        .chain(std::iter::once(PathBuf::new()))
        .map(|dir| dir.join("assets").join("i18n").join(&file))
        .find(|p| p.exists())
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    find_lang_file(lang)
        .and_then(|p| load_json_map(&p))
        .unwrap_or_default()
}

/// Initialize global i18n. Later calls switch the active language.
pub fn init(lang: impl Into<String>) {
    let lang = lang.into();
    let map = load_lang(&lang);
    let fallback_map = if lang == FALLBACK_LANG {
        HashMap::new()
    } else {
        load_lang(FALLBACK_LANG)
    };

    let i = I18n {
        lang,
        map,
        fallback_map,
    };

    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

pub fn current_lang() -> String {
    I18N.get()
        .and_then(|l| l.read().ok().map(|i| i.lang.clone()))
        .unwrap_or_else(|| FALLBACK_LANG.to_string())
}

/// Get localized text by key. If key missing everywhere, returns key itself.
pub fn tr(key: &str) -> String {
    let found = I18N
        .get()
        .and_then(|l| l.read().ok())
        .and_then(|i| i.lookup(key).cloned());

    found
        .or_else(|| BUILTIN_EN.get(key).cloned())
        .unwrap_or_else(|| key.to_string())
}

/// Get localized text and substitute `{name}` placeholders.
/// Any placeholder not provided is kept as-is.
pub fn tr_with(key: &str, args: &[(&str, String)]) -> String {
    let mut s = tr(key);
    for (k, v) in args {
        let placeholder = format!("{{{k}}}");
        s = s.replace(&placeholder, v);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_english_covers_ui_strings() {
        assert_eq!(tr("toolbar.select_placeholder"), "Select Panorama");
        assert_eq!(tr("toolbar.vr_on"), "VR On");
        assert_eq!(tr("status.no_panoramas"), "No panoramas available");
    }

    #[test]
    fn missing_key_returns_key() {
        assert_eq!(tr("no.such.key"), "no.such.key");
    }

    #[test]
    fn tr_with_fills_known_placeholders_only() {
        assert_eq!(
            tr_with("toolbar.zoom_label", &[("zoom", "2.5".to_string())]),
            "Zoom: 2.5x"
        );
        assert_eq!(tr_with("toolbar.zoom_label", &[]), "Zoom: {zoom}x");
    }
}
