use crate::prefs::PreferenceStore;

pub const THEME_PREF_KEY: &str = "theme";

/// Visual mode flag. Light is the default for an unset or unrecognized
/// persisted preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// Restores the persisted preference, read once at startup.
pub fn load_theme(store: &dyn PreferenceStore) -> ThemeMode {
    match store.get(THEME_PREF_KEY).as_deref() {
        Some("dark") => ThemeMode::Dark,
        _ => ThemeMode::Light,
    }
}

/// Persists the preference. A write failure is logged, not fatal.
pub fn persist_theme(store: &dyn PreferenceStore, mode: ThemeMode) {
    if let Err(err) = store.set(THEME_PREF_KEY, mode.as_str()) {
        tracing::warn!(%err, "failed to persist theme preference");
    }
}

pub struct ThemeDefinition {
    pub css: &'static str,
    /// Glyph the toggle control shows for this mode.
    pub toggle_icon: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition {
            css: DARK_THEME,
            toggle_icon: "\u{263e}",
        },
        ThemeMode::Light => ThemeDefinition {
            css: LIGHT_THEME,
            toggle_icon: "\u{2600}",
        },
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #000000;
    --color-bg-secondary: #050505;
    --color-text-primary: #ffffff;
    --color-text-muted: #cfcfcf;
    --color-border: #ffffff;
    --color-surface-muted: #111111;
    --color-input-border: #2a2a2a;
    --color-input-bg: #000000;
    --color-response-bg: #050505;
    --color-response-text: #ffffff;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-primary); }
.btn:hover,
.btn-ghost:hover { background: var(--color-surface-muted); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-border); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-secondary: #f5f5f5;
    --color-text-primary: #000000;
    --color-text-muted: #4a4a4a;
    --color-border: #000000;
    --color-surface-muted: #e6e6e6;
    --color-input-border: #c2c2c2;
    --color-input-bg: #ffffff;
    --color-response-bg: #f5f5f5;
    --color-response-text: #000000;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-primary); }
.btn { color: var(--color-text-primary); }
.btn:hover,
.btn-ghost:hover { background: var(--color-surface-muted); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-border); }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryStore;

    #[test]
    fn toggling_flips_between_the_two_modes() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled(), ThemeMode::Light);
    }

    #[test]
    fn unset_preference_defaults_to_light() {
        let store = MemoryStore::default();
        assert_eq!(load_theme(&store), ThemeMode::Light);
    }

    #[test]
    fn unrecognized_preference_defaults_to_light() {
        let store = MemoryStore::default();
        store.set(THEME_PREF_KEY, "solarized").expect("set");
        assert_eq!(load_theme(&store), ThemeMode::Light);
    }

    #[test]
    fn toggle_persists_and_a_fresh_load_restores_it() {
        let store = MemoryStore::default();
        assert_eq!(load_theme(&store), ThemeMode::Light);

        let mode = load_theme(&store).toggled();
        persist_theme(&store, mode);
        assert_eq!(store.get(THEME_PREF_KEY).as_deref(), Some("dark"));

        // A later load restores dark without requiring another toggle.
        assert_eq!(load_theme(&store), ThemeMode::Dark);
    }

    #[test]
    fn definitions_differ_per_mode() {
        let light = theme_definition(ThemeMode::Light);
        let dark = theme_definition(ThemeMode::Dark);
        assert_ne!(light.css, dark.css);
        assert_ne!(light.toggle_icon, dark.toggle_icon);
    }
}
