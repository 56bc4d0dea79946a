pub mod builtin;
pub mod system;

use ratatui::style::Color;
use tracing::info;

use crate::prefs::PreferenceStore;

/// Preference key holding "light" or "dark".
pub const THEME_KEY: &str = "theme";
/// Set to "true" once the user picked a theme by hand.
pub const THEME_EXPLICIT_KEY: &str = "theme_explicit";

/// 9-token semantic color schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    pub primary: Color,
    pub primary_dim: Color,
    pub accent: Color,
    pub warning: Color,
    pub error: Color,
    pub text: Color,
    pub text_muted: Color,
    pub text_dim: Color,
    pub surface: Color,
}

/// Parse a hex color string like "#06b6d4" into a ratatui Color.
pub fn hex_to_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::White;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
    Color::Rgb(r, g, b)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreference {
    Light,
    Dark,
}

impl ThemePreference {
    /// Only the exact stored strings are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Self::Dark
        } else {
            Self::Light
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn colors(self) -> ThemeColors {
        match self {
            Self::Light => builtin::light(),
            Self::Dark => builtin::dark(),
        }
    }
}

/// Stored preference if valid, else the system signal, else light.
pub fn preferred_theme(store: &dyn PreferenceStore, system_dark: Option<bool>) -> ThemePreference {
    if let Some(saved) = store.get(THEME_KEY).as_deref().and_then(ThemePreference::parse) {
        return saved;
    }
    ThemePreference::from_dark(system_dark.unwrap_or(false))
}

/// Active theme plus its persistence.
pub struct ThemeManager {
    store: Box<dyn PreferenceStore>,
    active: ThemePreference,
    colors: ThemeColors,
    follow_system: bool,
}

impl ThemeManager {
    /// Apply the preferred theme once. System changes are followed until
    /// the user picks a theme by hand, across restarts.
    pub fn init(store: Box<dyn PreferenceStore>, system_dark: Option<bool>) -> Self {
        let follow_system = store.get(THEME_EXPLICIT_KEY).as_deref() != Some("true");
        let preferred = preferred_theme(store.as_ref(), system_dark);

        let mut manager = Self {
            store,
            active: preferred,
            colors: preferred.colors(),
            follow_system,
        };
        manager.apply(preferred);
        manager
    }

    /// Make `theme` active and persist it.
    pub fn apply(&mut self, theme: ThemePreference) {
        self.active = theme;
        self.colors = theme.colors();
        self.store.set(THEME_KEY, theme.as_str());
        info!(theme = theme.as_str(), "theme applied");
    }

    /// Explicit user choice: flip the theme and stop following the system.
    pub fn toggle(&mut self) -> ThemePreference {
        self.follow_system = false;
        self.store.set(THEME_EXPLICIT_KEY, "true");
        let next = self.active.toggled();
        self.apply(next);
        next
    }

    /// Returns true when the active theme changed.
    pub fn system_changed(&mut self, dark: bool) -> bool {
        let next = ThemePreference::from_dark(dark);
        if !self.follow_system || next == self.active {
            return false;
        }
        self.apply(next);
        true
    }

    pub fn active(&self) -> ThemePreference {
        self.active
    }

    pub fn colors(&self) -> &ThemeColors {
        &self.colors
    }

    pub fn label(&self) -> &'static str {
        self.active.label()
    }

    pub fn follows_system(&self) -> bool {
        self.follow_system
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::{FilePrefs, MemoryPrefs};

    fn store_with(theme: Option<&str>) -> Box<dyn PreferenceStore> {
        let mut prefs = MemoryPrefs::default();
        if let Some(t) = theme {
            prefs.set(THEME_KEY, t);
        }
        Box::new(prefs)
    }

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#06b6d4"), Color::Rgb(6, 182, 212));
        assert_eq!(hex_to_color("bad"), Color::White);
    }

    #[test]
    fn test_preferred_theme_order() {
        assert_eq!(
            preferred_theme(store_with(Some("light")).as_ref(), Some(true)),
            ThemePreference::Light
        );
        assert_eq!(
            preferred_theme(store_with(None).as_ref(), Some(true)),
            ThemePreference::Dark
        );
        assert_eq!(
            preferred_theme(store_with(Some("Dark")).as_ref(), Some(false)),
            ThemePreference::Light
        );
        assert_eq!(preferred_theme(store_with(None).as_ref(), None), ThemePreference::Light);
    }

    #[test]
    fn test_init_follows_dark_system_and_persists() {
        let manager = ThemeManager::init(store_with(None), Some(true));
        assert_eq!(manager.active(), ThemePreference::Dark);
        assert_eq!(manager.label(), "Dark");
        assert_eq!(manager.store.get(THEME_KEY).as_deref(), Some("dark"));
        assert!(manager.follows_system());
    }

    #[test]
    fn test_toggle_flips_and_persists() {
        let mut manager = ThemeManager::init(store_with(None), Some(true));
        assert_eq!(manager.store.get(THEME_EXPLICIT_KEY), None);
        assert_eq!(manager.toggle(), ThemePreference::Light);
        assert_eq!(manager.store.get(THEME_KEY).as_deref(), Some("light"));
        assert_eq!(manager.store.get(THEME_EXPLICIT_KEY).as_deref(), Some("true"));
        assert_eq!(manager.colors(), &builtin::light());
        assert_eq!(manager.toggle(), ThemePreference::Dark);
        assert_eq!(manager.store.get(THEME_KEY).as_deref(), Some("dark"));
    }

    #[test]
    fn test_system_changes_followed_until_toggle() {
        let mut manager = ThemeManager::init(store_with(None), Some(false));
        assert!(manager.system_changed(true));
        assert_eq!(manager.active(), ThemePreference::Dark);
        assert!(!manager.system_changed(true));

        manager.toggle();
        assert!(!manager.follows_system());
        assert!(!manager.system_changed(true));
        assert_eq!(manager.active(), ThemePreference::Light);
    }

    #[test]
    fn test_explicit_choice_ignores_system() {
        let mut store = store_with(Some("light"));
        store.set(THEME_EXPLICIT_KEY, "true");
        let mut manager = ThemeManager::init(store, Some(true));
        assert_eq!(manager.active(), ThemePreference::Light);
        assert!(!manager.follows_system());
        assert!(!manager.system_changed(true));
        assert_eq!(manager.active(), ThemePreference::Light);
    }

    #[test]
    fn test_stored_theme_without_choice_still_follows() {
        let mut manager = ThemeManager::init(store_with(Some("light")), Some(true));
        assert_eq!(manager.active(), ThemePreference::Light);
        assert!(manager.follows_system());
        assert!(manager.system_changed(true));
        assert_eq!(manager.active(), ThemePreference::Dark);
    }

    #[test]
    fn test_follow_survives_restart_until_toggle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");

        let first = ThemeManager::init(Box::new(FilePrefs::open(path.clone())), Some(false));
        assert!(first.follows_system());
        drop(first);

        let mut second = ThemeManager::init(Box::new(FilePrefs::open(path.clone())), Some(false));
        assert!(second.follows_system());
        assert!(second.system_changed(true));
        assert_eq!(second.active(), ThemePreference::Dark);
        second.toggle();
        drop(second);

        let mut third = ThemeManager::init(Box::new(FilePrefs::open(path)), Some(true));
        assert!(!third.follows_system());
        assert_eq!(third.active(), ThemePreference::Light);
        assert!(!third.system_changed(false));
    }
}
