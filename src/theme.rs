use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Theme used when nothing else is asked for.
pub static DEFAULT_THEME: &str = "oracle";

/// A named palette. Only `primary` is required; missing colours fall back
/// to `primary` or to fixed defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub primary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<String>,
}

impl Theme {
    pub fn new(name: impl Into<String>, primary: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary: primary.into(),
            secondary: None,
            accent: None,
            warning: None,
            error: None,
            success: None,
        }
    }

    /// Resolve a `[$variable]` colour.
    pub fn variable(&self, name: &str) -> Option<&str> {
        let value = match name {
            "primary" => &self.primary,
            "secondary" => self.secondary.as_ref().unwrap_or(&self.primary),
            "accent" => self.accent.as_ref().unwrap_or(&self.primary),
            "warning" => return Some(self.warning.as_deref().unwrap_or("#FFA62B")),
            "error" => return Some(self.error.as_deref().unwrap_or("#BA3C5B")),
            "success" => return Some(self.success.as_deref().unwrap_or("#4EBF71")),
            _ => return None,
        };
        Some(value.as_str())
    }
}

/// Every theme the game knows, keyed by name.
#[derive(Debug, Clone)]
pub struct Themes {
    themes: BTreeMap<String, Theme>,
}

impl Default for Themes {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Themes {
    pub fn builtin() -> Self {
        let mut oracle = Theme::new(DEFAULT_THEME, "#00A6ED");
        oracle.secondary = Some("#7FB800".into());
        oracle.accent = Some("#FFB400".into());

        let mut matrix = Theme::new("matrix", "#00FF41");
        matrix.secondary = Some("#008F11".into());

        let amber = Theme::new("amber", "#FFB000");

        Self {
            themes: [oracle, matrix, amber]
                .into_iter()
                .map(|theme| (theme.name.clone(), theme))
                .collect(),
        }
    }

    /// Built-in themes with the themes from a JSON list merged over them.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read themes from {}", path.display()))?;
        let mut themes = Self::builtin();
        themes.merge_json(&text)?;
        info!("loaded themes from {}", path.display());
        Ok(themes)
    }

    /// Parse `[{ "name": ..., "primary": "#RRGGBB", ... }]` and add every
    /// entry, replacing built-ins with the same name.
    pub fn merge_json(&mut self, json: &str) -> Result<()> {
        let parsed: Vec<Theme> = serde_json::from_str(json).context("malformed themes list")?;
        for theme in parsed {
            debug!("theme '{}'", theme.name);
            self.themes.insert(theme.name.clone(), theme);
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        self.themes.get(name)
    }

    /// Look up a theme, failing with the list of known names.
    pub fn select(&self, name: &str) -> Result<Theme> {
        match self.get(name) {
            Some(theme) => Ok(theme.clone()),
            None => bail!(
                "unknown theme '{}', available: {}",
                name,
                self.names().collect::<Vec<_>>().join(", ")
            ),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_has_default_theme() {
        let themes = Themes::builtin();
        assert!(themes.get(DEFAULT_THEME).is_some());
    }

    #[test]
    fn test_variables_fall_back() {
        let theme = Theme::new("plain", "#123456");

        assert_eq!(theme.variable("primary"), Some("#123456"));
        assert_eq!(theme.variable("secondary"), Some("#123456"));
        assert_eq!(theme.variable("error"), Some("#BA3C5B"));
        assert_eq!(theme.variable("nope"), None);
    }

    #[test]
    fn test_load_merges_over_builtin() -> Result<()> {
        // Arrange
        let dir = tempdir()?;
        let path = dir.path().join("themes.json");
        fs::write(
            &path,
            r##"[
                {"name": "oracle", "primary": "#FF00FF"},
                {"name": "ice", "primary": "#A5F2F3", "error": "#FF0000"}
            ]"##,
        )?;

        // Act
        let themes = Themes::load(&path)?;

        // Assert
        assert_eq!(themes.select("oracle")?.primary, "#FF00FF");
        assert_eq!(themes.select("ice")?.variable("error"), Some("#FF0000"));
        assert!(themes.get("matrix").is_some());
        Ok(())
    }

    #[test]
    fn test_load_errors_carry_context() -> Result<()> {
        let dir = tempdir()?;
        let missing = Themes::load(dir.path().join("missing.json")).unwrap_err();
        assert!(missing.to_string().contains("failed to read themes"));

        let path = dir.path().join("broken.json");
        fs::write(&path, "{")?;
        let broken = Themes::load(&path).unwrap_err();
        assert!(broken.to_string().contains("malformed themes list"));
        Ok(())
    }

    #[test]
    fn test_select_unknown_lists_names() {
        let err = Themes::builtin().select("neon").unwrap_err();
        assert!(err.to_string().contains("amber, matrix, oracle"));
    }
}
