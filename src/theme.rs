use serde::{Deserialize, Serialize};

/// Theme preference as chosen by the user
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
    System,
}

/// Concrete theme after resolving `System`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            ThemeMode::Light => "Light",
            ThemeMode::Dark => "Dark",
            ThemeMode::System => "System",
        }
    }

    pub fn next(&self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::System,
            ThemeMode::System => ThemeMode::Light,
        }
    }

    pub fn resolve(&self) -> Theme {
        self.resolve_with(std::env::var("COLORFGBG").ok().as_deref())
    }

    /// `COLORFGBG` is "fg;bg" (sometimes "fg;default;bg"); a background of
    /// 7 or 15 means a light terminal.
    pub fn resolve_with(&self, colorfgbg: Option<&str>) -> Theme {
        match self {
            ThemeMode::Light => Theme::Light,
            ThemeMode::Dark => Theme::Dark,
            ThemeMode::System => match colorfgbg.and_then(|v| v.rsplit(';').next()) {
                Some("7") | Some("15") => Theme::Light,
                _ => Theme::Dark,
            },
        }
    }
}
