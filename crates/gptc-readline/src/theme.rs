//! Light/dark color palettes for terminal output.

use std::str::FromStr;

use colored::Color;

/// Palette actually used for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeTheme {
    Light,
    Dark,
}

/// Theme requested on the command line or in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeChoice {
    #[default]
    Auto,
    Light,
    Dark,
}

impl FromStr for ThemeChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown code theme '{other}' (expected auto, light or dark)")),
        }
    }
}

impl ThemeChoice {
    /// Resolves `Auto` from the terminal's `COLORFGBG` setting.
    pub fn resolve(self) -> CodeTheme {
        match self {
            Self::Light => CodeTheme::Light,
            Self::Dark => CodeTheme::Dark,
            Self::Auto => detect(std::env::var("COLORFGBG").ok().as_deref()),
        }
    }
}

/// Guesses the background from a `COLORFGBG` value like `"15;0"`.
///
/// Unknown or missing values count as dark.
pub fn detect(colorfgbg: Option<&str>) -> CodeTheme {
    let background = colorfgbg
        .and_then(|value| value.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok());
    match background {
        Some(7) | Some(9..=15) => CodeTheme::Light,
        _ => CodeTheme::Dark,
    }
}

impl CodeTheme {
    /// Assistant prose.
    pub fn text(self) -> Color {
        match self {
            Self::Light => Color::Black,
            Self::Dark => Color::BrightWhite,
        }
    }

    pub fn heading(self) -> Color {
        match self {
            Self::Light => Color::Blue,
            Self::Dark => Color::BrightCyan,
        }
    }

    /// Inline code spans and code block content.
    pub fn code(self) -> Color {
        match self {
            Self::Light => Color::Magenta,
            Self::Dark => Color::BrightYellow,
        }
    }

    /// Code block gutter, rules and status lines.
    pub fn chrome(self) -> Color {
        match self {
            Self::Light => Color::BrightBlack,
            Self::Dark => Color::TrueColor {
                r: 199,
                g: 199,
                b: 199,
            },
        }
    }

    pub fn link(self) -> Color {
        match self {
            Self::Light => Color::Blue,
            Self::Dark => Color::BrightBlue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_colorfgbg() {
        assert_eq!(detect(Some("15;0")), CodeTheme::Dark);
        assert_eq!(detect(Some("0;15")), CodeTheme::Light);
        assert_eq!(detect(Some("0;default;7")), CodeTheme::Light);
        assert_eq!(detect(Some("garbage")), CodeTheme::Dark);
        assert_eq!(detect(None), CodeTheme::Dark);
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!("auto".parse::<ThemeChoice>(), Ok(ThemeChoice::Auto));
        assert_eq!("Light".parse::<ThemeChoice>(), Ok(ThemeChoice::Light));
        assert_eq!("DARK".parse::<ThemeChoice>(), Ok(ThemeChoice::Dark));
        assert!("monokai".parse::<ThemeChoice>().is_err());
    }

    #[test]
    fn test_explicit_choice_ignores_terminal() {
        assert_eq!(ThemeChoice::Light.resolve(), CodeTheme::Light);
        assert_eq!(ThemeChoice::Dark.resolve(), CodeTheme::Dark);
    }
}
