//! Localized strings used in prompts, captions and fallbacks.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::types::ContentKind;

/// Language of prompts and relay captions. `Ru` is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Locale {
    #[default]
    Ru,
    En,
}

impl Locale {
    /// Token whose presence in a classifier answer means "yes".
    pub fn affirmative(&self) -> &'static str {
        match self {
            Locale::Ru => "да",
            Locale::En => "yes",
        }
    }

    pub fn source_label(&self) -> &'static str {
        match self {
            Locale::Ru => "Источник:",
            Locale::En => "Source:",
        }
    }

    pub fn attachment_lost(&self) -> &'static str {
        match self {
            Locale::Ru => "⚠️ Ошибка вложения",
            Locale::En => "⚠️ Attachment lost",
        }
    }

    /// Placeholder body for media without text, e.g. "📷 Медиа из".
    pub fn media_placeholder(&self, kind: ContentKind) -> String {
        let icon = match kind {
            ContentKind::Photo => "📷",
            ContentKind::Video => "🎬",
            ContentKind::Document => "📄",
            ContentKind::Audio => "🎵",
            ContentKind::Voice => "🎤",
            ContentKind::Sticker => "🏷",
            ContentKind::Animation => "🎞",
            ContentKind::Text | ContentKind::None => "📎",
        };
        let word = match self {
            Locale::Ru => "Медиа из",
            Locale::En => "Media from",
        };
        format!("{} {}", icon, word)
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ru" => Ok(Locale::Ru),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported language '{}', expected ru or en", other)),
        }
    }
}

impl TryFrom<String> for Locale {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Ru => f.write_str("ru"),
            Locale::En => f.write_str("en"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert_eq!(" en ".parse::<Locale>().unwrap(), Locale::En);
        assert!("de".parse::<Locale>().is_err());
    }

    #[test]
    fn test_deserialize_locale_ignores_case() {
        assert_eq!(serde_json::from_str::<Locale>("\"RU\"").unwrap(), Locale::Ru);
        assert_eq!(serde_json::from_str::<Locale>("\" En \"").unwrap(), Locale::En);
        let err = serde_json::from_str::<Locale>("\"de\"").unwrap_err();
        assert!(err.to_string().contains("unsupported language"));
    }

    #[test]
    fn test_photo_placeholder_ru() {
        assert_eq!(Locale::Ru.media_placeholder(ContentKind::Photo), "📷 Медиа из");
    }
}
