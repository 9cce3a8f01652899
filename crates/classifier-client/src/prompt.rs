//! Prompt construction and verdict parsing.

use relay_core::Locale;

use crate::InterestProfile;

/// Builds the yes/no instruction for one post.
pub fn build_prompt(text: &str, profile: &InterestProfile, locale: Locale) -> String {
    let topics = profile.topics.join(", ");
    match locale {
        Locale::Ru => {
            let mut prompt = format!(
                "Прочитай это сообщение и определи, относится ли оно к одной из этих тем: {}. ",
                topics
            );
            if profile.exclude_promotional {
                prompt.push_str(
                    "Если сообщение является рекламой или продвигает товар, услугу или канал, ответь 'Нет'. ",
                );
            }
            prompt.push_str("Ответь только 'Да' или 'Нет'.\n\nСообщение: ");
            prompt.push_str(text);
            prompt
        }
        Locale::En => {
            let mut prompt = format!(
                "Read this message and decide whether it relates to one of these topics: {}. ",
                topics
            );
            if profile.exclude_promotional {
                prompt.push_str(
                    "If the message is an advertisement or promotes a product, service or channel, answer 'No'. ",
                );
            }
            prompt.push_str("Answer only 'Yes' or 'No'.\n\nMessage: ");
            prompt.push_str(text);
            prompt
        }
    }
}

/// True when the trimmed, lower-cased answer contains the locale's affirmative token.
pub fn is_affirmative(answer: &str, locale: Locale) -> bool {
    answer.trim().to_lowercase().contains(locale.affirmative())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> InterestProfile {
        InterestProfile::new(vec!["AI".to_string(), "Rust".to_string()])
    }

    #[test]
    fn test_ru_prompt_without_promotional_clause() {
        let prompt = build_prompt(
            "Вышел Rust 1.80",
            &profile().with_exclude_promotional(false),
            Locale::Ru,
        );
        assert_eq!(
            prompt,
            "Прочитай это сообщение и определи, относится ли оно к одной из этих тем: AI, Rust. \
             Ответь только 'Да' или 'Нет'.\n\nСообщение: Вышел Rust 1.80"
        );
    }

    #[test]
    fn test_promotional_clause_included_by_default() {
        let prompt = build_prompt("text", &profile(), Locale::En);
        assert!(prompt.contains("advertisement"));
        assert!(prompt.ends_with("Message: text"));
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("  Да.\n", Locale::Ru));
        assert!(!is_affirmative("Нет", Locale::Ru));
        assert!(is_affirmative("YES", Locale::En));
        assert!(!is_affirmative("no", Locale::En));
    }
}
