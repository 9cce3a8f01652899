/// Masks a secret for logging: first 7 and last 4 characters, `***` in between.
/// Secrets of 11 characters or fewer are fully masked.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 11 {
        return "***".to_string();
    }
    let head: String = chars[..7].iter().collect();
    let tail: String = chars[len - 4..].iter().collect();
    format!("{}***{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_fully_masked() {
        assert_eq!(mask_token(""), "***");
        assert_eq!(mask_token("12345"), "***");
        assert_eq!(mask_token("+7999123456"), "***");
    }

    #[test]
    fn test_bot_token_shows_head_and_tail() {
        assert_eq!(
            mask_token("123456789:AAHdqTcvCH1vGWJxfSeofSAs0K5PALDsaw"),
            "1234567***Dsaw"
        );
    }
}
