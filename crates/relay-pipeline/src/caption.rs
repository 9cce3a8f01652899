//! Caption and text-post formatting with Telegram length limits.
//!
//! Bodies are stripped of Markdown emphasis (`**`, `__`), HTML-escaped and wrapped in bold; the
//! attribution suffix is always kept intact and the body is shortened first.

use relay_core::{ContentKind, Locale};

use crate::attribution::{push_escaped, Attribution};

/// Telegram limit for media captions.
pub const MAX_CAPTION_CHARS: usize = 1024;
/// Telegram limit for text messages.
pub const MAX_TEXT_CHARS: usize = 4096;

/// Keeps at most `max` characters, dropping the tail. Never fails.
pub fn clamp_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((byte_idx, _)) => s[..byte_idx].to_string(),
        None => s.to_string(),
    }
}

/// Removes Markdown emphasis markers and surrounding whitespace; `None` when nothing is left.
fn clean_body(body: Option<&str>) -> Option<String> {
    let cleaned = body?.replace("**", "").replace("__", "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CaptionFormatter {
    locale: Locale,
}

impl CaptionFormatter {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Caption for a media post: the body when present, else a placeholder naming the kind and source.
    pub fn caption(
        &self,
        kind: ContentKind,
        body: Option<&str>,
        attribution: &Attribution,
    ) -> String {
        match clean_body(body) {
            Some(body) => self.compose("", &body, attribution, MAX_CAPTION_CHARS),
            None => clamp_chars(
                &format!(
                    "<b>{} {}</b>",
                    self.locale.media_placeholder(kind),
                    attribution
                ),
                MAX_CAPTION_CHARS,
            ),
        }
    }

    /// Text post body; `None` when there is no text to send.
    pub fn text_post(&self, body: Option<&str>, attribution: &Attribution) -> Option<String> {
        clean_body(body).map(|body| self.compose("", &body, attribution, MAX_TEXT_CHARS))
    }

    /// Text-only fallback after a media failure, prefixed with the attachment-lost marker.
    pub fn fallback(&self, body: Option<&str>, attribution: &Attribution) -> Option<String> {
        let prefix = format!("{}\n\n", self.locale.attachment_lost());
        clean_body(body).map(|body| self.compose(&prefix, &body, attribution, MAX_TEXT_CHARS))
    }

    fn compose(&self, prefix: &str, body: &str, attribution: &Attribution, limit: usize) -> String {
        let head = format!("{}<b>", prefix);
        let tail = format!(
            "</b>\n\n<b>{}</b> {}",
            self.locale.source_label(),
            attribution
        );
        let budget = limit.saturating_sub(head.chars().count() + tail.chars().count());

        // Escape char by char so a truncated body never ends inside an entity.
        let mut escaped = String::with_capacity(body.len());
        let mut used = 0;
        let mut scratch = String::new();
        for c in body.chars() {
            scratch.clear();
            push_escaped(&mut scratch, c);
            let n = scratch.chars().count();
            if used + n > budget {
                break;
            }
            escaped.push_str(&scratch);
            used += n;
        }

        clamp_chars(&format!("{}{}{}", head, escaped.trim_end(), tail), limit)
    }
}
