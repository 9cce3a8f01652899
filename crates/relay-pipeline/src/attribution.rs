//! Source attribution: a link back to the origin post.

use std::fmt;

use relay_core::ChannelInfo;

const TELEGRAM_LINK_BASE: &str = "https://t.me";

/// HTML anchor pointing at the origin post, e.g. `<a href="https://t.me/rust/42">@rust</a>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution(String);

impl Attribution {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Attribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escapes the characters Telegram HTML parse mode treats as markup.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        push_escaped(&mut out, c);
    }
    out
}

pub(crate) fn push_escaped(out: &mut String, c: char) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(c),
    }
}

/// Public post link. Private channels use the `/c/` form with the `-100` prefix dropped
/// (first four characters of the decimal id).
pub fn message_link(channel: &ChannelInfo, message_id: i32) -> String {
    match channel.username.as_deref().filter(|u| !u.is_empty()) {
        Some(handle) => format!("{}/{}/{}", TELEGRAM_LINK_BASE, handle, message_id),
        None => {
            let internal: String = channel.id.to_string().chars().skip(4).collect();
            format!("{}/c/{}/{}", TELEGRAM_LINK_BASE, internal, message_id)
        }
    }
}

/// `@handle`, else title, else `Channel <id>`.
pub fn display_name(channel: &ChannelInfo) -> String {
    if let Some(handle) = channel.username.as_deref().filter(|u| !u.is_empty()) {
        return format!("@{}", handle);
    }
    if let Some(title) = channel.title.as_deref().filter(|t| !t.trim().is_empty()) {
        return title.trim().to_string();
    }
    format!("Channel {}", channel.id)
}

/// Builds the attribution anchor. Pure: same input, same output.
pub fn attribute(channel: &ChannelInfo, message_id: i32) -> Attribution {
    Attribution(format!(
        "<a href=\"{}\">{}</a>",
        escape_html(&message_link(channel, message_id)),
        escape_html(&display_name(channel))
    ))
}
