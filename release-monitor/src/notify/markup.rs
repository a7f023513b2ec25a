//! GitHub markdown to Slack mrkdwn conversion.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Converts GitHub-flavored markdown into Slack mrkdwn.
///
/// Fenced code blocks and inline code spans only get `&`, `<` and `>` escaped.
#[must_use]
pub fn github_to_slack(markdown: &str) -> String {
    let mut output = Vec::new();
    let mut in_fence = false;

    for line in markdown.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            output.push(escape(line));
        } else if in_fence {
            output.push(escape(line));
        } else {
            output.push(convert_line(line));
        }
    }

    output.join("\n")
}

/// Builds a Slack link: `<url|text>`.
#[must_use]
pub fn slack_link(url: &str, text: &str) -> String {
    format!("<{url}|{text}>")
}

fn heading_regex() -> &'static Regex {
    static HEADING_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^#{1,6}\s+(.+?)\s*#*\s*$").unwrap());
    &HEADING_REGEX
}

fn bullet_regex() -> &'static Regex {
    static BULLET_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+").unwrap());
    &BULLET_REGEX
}

fn link_regex() -> &'static Regex {
    // Markdown links and images (the `!` is dropped), or bare URLs.
    static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"!?\[([^\]]*)\]\(([^)\s]+)(?:\s+"[^"]*")?\)|(https?://[^\s<>]+)"#).unwrap()
    });
    &LINK_REGEX
}

fn placeholder_regex() -> &'static Regex {
    static PLACEHOLDER_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\x01(\d+)\x01").unwrap());
    &PLACEHOLDER_REGEX
}

fn bold_regex() -> &'static Regex {
    static BOLD_REGEX: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*|__(.+?)__").unwrap());
    &BOLD_REGEX
}

fn strike_regex() -> &'static Regex {
    static STRIKE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~(.+?)~~").unwrap());
    &STRIKE_REGEX
}

fn mention_regex() -> &'static Regex {
    static MENTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(^|[^\w/@])@([A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)").unwrap()
    });
    &MENTION_REGEX
}

fn convert_line(line: &str) -> String {
    if let Some(captures) = heading_regex().captures(line) {
        return format!("*{}*", convert_inline(&captures[1]));
    }

    let line = bullet_regex().replace(line, "$1• ");
    convert_inline(&line)
}

/// Converts inline markup, skipping backtick code spans.
fn convert_inline(text: &str) -> String {
    text.split('`')
        .enumerate()
        .map(|(index, segment)| {
            if index % 2 == 1 {
                escape(segment)
            } else {
                convert_segment(segment)
            }
        })
        .collect::<Vec<_>>()
        .join("`")
}

/// Marks a link that was already converted.
const PLACEHOLDER: char = '\u{1}';

/// Converts one segment outside code spans.
///
/// Links and bare URLs are swapped for placeholders first, so mention and
/// emphasis rules never see a URL or link label.
fn convert_segment(text: &str) -> String {
    let text = text.replace(PLACEHOLDER, "");

    let mut links = Vec::new();
    let text = link_regex().replace_all(&text, |caps: &Captures| {
        links.push(convert_link(caps));
        format!("{PLACEHOLDER}{}{PLACEHOLDER}", links.len() - 1)
    });

    let text = escape(&text);
    let text = mention_regex().replace_all(&text, |caps: &Captures| {
        format!(
            "{}{}",
            &caps[1],
            slack_link(&format!("https://github.com/{}", &caps[2]), &format!("@{}", &caps[2]))
        )
    });
    let text = bold_regex().replace_all(&text, |caps: &Captures| {
        let inner = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        format!("*{inner}*")
    });
    let text = strike_regex().replace_all(&text, "~$1~");

    placeholder_regex()
        .replace_all(&text, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| links.get(index))
                .cloned()
                .unwrap_or_default()
        })
        .into_owned()
}

fn convert_link(caps: &Captures) -> String {
    if let Some(url) = caps.get(3) {
        return escape(url.as_str());
    }

    let label = caps.get(1).map_or("", |m| m.as_str());
    let url = escape(caps.get(2).map_or("", |m| m.as_str()));
    if label.is_empty() {
        format!("<{url}>")
    } else {
        slack_link(&url, &escape(label))
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
