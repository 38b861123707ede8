use std::sync::OnceLock;

use regex::Regex;

pub const MAX_FILENAME_CHARS: usize = 200;
pub const UNTITLED: &str = "untitled";
pub const VIDEO_EXTENSION: &str = "mp4";

fn illegal_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[<>:"/\\|?*\x00-\x1f]"#).expect("valid character class"))
}

fn trim_dots_and_spaces(name: &str) -> &str {
    name.trim_matches(|c| c == '.' || c == ' ')
}

/// Sanitize a title so it can be used as a filename on any common filesystem.
pub fn sanitize_filename(filename: &str) -> String {
    let stripped = illegal_chars().replace_all(filename, "");
    let trimmed = trim_dots_and_spaces(&stripped);

    let capped: String = trimmed.chars().take(MAX_FILENAME_CHARS).collect();
    // Cutting can expose a dot or space at the new end.
    let capped = trim_dots_and_spaces(&capped);

    if capped.is_empty() {
        UNTITLED.to_string()
    } else {
        capped.to_string()
    }
}

/// `{title}_{shortcode}.mp4`; `title` is expected to be sanitized already.
pub fn output_filename(title: &str, shortcode: &str) -> String {
    format!("{}_{}.{}", title, shortcode, VIDEO_EXTENSION)
}

/// Protocol-relative CDN links (`//cdn.host/...`) get the secure scheme.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{}", url)
    } else {
        url.to_string()
    }
}
