use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn truncate_unicode(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width.saturating_sub(1) {
            result.push('\u{2026}');
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Formats a kibibyte count with a binary unit.
pub fn format_kib(kib: u64) -> String {
    const MB: u64 = 1024;
    const GB: u64 = 1024 * 1024;

    if kib >= GB {
        format!("{:.1} GB", kib as f64 / GB as f64)
    } else if kib >= MB {
        format!("{:.1} MB", kib as f64 / MB as f64)
    } else {
        format!("{kib} KB")
    }
}

pub fn format_uptime(secs: f64) -> String {
    format!("{:.2} hours", secs / 3600.0)
}
