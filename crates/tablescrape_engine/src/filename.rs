use chrono::{DateTime, SecondsFormat, Utc};
use tablescrape_core::ExportFormat;

/// `{prefix}_{timestamp}.{ext}`; the timestamp is RFC 3339 UTC with `:` and
/// `.` replaced by `-`, so names sort by creation time.
pub fn export_filename(prefix: &str, format: ExportFormat, at: DateTime<Utc>) -> String {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(&[':', '.'][..], "-");
    format!("{}_{stamp}.{}", sanitize_prefix(prefix), format.extension())
}

fn sanitize_prefix(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    for c in input.trim().chars() {
        let c = if is_forbidden(c) || c.is_whitespace() { '_' } else { c };
        // Collapse runs of underscores.
        if c == '_' && cleaned.ends_with('_') {
            continue;
        }
        cleaned.push(c);
    }
    let cleaned = cleaned.trim_matches(&['_', '.'][..]);
    if cleaned.is_empty() {
        "export".to_string()
    } else {
        cleaned.chars().take(64).collect()
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
