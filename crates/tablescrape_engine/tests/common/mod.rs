#![allow(dead_code)]

use tablescrape_core::ScrapeConfig;

pub const NEXT_ICON: &str = "M4.64645 14.3536C4.45118 14.1583 4.45118 13.8417 4.64645 13.6464";

/// A results page with a `Name`/`Score` table and the usual footer.
pub fn page(rows: &[(&str, &str)], has_next: bool) -> String {
    let body: String = rows
        .iter()
        .map(|(name, score)| format!("<tr><td>{name}</td><td>{score}</td></tr>"))
        .collect();
    let next = if has_next {
        format!(r#"<li><button aria-label="Next"><svg><path d="{NEXT_ICON}"/></svg></button></li>"#)
    } else {
        format!(r#"<li><button disabled><svg><path d="{NEXT_ICON}"/></svg></button></li>"#)
    };
    format!(
        r#"<html><body>
<table><thead><tr><th>Name</th><th>Score</th></tr></thead><tbody>{body}</tbody></table>
<ul class="table_footer"><li><button><svg><path d="M11 4L6 8"/></svg></button></li>{next}</ul>
</body></html>"#
    )
}

/// Same as [`page`] with a visible spinner.
pub fn loading_page(rows: &[(&str, &str)]) -> String {
    page(rows, true).replace("<body>", r#"<body><div class="spinner"></div>"#)
}

pub fn fast_config() -> ScrapeConfig {
    ScrapeConfig {
        min_wait_ms: 10,
        max_wait_ms: 20,
        load_poll_ms: 100,
        load_attempts: 3,
        ..ScrapeConfig::default()
    }
}
