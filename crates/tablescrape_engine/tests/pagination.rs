mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use tablescrape_core::{NextControlSpec, RunState, ScrapeConfig};
use tablescrape_engine::{PaginationDriver, StaticPages};

use common::{fast_config, page};

fn footer(items: &str) -> String {
    format!(r#"<html><body><ul class="table_footer">{items}</ul></body></html>"#)
}

#[test]
fn finds_enabled_svg_control() {
    let driver = PaginationDriver::new(&ScrapeConfig::default()).unwrap();

    let control = driver.find_next_control(&page(&[("Ada", "9")], true)).unwrap();
    assert_eq!(control.href, None);
    assert_eq!(control.label, "Next");
    assert!(!driver.has_next_page(&page(&[("Ada", "9")], false)));
}

#[test]
fn disabled_markers_hide_the_control() {
    let driver = PaginationDriver::new(&ScrapeConfig::default()).unwrap();
    let icon = common::NEXT_ICON;

    for attrs in [r#"aria-disabled="true""#, r#"class="btn disabled""#, "disabled"] {
        let html = footer(&format!(
            r#"<li><button {attrs}><svg><path d="{icon}"/></svg></button></li>"#
        ));
        assert!(!driver.has_next_page(&html), "{attrs}");
    }
}

#[test]
fn controls_outside_the_pagination_region_are_ignored() {
    let driver = PaginationDriver::new(&ScrapeConfig::default()).unwrap();
    let html = format!(
        r#"<html><body><ul class="nav"><li><button><svg><path d="{}"/></svg></button></li></ul></body></html>"#,
        common::NEXT_ICON
    );
    assert!(driver.find_next_control(&html).is_none());
}

#[test]
fn attribute_and_text_matchers() {
    let html = footer(
        r#"<li><a href="?page=1">Prev</a></li><li><a href="?page=3" aria-label="Next page">  next </a></li>"#,
    );

    let by_attr = PaginationDriver::new(&ScrapeConfig {
        next_control: NextControlSpec::Attribute {
            name: "aria-label".into(),
            value: "Next page".into(),
        },
        ..ScrapeConfig::default()
    })
    .unwrap();
    let control = by_attr.find_next_control(&html).unwrap();
    assert_eq!(control.href.as_deref(), Some("?page=3"));

    let by_text = PaginationDriver::new(&ScrapeConfig {
        next_control: NextControlSpec::Text {
            text: "Next".into(),
        },
        ..ScrapeConfig::default()
    })
    .unwrap();
    assert_eq!(
        by_text.find_next_control(&html).unwrap().href.as_deref(),
        Some("?page=3")
    );
}

#[tokio::test(start_paused = true)]
async fn advance_moves_one_page_within_the_wait_window() {
    let config = fast_config();
    let driver = PaginationDriver::new(&config).unwrap();
    let pages = StaticPages::new(
        "mem://",
        vec![page(&[("Ada", "9")], true), page(&[("Bob", "7")], false)],
    );
    let mut run = RunState::new();
    run.reset();

    let started = tokio::time::Instant::now();
    assert!(driver.advance(&pages, &mut run).await.unwrap());
    let waited = started.elapsed();

    assert_eq!(run.current_page(), 2);
    assert_eq!(pages.position(), 1);
    assert!(waited >= Duration::from_millis(config.min_wait_ms));
    assert!(waited <= Duration::from_millis(config.max_wait_ms));

    assert!(!driver.advance(&pages, &mut run).await.unwrap());
    assert_eq!(run.current_page(), 2);
}
