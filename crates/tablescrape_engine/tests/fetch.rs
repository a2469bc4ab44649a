mod common;

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tablescrape_core::RunStatus;
use tablescrape_engine::{
    CollectingSink, ExtractionLoop, FetchSettings, HttpPageSurface, NextControl, PageSurface,
    SurfaceError,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{fast_config, NEXT_ICON};

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

fn linked_page(rows: &[(&str, &str)], next_href: Option<&str>) -> String {
    let body: String = rows
        .iter()
        .map(|(name, score)| format!("<tr><td>{name}</td><td>{score}</td></tr>"))
        .collect();
    let next = next_href
        .map(|href| {
            format!(r#"<li><a href="{href}"><svg><path d="{NEXT_ICON}"/></svg></a></li>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><table><tr><th>Name</th><th>Score</th></tr>{body}</table>
<ul class="table_footer">{next}</ul></body></html>"#
    )
}

#[tokio::test]
async fn snapshot_returns_decoded_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scores"))
        .respond_with(html("<html>ok</html>"))
        .mount(&server)
        .await;

    let url = format!("{}/scores", server.uri());
    let surface = HttpPageSurface::new(&url, FetchSettings::default()).unwrap();

    assert_eq!(surface.snapshot().await.unwrap(), "<html>ok</html>");
    assert_eq!(surface.location(), url);
}

#[tokio::test]
async fn snapshot_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let surface =
        HttpPageSurface::new(&format!("{}/missing", server.uri()), FetchSettings::default())
            .unwrap();

    let err = surface.snapshot().await.unwrap_err();
    assert!(matches!(err, SurfaceError::HttpStatus(404)), "{err}");
}

#[tokio::test]
async fn snapshot_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("slow").set_delay(Duration::from_millis(250)))
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let surface = HttpPageSurface::new(&format!("{}/slow", server.uri()), settings).unwrap();

    let err = surface.snapshot().await.unwrap_err();
    assert!(matches!(err, SurfaceError::Timeout), "{err}");
}

#[tokio::test]
async fn snapshot_rejects_non_html() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let surface =
        HttpPageSurface::new(&format!("{}/data", server.uri()), FetchSettings::default()).unwrap();

    let err = surface.snapshot().await.unwrap_err();
    assert!(matches!(err, SurfaceError::UnsupportedContentType(_)), "{err}");
}

#[tokio::test]
async fn activation_without_link_is_a_navigation_failure() {
    let surface = HttpPageSurface::new("http://127.0.0.1:9/", FetchSettings::default()).unwrap();
    let control = NextControl {
        href: None,
        label: "Next".into(),
    };

    let err = surface.activate(&control).await.unwrap_err();
    assert!(matches!(err, SurfaceError::NavigationFailed(_)), "{err}");
}

#[tokio::test]
async fn extraction_follows_next_links_across_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/scores"))
        .and(query_param("page", "2"))
        .respond_with(html(&linked_page(&[("Cy", "5")], None)))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/scores"))
        .respond_with(html(&linked_page(
            &[("Ada", "9"), ("Bob", "7")],
            Some("?page=2"),
        )))
        .mount(&server)
        .await;

    let surface = HttpPageSurface::new(
        &format!("{}/scores", server.uri()),
        FetchSettings::default(),
    )
    .unwrap();
    let sink = Arc::new(CollectingSink::new());
    let extraction = ExtractionLoop::new(sink);

    let report = extraction.start(&surface, &fast_config()).await.unwrap();

    assert_eq!(report.status, RunStatus::Completed);
    assert_eq!(report.stats.pages_processed, 2);
    assert_eq!(report.row_count, 3);
    assert!(surface.location().ends_with("/scores?page=2"));
    let artifact = report.artifact.unwrap();
    assert_eq!(
        artifact.content,
        "\"Name\",\"Score\"\n\"Ada\",\"9\"\n\"Bob\",\"7\"\n\"Cy\",\"5\"\n"
    );
}
