//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! discover, fetch, extract and save cycle end-to-end.

use folio::config::{parse_config, Config};
use folio::crawler::run_crawl;
use folio::output::SqliteSink;
use folio::TargetStatus;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A play page with one numbered anchor per spoken line
fn play_page(title: &str, lines: usize) -> String {
    let mut html = format!(
        "<html><head><title>{}</title><script>var x = 1;</script></head><body><blockquote>\n",
        title
    );
    for i in 1..=lines {
        html.push_str(&format!(
            "<A NAME={}></A>Line {} of {}, spoken aloud by a player on the stage<br>\n",
            i, i, title
        ));
    }
    html.push_str("</blockquote></body></html>");
    html
}

async fn mount(server: &MockServer, p: &str, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(p))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Creates a test configuration; `extra` is appended verbatim
fn create_test_config(server: &MockServer, output: &str, discover: bool, extra: &str) -> Config {
    parse_config(&format!(
        r#"
[crawler]
base-url = "{}/"
delay-ms = 0
timeout-secs = 5
discover = {}

[user-agent]
identity = "FolioTest/1.0"

[output]
{}

{}
"#,
        server.uri(),
        discover,
        output,
        extra
    ))
    .expect("test config is valid")
}

#[tokio::test]
async fn test_full_crawl_from_index() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let works = temp.path().join("works");

    mount(
        &mock_server,
        "/",
        200,
        r#"<html><body>
        <a href="hamlet/full.html">Hamlet</a>
        <a href="hamlet/index.html">Hamlet scenes</a>
        <a href="king_lear/full.html">King Lear</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount(&mock_server, "/hamlet/full.html", 200, play_page("Hamlet", 40)).await;
    mount(&mock_server, "/king_lear/full.html", 404, String::new()).await;

    let config = create_test_config(
        &mock_server,
        &format!("directory = \"{}\"", works.display()),
        true,
        "",
    );

    let outcome = run_crawl(config).await.expect("Crawl failed");

    assert_eq!(outcome.attempted, 2);
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.reports[0].identifier, "Hamlet");
    assert_eq!(outcome.reports[0].status, TargetStatus::Saved);
    assert_eq!(outcome.reports[1].display_name, "King Lear");
    assert_eq!(
        outcome.reports[1].status,
        TargetStatus::AllCandidatesFailed
    );

    let text = std::fs::read_to_string(works.join("Hamlet.txt")).unwrap();
    assert_eq!(text.lines().count(), 40);
    assert!(text.starts_with("Line 1 of Hamlet, spoken aloud"));
    assert!(!text.contains('<'));
    assert!(!works.join("King_Lear.txt").exists());
}

#[tokio::test]
async fn test_configured_targets_with_fallback_into_sqlite() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();
    let db_path = temp.path().join("works.db");

    mount(&mock_server, "/as_you_like_it/full.html", 404, String::new()).await;
    mount(&mock_server, "/asyoulikeit/full.html", 200, play_page("As You Like It", 30)).await;

    let config = create_test_config(
        &mock_server,
        &format!("format = \"sqlite\"\ndatabase-path = \"{}\"", db_path.display()),
        false,
        &format!(
            r#"
[[target]]
id = "as_you_like_it"
name = "As You Like It"
urls = ["{0}/as_you_like_it/full.html", "{0}/asyoulikeit/full.html"]
"#,
            mock_server.uri()
        ),
    );

    let outcome = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(outcome.succeeded, 1);
    assert_eq!(outcome.reports[0].attempts.len(), 2);

    let sink = SqliteSink::new(&db_path).unwrap();
    let stored = sink.load("as_you_like_it").unwrap().expect("document saved");
    assert!(stored.body.starts_with("Line 1 of As You Like It"));
    assert_eq!(stored.length as usize, stored.body.chars().count());
    assert_eq!(sink.count().unwrap(), 1);
}

#[tokio::test]
async fn test_unreachable_index_falls_back_to_targets() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount(&mock_server, "/", 503, String::new()).await;
    mount(&mock_server, "/sonnets/full.html", 200, play_page("Sonnets", 25)).await;

    let config = create_test_config(
        &mock_server,
        &format!("directory = \"{}\"", temp.path().display()),
        true,
        &format!(
            r#"
[[target]]
name = "The Sonnets"
urls = ["{}/sonnets/full.html"]
"#,
            mock_server.uri()
        ),
    );

    let outcome = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(outcome.succeeded, 1);
    assert!(temp.path().join("The_Sonnets.txt").exists());
}

#[tokio::test]
async fn test_short_text_is_not_saved() {
    let mock_server = MockServer::start().await;
    let temp = TempDir::new().unwrap();

    mount(
        &mock_server,
        "/stub/full.html",
        200,
        "<html><body><p>Coming soon</p></body></html>".to_string(),
    )
    .await;

    let config = create_test_config(
        &mock_server,
        &format!("directory = \"{}\"", temp.path().display()),
        false,
        &format!(
            r#"
[[target]]
name = "Stub"
urls = ["{}/stub/full.html"]
"#,
            mock_server.uri()
        ),
    );

    let outcome = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(outcome.succeeded, 0);
    assert_eq!(outcome.failed().count(), 1);
    assert!(!temp.path().join("Stub.txt").exists());
}

#[tokio::test]
async fn test_nothing_to_fetch_is_an_error() {
    let mock_server = MockServer::start().await;
    mount(&mock_server, "/", 200, "<p>empty index</p>".to_string()).await;

    let config = create_test_config(&mock_server, "directory = \"unused\"", true, "");
    assert!(run_crawl(config).await.is_err());
}
