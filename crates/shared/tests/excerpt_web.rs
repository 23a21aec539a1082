use shared::{ExcerptExtractor, MainContentSource, Story, WebContentSource};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST: &str = r#"
<html><head><title>Why Rust</title></head><body>
  <main>
    <p>Rust makes systems programming approachable, safe, and fast. It gives you control over memory
    layout and allocation without handing you the usual set of footguns that come with that control.</p>
    <p>The borrow checker is the part everyone talks about. It rejects programs that could race or read
    freed memory, and once it accepts your code, whole categories of late night debugging disappear.</p>
    <p>Tooling matters too: one build tool, one formatter, one test runner, and a package registry that
    makes pulling in a parser or an HTTP client a one line change instead of an afternoon of work.</p>
    <table><tr><td>Release notes table</td><td>1.0</td></tr></table>
  </main>
</body></html>
"#;

fn linked(url: String) -> Story {
    Story {
        id: Some(1),
        title: Some("A linked story title".to_string()),
        url: Some(url),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_non_200_yields_empty_excerpt() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let extractor = ExcerptExtractor::new(1000).unwrap();
    let excerpt = extractor
        .extract_excerpt(&linked(format!("{}/down", server.uri())))
        .await;
    assert_eq!(excerpt, "");
}

#[tokio::test]
async fn test_empty_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(ResponseTemplate::new(200).set_body_string("   "))
        .mount(&server)
        .await;

    let source = WebContentSource::new().unwrap();
    let result = source
        .extract_main_content(&format!("{}/blank", server.uri()))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_unreachable_host_yields_empty_excerpt() {
    // Nothing listens on the discard port
    let extractor = ExcerptExtractor::new(1000).unwrap();
    let excerpt = extractor
        .extract_excerpt(&linked("http://127.0.0.1:9/".to_string()))
        .await;
    assert_eq!(excerpt, "");
}

#[tokio::test]
async fn test_linked_page_text_is_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/post"))
        .respond_with(ResponseTemplate::new(200).set_body_string(POST))
        .mount(&server)
        .await;

    let extractor = ExcerptExtractor::new(1000).unwrap();
    let excerpt = extractor
        .extract_excerpt(&linked(format!("{}/post", server.uri())))
        .await;
    assert!(excerpt.contains("Rust makes systems programming approachable, safe, and fast."));
    assert!(excerpt.contains("borrow checker"));
    assert!(!excerpt.contains("Release notes table"));
}
