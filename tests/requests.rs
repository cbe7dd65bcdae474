use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE, IF_MODIFIED_SINCE, LAST_MODIFIED};
use hyper::{HeaderMap, Method, Request, StatusCode};
use sitecast::config::{AppState, Config};
use sitecast::handler::handle_request;
use sitecast::site::Site;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

const INDEX: &str = "<p>Rack-Jekyll Test</p>\n";
const BUENOS_DIAS: &str = "<p>¡Buenos días!</p>\n";

struct TestSite {
    _dir: TempDir,
    state: Arc<AppState>,
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

async fn test_site() -> TestSite {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    std::fs::write(root.join("index.html"), INDEX).unwrap();
    std::fs::write(root.join("buenos_dias.html"), BUENOS_DIAS).unwrap();
    std::fs::create_dir_all(root.join("css")).unwrap();
    std::fs::write(root.join("css/test.css"), "body { color: #333; }\n").unwrap();
    std::fs::create_dir_all(root.join("js")).unwrap();
    std::fs::write(root.join("js/test.js"), "console.log('test');\n").unwrap();
    std::fs::write(root.join("js/test.min.js"), "console.log('min');").unwrap();

    let mut cfg = Config::load_from("tests/no-such-config").unwrap();
    cfg.site.root = root.display().to_string();
    cfg.logging.access_log = false;

    let state = Arc::new(AppState::load(cfg).await.unwrap());
    TestSite { _dir: dir, state }
}

impl TestSite {
    async fn request(&self, method: Method, path: &str, if_modified_since: Option<&str>) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(since) = if_modified_since {
            builder = builder.header(IF_MODIFIED_SINCE, since);
        }
        let req = builder.body(Empty::<Bytes>::new()).unwrap();

        let resp = handle_request(req, Arc::clone(&self.state), "127.0.0.1:40000".parse().unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        TestResponse { status, headers, body }
    }

    async fn get(&self, path: &str) -> TestResponse {
        self.request(Method::GET, path, None).await
    }

    async fn get_since(&self, path: &str, since: &str) -> TestResponse {
        self.request(Method::GET, path, Some(since)).await
    }
}

fn hour_before(http_date: &str) -> String {
    let time = httpdate::parse_http_date(http_date).unwrap();
    httpdate::fmt_http_date(time - Duration::from_secs(3600))
}

#[tokio::test]
async fn returns_correct_status_codes() {
    let site = test_site().await;
    assert_eq!(site.get("/").await.status, StatusCode::OK);
    assert_eq!(site.get("/show/me/404").await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn serves_index_page() {
    let site = test_site().await;
    let resp = site.get("/").await;

    assert_eq!(resp.headers[CONTENT_TYPE], "text/html");
    assert_eq!(resp.headers[CONTENT_LENGTH], "24");
    assert_eq!(resp.body, INDEX);
    assert!(resp.headers.contains_key(LAST_MODIFIED));
}

#[tokio::test]
async fn serves_not_found_page() {
    let site = test_site().await;
    let resp = site.get("/show/me/404").await;

    assert_eq!(resp.headers[CONTENT_TYPE], "text/html");
    assert_eq!(resp.headers[CONTENT_LENGTH], "9");
    assert_eq!(resp.body, "Not found");
}

#[tokio::test]
async fn if_modified_since_last_modified_is_304() {
    let site = test_site().await;
    let modify_time = site.get("/").await.headers[LAST_MODIFIED]
        .to_str()
        .unwrap()
        .to_string();

    let resp = site.get_since("/", &modify_time).await;
    assert_eq!(resp.status, StatusCode::NOT_MODIFIED);
    assert!(resp.body.is_empty());
    assert!(resp.headers.get(CONTENT_LENGTH).is_none());
    assert_eq!(resp.headers[LAST_MODIFIED], modify_time.as_str());
}

#[tokio::test]
async fn if_modified_since_earlier_is_200() {
    let site = test_site().await;
    let modify_time = site.get("/").await.headers[LAST_MODIFIED]
        .to_str()
        .unwrap()
        .to_string();

    let resp = site.get_since("/", &hour_before(&modify_time)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, INDEX);
}

#[tokio::test]
async fn if_modified_since_never_hides_404() {
    let site = test_site().await;
    let modify_time = site.get("/").await.headers[LAST_MODIFIED]
        .to_str()
        .unwrap()
        .to_string();

    for since in [hour_before(&modify_time), modify_time] {
        let resp = site.get_since("/show/me/404", &since).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND);
        assert_eq!(resp.body, "Not found");
    }
}

#[tokio::test]
async fn content_type_follows_extension() {
    let site = test_site().await;
    let cases = [
        ("/", "text/html"),
        ("/css/test.css", "text/css"),
        ("/js/test.js", "application/javascript"),
        ("/js/test.min.js", "application/javascript"),
        ("/show/me/404", "text/html"),
    ];

    for (path, content_type) in cases {
        assert_eq!(site.get(path).await.headers[CONTENT_TYPE], content_type, "{path}");
    }
}

#[tokio::test]
async fn multibyte_page_reports_byte_length() {
    let site = test_site().await;
    let resp = site.get("/buenos_dias.html").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body, BUENOS_DIAS);
    assert_eq!(resp.headers[CONTENT_LENGTH], "23");
}

#[tokio::test]
async fn query_string_is_ignored() {
    let site = test_site().await;
    let resp = site.get("/css/test.css?v=3").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.headers[CONTENT_TYPE], "text/css");
}

#[tokio::test]
async fn traversal_is_answered_as_not_found() {
    let site = test_site().await;
    for path in ["/../Cargo.toml", "/css/%2e%2e/%2e%2e/Cargo.toml"] {
        let resp = site.get(path).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{path}");
        assert_eq!(resp.body, "Not found");
    }
}

#[tokio::test]
async fn overlong_segment_is_answered_as_not_found() {
    let site = test_site().await;
    let path = format!("/{}.html", "a".repeat(300));
    let resp = site.get(&path).await;

    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.headers[CONTENT_TYPE], "text/html");
    assert_eq!(resp.body, "Not found");
}

#[cfg(unix)]
#[tokio::test]
async fn unreadable_entry_is_server_error() {
    let site = test_site().await;
    let root = site.state.site.current().root().to_path_buf();
    std::os::unix::fs::symlink("loop.html", root.join("loop.html")).unwrap();

    let resp = site.get("/loop.html").await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers[CONTENT_TYPE], "text/plain");
    assert_eq!(resp.body, "Internal Server Error");
}

#[tokio::test]
async fn head_returns_headers_only() {
    let site = test_site().await;
    let resp = site.request(Method::HEAD, "/buenos_dias.html", None).await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.headers[CONTENT_LENGTH], "23");
    assert!(resp.body.is_empty());
}

#[tokio::test]
async fn other_methods_are_rejected() {
    let site = test_site().await;
    let resp = site.request(Method::POST, "/", None).await;

    assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers[ALLOW], "GET, HEAD");
}

#[tokio::test]
async fn site_404_page_is_used_when_present() {
    let site = test_site().await;
    let root = site.state.site.current().root().to_path_buf();
    std::fs::write(root.join("404.html"), "<h1>Lost?</h1>\n").unwrap();
    site.state.rebuild_site().await.unwrap();

    let resp = site.get("/show/me/404").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.headers[CONTENT_TYPE], "text/html");
    assert_eq!(resp.headers[CONTENT_LENGTH], "15");
    assert_eq!(resp.body, "<h1>Lost?</h1>\n");
}

#[tokio::test]
async fn rebuilt_site_invalidates_cached_copies() {
    let site = test_site().await;
    let modify_time = site.get("/").await.headers[LAST_MODIFIED]
        .to_str()
        .unwrap()
        .to_string();

    let later = SystemTime::now() + Duration::from_secs(3600);
    let rebuilt = Site::load(&site.state.config.site, later).await.unwrap();
    site.state.site.replace(rebuilt);

    let resp = site.get_since("/", &modify_time).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_ne!(resp.headers[LAST_MODIFIED], modify_time.as_str());
}
