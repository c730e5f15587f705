use std::io;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use snippetbox::app::{App, standard_chain};
use snippetbox::middleware::HttpLogger;
use snippetbox::models::{MemorySnippets, MemoryUsers};
use snippetbox::{BoxedService, Request, Response, ResponseBuffer, Router, Service};
use tempfile::TempDir;

struct Harness {
    app: BoxedService,
    static_dir: TempDir,
}

fn harness_with(logger: HttpLogger) -> Harness {
    let static_dir = tempfile::tempdir().unwrap();
    let app = App::new(
        Arc::new(MemorySnippets::new()),
        Arc::new(MemoryUsers::new(4)),
        static_dir.path(),
    )
    .routes_with(logger);
    Harness { app, static_dir }
}

fn harness() -> Harness {
    harness_with(HttpLogger::new())
}

impl Harness {
    async fn get(&self, uri: &str) -> ResponseBuffer {
        self.send(Request::new("GET", uri, Vec::new(), Vec::new())).await
    }

    async fn post_form(&self, uri: &str, body: &str) -> ResponseBuffer {
        let headers = vec![(
            "content-type".to_owned(),
            "application/x-www-form-urlencoded".to_owned(),
        )];
        self.send(Request::new("POST", uri, headers, body.as_bytes().to_vec())).await
    }

    async fn send(&self, req: Request) -> ResponseBuffer {
        let mut buf = ResponseBuffer::new();
        self.app.serve(req, &mut buf).await;
        buf
    }
}

fn json(buf: &ResponseBuffer) -> Value {
    serde_json::from_slice(buf.body()).unwrap()
}

#[tokio::test]
async fn home_lists_no_snippets_initially() {
    let h = harness();
    let buf = h.get("/").await;

    assert_eq!(buf.status(), Some(200));
    assert_eq!(buf.sent_headers()["content-type"], "application/json");
    assert_eq!(buf.sent_headers()["x-frame-options"], "deny");
    assert_eq!(json(&buf)["snippets"], serde_json::json!([]));
}

#[tokio::test]
async fn create_redirects_to_the_new_snippet() {
    let h = harness();
    let buf = h
        .post_form("/snippet/create", "title=O+snail&content=Climb+Mount+Fuji&expires=7")
        .await;
    assert_eq!(buf.status(), Some(303));
    assert_eq!(buf.sent_headers()["location"], "/snippet/view/1");

    let view = h.get("/snippet/view/1").await;
    assert_eq!(view.status(), Some(200));
    let snippet = json(&view);
    assert_eq!(snippet["id"], 1);
    assert_eq!(snippet["title"], "O snail");
    assert_eq!(snippet["content"], "Climb Mount Fuji");

    let home = json(&h.get("/").await);
    assert_eq!(home["snippets"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_snippet_is_422_with_field_errors() {
    let h = harness();
    let buf = h.post_form("/snippet/create", "title=&content=body&expires=30").await;

    assert_eq!(buf.status(), Some(422));
    let form = json(&buf);
    assert_eq!(form["content"], "body");
    assert_eq!(form["field_errors"]["title"], "This field cannot be blank");
    assert_eq!(form["field_errors"]["expires"], "This field must equal 1, 7 or 365");
    assert!(form["field_errors"].get("content").is_none());
}

#[tokio::test]
async fn bad_form_input_is_a_client_error() {
    let h = harness();
    let buf = h.post_form("/snippet/create", "title=a&content=b&expires=never").await;
    assert_eq!(buf.status(), Some(400));

    let headers = vec![("content-type".to_owned(), "application/json".to_owned())];
    let req = Request::new("POST", "/snippet/create", headers, b"{}".to_vec());
    assert_eq!(h.send(req).await.status(), Some(415));
}

#[tokio::test]
async fn create_form_defaults_to_a_year() {
    let h = harness();
    let form = json(&h.get("/snippet/create").await);
    assert_eq!(form["expires"], 365);
    assert_eq!(form["title"], "");
}

#[tokio::test]
async fn unknown_snippets_are_404() {
    let h = harness();
    for uri in ["/snippet/view/0", "/snippet/view/-1", "/snippet/view/abc", "/snippet/view/99"] {
        let buf = h.get(uri).await;
        assert_eq!(buf.status(), Some(404), "{uri}");
        assert_eq!(buf.body(), b"Not Found");
    }
}

#[tokio::test]
async fn unmatched_route_and_wrong_method() {
    let h = harness();
    assert_eq!(h.get("/missing").await.status(), Some(404));

    let buf = h.send(Request::new("DELETE", "/snippet/create", Vec::new(), Vec::new())).await;
    assert_eq!(buf.status(), Some(405));
    assert_eq!(buf.sent_headers()["allow"], "GET, POST");
}

#[tokio::test]
async fn signup_then_login() {
    let h = harness();
    let buf = h
        .post_form("/user/signup", "name=Alice&email=alice%40example.com&password=pa%24%24word")
        .await;
    assert_eq!(buf.status(), Some(303));
    assert_eq!(buf.sent_headers()["location"], "/user/login");

    let dupe = h
        .post_form("/user/signup", "name=Alice&email=alice%40example.com&password=whatever123")
        .await;
    assert_eq!(dupe.status(), Some(422));
    assert_eq!(json(&dupe)["field_errors"]["email"], "Email address is already in use");

    let login = h.post_form("/user/login", "email=alice%40example.com&password=pa%24%24word").await;
    assert_eq!(login.status(), Some(200));
    assert_eq!(json(&login)["authenticated_user_id"], 1);

    let wrong = h.post_form("/user/login", "email=alice%40example.com&password=nope").await;
    assert_eq!(wrong.status(), Some(422));
    let form = json(&wrong);
    assert_eq!(form["non_field_errors"][0], "Email or password is incorrect");
    assert!(form.get("password").is_none());
}

#[tokio::test]
async fn passwords_are_not_trimmed() {
    let h = harness();
    let buf = h
        .post_form("/user/signup", "name=Bob&email=bob%40example.com&password=+secret12+")
        .await;
    assert_eq!(buf.status(), Some(303));

    let trimmed = h.post_form("/user/login", "email=bob%40example.com&password=secret12").await;
    assert_eq!(trimmed.status(), Some(422));

    let exact = h.post_form("/user/login", "email=bob%40example.com&password=+secret12+").await;
    assert_eq!(exact.status(), Some(200));
}

#[tokio::test]
async fn signup_validation_errors() {
    let h = harness();
    let buf = h.post_form("/user/signup", "name=&email=nope&password=short").await;
    assert_eq!(buf.status(), Some(422));

    let errors = &json(&buf)["field_errors"];
    assert_eq!(errors["name"], "This field cannot be blank");
    assert_eq!(errors["email"], "This field must be a valid email address");
    assert_eq!(errors["password"], "This field must be at least 8 characters long");
}

#[tokio::test]
async fn static_files_are_served_from_the_static_dir() {
    let h = harness();
    std::fs::create_dir(h.static_dir.path().join("css")).unwrap();
    std::fs::write(h.static_dir.path().join("css/main.css"), "body { margin: 0 }").unwrap();

    let buf = h.get("/static/css/main.css").await;
    assert_eq!(buf.status(), Some(200));
    assert_eq!(buf.sent_headers()["content-type"], "text/css; charset=utf-8");
    assert_eq!(buf.body(), b"body { margin: 0 }");

    assert_eq!(h.get("/static/css").await.status(), Some(404));
    assert_eq!(h.get("/static/css/missing.css").await.status(), Some(404));
    assert_eq!(h.get("/static/../Cargo.toml").await.status(), Some(404));
}

// ── Request logging through the full chain ────────────────────────────────────

#[derive(Clone, Default)]
struct Sink(Arc<Mutex<Vec<u8>>>);

impl io::Write for Sink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Sink {
    fn logger(&self) -> HttpLogger {
        let sink = self.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .flatten_event(true)
            .with_writer(move || sink.clone())
            .finish();
        HttpLogger::with_dispatch(tracing::Dispatch::new(subscriber))
    }

    fn records(&self) -> Vec<Value> {
        let raw = String::from_utf8(self.0.lock().clone()).unwrap();
        raw.lines().map(|line| serde_json::from_str(line).unwrap()).collect()
    }
}

#[tokio::test]
async fn every_request_is_logged_once() {
    let sink = Sink::default();
    let h = harness_with(sink.logger());

    h.get("/").await;
    h.get("/snippet/view/7?from=home").await;
    h.post_form("/snippet/create", "title=t&content=c&expires=1").await;

    let records = sink.records();
    assert_eq!(records.len(), 3);

    assert_eq!(records[0]["level"], "INFO");
    assert_eq!(records[0]["path"], "/");
    assert_eq!(records[0]["status_code"], 200);

    assert_eq!(records[1]["level"], "ERROR");
    assert_eq!(records[1]["method"], "GET");
    assert_eq!(records[1]["path"], "/snippet/view/7?from=home");
    assert_eq!(records[1]["status_code"], 404);
    assert_eq!(records[1]["status_text"], "Not Found");
    assert_eq!(records[1]["body"], "Not Found");

    assert_eq!(records[2]["method"], "POST");
    assert_eq!(records[2]["status_code"], 303);
    assert_eq!(records[2]["status_text"], "See Other");
    assert_eq!(records[2]["body"], "");
}

async fn explode(_req: Request) -> Response {
    panic!("snippet store exploded");
}

#[tokio::test]
async fn recovered_panic_is_logged_once_as_500() {
    let sink = Sink::default();
    let app = standard_chain(sink.logger()).then(Router::new().get("/explode", explode));

    let mut buf = ResponseBuffer::new();
    app.serve(Request::new("GET", "/explode?x=1", Vec::new(), Vec::new()), &mut buf).await;

    assert_eq!(buf.status(), Some(500));
    assert_eq!(buf.sent_headers()["connection"], "close");
    assert_eq!(buf.sent_headers()["x-frame-options"], "deny");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["level"], "ERROR");
    assert_eq!(records[0]["path"], "/explode?x=1");
    assert_eq!(records[0]["status_code"], 500);
    assert_eq!(records[0]["status_text"], "Internal Server Error");
    assert_eq!(records[0]["body"], "Internal Server Error");
}
