use std::{collections::BTreeMap, net::SocketAddr};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use tempfile::TempDir;
use tourley::{config::AppConfig, db::Database, routes::create_router, state::AppState};
use tower::ServiceExt;

struct Browser {
    app: Router,
    cookies: BTreeMap<String, String>,
    _root: TempDir,
}

struct Page {
    status: StatusCode,
    location: Option<String>,
    body: String,
}

impl Browser {
    async fn new() -> Self {
        let root = TempDir::new().expect("tempdir");
        let db_path = root.path().join("web.sqlite");
        let config = AppConfig {
            database_url: format!("sqlite://{}", db_path.display()),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            cookie_secret: "web-test-cookie-secret".into(),
            seed_sample_data: false,
        };
        let db = Database::connect(&config.database_url)
            .await
            .expect("open database");
        let app = create_router(AppState::new(&config, db));
        Self {
            app,
            cookies: BTreeMap::new(),
            _root: root,
        }
    }

    async fn get(&mut self, uri: &str) -> Page {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Page {
        self.send(Method::POST, uri, Some(form)).await
    }

    async fn send(&mut self, method: Method, uri: &str, form: Option<&str>) -> Page {
        let mut request = Request::builder().method(method).uri(uri);
        if !self.cookies.is_empty() {
            let cookie = self
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            request = request.header(header::COOKIE, cookie);
        }
        let body = match form {
            Some(form) => {
                request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(request.body(body).expect("request"))
            .await
            .expect("infallible router");

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let raw = set_cookie.to_str().expect("ascii cookie");
            let pair = raw.split(';').next().unwrap_or_default();
            if let Some((name, value)) = pair.split_once('=') {
                if value.is_empty() {
                    self.cookies.remove(name);
                } else {
                    self.cookies.insert(name.to_string(), value.to_string());
                }
            }
        }

        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        Page {
            status,
            location,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

fn assert_redirect(page: &Page, to: &str) {
    assert_eq!(page.status, StatusCode::SEE_OTHER);
    assert_eq!(page.location.as_deref(), Some(to));
}

#[tokio::test]
async fn dashboard_requires_login() {
    let mut browser = Browser::new().await;
    assert_redirect(&browser.get("/dashboard").await, "/login");
    assert_redirect(&browser.get("/add_trip").await, "/login");
    assert_redirect(&browser.get("/").await, "/login");
}

#[tokio::test]
async fn sign_up_validation_messages() {
    let mut browser = Browser::new().await;

    let page = browser
        .post("/sign_up", "name=Will&email=will%40example.com&password=a&confirm_password=b")
        .await;
    assert_redirect(&page, "/sign_up");
    let form = browser.get("/sign_up").await;
    assert!(form.body.contains("Passwords do not match"));

    let page = browser
        .post("/sign_up", "name=&email=will%40example.com&password=a&confirm_password=a")
        .await;
    assert_redirect(&page, "/sign_up");
    assert!(browser.get("/sign_up").await.body.contains("Please fill in all fields"));

    let page = browser
        .post("/sign_up", "name=Will&email=will%40example.com&password=a&confirm_password=a")
        .await;
    assert_redirect(&page, "/login");

    let page = browser
        .post("/sign_up", "name=Will&email=will%40example.com&password=a&confirm_password=a")
        .await;
    assert_redirect(&page, "/sign_up");
    assert!(browser.get("/sign_up").await.body.contains("Email already exists"));
}

#[tokio::test]
async fn trip_lifecycle_through_the_browser() {
    let mut browser = Browser::new().await;
    browser
        .post("/sign_up", "name=Will+Cox&email=will%40gmail.com&password=pw&confirm_password=pw")
        .await;

    let rejected = browser
        .post("/login", "email=will%40gmail.com&password=wrong")
        .await;
    assert_eq!(rejected.status, StatusCode::OK);
    assert!(rejected.body.contains("Invalid email or password"));

    let login = browser
        .post("/login", "email=will%40gmail.com&password=pw")
        .await;
    assert_redirect(&login, "/dashboard");
    assert_redirect(&browser.get("/").await, "/dashboard");

    let added = browser
        .post(
            "/add_trip",
            "city=Dallas&state=Texas&country=USA&start_date=2024-06-01&end_date=2024-06-07&type=business",
        )
        .await;
    assert_redirect(&added, "/dashboard");

    let dashboard = browser.get("/dashboard").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert!(dashboard.body.contains("Welcome, Will Cox"));
    assert!(dashboard.body.contains("Dallas"));
    assert!(dashboard.body.contains("Trip added successfully!"));

    let edit = browser.get("/edit_trip/0").await;
    assert_eq!(edit.status, StatusCode::OK);
    assert!(edit.body.contains("value=\"Dallas\""));

    let updated = browser
        .post(
            "/edit_trip/0",
            "city=Austin&state=&country=&start_date=&end_date=&type=",
        )
        .await;
    assert_redirect(&updated, "/dashboard");
    let dashboard = browser.get("/dashboard").await;
    assert!(dashboard.body.contains("Austin"));
    assert!(dashboard.body.contains("Texas"));

    assert_redirect(&browser.get("/delete_trip/3").await, "/dashboard");
    assert!(browser.get("/dashboard").await.body.contains("Trip not found"));

    assert_redirect(&browser.get("/delete_trip/0").await, "/dashboard");
    let dashboard = browser.get("/dashboard").await;
    assert!(dashboard.body.contains("Trip deleted successfully!"));
    assert!(!dashboard.body.contains("Austin"));

    assert_redirect(&browser.get("/logout").await, "/login");
    assert_redirect(&browser.get("/dashboard").await, "/login");
}
