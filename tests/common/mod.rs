use std::net::SocketAddr;

use reqwest::header::{HeaderMap, LOCATION, SET_COOKIE};
use reqwest::{Client, StatusCode};
use uuid::Uuid;

use login_gate::config::Config;
use login_gate::gate::GateOptions;
use login_gate::session::SESSION_USER_KEY;
use login_gate::state::SharedState;

pub const COOKIE_NAME: &str = "sid";

/// A running test server with direct access to its session store.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: SharedState,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Start an anonymous session, return its id.
    pub fn anonymous_session(&self) -> Uuid {
        self.state.sessions.create()
    }

    /// Start a session for a signed-in user, return its id.
    pub fn signed_in_session(&self, user: &str) -> Uuid {
        let id = self.state.sessions.create();
        self.state
            .sessions
            .insert(&id, SESSION_USER_KEY, user.to_string());
        id
    }

    pub fn return_to(&self, session: Uuid) -> Option<String> {
        self.state.sessions.get(&session, "returnTo")
    }

    /// GET with the given session cookie and extra headers.
    pub async fn get(
        &self,
        path: &str,
        session: Option<Uuid>,
        headers: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut req = self.client.get(self.url(path));
        if let Some(id) = session {
            req = req.header("cookie", format!("{COOKIE_NAME}={id}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        req.send().await.expect("get request failed")
    }
}

pub fn location(headers: &HeaderMap) -> Option<&str> {
    headers.get(LOCATION).and_then(|v| v.to_str().ok())
}

pub fn set_cookie(headers: &HeaderMap) -> Option<&str> {
    headers.get(SET_COOKIE).and_then(|v| v.to_str().ok())
}

pub fn assert_redirect(resp: &reqwest::Response, target: &str) {
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(resp.headers()), Some(target));
}

/// Spawn the demo app with default gate options.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(GateOptions::default()).await
}

/// Spawn the demo app on a random port with the given gate options.
pub async fn spawn_app_with(gate: GateOptions) -> TestApp {
    let config = Config {
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        gate,
        session_cookie: COOKIE_NAME.to_string(),
        session_ttl: std::time::Duration::from_secs(3600),
        log_level: "warn".to_string(),
    };

    let (app, state) = login_gate::build_app(config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        client,
        state,
    }
}
