use std::{
    io,
    sync::{Arc, Mutex},
};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use http_body_util::BodyExt;
use quickticket::{
    AppState, Config,
    auth::{AUTH_COOKIE_NAME, Authenticator, ManualClock},
    config::{
        DatabaseConfig, Environment, JwtConfig, ObservabilityConfig, ServerConfig, SessionConfig,
    },
};
use temp_dir::TempDir;
use tower::ServiceExt;
use tracing_subscriber::fmt::MakeWriter;

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    _dir: TempDir,
}

pub fn test_config(url: String) -> Config {
    Config {
        environment: Environment::Development,
        server: ServerConfig {
            host: "127.0.0.1".to_owned(),
            port: 3000,
        },
        database: DatabaseConfig {
            url,
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: "test_secret_key_minimum_32_characters_long".to_owned(),
            expiration_days: 7,
        },
        session: SessionConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

pub async fn setup_test_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let url = format!("sqlite:{}", dir.child("db.sqlite3").display());
    let config = test_config(url.to_owned());

    quickticket::migrate::migrate(&config).await?;

    let pool = quickticket::db::create_pool(&url, 5).await?;
    let clock = Arc::new(ManualClock::new(
        time::OffsetDateTime::now_utc().unix_timestamp(),
    ));
    let state = AppState::new(config, pool.clone(), pool)?.with_clock(clock.clone());

    Ok(TestApp {
        router: quickticket::router(state.clone()),
        state,
        clock,
        _dir: dir,
    })
}

#[allow(dead_code)]
impl TestApp {
    /// Rebuilds the router around a reconfigured authenticator.
    pub fn map_authenticator(mut self, f: impl FnOnce(Authenticator) -> Authenticator) -> Self {
        self.state.authenticator = f(self.state.authenticator.clone());
        self.router = quickticket::router(self.state.clone());
        self
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> anyhow::Result<Response<Body>> {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }

        Ok(self.router.clone().oneshot(req.body(Body::empty())?).await?)
    }

    pub async fn post_form(
        &self,
        uri: &str,
        form: &[(&str, &str)],
        cookie: Option<&str>,
    ) -> anyhow::Result<Response<Body>> {
        let mut req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }

        let body = serde_urlencoded::to_string(form)?;

        Ok(self.router.clone().oneshot(req.body(Body::from(body))?).await?)
    }

    /// Registers `name` and returns the `Cookie` header value for its session.
    pub async fn register(&self, name: &str) -> anyhow::Result<String> {
        let email = format!("{name}@quickticket.localhost");
        let res = self
            .post_form(
                "/register",
                &[("name", name), ("email", &email), ("password", "my_password")],
                None,
            )
            .await?;

        session_cookie(&res).ok_or_else(|| anyhow::anyhow!("register did not set a session"))
    }

    pub async fn user_id(&self, name: &str) -> anyhow::Result<String> {
        let user = self
            .state
            .user_query
            .find_by_email(format!("{name}@quickticket.localhost"))
            .await?
            .ok_or_else(|| anyhow::anyhow!("user {name} not found"))?;

        Ok(user.id)
    }
}

#[allow(dead_code)]
pub fn set_cookie_headers(res: &Response<Body>) -> Vec<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect()
}

/// `auth-token=<value>` taken from the response `Set-Cookie` headers.
pub fn session_cookie(res: &Response<Body>) -> Option<String> {
    set_cookie_headers(res)
        .into_iter()
        .filter_map(|c| c.split(';').next().map(str::to_owned))
        .find(|c| c.starts_with(&format!("{AUTH_COOKIE_NAME}=")) && c.len() > AUTH_COOKIE_NAME.len() + 1)
}

#[allow(dead_code)]
pub fn location(res: &Response<Body>) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

pub async fn body_string(res: Response<Body>) -> anyhow::Result<String> {
    let bytes = res.into_body().collect().await?.to_bytes();

    Ok(String::from_utf8(bytes.to_vec())?)
}

/// In-memory sink for formatted log lines.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogBuffer {
    /// Captures events emitted on the current thread until the guard drops.
    pub fn capture(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        let buf = self.0.lock().map(|b| b.clone()).unwrap_or_default();

        String::from_utf8_lossy(&buf).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut inner) = self.0.lock() {
            inner.extend_from_slice(buf);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
