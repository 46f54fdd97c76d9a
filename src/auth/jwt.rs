use std::sync::{
    Arc,
    atomic::{AtomicI64, Ordering},
};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use quickticket_shared::{Level, log_event};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::json;
use time::OffsetDateTime;

use super::{AuthError, MAX_COOKIE_BYTES, VerificationFailure};

/// Lifetime of a session token and of the cookie carrying it.
pub const TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

const SNIPPET_LEN: usize = 10;

pub trait Clock: Send + Sync {
    /// Current time as a unix timestamp in seconds.
    fn now(&self) -> i64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        OffsetDateTime::now_utc().unix_timestamp()
    }
}

/// Clock that only moves when told to.
#[derive(Default)]
pub struct ManualClock(AtomicI64);

impl ManualClock {
    pub fn new(now: i64) -> Self {
        Self(AtomicI64::new(now))
    }

    pub fn advance(&self, secs: i64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims<T> {
    #[serde(flatten)]
    pub payload: T,
    pub iat: i64,
    pub exp: i64,
}

struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies session tokens and drives the session cookie.
///
/// Built once at startup from the session secret; cheap to clone and safe to
/// share between requests.
#[derive(Clone)]
pub struct Authenticator {
    keys: Arc<Keys>,
    clock: Arc<dyn Clock>,
    ttl: i64,
    pub(super) secure_cookie: bool,
    pub(super) require_cookie_on_login: bool,
    pub(super) cookie_size_limit: usize,
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("ttl", &self.ttl)
            .field("secure_cookie", &self.secure_cookie)
            .field("require_cookie_on_login", &self.require_cookie_on_login)
            .field("cookie_size_limit", &self.cookie_size_limit)
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    pub fn new(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Signing(
                "session secret is not configured".to_owned(),
            ));
        }

        Ok(Self {
            keys: Arc::new(Keys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }),
            clock: Arc::new(SystemClock),
            ttl: TOKEN_TTL_SECS,
            secure_cookie: true,
            require_cookie_on_login: false,
            cookie_size_limit: MAX_COOKIE_BYTES,
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_ttl(mut self, ttl: i64) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// Whether a failure to write the session cookie fails login and
    /// registration instead of being logged and ignored.
    pub fn with_require_cookie_on_login(mut self, require: bool) -> Self {
        self.require_cookie_on_login = require;
        self
    }

    pub fn with_cookie_size_limit(mut self, size_limit: usize) -> Self {
        self.cookie_size_limit = size_limit;
        self
    }

    pub fn ttl(&self) -> i64 {
        self.ttl
    }

    /// Signs `payload` with `iat = now` and `exp = now + ttl`.
    pub fn issue<T: Serialize>(&self, payload: T) -> Result<String, AuthError> {
        let iat = self.clock.now();
        let Some(exp) = iat.checked_add(self.ttl) else {
            return Err(AuthError::Signing(format!(
                "token lifetime of {}s overflows the expiry",
                self.ttl
            )));
        };
        let claims = Claims { payload, iat, exp };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.keys.encoding,
        )
        .map_err(|e| {
            let err = AuthError::Signing(e.to_string());
            log_event(
                "Error signing JWT",
                "auth",
                json!({ "payload": serde_json::to_value(&claims.payload).ok() }),
                Level::Error,
                Some(&err),
            );

            err
        })
    }

    pub fn issue_session(&self, user_id: &str) -> Result<String, AuthError> {
        if user_id.is_empty() {
            return Err(AuthError::Signing("missing user id".to_owned()));
        }

        let token = self.issue(SessionPayload {
            user_id: user_id.to_owned(),
        })?;

        log_event(
            "Session token issued",
            "auth",
            json!({ "userId": user_id }),
            Level::Debug,
            None,
        );

        Ok(token)
    }

    /// Verifies signature, algorithm and expiry, then decodes the payload.
    ///
    /// Input is untrusted. On failure only a short prefix of the token is
    /// logged.
    pub fn verify<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, AuthError> {
        match self.decode::<T>(token) {
            Ok(claims) => {
                log_event("Session token verified", "auth", json!({}), Level::Debug, None);

                Ok(claims)
            }
            Err(failure) => {
                let err = AuthError::Verification(failure);
                let snippet = token.chars().take(SNIPPET_LEN).collect::<String>();
                log_event(
                    "AUTH_TOKEN_VERIFICATION_FAILED",
                    "auth",
                    json!({ "tokenSnippet": snippet }),
                    Level::Warning,
                    Some(&err),
                );

                Err(err)
            }
        }
    }

    fn decode<T: DeserializeOwned>(&self, token: &str) -> Result<Claims<T>, VerificationFailure> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // expiry is checked against the injected clock below
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let data =
            decode::<Claims<T>>(token, &self.keys.decoding, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::InvalidSignature => VerificationFailure::InvalidSignature,
                    ErrorKind::ExpiredSignature => VerificationFailure::Expired,
                    ErrorKind::InvalidAlgorithm
                    | ErrorKind::InvalidAlgorithmName
                    | ErrorKind::MissingAlgorithm => VerificationFailure::UnsupportedAlgorithm,
                    _ => VerificationFailure::Malformed,
                }
            })?;

        if self.clock.now() >= data.claims.exp {
            return Err(VerificationFailure::Expired);
        }

        Ok(data.claims)
    }
}
