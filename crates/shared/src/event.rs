use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

#[derive(EnumString, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Fatal,
    Error,
    Warning,
    #[default]
    Info,
    Debug,
}

/// Record a structured application event.
///
/// Events are emitted through `tracing` and never fail the caller. `data`
/// must not contain secrets: callers pass identifiers and short snippets
/// only.
pub fn log_event(
    message: impl AsRef<str>,
    category: &str,
    data: Value,
    level: Level,
    error: Option<&(dyn std::error::Error + 'static)>,
) {
    let message = message.as_ref();
    let error = error.map(|e| e.to_string());

    match level {
        Level::Fatal | Level::Error => tracing::error!(
            category,
            level = level.as_ref(),
            data = %data,
            error = error.as_deref(),
            "{message}"
        ),
        Level::Warning => tracing::warn!(
            category,
            data = %data,
            error = error.as_deref(),
            "{message}"
        ),
        Level::Info => tracing::info!(
            category,
            data = %data,
            error = error.as_deref(),
            "{message}"
        ),
        Level::Debug => tracing::debug!(
            category,
            data = %data,
            error = error.as_deref(),
            "{message}"
        ),
    }
}
