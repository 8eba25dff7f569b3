use std::time::Duration;

/// Application configuration.
///
/// Everything is compiled in; there is no config file and nothing is read
/// from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub window_title: &'static str,
    pub window_width: f32,
    pub window_height: f32,
    /// Upper bound on a whole request, connect through body.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// How often the UI checks for a finished request.
    pub poll_interval: Duration,
    /// Characters of the body shown under each history label.
    pub preview_chars: usize,
    pub log_level: tracing::Level,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_title: "Backend Dev Helper",
            window_width: 1100.0,
            window_height: 720.0,
            request_timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(150),
            preview_chars: 200,
            log_level: tracing::Level::INFO,
        }
    }
}
