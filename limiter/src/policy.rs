use std::time::Duration;

/// How many requests one client may make per fixed window.
#[derive(Debug, Clone)]
pub struct WindowPolicy {
    pub window: Duration,
    pub max_requests: u32,
    pub message: String,
}

impl WindowPolicy {
    pub fn new(window: Duration, max_requests: u32, message: impl Into<String>) -> Self {
        Self {
            window,
            max_requests,
            message: message.into(),
        }
    }

    /// 20 attempts per 15 minutes.
    pub fn login() -> Self {
        Self::new(
            Duration::from_secs(15 * 60),
            20,
            "Too many login attempts. Please try again in 15 minutes.",
        )
    }

    /// 100 requests per minute.
    pub fn api() -> Self {
        Self::new(
            Duration::from_secs(60),
            100,
            "Too many requests. Please try again later.",
        )
    }
}
