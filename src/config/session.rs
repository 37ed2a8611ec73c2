use std::time::Duration;

pub struct SessionConfig {
    /// Minimum gap between two polls of a pending session.
    pub poll_interval: Duration,
    /// A pending session with no resolution after this long is abandoned.
    pub timeout: Duration,
    /// Expiry requested from the wallet service when a payload is opened.
    pub payload_expiry_minutes: u32,
}

pub const SESSION: SessionConfig = SessionConfig {
    poll_interval: Duration::from_secs(2),
    timeout: Duration::from_secs(5 * 60),
    payload_expiry_minutes: 5,
};
