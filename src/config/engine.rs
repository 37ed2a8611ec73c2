use std::time::Duration;

pub struct EngineConfig {
    /// `update()` passes slower than this get a warning.
    pub slow_update_threshold: Duration,
    /// Sleep between passes in `pump_until`.
    pub pump_interval: Duration,
}

pub const ENGINE: EngineConfig = EngineConfig {
    slow_update_threshold: Duration::from_millis(100),
    pump_interval: Duration::from_millis(5),
};
