use std::time::Duration;

/// Logging configuration for executors.
///
/// By default every statement is logged at `DEBUG` with SQL truncated to 200 bytes,
/// and no slow-query threshold is set.
#[derive(Debug, Clone)]
pub struct ExecConfig {
    /// Statements slower than this are logged at `WARN`.
    pub slow_query_threshold: Option<Duration>,
    /// Truncate logged SQL (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
    /// Whether statements are logged at all.
    pub logging_enabled: bool,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            slow_query_threshold: None,
            max_sql_length: Some(200),
            logging_enabled: true,
        }
    }
}

impl ExecConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slow query threshold.
    pub fn with_slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Set maximum SQL length to log.
    pub fn with_max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    pub fn disable_logging(mut self) -> Self {
        self.logging_enabled = false;
        self
    }
}
