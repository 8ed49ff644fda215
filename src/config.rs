use crate::domain::pagination::DEFAULT_PAGE_SIZE;
use chrono::{NaiveDate, Utc};
use std::time::Duration;

pub const DEFAULT_LOAD_LATENCY: Duration = Duration::from_millis(400);
pub const DEFAULT_EXPORT_LATENCY: Duration = Duration::from_millis(1200);

/// Runtime settings for a [`PayoutConsole`](crate::application::console::PayoutConsole).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Rows revealed per "load more" unit.
    pub page_size: usize,
    /// Simulated backend delay before a pagination advance lands.
    pub load_latency: Duration,
    /// Simulated delay before an export is handed to the exporter.
    pub export_latency: Duration,
    /// Processing date used for "today" stats and the default export name.
    pub today: NaiveDate,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            load_latency: DEFAULT_LOAD_LATENCY,
            export_latency: DEFAULT_EXPORT_LATENCY,
            today: Utc::now().date_naive(),
        }
    }
}

impl ConsoleConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets both simulated latencies.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.load_latency = latency;
        self.export_latency = latency;
        self
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}
