use std::time::Duration;

// Fixed run parameters
pub const CLIENT_COUNT: usize = 1000;
pub const SERVER_CAPACITY: u64 = 200;            // Accepted requests per one-second window
pub const OUTAGE_DURATION: Duration = Duration::from_secs(10);

// Retry delays
pub const BASE_DELAY: Duration = Duration::from_millis(100);
pub const CAP_DELAY: Duration = Duration::from_secs(10);
pub const CONSTANT_DELAY: Duration = Duration::from_millis(1);

// Reporting
pub const STABILITY_WINDOW_SECS: u64 = 60;        // Seconds scanned past the outage
pub const HISTOGRAM_BAR_WIDTH: u64 = 60;
pub const LATENCY_PERCENTILE: f64 = 0.99;
