//! Shared constants for fleet-sens

use std::time::Duration;

/// Readings kept per sensor before the oldest is evicted
pub const DEFAULT_HISTORY_CAPACITY: usize = 1000;

/// Entries returned by a history query when no limit is given
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// How often the dashboard polls the stream for latest values
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Fallback update interval for sources that don't specify one
pub const DEFAULT_SOURCE_INTERVAL: Duration = Duration::from_millis(1000);
