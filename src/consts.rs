pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! This module contains all configuration constants for the dashboard core,
    //! organized by functional area for clarity and maintainability.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// Maximum number of buffered activity events shared by all widgets
    pub const EVENT_QUEUE_SIZE: usize = 100;

    // =============================================================================
    // POLLING CONFIGURATION
    // =============================================================================

    /// Poll cadence defaults, per widget
    pub mod polling {
        /// Integration status refresh (seconds)
        pub const STATUS_INTERVAL_SECS: u64 = 30;

        /// Cashier roster refresh (seconds)
        pub const CASHIERS_INTERVAL_SECS: u64 = 60;

        /// KPI metrics refresh (seconds)
        pub const METRICS_INTERVAL_SECS: u64 = 300;

        /// Pending manual refresh requests per controller
        pub const REFRESH_QUEUE_SIZE: usize = 16;

        /// Fetch results retained for lagging subscribers
        pub const RESULT_CHANNEL_CAPACITY: usize = 32;

        /// How often headless mode prints a dashboard snapshot
        pub const SNAPSHOT_INTERVAL_SECS: u64 = 30;
    }

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// HTTP client timing
    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 10;

        /// Upper bound for a single request; kept below the shortest default poll interval
        pub const REQUEST_TIMEOUT_SECS: u64 = 15;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }

    /// Backend endpoint paths, relative to the API base URL
    pub mod endpoints {
        pub const CASHIERS: &str = "api/cashiers";
        pub const INTEGRATION_STATUS: &str = "api/integrations/status";
        pub const DASHBOARD_METRICS: &str = "api/dashboard/metrics";
    }

    // =============================================================================
    // METRICS CONFIGURATION
    // =============================================================================

    /// Length of the default KPI reporting window (days, inclusive of today)
    pub const DEFAULT_METRICS_WINDOW_DAYS: i64 = 30;

    /// Suffix marking a period-over-period percentage delta in metrics payloads
    pub const KPI_CHANGE_SUFFIX: &str = "Change";
}
