//! Logging infrastructure
//!
//! Installs the `tracing` subscriber used by every crate in the workspace.

mod subscriber;

pub use subscriber::{
    LogFormat, TelemetryConfig, TelemetryError, TelemetryGuard, init_scoped_telemetry,
    init_telemetry,
};
