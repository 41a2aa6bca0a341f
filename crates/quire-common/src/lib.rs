//! quire-common: small pieces shared by the quire editor crates.
//!
//! - [`Clock`] - injectable wall clock used to stamp persisted records
//! - [`telemetry`] - tracing + prometheus bootstrap (feature `telemetry`)

pub mod clock;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use clock::{Clock, ManualClock, SystemClock};
