/// Background housekeeping jobs
pub mod health_monitor;
pub mod reaper;

pub use health_monitor::{HealthMonitor, HealthStatus};
pub use reaper::RecordReaper;
