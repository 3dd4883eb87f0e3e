// src/services/mod.rs

//! Services for checking monitored sites.

mod monitor;

pub use monitor::{RunReport, SiteMonitor, SiteReport, SiteStatus, scan_page};
