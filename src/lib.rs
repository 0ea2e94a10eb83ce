// Library for tests and the dump_history tool to access modules

pub mod alerts;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod persistence;
pub mod sysinfo_repo;
pub mod version;
