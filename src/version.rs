// Build-time version from Cargo.toml

/// Package version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name (from Cargo.toml).
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Startup banner line, e.g. "sysprobe v0.3.0 - Host Metrics Probe".
pub fn banner() -> String {
    format!("{} v{} - Host Metrics Probe", NAME, VERSION)
}
