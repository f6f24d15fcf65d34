pub mod config;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::io;
use std::path::PathBuf;

/// Returns `~/.config/rollcall[-dev]/` based on ROLLCALL_ENV.
///
/// Set ROLLCALL_ENV=dev to use the development data directory. ROLLCALL_HOME
/// overrides the location entirely, which is how tests and containers point
/// the engine at a scratch directory.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> io::Result<PathBuf> {
    if let Ok(home) = std::env::var("ROLLCALL_HOME") {
        let dir = PathBuf::from(home);
        std::fs::create_dir_all(&dir)?;
        return Ok(dir);
    }

    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ROLLCALL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("rollcall-dev")
    } else {
        base_dir.join("rollcall")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
