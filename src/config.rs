use std::env;
use std::path::PathBuf;

/// Runtime settings, read once at startup from the environment. Every
/// knob has a default so the dashboard runs with no configuration at all.
#[derive(Clone, Debug)]
pub struct Config {
    /// CSV worksheet acting as the persistent store.
    pub sheet_path: PathBuf,
    /// Where `/api/snapshot` writes and `/api/restore` reads.
    pub snapshot_path: PathBuf,
    /// Address the web server binds.
    pub bind_addr: String,
}

impl Config {
    pub fn from_env() -> Self {
        let sheet_path = env::var("LINEBOARD_SHEET")
            .unwrap_or_else(|_| "sheet.csv".to_string())
            .into();
        let snapshot_path = env::var("LINEBOARD_SNAPSHOT")
            .unwrap_or_else(|_| "lineboard.snapshot.gz".to_string())
            .into();
        let host = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        Config {
            sheet_path,
            snapshot_path,
            bind_addr: format!("{host}:{port}"),
        }
    }
}
