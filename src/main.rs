use lineboard::app;
use lineboard::config::Config;

/// Main entry point for the dashboard web application.
///
/// Reads configuration from the environment (`LINEBOARD_SHEET`,
/// `LINEBOARD_SNAPSHOT`, `BIND_ADDR`, `PORT`), runs the first load cycle
/// against the worksheet, and serves the dashboard until interrupted.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = Config::from_env();
    app::run(config).await
}
