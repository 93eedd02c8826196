use std::path::PathBuf;

use color_eyre::eyre::WrapErr;
use water_level_watcher::config::{WatcherConfig, DEFAULT_CONFIG_PATH};
use water_level_watcher::util::database::Database;
use water_level_watcher::util::http::ReqwestSensorClient;
use water_level_watcher::util::log::{install_file_logger, Logger};
use water_level_watcher::{log_info, log_warn, Runtime, RuntimeConfig, WaterLevelWatcher};

// The blocking HTTP client must be created and dropped outside the async
// runtime, so main stays synchronous and only the poll loop runs on tokio.
fn main() -> color_eyre::Result<()> {
    tracing_subscriber::fmt::init();
    color_eyre::install()?;

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    let config = WatcherConfig::load(&config_path)
        .wrap_err_with(|| format!("Failed to load config from {}", config_path.display()))?;

    if let Some(log_dir) = &config.log_dir {
        let logger = Logger::new(log_dir)
            .wrap_err_with(|| format!("Failed to create log dir {}", log_dir.display()))?;
        install_file_logger(logger);
    }

    let database = Database::open(&config.database_path, config.region_size)?;
    let client = ReqwestSensorClient::new(&config.client_options())?;

    let mut watcher = WaterLevelWatcher::new(database, client);
    watcher.set_storage_offset(config.storage_offset);
    watcher.load_data();

    if let Some(bootstrap) = &config.bootstrap {
        watcher.set_power(bootstrap.power);
        watcher.set_url(&bootstrap.url)?;
        watcher.set_outlet(bootstrap.outlet);
        if let Some(name) = &bootstrap.device_name {
            watcher.set_device_name(name)?;
        }
        watcher.save_data();
        log_info!("Applied bootstrap configuration");
    }

    if !watcher.record().is_ready() {
        log_warn!(
            "Watcher is not fully configured (power: {}, url: '{}', outlet: {}); polls will be skipped",
            watcher.power(),
            watcher.url(),
            watcher.outlet()
        );
    }

    let runtime = Runtime::new(
        watcher,
        RuntimeConfig { poll_interval: config.poll_interval() },
    );

    let tokio_runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let polls = tokio_runtime.block_on(runtime.run_until(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }))?;

    log_info!("Exiting after {} polls", polls);
    Ok(())
}
