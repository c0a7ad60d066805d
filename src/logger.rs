//! Structured, leveled logging via the `log` facade with `log4rs` as the
//! concrete backend. Hosts that don't care about logging
//! never have to configure anything; everything here is best-effort.

use std::path::Path;

/// Loads `log4rs.yaml` from the working directory if present. A missing
/// file is not fatal — callers who never call this simply get no logger
/// installed, and `log` macros become no-ops.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    if Path::new("log4rs.yaml").exists() {
        log4rs::init_file("log4rs.yaml", Default::default())?;
    }
    Ok(())
}

/// Sets up a rolling `engine.log` appender under `{data_dir}/logs/`, used
/// by `Engine::open` when a host wants file-backed logging scoped to one
/// data directory rather than a process-wide config file.
pub fn init_for_data_dir(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    use log::LevelFilter;
    use log4rs::append::file::FileAppender;
    use log4rs::config::{Appender, Config, Root};
    use log4rs::encode::pattern::PatternEncoder;

    let log_dir = data_dir.join("logs");
    std::fs::create_dir_all(&log_dir)?;
    let pattern = "{d(%Y-%m-%d %H:%M:%S%.3f)} [{l}] {t} - {m}{n}";
    let engine_log = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build(log_dir.join("engine.log"))?;
    let audit_log = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build(log_dir.join("audit.log"))?;

    let config = Config::builder()
        .appender(Appender::builder().build("engine", Box::new(engine_log)))
        .appender(Appender::builder().build("audit", Box::new(audit_log)))
        .logger(
            log4rs::config::Logger::builder()
                .appender("audit")
                .additive(false)
                .build("enosql::audit", LevelFilter::Info),
        )
        .build(Root::builder().appender("engine").build(LevelFilter::Info))?;
    log4rs::init_config(config)?;
    Ok(())
}

/// Records one line to the `enosql::audit` logger for a database-level
/// mutation (`create_database`, `delete_database`, `save_database`,
/// `restore_backup`, `compact_database`) — an activity trail for
/// operators who need one without a full WAL.
pub fn audit(operation: &str, database: &str) {
    log::info!(target: "enosql::audit", "{operation} database={database}");
}
