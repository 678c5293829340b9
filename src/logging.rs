use simplelog::{ColorChoice, ConfigBuilder, LevelFilter, TermLogger, TerminalMode};

pub use log::SetLoggerError;

/// Each `-v` opens up one more level, starting from warnings.
pub fn level_for(verbosity: u64) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Log to stderr so stdout stays clean for rendered pages and JSON.
pub fn init(verbosity: u64) -> Result<(), SetLoggerError> {
    let cfg = ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();
    TermLogger::init(
        level_for(verbosity),
        cfg,
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
}
