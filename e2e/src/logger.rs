use fern::colors::{Color, ColoredLevelConfig};
use log::{LevelFilter, SetLoggerError};

/// Install a stdout logger, `module` is logged at `level` and every other crate at warn
pub fn init_logger(module: &str, level: LevelFilter, disable_color: bool) -> Result<(), SetLoggerError> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Cyan)
        .trace(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
            if disable_color {
                out.finish(format_args!(
                    "{} [{:>5}] [{}] {}",
                    timestamp,
                    record.level(),
                    record.target(),
                    message
                ))
            } else {
                out.finish(format_args!(
                    "{} [{:>5}] [{}] {}",
                    timestamp,
                    colors.color(record.level()),
                    record.target(),
                    message
                ))
            }
        })
        .level(LevelFilter::Warn)
        .level_for(module.to_string(), level)
        .level_for("huobi_e2e", level)
        .level_for("huobi_common", level)
        .chain(std::io::stdout())
        .apply()
}
