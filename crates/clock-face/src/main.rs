use clock_engine::logging::{init_logging, LoggingConfig};
use clock_face::ClockConfig;

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = clock_face::run(ClockConfig::default()) {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
