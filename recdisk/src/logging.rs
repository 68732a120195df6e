use env_logger::Target;
use log::LevelFilter;

/// Logs go to stderr; stdout carries the command output parsed by the recording UI.
/// `RUST_LOG` overrides the default `info` level.
pub fn init() {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(Target::Stderr)
        .init();
}
