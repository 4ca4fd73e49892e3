/// Initializes the env_logger backend for the `log` facade.
///
/// `RUST_LOG` still refines the filter; `verbose` only moves the default.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .parse_default_env()
        .init();
}
