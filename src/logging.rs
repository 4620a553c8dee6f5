//! Log backend setup.
//!
//! The library only uses the `log` macros; the binary installs `log4rs`.
//! stdout carries filter output, so the default appender writes to stderr.

use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::error::Error;
use std::path::Path;

const STDERR_PATTERN: &str = "{d(%H:%M:%S)} {h({l:5})} {t} - {m}{n}";

/// Build the default stderr-only configuration.
pub fn stderr_config(level: log::LevelFilter) -> Result<Config, Box<dyn Error>> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(STDERR_PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))?;
    Ok(config)
}

/// Install the global logger, from a YAML file when one is given.
pub fn init(level: log::LevelFilter, config_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    match config_file {
        Some(path) => {
            log4rs::init_file(path, Default::default())
                .map_err(|e| format!("Error initializing log4rs from {}: {e}", path.display()))?;
        }
        None => {
            log4rs::init_config(stderr_config(level)?)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stderr_config_builds() {
        let config = stderr_config(log::LevelFilter::Warn).unwrap();
        assert_eq!(config.root().level(), log::LevelFilter::Warn);
        assert_eq!(config.appenders().len(), 1);
    }
}
