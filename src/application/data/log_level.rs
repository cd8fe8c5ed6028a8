use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;

/// Verbosity of the diagnostics written to stderr.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Silent => LevelFilter::OFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(LogLevel::Debug, LevelFilter::DEBUG)]
    #[case(LogLevel::Warn, LevelFilter::WARN)]
    #[case(LogLevel::Silent, LevelFilter::OFF)]
    fn maps_to_level_filter(#[case] level: LogLevel, #[case] expected: LevelFilter) {
        assert_eq!(LevelFilter::from(level), expected);
    }

    #[test]
    fn parses_from_the_command_line_spelling() {
        assert_eq!(LogLevel::from_str("silent", true), Ok(LogLevel::Silent));
    }
}
