mod log_level;
mod read_mode;

pub use log_level::LogLevel;
pub use read_mode::ReadMode;
