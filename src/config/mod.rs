mod options_file;

pub use options_file::{OptionsFile, OptionsFileError};
