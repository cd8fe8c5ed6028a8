mod path_ext;

pub use path_ext::{BestEffortPathExt, normalize_path, relative_path, to_slash_string};
