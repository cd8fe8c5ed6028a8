mod record;
mod signals;

pub use record::{Contents, Record};
pub use signals::ContentSignals;
