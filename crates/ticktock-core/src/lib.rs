pub mod clock;
pub mod error;
pub mod format;
pub mod models;
pub mod storage;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use error::{Error, Result};
