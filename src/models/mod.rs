pub mod period;
pub mod session;
pub mod stats;

pub use period::*;
pub use session::*;
pub use stats::*;
