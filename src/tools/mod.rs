pub mod reload;
pub mod search;
pub mod stats;

pub use reload::*;
pub use search::*;
pub use stats::*;
