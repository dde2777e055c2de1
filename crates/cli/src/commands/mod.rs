pub mod analyze;
pub mod resolve;
pub mod rules;
pub mod util;

pub use analyze::*;
pub use resolve::*;
pub use rules::*;
pub use util::*;
