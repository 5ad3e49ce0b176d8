pub mod annotate;
pub mod merge;
pub mod resolve;

pub use annotate::*;
pub use merge::*;
pub use resolve::*;
