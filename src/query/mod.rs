pub mod board;
pub mod dashboard;
pub mod filter;
pub mod group;

pub use board::*;
pub use dashboard::*;
pub use filter::*;
pub use group::*;
