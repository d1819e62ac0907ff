pub mod command_line;
pub mod quick_add;

pub use command_line::split_line;
pub use quick_add::{QuickAddError, parse_quick_add};
