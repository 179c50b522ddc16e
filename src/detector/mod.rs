pub mod change;

pub use change::{changed_rows, is_changed};
