pub mod csv;
pub mod models;

pub use self::csv::{read_rows, write_rows_atomic};
