pub mod csv;

pub use self::csv::{read_csv, read_csv_from_str};
