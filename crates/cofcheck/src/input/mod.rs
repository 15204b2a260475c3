//! Table input handling.

mod parser;
mod table;

pub use parser::TableReader;
pub use table::DataTable;
