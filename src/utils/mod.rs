pub mod parameter_error_handler;
pub mod table;

pub use parameter_error_handler::{json_error_handler, path_error_handler, query_error_handler};
pub use table::{DataTable, ExportOptions, SortDirection, export_csv, export_json};
