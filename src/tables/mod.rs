//! Summary tables: a format-independent view, and writers for CSV,
//! LaTeX, Excel and the terminal.

pub mod csv_table_view;
pub mod excel_table_view;
pub mod latex_table_view;
pub mod speedup;
pub mod table_view;
pub mod terminal_table;
