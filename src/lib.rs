pub mod chart;
pub mod clap_styles;
pub mod comparison;
pub mod config_file;
pub mod extract;
pub mod get_terminal_width;
pub mod io_utils;
pub mod join;
pub mod observation;
pub mod run;
pub mod stats;
pub mod summary;
pub mod tables;
pub mod utillib;
