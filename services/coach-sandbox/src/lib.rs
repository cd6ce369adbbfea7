pub mod batch_file;
pub mod tui;
