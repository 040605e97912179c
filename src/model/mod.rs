pub mod correlate;
pub mod data_core;
pub mod flatten;
pub mod path;
pub mod performance;
pub mod rebuild;
pub mod text_filter;
