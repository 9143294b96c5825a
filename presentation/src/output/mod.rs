//! Output formatting for replay results

pub mod console;
pub mod formatter;
pub mod view;
