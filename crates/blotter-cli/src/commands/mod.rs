//! Command implementations for the blotter CLI

mod curl;
mod render;

pub use curl::execute as print_curl;
pub use render::execute as render;
