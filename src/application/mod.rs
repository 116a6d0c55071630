pub mod articles;
pub mod enrich;
pub mod parsing;
pub mod prompt;
pub mod render;
pub mod run_scan;
