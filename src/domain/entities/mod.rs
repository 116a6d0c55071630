pub mod article;
pub mod report;
pub mod trend;
