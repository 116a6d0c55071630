pub mod response_format;
pub mod sentiment;
pub mod ticker;
pub mod trend_status;
