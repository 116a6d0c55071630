pub mod analysis_model;
pub mod ledger;
pub mod news_source;
pub mod pacer;
pub mod price_history;
pub mod report_delivery;
pub mod report_parser;
