pub mod preview;
pub mod smtp;
