pub mod fixed_interval;
