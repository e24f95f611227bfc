pub mod aggregate_model;
pub mod aggregator;
pub mod coverage;
pub mod junit_parser;
