pub mod agent;
pub mod config;
pub mod parsers;
pub mod staging;
