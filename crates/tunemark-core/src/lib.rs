pub mod config;
pub mod logging;

// Core modules
pub mod driver;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod sanitize;
pub mod store;
pub mod tag;
pub mod tools;
pub mod walk;
