pub mod config;
pub mod error;
pub mod linking;
pub mod pipeline;
pub mod records;
pub mod source;
