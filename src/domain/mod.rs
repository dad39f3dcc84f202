// News article domain
pub mod article;

// Domain-specific error types
pub mod errors;

// Time-indexed tabular data
pub mod frame;

// Port interfaces
pub mod ports;
