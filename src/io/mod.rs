//! File output for evaluation and optimizer results.

pub mod export;
