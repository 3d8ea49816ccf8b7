//! Metric bucketing and health scoring.
//!
//! This module groups a batch of metric samples into seven independent
//! time-window views, reduces each non-empty bucket to a bounded health
//! score, and assembles the nested report returned to the caller.

pub mod bucket;
pub mod report;
pub mod score;
pub mod utility;
pub mod windows;
