//! File state helpers

pub mod wait;
