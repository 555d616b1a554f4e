//! HTTP Routes

pub mod diagnose;
