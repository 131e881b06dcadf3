//! # Domain Models
//!
//! Pure data shared by every Wayfinder crate, with minimal dependencies (`serde`, `bitflags`).
//! Keep it lean: no I/O, channels, or navigation logic. Just data and simple helpers.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod features;
