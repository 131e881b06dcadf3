pub mod error;
pub mod runtime;
pub mod view_model;
