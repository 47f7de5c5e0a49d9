//! Application services.

pub mod credential;
