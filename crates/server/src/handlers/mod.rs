//! Request handlers for the gateway endpoints.

pub mod ask;
pub mod health;
