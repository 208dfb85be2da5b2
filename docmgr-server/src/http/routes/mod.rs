//! Route handlers

pub mod docs;
pub mod health;
