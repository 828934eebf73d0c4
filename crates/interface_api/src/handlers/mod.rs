//! Request handlers

pub mod company;
pub mod health;
pub mod supplier;
