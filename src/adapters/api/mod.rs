//! GO API adapter

pub mod client;
pub mod models;

pub use client::{GoApi, GoApiClient};
pub use models::{ListResponse, SessionBundle};
