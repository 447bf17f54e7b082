//! CLI command implementations

pub mod check;
pub mod fetch;
pub mod init;
pub mod submit;
pub mod validate;
