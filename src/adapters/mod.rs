//! External system adapters
//!
//! Boundary code that talks to the GO server. Domain and form logic never
//! import from here; commands wire the two together.

pub mod api;
