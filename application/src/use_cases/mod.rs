//! Use cases (application services)
//!
//! Each use case orchestrates domain objects and ports to fulfil one
//! user-facing capability.

pub mod dial_turn;
