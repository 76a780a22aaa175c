//! Turn progress indicators

pub mod spinner;
