//! Platform paths.

pub mod xdg;
