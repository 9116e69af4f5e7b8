//! UI components.

pub mod space_warp;
