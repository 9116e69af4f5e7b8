//! Space-warp starfield background.
//!
//! Particles stream toward the viewer from a far depth plane, are projected
//! onto a canvas, and glow with additive blending:
//! - Depth-based projection with fade-in from the far plane
//! - Streaks for particles that move fast on screen
//! - Pointer interaction: repel by default, attract while a button or Alt is held
//! - Population scaled to the viewport area
//!
//! The simulation ([`ParticleField`]) is independent of the DOM and takes its
//! randomness from an injected [`rand::Rng`].
//!
//! # Example
//!
//! ```ignore
//! use space_warp::{FieldConfig, SpaceWarpCanvas};
//!
//! view! { <SpaceWarpCanvas config=FieldConfig { glow: true, ..Default::default() } /> }
//! ```

mod component;
pub mod config;
mod driver;
mod particles;
mod render;
mod state;
pub mod theme;

pub use component::{DEFAULT_CANVAS_ID, SpaceWarpCanvas};
pub use config::FieldConfig;
pub use driver::attach;
pub use particles::{Particle, Sprite};
pub use render::render;
pub use state::{ParticleField, PointerState, ViewState};
pub use theme::Theme;
