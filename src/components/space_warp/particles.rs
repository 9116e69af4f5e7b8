//! Particles streaming toward the viewer.
//!
//! Positions live in world space relative to the view center; `z` is the
//! distance along the view axis. Each frame a particle moves closer, drifts a
//! little, and is projected onto the screen with `scale = fov / z`.

use rand::Rng;

use super::config::{EPSILON, FieldConfig};
use super::state::{PointerState, ViewState};
use super::theme::{Color, Palette};

/// Screen offset range (CSS px) around the pointer for burst spawns.
const BURST_SCATTER: f64 = 24.0;

/// A single point or streak of light.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// World-space offset from the view center.
	pub x: f64,
	/// World-space vertical offset from the view center.
	pub y: f64,
	/// Depth; larger is farther away.
	pub z: f64,
	/// Drift velocity in world units per 60 Hz frame.
	pub vx: f64,
	/// Vertical drift velocity.
	pub vy: f64,
	/// Depth travelled per 60 Hz frame.
	pub speed: f64,
	/// Radius before projection.
	pub size: f64,
	/// Palette entry picked at spawn.
	pub color: Color,
	/// Fade-in opacity, 0 on the far plane.
	pub alpha: f64,
	/// Eligible to render as a line when moving fast on screen.
	pub is_streak: bool,
	/// Projected screen position, pointer displacement included.
	pub sx: f64,
	/// Projected vertical screen position.
	pub sy: f64,
	/// Projection scale from the last update.
	pub scale: f64,
	/// Number of times this particle has been recycled.
	pub respawns: u32,
}

/// How a particle is drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sprite {
	/// Filled disc.
	Dot { x: f64, y: f64, radius: f64 },
	/// Round-capped line from the particle back toward the view center.
	Streak {
		x: f64,
		y: f64,
		tail_x: f64,
		tail_y: f64,
		width: f64,
	},
}

impl Particle {
	/// Spawns at a random depth somewhere inside the visible rectangle.
	///
	/// Used to seed the field so it starts full instead of filling up from the
	/// far plane.
	pub fn spawn_visible<R: Rng + ?Sized>(
		config: &FieldConfig,
		view: &ViewState,
		palette: &Palette,
		rng: &mut R,
	) -> Self {
		let z = random_depth(config, rng);
		let scale = config.fov / z;
		let sx = rng.random::<f64>() * view.width;
		let sy = rng.random::<f64>() * view.height;
		Self::fresh(
			(sx - view.cx) / scale,
			(sy - view.cy) / scale,
			z,
			config,
			view,
			palette,
			rng,
		)
	}

	/// Spawns on the far plane, spread over a wide cone around the view axis.
	pub fn spawn_far<R: Rng + ?Sized>(
		config: &FieldConfig,
		view: &ViewState,
		palette: &Palette,
		rng: &mut R,
	) -> Self {
		// Wide spread so the field does not clump at the center.
		let x = (rng.random::<f64>() - 0.5) * view.width * config.spawn_spread;
		let y = (rng.random::<f64>() - 0.5) * view.height * config.spawn_spread;
		Self::fresh(x, y, config.max_depth, config, view, palette, rng)
	}

	/// Spawns at a random depth, projected close to a screen position.
	pub fn spawn_near<R: Rng + ?Sized>(
		sx: f64,
		sy: f64,
		config: &FieldConfig,
		view: &ViewState,
		palette: &Palette,
		rng: &mut R,
	) -> Self {
		let z = random_depth(config, rng);
		let scale = config.fov / z;
		let sx = sx + rng.random_range(-BURST_SCATTER..=BURST_SCATTER);
		let sy = sy + rng.random_range(-BURST_SCATTER..=BURST_SCATTER);
		Self::fresh(
			(sx - view.cx) / scale,
			(sy - view.cy) / scale,
			z,
			config,
			view,
			palette,
			rng,
		)
	}

	fn fresh<R: Rng + ?Sized>(
		x: f64,
		y: f64,
		z: f64,
		config: &FieldConfig,
		view: &ViewState,
		palette: &Palette,
		rng: &mut R,
	) -> Self {
		let mut p = Self {
			x,
			y,
			z,
			vx: 0.0,
			vy: 0.0,
			speed: config.speed_base + rng.random_range(0.0..=config.speed_var),
			size: config.size_min + rng.random_range(0.0..=config.size_var),
			color: palette.get(rng.random_range(0..palette.len())),
			alpha: 0.0,
			is_streak: rng.random_bool(config.streak_chance),
			sx: view.cx,
			sy: view.cy,
			scale: 0.0,
			respawns: 0,
		};
		p.project(config, view);
		p
	}

	/// Replaces this particle with a fresh one on the far plane.
	pub fn respawn<R: Rng + ?Sized>(
		&mut self,
		config: &FieldConfig,
		view: &ViewState,
		palette: &Palette,
		rng: &mut R,
	) {
		let respawns = self.respawns.saturating_add(1);
		*self = Self::spawn_far(config, view, palette, rng);
		self.respawns = respawns;
	}

	/// Advances the particle by `dt` seconds.
	///
	/// Returns `false` when it crossed the near plane or left the visible
	/// rectangle and must be recycled. A particle past the near plane is not
	/// projected.
	pub fn advance<R: Rng + ?Sized>(
		&mut self,
		dt: f64,
		config: &FieldConfig,
		view: &ViewState,
		rng: &mut R,
	) -> bool {
		let frames = dt * 60.0;

		self.z -= self.speed * frames;
		if self.z <= config.near_depth {
			return false;
		}

		if config.jitter > 0.0 {
			self.vx += (rng.random::<f64>() * 2.0 - 1.0) * config.jitter * dt;
			self.vy += (rng.random::<f64>() * 2.0 - 1.0) * config.jitter * dt;
		}
		let drift = self.vx.hypot(self.vy);
		if drift > config.max_drift {
			let k = config.max_drift / drift;
			self.vx *= k;
			self.vy *= k;
		}
		self.x += self.vx * frames;
		self.y += self.vy * frames;

		// Constant in world space, so on screen it grows with fov / z.
		let r = self.x.hypot(self.y) + EPSILON;
		let push = config.radial_force * frames;
		self.x += self.x / r * push;
		self.y += self.y / r * push;

		self.project(config, view);
		view.contains(self.sx, self.sy, config.edge_margin)
	}

	fn project(&mut self, config: &FieldConfig, view: &ViewState) {
		self.scale = config.fov / self.z;
		self.sx = view.cx + self.x * self.scale;
		self.sy = view.cy + self.y * self.scale;
		self.alpha = ((1.0 - self.z / config.max_depth) * config.fade_in).clamp(0.0, 1.0);
	}

	/// Pushes the projected position away from (or toward) the pointer.
	///
	/// Only the screen position moves; the world position is untouched, so the
	/// particle eases back once the pointer leaves.
	pub fn apply_pointer(&mut self, pointer: &PointerState, config: &FieldConfig) {
		let (dx, dy) = (self.sx - pointer.x, self.sy - pointer.y);
		let dist = dx.hypot(dy);
		if let Some(force) = pointer.signed_force(dist, config) {
			let inv = 1.0 / (dist + EPSILON);
			self.sx += dx * inv * force;
			self.sy += dy * inv * force;
		}
	}

	/// Apparent on-screen speed: grows with projection scale and with the
	/// distance from the view center. Never below 1.
	pub fn stretch(&self, config: &FieldConfig, view: &ViewState) -> f64 {
		let dist = (self.sx - view.cx).hypot(self.sy - view.cy);
		(self.scale * dist * config.stretch_factor).max(1.0)
	}

	/// Decides how the particle is drawn.
	pub fn sprite(&self, config: &FieldConfig, view: &ViewState) -> Sprite {
		let radius = self.size * self.scale;
		let stretch = self.stretch(config, view);

		if !(self.is_streak && stretch > config.streak_threshold) {
			return Sprite::Dot {
				x: self.sx,
				y: self.sy,
				radius,
			};
		}

		let (dx, dy) = (self.sx - view.cx, self.sy - view.cy);
		let inv = 1.0 / (dx.hypot(dy) + EPSILON);
		let tail = (radius * stretch * 2.0).min(config.max_tail);
		Sprite::Streak {
			x: self.sx,
			y: self.sy,
			tail_x: self.sx - dx * inv * tail,
			tail_y: self.sy - dy * inv * tail,
			width: radius,
		}
	}
}

/// Depth in `(near_depth, max_depth]`.
fn random_depth<R: Rng + ?Sized>(config: &FieldConfig, rng: &mut R) -> f64 {
	let t = 1.0 - rng.random::<f64>();
	config.near_depth + (config.max_depth - config.near_depth) * t
}
