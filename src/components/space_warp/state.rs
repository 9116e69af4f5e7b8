//! Simulation state for the starfield.
//!
//! [`ParticleField`] owns everything the animation needs between frames: the
//! particle pool, the viewport, the pointer and the random source. Host events
//! and the frame callback mutate it through its methods; nothing here touches
//! the DOM, so the whole simulation runs in plain unit tests.

use rand::Rng;
use rand::rngs::SmallRng;

use super::config::FieldConfig;
use super::particles::Particle;
use super::theme::Theme;

/// Canvas dimensions and the population they call for.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
	/// Device pixel ratio of the backing store.
	pub dpr: f64,
	/// Horizontal view center.
	pub cx: f64,
	/// Vertical view center.
	pub cy: f64,
	/// Population the field converges to.
	pub target_count: usize,
}

impl ViewState {
	/// Sanitizes the dimensions and derives the center and target count.
	pub fn new(width: f64, height: f64, dpr: f64, config: &FieldConfig) -> Self {
		let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
		let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
		let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
		Self {
			width,
			height,
			dpr,
			cx: width / 2.0,
			cy: height / 2.0,
			target_count: config.target_count(width, height),
		}
	}

	/// Backing store size in device pixels.
	pub fn buffer_size(&self) -> (u32, u32) {
		(
			(self.width * self.dpr).round() as u32,
			(self.height * self.dpr).round() as u32,
		)
	}

	/// Whether a screen point lies inside the view grown by `margin` on every side.
	pub fn contains(&self, x: f64, y: f64, margin: f64) -> bool {
		x >= -margin && x <= self.width + margin && y >= -margin && y <= self.height + margin
	}
}

/// Last known pointer state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PointerState {
	/// Position in CSS pixels relative to the canvas.
	pub x: f64,
	/// Vertical position in CSS pixels.
	pub y: f64,
	/// Mouse button or modifier held: pull particles in instead of pushing.
	pub attract: bool,
	/// Simulation time of the last move.
	pub last_move_at: Option<f64>,
}

impl PointerState {
	/// Whether the pointer moved within `timeout` seconds of `now`.
	pub fn is_active(&self, now: f64, timeout: f64) -> bool {
		self.last_move_at.is_some_and(|t| now - t <= timeout)
	}

	/// Screen displacement for a particle `dist` pixels away from the pointer.
	///
	/// Strongest at the pointer and fading linearly to zero at the interaction
	/// radius. Positive pushes away, negative pulls in. `None` outside the radius.
	pub fn signed_force(&self, dist: f64, config: &FieldConfig) -> Option<f64> {
		if !(dist < config.pointer_radius) {
			return None;
		}
		let magnitude = (1.0 - dist / config.pointer_radius) * config.pointer_force;
		Some(if self.attract { -magnitude } else { magnitude })
	}
}

/// The particle field and everything it reacts to.
///
/// Generic over the random source so tests can drive it with a seeded RNG.
pub struct ParticleField<R = SmallRng> {
	particles: Vec<Particle>,
	config: FieldConfig,
	theme: Theme,
	view: ViewState,
	pointer: PointerState,
	/// Seconds of simulated time (sum of clamped tick lengths).
	clock: f64,
	last_burst_at: Option<f64>,
	rng: R,
}

impl<R> ParticleField<R> {
	/// Live particles in draw order.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Current population.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether the field holds no particles.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Sanitized configuration in effect.
	pub fn config(&self) -> &FieldConfig {
		&self.config
	}

	/// Resolved colors and glow settings.
	pub fn theme(&self) -> &Theme {
		&self.theme
	}

	/// Current viewport.
	pub fn view(&self) -> &ViewState {
		&self.view
	}

	/// Last known pointer state.
	pub fn pointer(&self) -> &PointerState {
		&self.pointer
	}

	/// Seconds of simulated time so far.
	pub fn clock(&self) -> f64 {
		self.clock
	}
}

impl<R: Rng> ParticleField<R> {
	/// Builds a full field for a viewport of `width` x `height` CSS pixels.
	pub fn new(config: FieldConfig, width: f64, height: f64, dpr: f64, mut rng: R) -> Self {
		let config = config.sanitized();
		let theme = config.theme();
		let view = ViewState::new(width, height, dpr, &config);

		let particles = (0..view.target_count)
			.map(|_| Particle::spawn_visible(&config, &view, &theme.palette, &mut rng))
			.collect();

		Self {
			particles,
			config,
			theme,
			view,
			pointer: PointerState::default(),
			clock: 0.0,
			last_burst_at: None,
			rng,
		}
	}

	/// Adopts new viewport dimensions.
	///
	/// Particles are kept as they are; the population converges to the new
	/// target over the following ticks.
	pub fn on_resize(&mut self, width: f64, height: f64, dpr: f64) {
		self.view = ViewState::new(width, height, dpr, &self.config);
	}

	/// Tracks the pointer and, at most once per cooldown, spawns a small
	/// burst of particles around it.
	pub fn on_pointer_move(&mut self, x: f64, y: f64) {
		self.pointer.x = x;
		self.pointer.y = y;
		self.pointer.last_move_at = Some(self.clock);

		let cooldown = self.config.burst_cooldown;
		let now = self.clock;
		if self.last_burst_at.is_some_and(|t| now - t < cooldown) {
			return;
		}

		let room = self.config.max_count.saturating_sub(self.particles.len());
		let burst = self.config.burst_size.min(room);
		if burst == 0 {
			return;
		}
		self.last_burst_at = Some(now);
		for _ in 0..burst {
			self.particles.push(Particle::spawn_near(
				x,
				y,
				&self.config,
				&self.view,
				&self.theme.palette,
				&mut self.rng,
			));
		}
	}

	/// Switches between repelling (released) and attracting (pressed).
	pub fn on_modifier_toggle(&mut self, pressed: bool) {
		self.pointer.attract = pressed;
	}

	/// Advances the simulation by `elapsed` seconds.
	///
	/// The step is clamped to `max_frame_dt` so a stalled tab does not make
	/// the field jump.
	pub fn tick(&mut self, elapsed: f64) {
		let dt = if elapsed.is_finite() {
			elapsed.clamp(0.0, self.config.max_frame_dt)
		} else {
			0.0
		};
		self.clock += dt;
		let pointer_active = self
			.pointer
			.is_active(self.clock, self.config.pointer_timeout);

		let mut i = 0;
		while i < self.particles.len() {
			let alive =
				self.particles[i].advance(dt, &self.config, &self.view, &mut self.rng);
			if !alive {
				if self.particles.len() > self.view.target_count {
					// The swapped-in particle has not been advanced yet.
					self.particles.swap_remove(i);
					continue;
				}
				self.particles[i].respawn(
					&self.config,
					&self.view,
					&self.theme.palette,
					&mut self.rng,
				);
			}
			if pointer_active {
				self.particles[i].apply_pointer(&self.pointer, &self.config);
			}
			i += 1;
		}

		while self.particles.len() < self.view.target_count {
			self.particles.push(Particle::spawn_far(
				&self.config,
				&self.view,
				&self.theme.palette,
				&mut self.rng,
			));
		}
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;

	use super::*;

	fn field(width: f64, height: f64, seed: u64) -> ParticleField<SmallRng> {
		ParticleField::new(
			FieldConfig::default(),
			width,
			height,
			1.0,
			SmallRng::seed_from_u64(seed),
		)
	}

	#[test]
	fn initial_population_follows_area() {
		let f = field(1024.0, 768.0, 1);
		assert_eq!(f.len(), 393);
		assert_eq!(f.view().target_count, 393);
		assert_eq!(field(10.0, 10.0, 1).len(), 150);
		assert_eq!(field(4000.0, 3000.0, 1).len(), 600);
	}

	#[test]
	fn depth_stays_in_bounds() {
		let mut f = field(1280.0, 720.0, 2);
		let (near, far) = (f.config().near_depth, f.config().max_depth);
		for step in 0..600 {
			// Mix of normal frames, stalls and bogus timestamps.
			let dt = match step % 7 {
				0 => 1.5,
				1 => -0.2,
				2 => f64::NAN,
				_ => 0.016,
			};
			f.tick(dt);
			for p in f.particles() {
				assert!(p.z > near && p.z <= far, "z = {}", p.z);
			}
		}
	}

	#[test]
	fn population_stays_in_bounds_under_pointer_spam() {
		let mut f = field(1024.0, 768.0, 3);
		let (min, max) = (f.config().min_count, f.config().max_count);
		for step in 0..400 {
			for k in 0..5 {
				f.on_pointer_move(100.0 + k as f64, 200.0 + step as f64 % 300.0);
			}
			f.tick(0.016);
			assert!(f.len() >= min && f.len() <= max, "len = {}", f.len());
		}
	}

	#[test]
	fn bursts_respect_cooldown_and_ceiling() {
		let mut f = field(1024.0, 768.0, 4);
		let start = f.len();
		f.on_pointer_move(10.0, 10.0);
		assert_eq!(f.len(), start + f.config().burst_size);
		// Same simulated instant: still cooling down.
		f.on_pointer_move(12.0, 10.0);
		assert_eq!(f.len(), start + f.config().burst_size);

		let mut full = field(4000.0, 3000.0, 4);
		assert_eq!(full.len(), full.config().max_count);
		full.on_pointer_move(10.0, 10.0);
		assert_eq!(full.len(), full.config().max_count);
	}

	#[test]
	fn seeded_runs_are_identical() {
		let mut a = field(900.0, 700.0, 42);
		let mut b = field(900.0, 700.0, 42);
		for step in 0..200 {
			if step == 50 {
				a.on_pointer_move(300.0, 300.0);
				b.on_pointer_move(300.0, 300.0);
			}
			let dt = 0.010 + (step % 5) as f64 * 0.004;
			a.tick(dt);
			b.tick(dt);
		}
		assert_eq!(a.particles(), b.particles());
		assert_eq!(a.pointer(), b.pointer());
	}

	#[test]
	fn force_sign_follows_modifier() {
		let mut f = field(1024.0, 768.0, 5);
		f.on_pointer_move(512.0, 384.0);
		f.on_modifier_toggle(true);
		let cfg = f.config().clone();
		let mut in_range = 0;
		for p in f.particles() {
			let dist = (p.sx - 512.0).hypot(p.sy - 384.0);
			if let Some(force) = f.pointer().signed_force(dist, &cfg) {
				assert!(force < 0.0);
				in_range += 1;
			}
		}
		assert!(in_range > 0);

		f.on_modifier_toggle(false);
		for p in f.particles() {
			let dist = (p.sx - 512.0).hypot(p.sy - 384.0);
			if let Some(force) = f.pointer().signed_force(dist, &cfg) {
				assert!(force > 0.0);
			}
		}
		assert_eq!(f.pointer().signed_force(cfg.pointer_radius, &cfg), None);
	}

	#[test]
	fn stale_pointer_goes_quiet() {
		let mut f = field(1024.0, 768.0, 6);
		f.on_pointer_move(512.0, 384.0);
		let timeout = f.config().pointer_timeout;
		assert!(f.pointer().is_active(f.clock(), timeout));
		for _ in 0..((timeout / 0.05) as usize + 2) {
			f.tick(0.05);
		}
		assert!(!f.pointer().is_active(f.clock(), timeout));
		assert!(!PointerState::default().is_active(0.0, timeout));
	}

	#[test]
	fn elapsed_time_is_clamped() {
		let mut f = field(1024.0, 768.0, 7);
		let before: Vec<f64> = f.particles().iter().map(|p| p.z).collect();
		f.tick(10.0);
		assert!((f.clock() - f.config().max_frame_dt).abs() < 1e-12);
		let cfg = f.config();
		let max_step = (cfg.speed_base + cfg.speed_var) * cfg.max_frame_dt * 60.0;
		for (p, z0) in f.particles().iter().zip(before) {
			if p.respawns == 0 {
				assert!(z0 - p.z <= max_step + 1e-9);
			}
		}
	}

	#[test]
	fn resize_grows_and_shrinks_population() {
		let mut f = field(800.0, 600.0, 8);
		assert_eq!(f.len(), 240);

		f.on_resize(1600.0, 1200.0, 2.0);
		assert_eq!(f.view().target_count, 600);
		assert_eq!(f.view().buffer_size(), (3200, 2400));
		f.tick(0.016);
		assert_eq!(f.len(), 600);

		f.on_resize(800.0, 600.0, 1.0);
		assert_eq!(f.view().target_count, 240);
		for _ in 0..2000 {
			f.tick(0.05);
			assert!(f.len() >= 240 && f.len() <= 600);
		}
		assert_eq!(f.len(), 240);
	}

	#[test]
	fn degenerate_viewports_are_sanitized() {
		let cfg = FieldConfig::default();
		let view = ViewState::new(f64::NAN, -5.0, 0.0, &cfg);
		assert_eq!((view.width, view.height, view.dpr), (0.0, 0.0, 1.0));
		assert_eq!(view.target_count, cfg.min_count);
	}
}
