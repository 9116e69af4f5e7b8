//! Tunable parameters for the starfield.
//!
//! Every value has a compiled-in default. A page can override any subset of
//! them with a JSON document; missing fields keep their defaults.

use serde::Deserialize;

use super::theme::{Color, Palette, Theme};

/// Guards divisions by distances that can approach zero.
pub const EPSILON: f64 = 1e-6;

/// Ceiling for non-negative tunables; keeps sampled ranges and sums finite.
const MAX_TUNABLE: f64 = 1e9;

/// Simulation and styling parameters.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
	/// Lower bound for the population.
	pub min_count: usize,
	/// Hard ceiling for the population, bursts included.
	pub max_count: usize,
	/// Viewport area (CSS px²) per particle when deriving the target count.
	pub area_per_particle: f64,

	/// Far plane; particles spawn here when recycled.
	pub max_depth: f64,
	/// Near plane; particles reaching it are recycled.
	pub near_depth: f64,
	/// Projection factor: `scale = fov / z`.
	pub fov: f64,
	/// Minimum depth travelled per 60 Hz frame.
	pub speed_base: f64,
	/// Random extra depth speed on top of `speed_base`.
	pub speed_var: f64,
	/// Spawn spread as a multiple of the viewport size.
	pub spawn_spread: f64,

	/// Smallest particle radius before projection.
	pub size_min: f64,
	/// Random extra radius on top of `size_min`.
	pub size_var: f64,
	/// How quickly particles fade in as they leave the far plane.
	pub fade_in: f64,

	/// CSS colors particles are drawn from.
	pub palette: Vec<String>,
	/// CSS background fill.
	pub background: String,
	/// Draw radial halos around dot particles.
	pub glow: bool,

	/// Probability that a spawned particle may render as a streak.
	pub streak_chance: f64,
	/// Minimum stretch before a streak particle renders as a line.
	pub streak_threshold: f64,
	/// Stretch per unit of `scale * distance_from_center`.
	pub stretch_factor: f64,
	/// Longest streak tail in CSS px.
	pub max_tail: f64,

	/// Interaction radius around the pointer in CSS px.
	pub pointer_radius: f64,
	/// Displacement at the pointer itself, fading to zero at the radius.
	pub pointer_force: f64,
	/// Seconds after the last pointer move during which it still acts.
	pub pointer_timeout: f64,
	/// Particles spawned per pointer burst.
	pub burst_size: usize,
	/// Minimum seconds between bursts.
	pub burst_cooldown: f64,

	/// Ceiling applied to the elapsed time of a single tick.
	pub max_frame_dt: f64,
	/// Random drift acceleration per second.
	pub jitter: f64,
	/// Drift speed ceiling in world units per 60 Hz frame.
	pub max_drift: f64,
	/// Outward drift from the view center in world units per 60 Hz frame.
	/// Projection magnifies it by `fov / z`, so near particles spread faster.
	pub radial_force: f64,
	/// Off-screen allowance before a particle is recycled.
	pub edge_margin: f64,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			min_count: 150,
			max_count: 600,
			area_per_particle: 2000.0,
			max_depth: 1000.0,
			near_depth: 1.0,
			fov: 300.0,
			speed_base: 2.0,
			speed_var: 3.0,
			spawn_spread: 2.0,
			size_min: 0.8,
			size_var: 2.0,
			fade_in: 3.0,
			palette: vec!["#00FFFF".into(), "#1E90FF".into(), "#9400D3".into()],
			background: "#000000".into(),
			glow: false,
			streak_chance: 0.2,
			streak_threshold: 1.5,
			stretch_factor: 0.02,
			max_tail: 150.0,
			pointer_radius: 250.0,
			pointer_force: 80.0,
			pointer_timeout: 2.5,
			burst_size: 3,
			burst_cooldown: 0.05,
			max_frame_dt: 0.1,
			jitter: 0.3,
			max_drift: 0.5,
			radial_force: 0.15,
			edge_margin: 50.0,
		}
	}
}

impl FieldConfig {
	/// Parses a (possibly partial) JSON override.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str::<FieldConfig>(json).map(FieldConfig::sanitized)
	}

	/// Repairs values that would break the simulation invariants.
	pub fn sanitized(mut self) -> Self {
		let defaults = FieldConfig::default();

		if self.max_count == 0 {
			self.max_count = defaults.max_count;
		}
		self.min_count = self.min_count.min(self.max_count);
		if !(self.area_per_particle > 0.0 && self.area_per_particle.is_finite()) {
			self.area_per_particle = defaults.area_per_particle;
		}
		if !(self.near_depth > 0.0 && self.near_depth <= MAX_TUNABLE) {
			self.near_depth = defaults.near_depth;
		}
		if !(self.max_depth > self.near_depth && self.max_depth <= MAX_TUNABLE) {
			self.max_depth = self.near_depth + defaults.max_depth;
		}
		if !(self.fov > 0.0 && self.fov <= MAX_TUNABLE) {
			self.fov = defaults.fov;
		}
		for v in [
			&mut self.speed_base,
			&mut self.fade_in,
			&mut self.stretch_factor,
			&mut self.streak_threshold,
			&mut self.speed_var,
			&mut self.size_min,
			&mut self.size_var,
			&mut self.spawn_spread,
			&mut self.jitter,
			&mut self.max_drift,
			&mut self.radial_force,
			&mut self.pointer_radius,
			&mut self.pointer_force,
			&mut self.pointer_timeout,
			&mut self.burst_cooldown,
			&mut self.max_frame_dt,
			&mut self.edge_margin,
			&mut self.max_tail,
		] {
			*v = if v.is_finite() { v.clamp(0.0, MAX_TUNABLE) } else { 0.0 };
		}
		self.streak_chance = if self.streak_chance.is_finite() {
			self.streak_chance.clamp(0.0, 1.0)
		} else {
			defaults.streak_chance
		};
		self
	}

	/// Population the field converges to for a viewport of the given CSS size.
	pub fn target_count(&self, width: f64, height: f64) -> usize {
		let area = (width * height).max(0.0);
		let count = (area / self.area_per_particle).floor() as usize;
		count.clamp(self.min_count, self.max_count.max(self.min_count))
	}

	/// Resolves the styling fields into a [`Theme`].
	pub fn theme(&self) -> Theme {
		Theme {
			background: Color::parse(&self.background).unwrap_or(Color::rgb(0, 0, 0)),
			palette: Palette::from_css(&self.palette),
			glow: self.glow,
			..Theme::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn target_count_is_clamped_and_monotonic() {
		let cfg = FieldConfig::default();
		assert_eq!(cfg.target_count(1024.0, 768.0), 393);
		let small = cfg.target_count(800.0, 600.0);
		let large = cfg.target_count(1600.0, 1200.0);
		assert!(large > small);
		assert_eq!(large, 600);
		assert_eq!(cfg.target_count(100.0, 100.0), 150);
		assert_eq!(cfg.target_count(0.0, 0.0), 150);
	}

	#[test]
	fn partial_json_keeps_other_defaults() {
		let cfg = FieldConfig::from_json(r##"{ "max_count": 300, "palette": ["#ff0000"] }"##)
			.unwrap();
		assert_eq!(cfg.max_count, 300);
		assert_eq!(cfg.palette, vec!["#ff0000".to_string()]);
		assert_eq!(cfg.fov, FieldConfig::default().fov);
		assert_eq!(cfg.theme().palette.colors, vec![Color::rgb(255, 0, 0)]);
	}

	#[test]
	fn rejects_malformed_json() {
		assert!(FieldConfig::from_json("{ not json").is_err());
	}

	#[test]
	fn sanitizing_restores_invariants() {
		let cfg = FieldConfig {
			min_count: 900,
			max_count: 100,
			near_depth: -4.0,
			max_depth: 0.5,
			streak_chance: 7.0,
			speed_var: -1.0,
			jitter: 1e308,
			..FieldConfig::default()
		}
		.sanitized();
		assert_eq!(cfg.min_count, 100);
		assert!(cfg.near_depth > 0.0);
		assert!(cfg.max_depth > cfg.near_depth);
		assert_eq!(cfg.streak_chance, 1.0);
		assert_eq!(cfg.speed_var, 0.0);
		assert_eq!(cfg.jitter, MAX_TUNABLE);
	}

	#[test]
	fn huge_overrides_are_capped() {
		let cfg = FieldConfig::from_json(
			r#"{ "jitter": 1e308, "speed_var": 1e308, "size_var": 1e308, "fov": 1e308, "max_depth": 1e308 }"#,
		)
		.unwrap();
		for v in [cfg.jitter, cfg.speed_var, cfg.size_var, cfg.fov, cfg.max_depth] {
			assert!(v.is_finite() && v <= MAX_TUNABLE, "{v}");
			assert!((2.0 * v).is_finite());
		}
		assert!(cfg.max_depth > cfg.near_depth);
	}

	#[test]
	fn bad_background_falls_back_to_black() {
		let cfg = FieldConfig {
			background: "not-a-color".into(),
			..FieldConfig::default()
		};
		assert_eq!(cfg.theme().background, Color::rgb(0, 0, 0));
	}
}
