//! Visual theming for the starfield.
//!
//! Provides colors, the particle palette, and background/glow styling.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RGB`, `#RRGGBB`) and `rgb()`/`rgba()` functional notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let s = color_str.trim();
		if let Some(hex) = s.strip_prefix('#') {
			return match hex.len() {
				6 => Some(Color::rgb(
					u8::from_str_radix(hex.get(0..2)?, 16).ok()?,
					u8::from_str_radix(hex.get(2..4)?, 16).ok()?,
					u8::from_str_radix(hex.get(4..6)?, 16).ok()?,
				)),
				3 => {
					let digit = |i: usize| -> Option<u8> {
						let v = u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()?;
						Some(v * 17)
					};
					Some(Color::rgb(digit(0)?, digit(1)?, digit(2)?))
				}
				_ => None,
			};
		}

		let inner = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let nums: Vec<&str> = inner.split(',').map(str::trim).collect();
		if nums.len() < 3 {
			return None;
		}
		let a = match nums.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(
			nums[0].parse().ok()?,
			nums[1].parse().ok()?,
			nums[2].parse().ok()?,
			a,
		))
	}
}

/// The fixed set of colors particles are drawn from.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Cyan, deep blue and bright purple (default)
	pub fn cyberpunk() -> Self {
		Self {
			colors: vec![
				Color::rgb(0, 255, 255), // Cyan
				Color::rgb(30, 144, 255), // Dodger blue
				Color::rgb(148, 0, 211),  // Dark violet
			],
		}
	}

	/// Builds a palette from CSS color strings, skipping entries that fail to parse.
	/// Falls back to [`Palette::cyberpunk`] when nothing usable remains.
	pub fn from_css<S: AsRef<str>>(colors: &[S]) -> Self {
		let colors: Vec<Color> = colors
			.iter()
			.filter_map(|c| Color::parse(c.as_ref()))
			.collect();
		if colors.is_empty() {
			Self::cyberpunk()
		} else {
			Self { colors }
		}
	}

	pub fn get(&self, index: usize) -> Color {
		self.colors[index % self.colors.len()]
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::cyberpunk()
	}
}

/// Complete visual style for a frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	/// Solid fill painted behind the particles every frame
	pub background: Color,
	/// Particle colors
	pub palette: Palette,
	/// Draw a soft radial halo around dot particles
	pub glow: bool,
	/// Halo radius relative to the particle radius
	pub glow_radius: f64,
}

impl Default for Theme {
	fn default() -> Self {
		Self {
			background: Color::rgb(0, 0, 0),
			palette: Palette::cyberpunk(),
			glow: false,
			glow_radius: 3.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_hex_colors() {
		assert_eq!(Color::parse("#00FFFF"), Some(Color::rgb(0, 255, 255)));
		assert_eq!(Color::parse("#1e90ff"), Some(Color::rgb(30, 144, 255)));
		assert_eq!(Color::parse("#fff"), Some(Color::rgb(255, 255, 255)));
		assert_eq!(Color::parse("#12345"), None);
		assert_eq!(Color::parse("#zzzzzz"), None);
	}

	#[test]
	fn parses_functional_colors() {
		assert_eq!(
			Color::parse("rgb(10, 20, 30)"),
			Some(Color::rgb(10, 20, 30))
		);
		assert_eq!(
			Color::parse("rgba(10,20,30,0.5)"),
			Some(Color::rgba(10, 20, 30, 0.5))
		);
		assert_eq!(Color::parse("rgb(10, 20)"), None);
		assert_eq!(Color::parse("cyan"), None);
	}

	#[test]
	fn css_output_drops_alpha_when_opaque() {
		assert_eq!(Color::rgb(148, 0, 211).to_css(), "#9400d3");
		assert_eq!(
			Color::rgb(0, 0, 0).with_alpha(0.25).to_css(),
			"rgba(0, 0, 0, 0.25)"
		);
	}

	#[test]
	fn palette_falls_back_when_nothing_parses() {
		assert_eq!(Palette::from_css(&["nope", ""]), Palette::cyberpunk());
		let p = Palette::from_css(&["#ff0000", "bad", "#00ff00"]);
		assert_eq!(p.len(), 2);
		assert_eq!(p.get(3), Color::rgb(0, 255, 0));
	}
}
