//! Canvas rendering for the starfield.
//!
//! Each frame clears the surface, paints the solid background, then draws
//! every particle with additive ("lighter") blending so overlapping light
//! brightens instead of occluding. Coordinates are CSS pixels; the caller sets
//! the device-pixel-ratio transform on the context.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::particles::{Particle, Sprite};
use super::state::ParticleField;
use super::theme::{Color, Theme};

/// Particles fainter than this are skipped.
const MIN_VISIBLE_ALPHA: f64 = 0.005;

/// Renders the complete field to the canvas.
pub fn render<R>(field: &ParticleField<R>, ctx: &CanvasRenderingContext2d) {
	let view = field.view();
	let theme = field.theme();

	ctx.clear_rect(0.0, 0.0, view.width, view.height);
	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, view.width, view.height);

	let _ = ctx.set_global_composite_operation("lighter");
	for p in field.particles() {
		if p.alpha < MIN_VISIBLE_ALPHA {
			continue;
		}
		draw_particle(ctx, p, p.sprite(field.config(), view), theme);
	}
	ctx.set_global_alpha(1.0);
	let _ = ctx.set_global_composite_operation("source-over");
}

fn draw_particle(ctx: &CanvasRenderingContext2d, p: &Particle, sprite: Sprite, theme: &Theme) {
	ctx.set_global_alpha(p.alpha);
	let color = p.color.to_css();

	match sprite {
		Sprite::Streak {
			x,
			y,
			tail_x,
			tail_y,
			width,
		} => {
			ctx.set_stroke_style_str(&color);
			ctx.set_line_width(width);
			ctx.set_line_cap("round");
			ctx.begin_path();
			ctx.move_to(x, y);
			ctx.line_to(tail_x, tail_y);
			ctx.stroke();
		}
		Sprite::Dot { x, y, radius } => {
			if theme.glow {
				draw_halo(ctx, x, y, radius, p.color, theme.glow_radius);
			}
			ctx.set_fill_style_str(&color);
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius, 0.0, PI * 2.0);
			ctx.fill();
		}
	}
}

fn draw_halo(
	ctx: &CanvasRenderingContext2d,
	x: f64,
	y: f64,
	radius: f64,
	color: Color,
	glow_radius: f64,
) {
	let outer = radius * glow_radius;
	if outer <= radius {
		return;
	}
	let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.5, x, y, outer) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, &color.lighten(0.3).with_alpha(0.5).to_css());
	let _ = gradient.add_color_stop(0.4, &color.with_alpha(0.2).to_css());
	let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0)");

	ctx.begin_path();
	let _ = ctx.arc(x, y, outer, 0.0, PI * 2.0);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}
