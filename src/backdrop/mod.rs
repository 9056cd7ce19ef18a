//! Interactive particle backdrop.
//!
//! A field of drifting points joined by lines that fade with distance and
//! pulled toward the pointer when it is near. The simulation is plain owned
//! state ([`ParticleField`]) advanced by an external clock ([`FrameLoop`]) and
//! drawn through the [`Surface`] trait, so the same code can paint a browser
//! canvas, a test recorder, or an SVG document.
//!
//! The generator uses the SVG path: it seeds the field, lets it settle for a
//! number of frames, and embeds the resulting still behind the hero section.
//!
//! | Module | Role |
//! |--------|------|
//! | [`surface`] | `Vec2`, `Rgba`, and the `Surface` drawing trait |
//! | [`field`] | Particle state, per-frame physics, drawing order, the frame loop |
//! | [`svg`] | `SvgSurface`, a deterministic SVG writer |

pub mod field;
pub mod surface;
pub mod svg;

pub use field::{
    FieldParams, FrameLoop, LoopHandle, Particle, ParticleField, connection_alpha, particle_count,
};
pub use surface::{Rgba, Surface, Vec2};
pub use svg::SvgSurface;

use crate::config::BackdropConfig;
use maud::Markup;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Simulate the configured field from its seed and capture one frame as SVG.
///
/// Returns `None` when the backdrop is disabled.
pub fn render_still(config: &BackdropConfig) -> Option<Markup> {
    if !config.enabled {
        return None;
    }
    let field = ParticleField::new(
        config.field_params(),
        config.width,
        config.height,
        StdRng::seed_from_u64(config.seed),
    );
    let mut frames = FrameLoop::new(field);
    frames.warm_up(config.warmup_frames);

    let mut surface = SvgSurface::new(config.width, config.height);
    frames.tick(Some(&mut surface));
    Some(surface.into_markup())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_backdrop_renders_nothing() {
        let config = BackdropConfig {
            enabled: false,
            ..BackdropConfig::default()
        };
        assert!(render_still(&config).is_none());
    }

    #[test]
    fn still_is_reproducible_for_a_seed() {
        let config = BackdropConfig::default();
        let a = render_still(&config).unwrap().into_string();
        let b = render_still(&config).unwrap().into_string();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_differ() {
        let a = render_still(&BackdropConfig::default())
            .unwrap()
            .into_string();
        let b = render_still(&BackdropConfig {
            seed: 8,
            ..BackdropConfig::default()
        })
        .unwrap()
        .into_string();
        assert_ne!(a, b);
    }

    #[test]
    fn still_has_one_circle_per_particle() {
        let config = BackdropConfig {
            width: 600.0,
            height: 400.0,
            ..BackdropConfig::default()
        };
        let svg = render_still(&config).unwrap().into_string();
        // 600 * 400 / 12000
        assert_eq!(svg.matches("filter=\"url(#blur-0)\"").count(), 20);
    }
}
