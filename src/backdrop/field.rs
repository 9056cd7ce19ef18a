//! The particle field simulation and its frame loop.

use super::surface::{Rgba, Surface, Vec2};
use rand::Rng;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Tunables for the particle field. Defaults match the stock `[backdrop]` table.
#[derive(Debug, Clone)]
pub struct FieldParams {
    /// Upper bound on the particle count regardless of viewport size.
    pub max_particles: usize,
    /// Viewport pixels per particle.
    pub area_per_particle: f64,
    /// Pointer attraction and pointer-line reach.
    pub interaction_radius: f64,
    /// Impulse at zero distance from the pointer; falls off linearly to 0 at the radius.
    pub attraction: f64,
    /// Particles closer than this are joined by a line.
    pub connection_distance: f64,
    pub damping: f64,
    /// Per-frame random velocity nudge, uniform in `[-jitter, jitter]` per axis.
    pub jitter: f64,
    pub line_opacity: f64,
    pub grid_spacing: f64,
    pub grid_color: Rgba,
    pub max_initial_speed: f64,
    pub min_radius: f64,
    pub max_radius: f64,
    pub particle_blur: f64,
    pub pointer_glow_radius: f64,
    pub palette: Vec<Rgba>,
}

impl Default for FieldParams {
    fn default() -> Self {
        Self {
            max_particles: 120,
            area_per_particle: 12000.0,
            interaction_radius: 150.0,
            attraction: 0.03,
            connection_distance: 120.0,
            damping: 0.98,
            jitter: 0.05,
            line_opacity: 0.35,
            grid_spacing: 48.0,
            grid_color: Rgba::opaque(0x63, 0x66, 0xf1).with_alpha(0.06),
            max_initial_speed: 0.5,
            min_radius: 1.0,
            max_radius: 3.0,
            particle_blur: 6.0,
            pointer_glow_radius: 200.0,
            palette: vec![Rgba::opaque(0x63, 0x66, 0xf1)],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub color: Rgba,
}

/// Number of particles for a viewport: one per `area_per_particle` pixels,
/// capped at `max_particles`. Degenerate sizes yield zero.
pub fn particle_count(width: f64, height: f64, params: &FieldParams) -> usize {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return 0;
    }
    if params.area_per_particle <= 0.0 {
        return params.max_particles;
    }
    let n = (width * height / params.area_per_particle).floor();
    (n as usize).min(params.max_particles)
}

/// Line opacity for two points `distance` apart: 1 when touching, 0 at `threshold`.
pub fn connection_alpha(distance: f64, threshold: f64) -> f64 {
    if threshold <= 0.0 || distance >= threshold {
        0.0
    } else {
        (1.0 - distance / threshold).clamp(0.0, 1.0)
    }
}

/// A viewport-sized field of drifting, pointer-attracted particles.
///
/// All state is owned here; the caller supplies the clock by calling
/// [`ParticleField::step`] (or [`FrameLoop::tick`]) once per frame.
pub struct ParticleField<R> {
    params: FieldParams,
    width: f64,
    height: f64,
    particles: Vec<Particle>,
    pointer: Option<Vec2>,
    rng: R,
}

impl<R: Rng> ParticleField<R> {
    pub fn new(params: FieldParams, width: f64, height: f64, rng: R) -> Self {
        let mut field = Self {
            params,
            width,
            height,
            particles: Vec::new(),
            pointer: None,
            rng,
        };
        field.reinitialize();
        field
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    pub fn set_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Adopt a new viewport and respawn every particle for it.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
        self.reinitialize();
    }

    fn reinitialize(&mut self) {
        let count = particle_count(self.width, self.height, &self.params);
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(self.spawn());
        }
        self.particles = particles;
    }

    fn spawn(&mut self) -> Particle {
        let speed = self.params.max_initial_speed.abs();
        let color = if self.params.palette.is_empty() {
            Rgba::WHITE
        } else {
            self.params.palette[self.rng.gen_range(0..self.params.palette.len())]
        };
        let (min_r, max_r) = (
            self.params.min_radius.min(self.params.max_radius),
            self.params.max_radius.max(self.params.min_radius),
        );
        Particle {
            position: Vec2::new(
                self.rng.gen_range(0.0..=self.width),
                self.rng.gen_range(0.0..=self.height),
            ),
            velocity: Vec2::new(
                self.rng.gen_range(-speed..=speed),
                self.rng.gen_range(-speed..=speed),
            ),
            radius: self.rng.gen_range(min_r..=max_r),
            color,
        }
    }

    /// Advance the simulation by one frame.
    ///
    /// After a step every particle lies inside `[0, width] x [0, height]`.
    pub fn step(&mut self) {
        let Self {
            params,
            width,
            height,
            particles,
            pointer,
            rng,
        } = self;
        let jitter = if params.jitter.is_finite() {
            params.jitter.abs()
        } else {
            0.0
        };

        for p in particles.iter_mut() {
            if let Some(target) = *pointer {
                let toward = target - p.position;
                let distance = toward.length();
                if distance > 0.0 && distance < params.interaction_radius {
                    let force = (1.0 - distance / params.interaction_radius) * params.attraction;
                    p.velocity += toward / distance * force;
                }
            }

            p.position += p.velocity;
            p.velocity *= params.damping;
            if jitter > 0.0 {
                p.velocity += Vec2::new(
                    rng.gen_range(-jitter..=jitter),
                    rng.gen_range(-jitter..=jitter),
                );
            }

            reflect(&mut p.position.x, &mut p.velocity.x, *width);
            reflect(&mut p.position.y, &mut p.velocity.y, *height);
        }
    }

    /// Paint the current state: background, grid, connections, pointer
    /// glow and lines, then the particles on top.
    pub fn draw(&self, surface: &mut dyn Surface) {
        let params = &self.params;
        surface.clear();
        if params.grid_spacing > 0.0 {
            surface.grid(params.grid_spacing, params.grid_color);
        }

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.position.distance(b.position);
                let alpha = connection_alpha(distance, params.connection_distance);
                if alpha > 0.0 {
                    surface.line(
                        a.position,
                        b.position,
                        a.color.with_alpha(alpha * params.line_opacity),
                        1.0,
                    );
                }
            }
        }

        if let Some(pointer) = self.pointer {
            let glow = self
                .params
                .palette
                .first()
                .copied()
                .unwrap_or(Rgba::WHITE)
                .with_alpha(0.15);
            surface.radial_glow(pointer, params.pointer_glow_radius, glow);
            for p in &self.particles {
                let alpha =
                    connection_alpha(pointer.distance(p.position), params.interaction_radius);
                if alpha > 0.0 {
                    surface.line(
                        pointer,
                        p.position,
                        p.color.with_alpha(alpha * params.line_opacity),
                        1.0,
                    );
                }
            }
        }

        for p in &self.particles {
            surface.circle(p.position, p.radius, p.color, params.particle_blur);
        }
    }
}

/// Clamp one axis into `[0, max]`, pointing the velocity back inside on contact.
fn reflect(position: &mut f64, velocity: &mut f64, max: f64) {
    if *position < 0.0 {
        *position = 0.0;
        *velocity = velocity.abs();
    } else if *position > max {
        *position = max.max(0.0);
        *velocity = -velocity.abs();
    }
}

/// Cancellation token shared between a [`FrameLoop`] and whatever schedules it.
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Arc<AtomicBool>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Drives a [`ParticleField`] from an external clock.
///
/// Each `tick` is one display refresh. Input events (resize, pointer) mutate
/// the field between ticks. Dropping the loop cancels its handle, so a
/// scheduler holding the handle stops asking for frames.
pub struct FrameLoop<R> {
    field: ParticleField<R>,
    handle: LoopHandle,
    frames: u64,
}

impl<R: Rng> FrameLoop<R> {
    pub fn new(field: ParticleField<R>) -> Self {
        Self {
            field,
            handle: LoopHandle::default(),
            frames: 0,
        }
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn field(&self) -> &ParticleField<R> {
        &self.field
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn on_resize(&mut self, width: f64, height: f64) {
        self.field.resize(width, height);
    }

    pub fn on_pointer_move(&mut self, position: Vec2) {
        self.field.set_pointer(position);
    }

    pub fn on_pointer_leave(&mut self) {
        self.field.clear_pointer();
    }

    /// Render one frame. Returns `false` without touching the field when the
    /// loop is cancelled or there is no surface to draw on.
    pub fn tick(&mut self, surface: Option<&mut dyn Surface>) -> bool {
        if self.handle.is_cancelled() {
            return false;
        }
        let Some(surface) = surface else {
            return false;
        };
        self.field.step();
        self.field.draw(surface);
        self.frames += 1;
        true
    }

    /// Advance `frames` steps without drawing, e.g. to settle the field
    /// before capturing a still.
    pub fn warm_up(&mut self, frames: u32) {
        for _ in 0..frames {
            if self.handle.is_cancelled() {
                break;
            }
            self.field.step();
        }
    }
}

impl<R> Drop for FrameLoop<R> {
    fn drop(&mut self) {
        self.handle.cancel();
    }
}
