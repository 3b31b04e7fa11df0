//! Software renderer into an RGBA pixel buffer.
//!
//! Each frame first darkens the previous one with a translucent black fill,
//! leaving motion trails, then draws every particle as a shadow disk offset
//! by two pixels and the particle disk on top, composited with the
//! material's [`BlendMode`]. Fixed particles get a thin white outline.
//!
//! The buffer is in simulation coordinates. Horizontal mirroring for a
//! selfie-style display happens only in [`Renderer::presented`].

use std::borrow::Cow;
use std::path::Path;

use glam::{Vec2, Vec3, Vec4};
use image::{imageops, ImageFormat, Rgba, RgbaImage};

use crate::error::RenderError;
use crate::material::{BlendMode, MaterialDefinition};
use crate::particle::Particle;

const SHADOW_OFFSET: Vec2 = Vec2::new(2.0, 2.0);
const SHADOW_SCALE: f32 = 1.2;
const OUTLINE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 0.5);
const OUTLINE_WIDTH: f32 = 1.0;

/// Draws particles into an owned RGBA frame.
#[derive(Debug, Clone)]
pub struct Renderer {
    frame: RgbaImage,
    trail_fade: f32,
    mirror_x: bool,
}

impl Renderer {
    /// Black frame of `width × height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            frame: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
            trail_fade: 0.1,
            mirror_x: false,
        }
    }

    /// Alpha of the black fill laid over the previous frame.
    pub fn with_trail_fade(mut self, alpha: f32) -> Self {
        self.trail_fade = alpha.clamp(0.0, 1.0);
        self
    }

    /// Mirror horizontally when presenting.
    pub fn with_mirror(mut self, mirror_x: bool) -> Self {
        self.mirror_x = mirror_x;
        self
    }

    pub fn mirror_x(&self) -> bool {
        self.mirror_x
    }

    pub fn width(&self) -> u32 {
        self.frame.width()
    }

    pub fn height(&self) -> u32 {
        self.frame.height()
    }

    /// Reallocate the frame at a new size, cleared to black.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.frame = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255]));
    }

    /// Paint one frame.
    pub fn render(&mut self, particles: &[Particle], material: &MaterialDefinition) {
        self.fade();

        let mode = material.blend_mode;
        let shadow = material.shadow_tint();
        for p in particles {
            self.fill_disk(p.position + SHADOW_OFFSET, p.size * SHADOW_SCALE, shadow, mode);
            self.fill_disk(p.position, p.size, p.color.extend(1.0), mode);
            if p.fixed {
                self.stroke_circle(p.position, p.size, OUTLINE, mode);
            }
        }
    }

    /// The frame in simulation coordinates.
    pub fn frame(&self) -> &RgbaImage {
        &self.frame
    }

    /// The frame as it should be shown, mirrored if configured.
    pub fn presented(&self) -> Cow<'_, RgbaImage> {
        if self.mirror_x {
            Cow::Owned(imageops::flip_horizontal(&self.frame))
        } else {
            Cow::Borrowed(&self.frame)
        }
    }

    /// Write the presented frame as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        self.presented()
            .save_with_format(path.as_ref(), ImageFormat::Png)?;
        log::info!("Saved frame to {}", path.as_ref().display());
        Ok(())
    }

    fn fade(&mut self) {
        let keep = 1.0 - self.trail_fade;
        for px in self.frame.pixels_mut() {
            for c in &mut px.0[..3] {
                // Floor so that dim trails reach black.
                *c = (*c as f32 * keep).floor() as u8;
            }
        }
    }

    /// Anti-aliased filled disk.
    fn fill_disk(&mut self, center: Vec2, radius: f32, color: Vec4, mode: BlendMode) {
        self.cover(center, radius + 0.5, color, mode, |dist| {
            (radius - dist + 0.5).clamp(0.0, 1.0)
        });
    }

    /// Anti-aliased ring of `OUTLINE_WIDTH` centered on `radius`.
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Vec4, mode: BlendMode) {
        let half = OUTLINE_WIDTH * 0.5;
        self.cover(center, radius + half + 0.5, color, mode, |dist| {
            (half - (dist - radius).abs() + 0.5).clamp(0.0, 1.0)
        });
    }

    /// Blend `color` into every pixel within `extent` of `center`, weighted
    /// by `coverage(distance)` from the pixel center.
    fn cover<F: Fn(f32) -> f32>(
        &mut self,
        center: Vec2,
        extent: f32,
        color: Vec4,
        mode: BlendMode,
        coverage: F,
    ) {
        let (w, h) = (self.frame.width() as i64, self.frame.height() as i64);
        let x0 = ((center.x - extent).floor() as i64).max(0);
        let x1 = ((center.x + extent).ceil() as i64).min(w - 1);
        let y0 = ((center.y - extent).floor() as i64).max(0);
        let y1 = ((center.y + extent).ceil() as i64).min(h - 1);

        for y in y0..=y1 {
            for x in x0..=x1 {
                let pixel_center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let a = coverage(pixel_center.distance(center)) * color.w;
                if a <= 0.0 {
                    continue;
                }
                let px = self.frame.get_pixel_mut(x as u32, y as u32);
                *px = blend(*px, color.truncate(), a, mode);
            }
        }
    }
}

/// Composite `src` with opacity `alpha` over `dst`.
pub fn blend(dst: Rgba<u8>, src: Vec3, alpha: f32, mode: BlendMode) -> Rgba<u8> {
    let d = Vec3::new(dst[0] as f32, dst[1] as f32, dst[2] as f32) / 255.0;
    let out = match mode {
        BlendMode::SourceOver => d.lerp(src, alpha),
        BlendMode::Screen => {
            let screened = Vec3::ONE - (Vec3::ONE - src) * (Vec3::ONE - d);
            d.lerp(screened, alpha)
        }
        BlendMode::Lighter => (d + src * alpha).min(Vec3::ONE),
    };
    let out = (out.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
    Rgba([out.x as u8, out.y as u8, out.z as u8, 255])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{LIGHT, SAND};

    fn particle(x: f32, y: f32) -> Particle {
        Particle::new(Vec2::new(x, y), Vec2::ZERO, Vec3::new(1.0, 0.0, 0.0), 4.0, 1.0)
    }

    #[test]
    fn test_particle_drawn_at_position() {
        let mut r = Renderer::new(64, 48);
        r.render(&[particle(20.5, 20.5)], &SAND);
        assert_eq!(*r.frame().get_pixel(20, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(*r.frame().get_pixel(50, 40), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_shadow_offset_darkens_behind() {
        let mut r = Renderer::new(64, 48);
        // Light gray background so the black sand shadow shows.
        for px in r.frame.pixels_mut() {
            *px = Rgba([200, 200, 200, 255]);
        }
        r.render(&[particle(20.5, 20.5)], &SAND);
        // Inside the shadow (radius 4.8 at +2,+2) but outside the particle.
        let shadowed = r.frame().get_pixel(25, 25)[0];
        let clear = r.frame().get_pixel(40, 40)[0];
        assert!(shadowed < clear);
    }

    #[test]
    fn test_trails_fade_to_black() {
        let mut r = Renderer::new(16, 16);
        r.render(&[particle(8.0, 8.0)], &SAND);
        for _ in 0..200 {
            r.render(&[], &SAND);
        }
        assert!(r.frame().pixels().all(|p| p[0] == 0 && p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn test_fixed_particle_outlined() {
        let mut free = Renderer::new(64, 48);
        let mut fixed = Renderer::new(64, 48);
        let mut p = particle(30.5, 20.5);
        free.render(&[p], &SAND);
        p.fixed = true;
        fixed.render(&[p], &SAND);
        // Top edge of the ring, away from the shadow
        let a = free.frame().get_pixel(30, 16);
        let b = fixed.frame().get_pixel(30, 16);
        assert!(b[1] > a[1]);
    }

    #[test]
    fn test_lighter_accumulates() {
        let src = Vec3::new(0.4, 0.0, 0.0);
        let once = blend(Rgba([100, 0, 0, 255]), src, 1.0, BlendMode::Lighter);
        assert_eq!(once[0], 202);
        let sat = blend(once, src, 1.0, BlendMode::Lighter);
        assert_eq!(sat[0], 255);
        // Lighter never darkens
        let mut r = Renderer::new(8, 8).with_trail_fade(0.0);
        r.render(&[particle(4.0, 4.0)], &LIGHT);
        assert!(r.frame().pixels().all(|p| p[3] == 255));
    }

    #[test]
    fn test_screen_brightens() {
        let out = blend(Rgba([128, 128, 128, 255]), Vec3::splat(0.5), 1.0, BlendMode::Screen);
        assert!(out[0] > 128);
    }

    #[test]
    fn test_presented_mirrors() {
        let mut r = Renderer::new(64, 48).with_mirror(true);
        r.render(&[particle(10.5, 20.5)], &SAND);
        let shown = r.presented();
        assert_eq!(*shown.get_pixel(63 - 10, 20), Rgba([255, 0, 0, 255]));
        assert_eq!(*r.frame().get_pixel(10, 20), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_resize_reallocates() {
        let mut r = Renderer::new(64, 48);
        r.resize(32, 16);
        assert_eq!((r.width(), r.height()), (32, 16));
    }
}
