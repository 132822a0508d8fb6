use crate::transform::InstanceTransform;
use glam::Vec3;
use std::f32::consts::PI;
use std::ops::Range;
use surfaces_common::{SurfaceConfig, SurfaceKind};

/// Half-open range of grid indices along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRange {
    pub start: i32,
    pub end: i32,
}

impl GridRange {
    pub fn len(&self) -> usize {
        (i64::from(self.end) - i64::from(self.start)).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn contains(&self, index: i32) -> bool {
        (self.start..self.end).contains(&index)
    }

    pub fn iter(&self) -> Range<i32> {
        self.start..self.end
    }
}

/// Maps grid cells to points on an animated parametric surface.
///
/// Cell `(i, j)` maps to unit coordinates `u = 2i / resolution` and
/// `v = 2j / resolution`, both in `[-1, 1)`. The surface point is scaled by
/// `radius` to land in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceSampler {
    kind: SurfaceKind,
    resolution: u32,
    radius: f32,
    cube_size: Option<f32>,
}

impl SurfaceSampler {
    /// Create a sampler over a `resolution × resolution` grid with unit radius.
    pub fn new(kind: SurfaceKind, resolution: u32) -> Self {
        assert!(
            resolution > 0 && resolution % 2 == 0,
            "resolution must be even and positive"
        );
        Self {
            kind,
            resolution,
            radius: 1.0,
            cube_size: None,
        }
    }

    pub fn from_config(config: &SurfaceConfig) -> Self {
        Self::new(config.kind, config.resolution)
            .with_radius(config.radius)
            .with_cube_size(config.cube_size)
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_cube_size(mut self, cube_size: Option<f32>) -> Self {
        self.cube_size = cube_size;
        self
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn set_kind(&mut self, kind: SurfaceKind) {
        if self.kind != kind {
            tracing::debug!(from = %self.kind, to = %kind, "surface changed");
            self.kind = kind;
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn cube_size(&self) -> Option<f32> {
        self.cube_size
    }

    pub fn grid_range(&self) -> GridRange {
        let half = (self.resolution / 2) as i32;
        GridRange {
            start: -half,
            end: half,
        }
    }

    pub fn instance_count(&self) -> usize {
        let side = self.resolution as usize;
        side * side
    }

    /// Surface point for cell `(i, j)` at time `t`, in unit space.
    pub fn sample(&self, i: i32, j: i32, t: f32) -> Vec3 {
        let u = self.to_unit(i);
        let v = self.to_unit(j);
        match self.kind {
            SurfaceKind::Plane => plane(u, v),
            SurfaceKind::Wave => wave(u, v, t),
            SurfaceKind::Torus => torus(u, v, t),
        }
    }

    /// World-space transform for cell `(i, j)` at time `t`.
    pub fn transform(&self, i: i32, j: i32, t: f32) -> InstanceTransform {
        InstanceTransform::new(
            self.sample(i, j, t) * self.radius,
            self.cube_size.unwrap_or(1.0),
        )
    }

    /// Replace the contents of `out` with every cell's transform, `j` outer
    /// and `i` inner.
    pub fn fill_transforms(&self, t: f32, out: &mut Vec<InstanceTransform>) {
        let range = self.grid_range();
        out.clear();
        out.reserve(self.instance_count());
        for j in range.iter() {
            for i in range.iter() {
                out.push(self.transform(i, j, t));
            }
        }
        tracing::trace!(count = out.len(), t, "sampled surface");
    }

    fn to_unit(&self, index: i32) -> f32 {
        index as f32 * 2.0 / self.resolution as f32
    }
}

fn plane(u: f32, v: f32) -> Vec3 {
    Vec3::new(u, 0.0, v)
}

fn wave(u: f32, v: f32, t: f32) -> Vec3 {
    Vec3::new(u, (PI * (u + v + t)).sin(), v)
}

fn torus(u: f32, v: f32, t: f32) -> Vec3 {
    let r1 = 0.7 + 0.1 * (PI * (6.0 * u + 0.5 * t)).sin();
    let r2 = 0.15 + 0.05 * (PI * (8.0 * u + 4.0 * v + 2.0 * t)).sin();
    let s = 0.5 + r1 + r2 * (PI * v).cos();
    Vec3::new(s * (PI * u).sin(), r2 * (PI * v).sin(), s * (PI * u).cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).length() < eps
    }

    #[test]
    fn torus_origin_golden_value() {
        let sampler = SurfaceSampler::new(SurfaceKind::Torus, 400);
        let p = sampler.sample(0, 0, 0.0);
        assert!(approx(p, Vec3::new(0.0, 0.0, 1.35), 1e-6), "{p:?}");
    }

    #[test]
    fn torus_quarter_turn_golden_value() {
        // i = 100 on a 400 grid is u = 0.5, a quarter turn around Y.
        let sampler = SurfaceSampler::new(SurfaceKind::Torus, 400);
        let p = sampler.sample(100, 0, 0.0);
        assert!(approx(p, Vec3::new(1.35, 0.0, 0.0), 1e-5), "{p:?}");
    }

    #[test]
    fn sampling_is_bit_identical() {
        for kind in SurfaceKind::ALL {
            let sampler = SurfaceSampler::new(kind, 400);
            for (i, j, t) in [(0, 0, 0.0), (-200, 199, 3.7), (57, -13, 1234.5)] {
                let a = sampler.sample(i, j, t).to_array().map(f32::to_bits);
                let b = sampler.sample(i, j, t).to_array().map(f32::to_bits);
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn torus_stays_within_its_radii() {
        let sampler = SurfaceSampler::new(SurfaceKind::Torus, 40);
        let range = sampler.grid_range();
        for t in [0.0, 0.37, 2.5] {
            for j in range.iter() {
                for i in range.iter() {
                    let p = sampler.sample(i, j, t);
                    let planar = Vec3::new(p.x, 0.0, p.z).length();
                    assert!((0.5 + 0.6 - 0.2 - 1e-5..=0.5 + 0.8 + 0.2 + 1e-5).contains(&planar));
                    assert!(p.y.abs() <= 0.2 + 1e-5);
                }
            }
        }
    }

    #[test]
    fn plane_ignores_time() {
        let sampler = SurfaceSampler::new(SurfaceKind::Plane, 10);
        assert_eq!(sampler.sample(3, -2, 0.0), sampler.sample(3, -2, 99.0));
        assert_eq!(sampler.sample(5, -5, 0.0), Vec3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn wave_height_follows_time() {
        let sampler = SurfaceSampler::new(SurfaceKind::Wave, 10);
        assert!(sampler.sample(0, 0, 0.0).y.abs() < 1e-6);
        assert!((sampler.sample(0, 0, 0.5).y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn grid_range_is_half_open_and_centred() {
        let sampler = SurfaceSampler::new(SurfaceKind::Plane, 400);
        let range = sampler.grid_range();
        assert_eq!(range, GridRange { start: -200, end: 200 });
        assert_eq!(range.len(), 400);
        assert!(range.contains(-200));
        assert!(!range.contains(200));
        assert_eq!(sampler.instance_count(), 160_000);
    }

    #[test]
    fn fill_transforms_is_row_major() {
        let sampler = SurfaceSampler::new(SurfaceKind::Plane, 8)
            .with_radius(4.0)
            .with_cube_size(Some(0.5));
        let mut out = vec![InstanceTransform::default(); 3];
        sampler.fill_transforms(0.0, &mut out);
        assert_eq!(out.len(), 64);
        assert_eq!(out[0], sampler.transform(-4, -4, 0.0));
        assert_eq!(out[1], sampler.transform(-3, -4, 0.0));
        assert_eq!(out[8], sampler.transform(-4, -3, 0.0));
        assert_eq!(out[0].translation, Vec3::new(-4.0, 0.0, -4.0));
        assert!(out.iter().all(|t| t.scale == 0.5));
    }

    #[test]
    fn transform_without_cube_size_is_unit_scale() {
        let sampler = SurfaceSampler::new(SurfaceKind::Torus, 400).with_radius(100.0);
        let t = sampler.transform(0, 0, 0.0);
        assert_eq!(t.scale, 1.0);
        assert!((t.translation.z - 135.0).abs() < 1e-3);
    }

    #[test]
    fn from_config_uses_every_field() {
        let config = SurfaceConfig {
            kind: SurfaceKind::Wave,
            resolution: 16,
            radius: 2.0,
            cube_size: None,
        };
        let sampler = SurfaceSampler::from_config(&config);
        assert_eq!(sampler.kind(), SurfaceKind::Wave);
        assert_eq!(sampler.resolution(), 16);
        assert_eq!(sampler.radius(), 2.0);
        assert_eq!(sampler.cube_size(), None);
    }

    #[test]
    fn widest_grid_range_length_does_not_overflow() {
        let sampler = SurfaceSampler::new(SurfaceKind::Plane, u32::MAX - 1);
        let range = sampler.grid_range();
        assert_eq!(range.start, -i32::MAX);
        assert_eq!(range.end, i32::MAX);
        assert_eq!(range.len(), (u32::MAX - 1) as usize);
        assert!(!range.is_empty());
    }

    #[test]
    #[should_panic(expected = "resolution must be even")]
    fn odd_resolution_panics() {
        SurfaceSampler::new(SurfaceKind::Plane, 7);
    }
}
