//! Periodic cell geometry.

use serde::{Deserialize, Serialize};

use crate::error::{CofCheckError, Result};

/// Periodic cell, stored as the Cartesian lattice vectors a, b, c (rows).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// Build a lattice from its vectors.
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Result<Self> {
        let lattice = Self { matrix };
        if lattice.volume() <= 1e-8 {
            return Err(CofCheckError::InvalidStructure(
                "lattice vectors are degenerate".to_string(),
            ));
        }
        Ok(lattice)
    }

    /// Build a lattice from cell lengths and angles (degrees).
    ///
    /// `a` lies along x and `b` in the xy plane.
    pub fn from_parameters(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        if [a, b, c].iter().any(|l| !(l.is_finite() && *l > 0.0)) {
            return Err(CofCheckError::InvalidStructure(format!(
                "cell lengths must be positive, got {a}, {b}, {c}"
            )));
        }

        let (alpha, beta, gamma) = (alpha.to_radians(), beta.to_radians(), gamma.to_radians());
        let (cos_a, cos_b, cos_g) = (alpha.cos(), beta.cos(), gamma.cos());
        let sin_g = gamma.sin();
        if sin_g.abs() < 1e-10 {
            return Err(CofCheckError::InvalidStructure(
                "cell angle gamma must not be 0 or 180 degrees".to_string(),
            ));
        }

        let cx = c * cos_b;
        let cy = c * (cos_a - cos_b * cos_g) / sin_g;
        let cz_sq = c * c - cx * cx - cy * cy;
        if cz_sq <= 0.0 {
            return Err(CofCheckError::InvalidStructure(
                "cell angles do not describe a valid cell".to_string(),
            ));
        }

        Self::from_vectors([
            [a, 0.0, 0.0],
            [b * cos_g, b * sin_g, 0.0],
            [cx, cy, cz_sq.sqrt()],
        ])
    }

    /// Cell volume.
    pub fn volume(&self) -> f64 {
        let [a, b, c] = self.matrix;
        dot(a, cross(b, c)).abs()
    }

    /// Convert fractional to Cartesian coordinates.
    pub fn to_cartesian(&self, frac: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        let mut out = [0.0; 3];
        for (axis, value) in out.iter_mut().enumerate() {
            *value = frac[0] * m[0][axis] + frac[1] * m[1][axis] + frac[2] * m[2][axis];
        }
        out
    }

    /// Distances between opposite faces of the cell, one per lattice vector.
    pub fn plane_spacings(&self) -> [f64; 3] {
        let [a, b, c] = self.matrix;
        let volume = self.volume();
        [
            volume / norm(cross(b, c)),
            volume / norm(cross(c, a)),
            volume / norm(cross(a, b)),
        ]
    }

    /// Shortest distance between two fractional positions over all periodic images.
    pub fn min_image_distance(&self, from: [f64; 3], to: [f64; 3]) -> f64 {
        let delta = wrap_delta(from, to);
        let mut best = f64::INFINITY;
        for i in -1..=1 {
            for j in -1..=1 {
                for k in -1..=1 {
                    let shifted = [
                        delta[0] + i as f64,
                        delta[1] + j as f64,
                        delta[2] + k as f64,
                    ];
                    best = best.min(norm(self.to_cartesian(shifted)));
                }
            }
        }
        best
    }

    /// Distances from `from` to every periodic image of `to` within `cutoff`.
    ///
    /// The zero-length self image is never returned.
    pub fn image_distances_within(&self, from: [f64; 3], to: [f64; 3], cutoff: f64) -> Vec<f64> {
        let delta = wrap_delta(from, to);
        let spacings = self.plane_spacings();
        let reach: Vec<i32> = spacings
            .iter()
            .map(|s| (cutoff / s).ceil() as i32 + 1)
            .collect();

        let mut distances = Vec::new();
        for i in -reach[0]..=reach[0] {
            for j in -reach[1]..=reach[1] {
                for k in -reach[2]..=reach[2] {
                    let shifted = [
                        delta[0] + i as f64,
                        delta[1] + j as f64,
                        delta[2] + k as f64,
                    ];
                    let d = norm(self.to_cartesian(shifted));
                    if d <= cutoff && d > 1e-8 {
                        distances.push(d);
                    }
                }
            }
        }
        distances
    }
}

/// Wrap a fractional coordinate into [0, 1).
pub fn wrap_fractional(value: f64) -> f64 {
    let wrapped = value - value.floor();
    // -1e-17 floors to -1 and wraps to exactly 1.0
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Whether two fractional positions coincide modulo lattice translations.
pub fn same_fractional_site(a: [f64; 3], b: [f64; 3], tolerance: f64) -> bool {
    wrap_delta(a, b).iter().all(|d| d.abs() < tolerance)
}

/// `to - from`, folded into [-0.5, 0.5] per component.
fn wrap_delta(from: [f64; 3], to: [f64; 3]) -> [f64; 3] {
    let mut delta = [0.0; 3];
    for axis in 0..3 {
        let d = to[axis] - from[axis];
        delta[axis] = d - d.round();
    }
    delta
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}
