//! Conic-section fit over a body's recent positions, projected onto the XY plane.

use cgmath::Vector3;

/// Samples needed to pin down a conic.
pub const FIT_POINTS: usize = 5;

/// `a x² + b xy + c y² + d x + e y = 1`
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Conic {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConicKind {
    Ellipse,
    Parabola,
    Hyperbola,
}

impl Conic {
    /// Exact fit through the last [`FIT_POINTS`] samples. `None` with too few
    /// samples, or when they are degenerate (collinear, or on a conic through
    /// the origin, which this form cannot express).
    pub fn fit(history: &[Vector3<f64>]) -> Option<Conic> {
        let points = history.get(history.len().checked_sub(FIT_POINTS)?..)?;
        let mut system = [[0.0; FIT_POINTS + 1]; FIT_POINTS];
        for (row, p) in system.iter_mut().zip(points) {
            *row = [p.x * p.x, p.x * p.y, p.y * p.y, p.x, p.y, 1.0];
        }
        let [a, b, c, d, e] = solve(system)?;
        Some(Conic { a, b, c, d, e })
    }
    /// Zero on the curve.
    pub fn residual(&self, x: f64, y: f64) -> f64 {
        self.a * x * x + self.b * x * y + self.c * y * y + self.d * x + self.e * y - 1.0
    }
    pub fn kind(&self) -> ConicKind {
        let discriminant = self.b * self.b - 4.0 * self.a * self.c;
        let scale = self.a * self.a + self.b * self.b + self.c * self.c;
        if discriminant.abs() <= 1e-9 * scale {
            ConicKind::Parabola
        } else if discriminant < 0.0 {
            ConicKind::Ellipse
        } else {
            ConicKind::Hyperbola
        }
    }
}

/// Gaussian elimination with partial pivoting on an augmented matrix.
fn solve(mut m: [[f64; FIT_POINTS + 1]; FIT_POINTS]) -> Option<[f64; FIT_POINTS]> {
    let largest = m
        .iter()
        .flat_map(|row| row[..FIT_POINTS].iter())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    if !(largest > 0.0) {
        return None;
    }
    let tolerance = largest * 1e-12;
    for col in 0..FIT_POINTS {
        let pivot = (col..FIT_POINTS)
            .max_by(|&i, &j| m[i][col].abs().total_cmp(&m[j][col].abs()))?;
        if m[pivot][col].abs() <= tolerance {
            return None;
        }
        m.swap(col, pivot);
        for row in col + 1..FIT_POINTS {
            let factor = m[row][col] / m[col][col];
            for k in col..=FIT_POINTS {
                m[row][k] -= factor * m[col][k];
            }
        }
    }
    let mut x = [0.0; FIT_POINTS];
    for row in (0..FIT_POINTS).rev() {
        let tail: f64 = (row + 1..FIT_POINTS).map(|k| m[row][k] * x[k]).sum();
        x[row] = (m[row][FIT_POINTS] - tail) / m[row][row];
    }
    Some(x)
}
