//! Quality indicators for an approximated Pareto front.
//!
//! All functions take plain objective vectors so they can be applied to
//! [`ParetoFront::objectives`](super::ParetoFront::objectives) or to any
//! externally stored front.
//!
//! # References
//!
//! - Van Veldhuizen (1999), "Multiobjective Evolutionary Algorithms:
//!   Classifications, Analyses, and New Innovations" (error ratio,
//!   generational distance)
//! - Schott (1995), "Fault Tolerant Design Using Single and Multicriteria
//!   Genetic Algorithm Optimization" (spacing)

/// Fraction of `front` members that do not appear in `reference`.
///
/// Two vectors match when every objective differs by at most `tolerance`.
/// Returns 0.0 for an empty front.
pub fn error_rate(front: &[Vec<f64>], reference: &[Vec<f64>], tolerance: f64) -> f64 {
    if front.is_empty() {
        return 0.0;
    }
    let misses = front
        .iter()
        .filter(|p| {
            !reference.iter().any(|r| {
                r.len() == p.len()
                    && r.iter().zip(p.iter()).all(|(a, b)| (a - b).abs() <= tolerance)
            })
        })
        .count();
    misses as f64 / front.len() as f64
}

/// Generational distance: `sqrt(sum d_i^2) / n`, where `d_i` is the
/// Euclidean distance from the i-th front member to its nearest
/// reference point.
///
/// Returns 0.0 for an empty front and infinity when the reference front
/// is empty.
pub fn generational_distance(front: &[Vec<f64>], reference: &[Vec<f64>]) -> f64 {
    if front.is_empty() {
        return 0.0;
    }
    if reference.is_empty() {
        return f64::INFINITY;
    }
    let sum_sq: f64 = front
        .iter()
        .map(|p| {
            reference
                .iter()
                .map(|r| squared_distance(p, r))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    sum_sq.sqrt() / front.len() as f64
}

/// Spacing: standard deviation of nearest-neighbor Manhattan distances
/// within the front. Zero means perfectly uniform spacing.
///
/// Returns 0.0 for fronts with fewer than two members.
pub fn spacing(front: &[Vec<f64>]) -> f64 {
    let n = front.len();
    if n < 2 {
        return 0.0;
    }
    let nearest: Vec<f64> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i)
                .map(|j| manhattan(&front[i], &front[j]))
                .fold(f64::INFINITY, f64::min)
        })
        .collect();
    let mean = nearest.iter().sum::<f64>() / n as f64;
    let var = nearest.iter().map(|d| (mean - d).powi(2)).sum::<f64>() / (n - 1) as f64;
    var.sqrt()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

fn manhattan(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum()
}
