//! Bounded Nelder–Mead simplex search used for model estimation.

use std::cmp::Ordering;

/// Result of Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadResult {
    /// The best point found.
    pub optimal_point: Vec<f64>,
    /// The objective function value at the best point.
    pub optimal_value: f64,
    /// Number of simplex updates performed.
    pub iterations: usize,
    /// Whether a stopping tolerance was met before `max_iter`.
    pub converged: bool,
}

/// Configuration for Nelder-Mead optimization.
#[derive(Debug, Clone)]
pub struct NelderMeadConfig {
    /// Maximum number of simplex updates.
    pub max_iter: usize,
    /// Relative tolerance on the spread of objective values, and on the
    /// simplex diameter.
    pub tolerance: f64,
    /// Reflection coefficient (default: 1.0).
    pub alpha: f64,
    /// Expansion coefficient (default: 2.0).
    pub gamma: f64,
    /// Contraction coefficient (default: 0.5).
    pub rho: f64,
    /// Shrinkage coefficient (default: 0.5).
    pub sigma: f64,
    /// Initial simplex step size (default: 0.05).
    pub initial_step: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iter: 2000,
            tolerance: 1e-8,
            alpha: 1.0,
            gamma: 2.0,
            rho: 0.5,
            sigma: 0.5,
            initial_step: 0.05,
        }
    }
}

#[derive(Debug, Clone)]
struct Vertex {
    point: Vec<f64>,
    value: f64,
}

/// NaN objective values rank behind every finite value.
fn rank(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.total_cmp(&b),
    }
}

/// Minimize `objective` starting from `initial`.
///
/// Each coordinate is clamped to `bounds[i]` when bounds are given. With an
/// empty starting point the objective is evaluated once and reported as
/// converged.
///
/// # Example
/// ```
/// use anofox_weather::utils::optimization::{nelder_mead, NelderMeadConfig};
///
/// // Minimize (x-2)^2 + (y-3)^2
/// let result = nelder_mead(
///     |x| (x[0] - 2.0).powi(2) + (x[1] - 3.0).powi(2),
///     &[0.0, 0.0],
///     None,
///     &NelderMeadConfig::default(),
/// );
///
/// assert!(result.converged);
/// assert!((result.optimal_point[0] - 2.0).abs() < 0.01);
/// assert!((result.optimal_point[1] - 3.0).abs() < 0.01);
/// ```
pub fn nelder_mead<F>(
    objective: F,
    initial: &[f64],
    bounds: Option<&[(f64, f64)]>,
    config: &NelderMeadConfig,
) -> NelderMeadResult
where
    F: Fn(&[f64]) -> f64,
{
    let n = initial.len();
    let start = clamp(initial.to_vec(), bounds);
    if n == 0 {
        return NelderMeadResult {
            optimal_value: objective(&start),
            optimal_point: start,
            iterations: 0,
            converged: true,
        };
    }

    let evaluate = |point: Vec<f64>| {
        let point = clamp(point, bounds);
        let value = objective(&point);
        Vertex { point, value }
    };

    let mut simplex: Vec<Vertex> = Vec::with_capacity(n + 1);
    simplex.push(evaluate(start.clone()));
    for i in 0..n {
        let mut point = start.clone();
        point[i] += if start[i].abs() > 1e-10 {
            config.initial_step * start[i].abs()
        } else {
            config.initial_step
        };
        simplex.push(evaluate(point));
    }

    let mut iterations = 0;
    let mut converged = false;

    loop {
        simplex.sort_by(|a, b| rank(a.value, b.value));
        if has_converged(&simplex, config.tolerance) {
            converged = true;
            break;
        }
        if iterations >= config.max_iter {
            break;
        }
        iterations += 1;

        let best = simplex[0].value;
        let second_worst = simplex[n - 1].value;
        let worst = simplex[n].value;
        let centroid = centroid_without_last(&simplex);

        let reflected = evaluate(towards(&centroid, &simplex[n].point, -config.alpha));

        if rank(reflected.value, best) == Ordering::Less {
            let expanded = evaluate(towards(&centroid, &reflected.point, config.gamma));
            simplex[n] = if rank(expanded.value, reflected.value) == Ordering::Less {
                expanded
            } else {
                reflected
            };
            continue;
        }

        if rank(reflected.value, second_worst) == Ordering::Less {
            simplex[n] = reflected;
            continue;
        }

        let contracted = if rank(reflected.value, worst) == Ordering::Less {
            let outside = evaluate(towards(&centroid, &reflected.point, config.rho));
            (rank(outside.value, reflected.value) != Ordering::Greater).then_some(outside)
        } else {
            let inside = evaluate(towards(&centroid, &simplex[n].point, config.rho));
            (rank(inside.value, worst) == Ordering::Less).then_some(inside)
        };

        match contracted {
            Some(vertex) => simplex[n] = vertex,
            None => {
                let anchor = simplex[0].point.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    *vertex = evaluate(towards(&anchor, &vertex.point, config.sigma));
                }
            }
        }
    }

    let best = simplex.swap_remove(0);
    NelderMeadResult {
        optimal_point: best.point,
        optimal_value: best.value,
        iterations,
        converged,
    }
}

/// Stop when the simplex has collapsed, or when the objective spread is
/// negligible and the simplex is already small. Expects `simplex` sorted
/// best first.
///
/// Equal values alone are not enough: a degenerate simplex, or vertices on
/// either side of the minimum, can tie far from the optimum.
fn has_converged(simplex: &[Vertex], tolerance: f64) -> bool {
    let best = &simplex[0];
    let worst = &simplex[simplex.len() - 1];
    if !best.value.is_finite() {
        return false;
    }

    let scale = 1.0 + best.point.iter().map(|x| x.abs()).fold(0.0, f64::max);
    let diameter = simplex
        .iter()
        .skip(1)
        .flat_map(|v| v.point.iter().zip(&best.point).map(|(a, b)| (a - b).abs()))
        .fold(0.0, f64::max);
    if diameter <= tolerance * scale {
        return true;
    }

    let spread = worst.value - best.value;
    spread.is_finite()
        && spread <= tolerance * (best.value.abs() + tolerance)
        && diameter <= tolerance.sqrt() * scale
}

/// Centroid of every vertex except the last (worst) one.
fn centroid_without_last(simplex: &[Vertex]) -> Vec<f64> {
    let kept = &simplex[..simplex.len() - 1];
    let mut centroid = vec![0.0; kept[0].point.len()];
    for vertex in kept {
        for (c, x) in centroid.iter_mut().zip(&vertex.point) {
            *c += x;
        }
    }
    let count = kept.len() as f64;
    centroid.iter_mut().for_each(|c| *c /= count);
    centroid
}

/// `origin + factor * (target - origin)`.
///
/// A negative factor reflects `target` through `origin`.
fn towards(origin: &[f64], target: &[f64], factor: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, t)| o + factor * (t - o))
        .collect()
}

fn clamp(mut point: Vec<f64>, bounds: Option<&[(f64, f64)]>) -> Vec<f64> {
    if let Some(bounds) = bounds {
        for (x, &(lo, hi)) in point.iter_mut().zip(bounds) {
            *x = x.clamp(lo, hi);
        }
    }
    point
}
