//! Trunk diameter density curve.
//!
//! A Gaussian kernel density estimate sampled at evenly spaced diameters
//! across the data extent. The bandwidth follows Scott's rule with the
//! interquartile range guard used by common plotting grammars.

use blossom_map_chart_models::{DensityCurve, DensityPoint};
use blossom_map_tree_models::{TreeRecord, TreeView};

/// Number of samples along the diameter axis.
pub const DENSITY_STEPS: usize = 200;

/// Estimates the density of trunk diameters in centimeters.
///
/// Rows without a diameter and diameters outside `0..=max_cm` are left
/// out. With no diameters left the curve has no points.
#[must_use]
pub fn diameter_density(view: &TreeView<'_>, max_cm: f64, x_domain: [f64; 2]) -> DensityCurve {
    let mut values: Vec<f64> = view
        .iter()
        .filter_map(TreeRecord::diameter_cm)
        .filter(|cm| (0.0..=max_cm).contains(cm))
        .collect();
    values.sort_by(f64::total_cmp);

    let (bandwidth, points) = match (values.first(), values.last()) {
        (Some(&lo), Some(&hi)) => {
            let bandwidth = bandwidth(&values);
            let (lo, hi) = if hi > lo {
                (lo, hi)
            } else {
                (lo - 3.0 * bandwidth, hi + 3.0 * bandwidth)
            };
            (Some(bandwidth), sample(&values, bandwidth, lo, hi))
        }
        _ => (None, vec![]),
    };

    DensityCurve {
        x_title: "Tree diameter (cm)".to_string(),
        x_domain,
        sample_size: values.len(),
        bandwidth,
        points,
    }
}

#[allow(clippy::cast_precision_loss)]
fn sample(values: &[f64], bandwidth: f64, lo: f64, hi: f64) -> Vec<DensityPoint> {
    let step = (hi - lo) / (DENSITY_STEPS - 1) as f64;
    (0..DENSITY_STEPS)
        .map(|i| {
            let diameter_cm = (i as f64).mul_add(step, lo);
            DensityPoint {
                diameter_cm,
                density: kernel_density(values, bandwidth, diameter_cm),
            }
        })
        .collect()
}

#[allow(clippy::cast_precision_loss)]
fn kernel_density(values: &[f64], bandwidth: f64, x: f64) -> f64 {
    let sum: f64 = values
        .iter()
        .map(|v| standard_normal((x - v) / bandwidth))
        .sum();
    sum / (values.len() as f64 * bandwidth)
}

fn standard_normal(z: f64) -> f64 {
    (-0.5 * z * z).exp() / (2.0 * std::f64::consts::PI).sqrt()
}

/// Scott's rule bandwidth over sorted values.
///
/// Falls back to the standard deviation, then the magnitude of the first
/// quartile, then one, when the preceding spread estimate is zero.
#[allow(clippy::cast_precision_loss)]
fn bandwidth(sorted: &[f64]) -> f64 {
    let q1 = quantile(sorted, 0.25);
    let q3 = quantile(sorted, 0.75);
    let iqr_spread = (q3 - q1) / 1.34;
    let deviation = deviation(sorted);

    let spread = [deviation.min(iqr_spread), deviation, q1.abs()]
        .into_iter()
        .find(|v| *v > 0.0 && v.is_finite())
        .unwrap_or(1.0);

    1.06 * spread * (sorted.len() as f64).powf(-0.2)
}

/// Linear interpolation between closest ranks.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let Some(&first) = sorted.first() else {
        return f64::NAN;
    };
    let h = (sorted.len() - 1) as f64 * p;
    let lower = h.floor() as usize;
    let lo = sorted.get(lower).copied().unwrap_or(first);
    let hi = sorted.get(lower + 1).copied().unwrap_or(lo);
    (h - h.floor()).mul_add(hi - lo, lo)
}

/// Sample standard deviation; NaN below two values.
#[allow(clippy::cast_precision_loss)]
fn deviation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (squares / (n - 1.0)).sqrt()
}
