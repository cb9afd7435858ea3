//! Savitzky-Golay smoothing for the daily traffic line chart.
//!
//! Each point is replaced by the value at the centre of a least-squares
//! polynomial fitted to the surrounding window. The first and last half
//! windows are taken from polynomials fitted to the first and last full
//! window, so the output has the same length as the input.

use anyhow::{anyhow, bail};

/// Window length used by the dashboard's traffic chart.
pub const DEFAULT_WINDOW: usize = 53;

/// Polynomial order used by the dashboard's traffic chart.
pub const DEFAULT_POLYORDER: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct SavitzkyGolay {
    window: usize,
    polyorder: usize,
    /// Window offsets, centred on zero
    offsets: Vec<f64>,
    /// Normal matrix `AᵀA` of the window's Vandermonde matrix
    normal: Vec<Vec<f64>>,
    /// Convolution weights producing the fitted value at the window centre
    center_weights: Vec<f64>,
}

impl SavitzkyGolay {
    /// Build a filter. `window` must be odd and greater than `polyorder`.
    pub fn new(window: usize, polyorder: usize) -> anyhow::Result<Self> {
        if window % 2 == 0 {
            bail!("Savitzky-Golay window length must be odd, got {}", window);
        }
        if polyorder >= window {
            bail!(
                "Savitzky-Golay polynomial order {} must be less than the window length {}",
                polyorder,
                window
            );
        }

        let half = (window / 2) as i64;
        let offsets: Vec<f64> = (-half..=half).map(|x| x as f64).collect();
        let terms = polyorder + 1;
        let normal: Vec<Vec<f64>> = (0..terms)
            .map(|row| {
                (0..terms)
                    .map(|col| offsets.iter().map(|x| x.powi((row + col) as i32)).sum())
                    .collect()
            })
            .collect();

        let mut unit = vec![0.0; terms];
        unit[0] = 1.0;
        let z = solve(normal.clone(), unit)
            .ok_or_else(|| anyhow!("Savitzky-Golay normal matrix is singular"))?;
        let center_weights = offsets.iter().map(|&x| evaluate(&z, x)).collect();

        Ok(SavitzkyGolay {
            window,
            polyorder,
            offsets,
            normal,
            center_weights,
        })
    }

    /// The filter the traffic chart uses: window 53, cubic polynomials.
    pub fn dashboard_default() -> anyhow::Result<Self> {
        SavitzkyGolay::new(DEFAULT_WINDOW, DEFAULT_POLYORDER)
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn polyorder(&self) -> usize {
        self.polyorder
    }

    /// Smooth `values`. Series shorter than the window come back unchanged.
    pub fn apply(&self, values: &[f64]) -> Vec<f64> {
        let n = values.len();
        if n < self.window {
            log::debug!(
                "[ATD] smoothing: series of {} points is shorter than window {}, left as is",
                n,
                self.window
            );
            return values.to_vec();
        }

        let half = self.window / 2;
        let mut smoothed = values.to_vec();
        for (i, slot) in smoothed.iter_mut().enumerate().take(n - half).skip(half) {
            *slot = values[i - half..=i + half]
                .iter()
                .zip(&self.center_weights)
                .map(|(v, w)| v * w)
                .sum();
        }

        if let Some(head) = self.fit(&values[..self.window]) {
            for (i, slot) in smoothed.iter_mut().enumerate().take(half) {
                *slot = evaluate(&head, self.offsets[i]);
            }
        }
        let tail_start = n - self.window;
        if let Some(tail) = self.fit(&values[tail_start..]) {
            for i in n - half..n {
                smoothed[i] = evaluate(&tail, self.offsets[i - tail_start]);
            }
        }
        smoothed
    }

    /// Least-squares polynomial coefficients for one window of values.
    fn fit(&self, window_values: &[f64]) -> Option<Vec<f64>> {
        let rhs: Vec<f64> = (0..=self.polyorder)
            .map(|k| {
                self.offsets
                    .iter()
                    .zip(window_values)
                    .map(|(x, y)| x.powi(k as i32) * y)
                    .sum()
            })
            .collect();
        solve(self.normal.clone(), rhs)
    }
}

/// Evaluate `Σ coefficients[k] · x^k`.
fn evaluate(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Gaussian elimination with partial pivoting. `None` if the matrix is
/// singular to working precision, judged against its largest entry.
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Option<Vec<f64>> {
    let n = b.len();
    let scale = a
        .iter()
        .flatten()
        .fold(0.0_f64, |max, value| max.max(value.abs()));
    let tolerance = f64::EPSILON * scale * n as f64;
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))?;
        if a[pivot][col].abs() <= tolerance {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);
        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Some(x)
}
