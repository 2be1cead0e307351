use statrs::distribution::{ChiSquared, ContinuousCDF};

/// 2x2 table for one edge X->Y:
///
/// ```text
/// w_xy    w_nx_y
/// w_x_ny  w_nx_ny
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contingency {
    pub w_xy: u64,
    pub w_nx_y: u64,
    pub w_x_ny: u64,
    pub w_nx_ny: u64,
}

impl Contingency {
    /// `out_sum`/`in_sum` are the summed weights leaving X and entering Y,
    /// `coverage` the estimated depth at X. The no-X-no-Y cell is floored at 1.
    pub fn for_edge(weight: u64, out_sum: u64, in_sum: u64, coverage: u64) -> Self {
        let w_x_ny = out_sum.saturating_sub(weight);
        let w_nx_y = in_sum.saturating_sub(weight);
        let rest = coverage as i128 - weight as i128 - w_x_ny as i128 - w_nx_y as i128;
        Contingency {
            w_xy: weight,
            w_nx_y,
            w_x_ny,
            w_nx_ny: rest.max(1) as u64,
        }
    }

    fn cells(&self) -> [[f64; 2]; 2] {
        [
            [self.w_xy as f64, self.w_nx_y as f64],
            [self.w_x_ny as f64, self.w_nx_ny as f64],
        ]
    }

    /// Pearson chi-square test of independence with Yates' continuity
    /// correction. Returns `(statistic, p-value)`.
    pub fn chi_square(&self) -> (f64, f64) {
        chi_square_yates(self.cells())
    }
}

pub fn chi_square_yates(observed: [[f64; 2]; 2]) -> (f64, f64) {
    let rows = [
        observed[0][0] + observed[0][1],
        observed[1][0] + observed[1][1],
    ];
    let cols = [
        observed[0][0] + observed[1][0],
        observed[0][1] + observed[1][1],
    ];
    let total = rows[0] + rows[1];
    if total <= 0.0 || rows.iter().chain(cols.iter()).any(|&m| m <= 0.0) {
        return (0.0, 1.0);
    }

    let mut statistic = 0.0;
    for i in 0..2 {
        for j in 0..2 {
            let expected = rows[i] * cols[j] / total;
            let diff = expected - observed[i][j];
            let corrected = observed[i][j] + diff.signum() * diff.abs().min(0.5);
            statistic += (corrected - expected).powi(2) / expected;
        }
    }

    let p_value = ChiSquared::new(1.0)
        .map(|dist| dist.sf(statistic))
        .unwrap_or(1.0);
    (statistic, p_value)
}
