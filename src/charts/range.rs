/// Margin added on both sides of the price range, in cents.
pub const RANGE_PADDING: i64 = 10;

/// Rounded price extremes widened by [`RANGE_PADDING`], used for color scales and axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddedRange {
    pub max: i64,
    pub min: i64,
}

impl PaddedRange {
    /// `[min, max]` as a Plotly axis range.
    pub fn as_axis(&self) -> [f64; 2] {
        [self.min as f64, self.max as f64]
    }
}

/// `max = round(max) + 10`, `min = round(min) - 10`, rounding half to even.
///
/// Non-finite values are skipped; `None` when nothing finite remains.
pub fn padded_range<I>(values: I) -> Option<PaddedRange>
where
    I: IntoIterator<Item = f64>,
{
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    Some(PaddedRange {
        max: hi.round_ties_even() as i64 + RANGE_PADDING,
        min: lo.round_ties_even() as i64 - RANGE_PADDING,
    })
}
