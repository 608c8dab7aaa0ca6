use core_types::{PriceSeries, is_missing};

/// True iff any element of the series is missing (`None` or NaN).
pub fn has_missing(series: &PriceSeries) -> bool {
    series.values().any(is_missing)
}

/// Forward-fills, then back-fills the leading gap.
///
/// Every missing slot takes the nearest prior present value; slots before the
/// first present value take that first value instead. An all-missing input
/// comes back all-missing. Length and timestamps are preserved.
pub fn fill_gaps(series: &PriceSeries) -> PriceSeries {
    let first_present = series.present_values().next();
    let mut last_seen: Option<f64> = None;

    series.map_values(|value| {
        if !is_missing(value) {
            last_seen = *value;
        }
        last_seen.or(first_present)
    })
}

/// Linear interpolation by position, forward direction only.
///
/// Interior gaps are interpolated between their present neighbours, trailing
/// gaps repeat the last present value and leading gaps stay missing.
pub fn interpolate_gaps(series: &PriceSeries) -> PriceSeries {
    let values: Vec<Option<f64>> = series.values().map(|v| v.filter(|x| !x.is_nan())).collect();
    let mut filled = values.clone();
    let mut previous: Option<(usize, f64)> = None;

    for (i, value) in values.iter().enumerate() {
        let Some(current) = *value else { continue };

        if let Some((start, start_value)) = previous {
            let span = (i - start) as f64;
            for (offset, slot) in filled[start + 1..i].iter_mut().enumerate() {
                let step = (current - start_value) * (offset + 1) as f64 / span;
                *slot = Some(start_value + step);
            }
        }
        previous = Some((i, current));
    }

    if let Some((last, last_value)) = previous {
        for slot in &mut filled[last + 1..] {
            *slot = Some(last_value);
        }
    }

    // `values` has the same length and order as `series`.
    series.map_indexed(|i, _| filled[i])
}
