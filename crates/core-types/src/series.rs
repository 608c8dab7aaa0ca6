use crate::error::CoreError;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::Serialize;

/// A single `(timestamp, value)` pair of a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation<T> {
    pub timestamp: NaiveDateTime,
    pub value: T,
}

impl<T> Observation<T> {
    pub fn new(timestamp: NaiveDateTime, value: T) -> Self {
        Self { timestamp, value }
    }
}

/// An ordered sequence of observations with non-decreasing timestamps.
///
/// The ordering invariant is checked whenever a series is built from
/// caller-supplied parts. Operations that derive a new series from an existing
/// one (`map_values`, `filter`) keep the source alignment and cannot break it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TimeSeries<T> {
    observations: Vec<Observation<T>>,
}

/// A price sequence that may contain gaps. `None` and NaN both mean "missing".
pub type PriceSeries = TimeSeries<Option<f64>>;

impl<T> Default for TimeSeries<T> {
    fn default() -> Self {
        Self {
            observations: Vec::new(),
        }
    }
}

impl<T> TimeSeries<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a series from observations, rejecting decreasing timestamps.
    pub fn from_observations(observations: Vec<Observation<T>>) -> Result<Self, CoreError> {
        check_ordered(observations.iter().map(|o| o.timestamp))?;
        Ok(Self { observations })
    }

    /// Zips timestamps with values into a series.
    pub fn from_parts(timestamps: Vec<NaiveDateTime>, values: Vec<T>) -> Result<Self, CoreError> {
        if timestamps.len() != values.len() {
            return Err(CoreError::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }

        let observations = timestamps
            .into_iter()
            .zip(values)
            .map(|(timestamp, value)| Observation { timestamp, value })
            .collect();

        Self::from_observations(observations)
    }

    /// One observation per calendar day starting at midnight of `start`.
    pub fn daily(start: NaiveDate, values: Vec<T>) -> Self {
        let origin = start.and_time(NaiveTime::MIN);
        let observations = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| Observation {
                timestamp: origin + Duration::days(i as i64),
                value,
            })
            .collect();

        Self { observations }
    }

    /// One observation per weekday starting at the first weekday on or after `start`.
    pub fn weekdays(start: NaiveDate, values: Vec<T>) -> Self {
        let mut day = start;
        let mut observations = Vec::with_capacity(values.len());

        for value in values {
            while matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                day = day + Duration::days(1);
            }
            observations.push(Observation {
                timestamp: day.and_time(NaiveTime::MIN),
                value,
            });
            day = day + Duration::days(1);
        }

        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation<T>] {
        &self.observations
    }

    pub fn get(&self, index: usize) -> Option<&Observation<T>> {
        self.observations.get(index)
    }

    pub fn first(&self) -> Option<&Observation<T>> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation<T>> {
        self.observations.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation<T>> {
        self.observations.iter()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.observations.iter().map(|o| o.timestamp)
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.observations.iter().map(|o| &o.value)
    }

    pub fn into_values(self) -> Vec<T> {
        self.observations.into_iter().map(|o| o.value).collect()
    }

    /// Derives a new series with the same timestamps.
    pub fn map_values<U>(&self, mut f: impl FnMut(&T) -> U) -> TimeSeries<U> {
        self.map_indexed(|_, value| f(value))
    }

    /// Like [`TimeSeries::map_values`], also passing each element's position.
    pub fn map_indexed<U>(&self, mut f: impl FnMut(usize, &T) -> U) -> TimeSeries<U> {
        let observations = self
            .observations
            .iter()
            .enumerate()
            .map(|(i, o)| Observation {
                timestamp: o.timestamp,
                value: f(i, &o.value),
            })
            .collect();

        TimeSeries { observations }
    }

    /// Keeps the observations for which `keep` returns true, in order.
    pub fn filter(&self, mut keep: impl FnMut(&Observation<T>) -> bool) -> TimeSeries<T>
    where
        T: Clone,
    {
        let observations = self
            .observations
            .iter()
            .filter(|o| keep(o))
            .cloned()
            .collect();

        TimeSeries { observations }
    }
}

impl<'a, T> IntoIterator for &'a TimeSeries<T> {
    type Item = &'a Observation<T>;
    type IntoIter = std::slice::Iter<'a, Observation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

/// True when a price slot holds no usable number.
pub fn is_missing(value: &Option<f64>) -> bool {
    value.is_none_or(f64::is_nan)
}

impl TimeSeries<Option<f64>> {
    /// Iterates over the present values, skipping gaps.
    pub fn present_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values().filter_map(|v| v.filter(|x| !x.is_nan()))
    }

    pub fn missing_count(&self) -> usize {
        self.values().filter(|v| is_missing(v)).count()
    }

    /// Converts into a gap-free series, failing at the first missing slot.
    pub fn require_complete(&self) -> Result<TimeSeries<f64>, CoreError> {
        let mut observations = Vec::with_capacity(self.len());
        for (index, o) in self.observations.iter().enumerate() {
            match o.value {
                Some(value) if !value.is_nan() => observations.push(Observation {
                    timestamp: o.timestamp,
                    value,
                }),
                _ => return Err(CoreError::MissingValue { index }),
            }
        }

        Ok(TimeSeries { observations })
    }
}

impl TimeSeries<f64> {
    /// Lifts a complete series into a price series.
    pub fn to_price_series(&self) -> PriceSeries {
        self.map_values(|v| Some(*v))
    }
}

pub(crate) fn check_ordered(
    timestamps: impl IntoIterator<Item = NaiveDateTime>,
) -> Result<(), CoreError> {
    let mut previous: Option<NaiveDateTime> = None;
    for (index, next) in timestamps.into_iter().enumerate() {
        if let Some(previous) = previous {
            if next < previous {
                return Err(CoreError::UnorderedTimestamps {
                    index,
                    previous,
                    next,
                });
            }
        }
        previous = Some(next);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn from_parts_rejects_decreasing_timestamps() {
        let t0 = monday().and_time(NaiveTime::MIN);
        let t1 = t0 + Duration::days(1);

        let err = TimeSeries::from_parts(vec![t1, t0], vec![1.0, 2.0]).unwrap_err();
        assert!(matches!(err, CoreError::UnorderedTimestamps { index: 1, .. }));

        // Repeated timestamps are allowed.
        assert!(TimeSeries::from_parts(vec![t0, t0], vec![1.0, 2.0]).is_ok());
    }

    #[test]
    fn from_parts_rejects_length_mismatch() {
        let t0 = monday().and_time(NaiveTime::MIN);
        let err = TimeSeries::from_parts(vec![t0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, CoreError::LengthMismatch { timestamps: 1, values: 2 });
    }

    #[test]
    fn weekdays_skips_saturday_and_sunday() {
        // 2024-01-05 is a Friday.
        let start = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let series = TimeSeries::weekdays(start, vec![1, 2, 3]);
        let days: Vec<u32> = series.timestamps().map(|t| t.day()).collect();
        assert_eq!(days, vec![5, 8, 9]);
    }

    #[test]
    fn require_complete_reports_first_gap() {
        let series = TimeSeries::daily(monday(), vec![Some(1.0), Some(f64::NAN), None]);
        assert_eq!(series.missing_count(), 2);
        assert_eq!(series.require_complete(), Err(CoreError::MissingValue { index: 1 }));

        let complete = TimeSeries::daily(monday(), vec![Some(1.0), Some(2.0)])
            .require_complete()
            .unwrap();
        assert_eq!(complete.into_values(), vec![1.0, 2.0]);
    }

    #[test]
    fn map_and_filter_keep_alignment() {
        let series = TimeSeries::daily(monday(), vec![1.0, 2.0, 3.0]);
        let doubled = series.map_values(|v| v * 2.0);
        assert_eq!(doubled.timestamps().collect::<Vec<_>>(), series.timestamps().collect::<Vec<_>>());

        let odd = series.filter(|o| o.value != 2.0);
        assert_eq!(odd.len(), 2);
        assert_eq!(odd.get(1).map(|o| o.timestamp), series.get(2).map(|o| o.timestamp));
    }
}
