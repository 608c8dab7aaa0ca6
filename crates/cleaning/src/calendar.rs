use chrono::{Datelike, NaiveDateTime, Weekday};
use core_types::TimeSeries;

/// Monday through Friday. Exchange holidays are not known here.
pub fn is_trading_day(timestamp: &NaiveDateTime) -> bool {
    !matches!(timestamp.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Drops Saturday and Sunday observations, keeping everything else in order.
///
/// Weekday holidays are left in place. Applying this twice is the same as
/// applying it once.
pub fn remove_non_trading_days<T: Clone>(series: &TimeSeries<T>) -> TimeSeries<T> {
    series.filter(|o| is_trading_day(&o.timestamp))
}
