use core_types::{Direction, TimeSeries};
use serde::Serialize;

/// Longest rising and falling runs of a sequence, plus its direction mask.
///
/// Run lengths count steps: `[1, 2, 3]` has a rising run of 2.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakSummary {
    pub longest_up: usize,
    pub longest_down: usize,
    pub mask: TimeSeries<Direction>,
}

/// Tracks the run in progress and the longest committed runs.
#[derive(Debug, Default)]
struct RunTracker {
    direction: Direction,
    length: usize,
    longest_up: usize,
    longest_down: usize,
}

impl RunTracker {
    fn step(&mut self, direction: Direction) {
        if direction != Direction::Flat && direction == self.direction {
            self.length += 1;
            return;
        }

        self.commit();
        self.direction = direction;
        self.length = usize::from(direction != Direction::Flat);
    }

    fn commit(&mut self) {
        match self.direction {
            Direction::Up => self.longest_up = self.longest_up.max(self.length),
            Direction::Down => self.longest_down = self.longest_down.max(self.length),
            Direction::Flat => {}
        }
    }

    /// Commits the trailing run, which no direction change will close.
    fn finish(mut self) -> (usize, usize) {
        self.commit();
        (self.longest_up, self.longest_down)
    }
}

/// Single forward pass computing the longest strictly rising run, the longest
/// strictly falling run and the per-element direction mask.
///
/// Equal neighbours are `Flat`: they end any active run and count toward
/// neither. The mask is aligned with the input and starts with `Flat`.
pub fn compute_streak(series: &TimeSeries<f64>) -> StreakSummary {
    let observations = series.observations();
    let mut tracker = RunTracker::default();

    let mask = series.map_indexed(|i, current| {
        let Some(previous) = i.checked_sub(1).map(|p| observations[p].value) else {
            return Direction::Flat;
        };
        let direction = Direction::between(previous, *current);
        tracker.step(direction);
        direction
    });

    let (longest_up, longest_down) = tracker.finish();
    tracing::trace!(longest_up, longest_down, len = mask.len(), "Streak scan");

    StreakSummary {
        longest_up,
        longest_down,
        mask,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: Vec<f64>) -> TimeSeries<f64> {
        TimeSeries::daily(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), values)
    }

    fn mask_of(summary: &StreakSummary) -> Vec<i8> {
        summary.mask.values().map(|d| d.as_i8()).collect()
    }

    #[test]
    fn monotone_increasing() {
        let summary = compute_streak(&series((1..=100).map(f64::from).collect()));
        assert_eq!(summary.longest_up, 99);
        assert_eq!(summary.longest_down, 0);
        assert_eq!(summary.mask.len(), 100);
        assert_eq!(summary.mask.first().map(|o| o.value), Some(Direction::Flat));
        assert!(summary.mask.values().skip(1).all(|d| *d == Direction::Up));
    }

    #[test]
    fn flat_step_breaks_the_run() {
        let summary = compute_streak(&series(vec![1.0, 2.0, 2.0, 3.0]));
        assert_eq!(summary.longest_up, 1);
        assert_eq!(summary.longest_down, 0);
        assert_eq!(mask_of(&summary), vec![0, 1, 0, 1]);
    }

    #[test]
    fn trailing_run_is_committed() {
        let summary = compute_streak(&series(vec![5.0, 6.0, 4.0, 3.0, 2.0, 1.0]));
        assert_eq!(summary.longest_up, 1);
        assert_eq!(summary.longest_down, 4);
        assert_eq!(mask_of(&summary), vec![0, 1, -1, -1, -1, -1]);
    }

    #[test]
    fn direction_change_without_flat_step() {
        let summary = compute_streak(&series(vec![1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0]));
        assert_eq!(summary.longest_up, 4);
        assert_eq!(summary.longest_down, 2);
    }

    #[test]
    fn short_sequences_have_no_runs() {
        for values in [vec![], vec![42.0]] {
            let summary = compute_streak(&series(values.clone()));
            assert_eq!((summary.longest_up, summary.longest_down), (0, 0));
            assert_eq!(summary.mask.len(), values.len());
            assert!(summary.mask.values().all(|d| *d == Direction::Flat));
        }
    }

    #[test]
    fn mask_serializes_as_integers() {
        let summary = compute_streak(&series(vec![3.0, 2.0, 2.0, 4.0]));
        let json = serde_json::to_value(&summary.mask).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 4);
        assert_eq!(json[1]["value"], -1);
    }
}
