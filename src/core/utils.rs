//! Utility functions and types.
use serde::{Deserialize, Serialize};

/// Returns the Boltzmann steady state `1 / (1 + exp((v_half - v) / slope))`.
/// A positive slope gives an activation curve, a negative one an inactivation curve.
#[inline]
pub fn boltzmann(v: f64, v_half: f64, slope: f64) -> f64 {
    1.0 / (1.0 + ((v_half - v) / slope).exp())
}

/// A closed time interval, inclusive on both ends.
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum TimeInterval {
    /// A closed interval [start, end].
    Closed { start: f64, end: f64 },
    /// An empty time interval.
    Empty,
}

impl TimeInterval {
    /// Create the interval [start, end], or an empty one if `end < start`.
    pub fn new(start: f64, end: f64) -> Self {
        if start > end {
            TimeInterval::Empty
        } else {
            TimeInterval::Closed { start, end }
        }
    }

    /// Returns the interval [start, +inf).
    pub fn starting_at(start: f64) -> Self {
        TimeInterval::new(start, f64::INFINITY)
    }

    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        match self {
            TimeInterval::Closed { start, end } => time >= *start && time <= *end,
            TimeInterval::Empty => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, TimeInterval::Empty)
    }
}

/// A union of closed time intervals, sorted and merged on construction.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct TimeIntervalUnion {
    intervals: Vec<TimeInterval>,
}

impl TimeIntervalUnion {
    /// Create a union from intervals given in any order.
    /// Overlapping intervals are merged and empty ones are dropped.
    pub fn new_from(intervals: Vec<TimeInterval>) -> Self {
        let mut bounds: Vec<(f64, f64)> = intervals
            .iter()
            .filter_map(|interval| match interval {
                TimeInterval::Closed { start, end } => Some((*start, *end)),
                TimeInterval::Empty => None,
            })
            .collect();
        bounds.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));

        let mut merged: Vec<(f64, f64)> = Vec::with_capacity(bounds.len());
        for (start, end) in bounds {
            match merged.last_mut() {
                Some(last) if start <= last.1 => last.1 = last.1.max(end),
                _ => merged.push((start, end)),
            }
        }

        TimeIntervalUnion {
            intervals: merged
                .into_iter()
                .map(|(start, end)| TimeInterval::Closed { start, end })
                .collect(),
        }
    }

    #[inline]
    pub fn contains(&self, time: f64) -> bool {
        self.intervals.iter().any(|interval| interval.contains(time))
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<TimeInterval> {
        self.intervals.iter()
    }
}

impl From<TimeInterval> for TimeIntervalUnion {
    fn from(interval: TimeInterval) -> Self {
        TimeIntervalUnion::new_from(vec![interval])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_boltzmann() {
        assert_relative_eq!(boltzmann(-40.0, -40.0, 2.5), 0.5);
        assert!(boltzmann(0.0, -40.0, 2.5) > 0.999);
        assert!(boltzmann(0.0, -40.0, -2.5) < 0.001);
        assert_relative_eq!(
            boltzmann(-67.0, -55.2, -7.1),
            1.0 / (1.0 + ((-55.2 - (-67.0)) / -7.1_f64).exp())
        );
    }

    #[test]
    fn test_interval_contains() {
        let interval = TimeInterval::new(100.0, 9500.0);
        assert_eq!(interval.contains(99.99), false);
        assert_eq!(interval.contains(100.0), true);
        assert_eq!(interval.contains(9500.0), true);
        assert_eq!(interval.contains(9500.01), false);
        assert!(TimeInterval::new(1.0, 0.0).is_empty());
        assert!(TimeInterval::starting_at(0.0).contains(1e12));
    }

    #[test]
    fn test_union_merges_overlaps() {
        let union = TimeIntervalUnion::new_from(vec![
            TimeInterval::new(1500.0, 1600.0),
            TimeInterval::new(800.0, 900.0),
            TimeInterval::new(850.0, 1000.0),
            TimeInterval::Empty,
        ]);
        assert_eq!(
            union.iter().cloned().collect::<Vec<_>>(),
            vec![TimeInterval::new(800.0, 1000.0), TimeInterval::new(1500.0, 1600.0)]
        );
        assert_eq!(union.contains(950.0), true);
        assert_eq!(union.contains(1200.0), false);
        assert_eq!(union.contains(1600.0), true);
        assert!(TimeIntervalUnion::new_from(vec![]).is_empty());
    }
}
