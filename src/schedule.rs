//! Ordered sequences of pointings.
use std::ops::Deref;

use itertools::Itertools;

use crate::pointing::{movement_cost, Pointing};

/// An ordered plan: every pointing is visited once, in index order `0..N-1`.
///
/// A schedule is immutable once built; it dereferences to a slice of [`Pointing`]s.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schedule {
    pointings: Vec<Pointing>,
}

impl Schedule {
    pub fn new(pointings: Vec<Pointing>) -> Self {
        Schedule { pointings }
    }

    /// Sum of the movement costs between consecutive pointings.
    ///
    /// A schedule with zero or one pointing has a total distance of exactly `0`.
    pub fn total_distance(&self) -> f64 {
        total_distance(&self.pointings)
    }

    /// Number of pointings visited in their other (mirror-flipped) representation.
    pub fn count_other_representation(&self) -> usize {
        self.pointings
            .iter()
            .filter(|p| p.is_other_representation())
            .count()
    }

    pub fn into_inner(self) -> Vec<Pointing> {
        self.pointings
    }
}

impl Deref for Schedule {
    type Target = [Pointing];

    fn deref(&self) -> &Self::Target {
        &self.pointings
    }
}

impl FromIterator<Pointing> for Schedule {
    fn from_iter<I: IntoIterator<Item = Pointing>>(iter: I) -> Self {
        Schedule {
            pointings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Schedule {
    type Item = &'a Pointing;
    type IntoIter = std::slice::Iter<'a, Pointing>;

    fn into_iter(self) -> Self::IntoIter {
        self.pointings.iter()
    }
}

/// Total movement cost of visiting `pointings` in order (`N-1` pairwise costs).
pub fn total_distance(pointings: &[Pointing]) -> f64 {
    pointings
        .iter()
        .tuple_windows()
        .map(|(a, b)| movement_cost(a, b))
        .sum()
}

#[cfg(test)]
mod schedule_test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_total_distance_short_schedules() {
        assert_eq!(Schedule::default().total_distance(), 0.0);
        assert_eq!(
            Schedule::new(vec![Pointing::new(0, 1.0, 0.5)]).total_distance(),
            0.0
        );
    }

    #[test]
    fn test_total_distance_sums_pairs() {
        let schedule: Schedule = vec![
            Pointing::new(0, 0.0, 0.1),
            Pointing::new(1, 0.3, 0.1),
            Pointing::new(2, 0.3, 0.6),
            Pointing::new(3, 6.2, 0.6),
        ]
        .into_iter()
        .collect();

        let expected = 0.3 + 0.5 + (0.3 - 6.2 + std::f64::consts::TAU);
        assert_relative_eq!(schedule.total_distance(), expected, epsilon = 1e-12);
        assert_eq!(schedule.len(), 4);
    }

    #[test]
    fn test_count_other_representation() {
        let schedule = Schedule::new(vec![
            Pointing::new(0, 0.0, 0.1),
            Pointing::new(1, 0.3, 0.1).switch_representation(),
            Pointing::new(2, 0.3, 0.0),
        ]);
        assert_eq!(schedule.count_other_representation(), 1);
    }
}
