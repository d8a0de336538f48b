use std::fmt;

use crate::simulator::Totals;

/// Plain-text rendering of a finished simulation, split count first.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Summary(pub Totals);

impl From<Totals> for Summary {
    fn from(totals: Totals) -> Self {
        Self(totals)
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total splits: {}", self.0.split_count)?;
        write!(f, "Total timelines: {}", self.0.finished_timelines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_splits_before_timelines() {
        let summary = Summary::from(Totals {
            split_count: 21,
            finished_timelines: 40,
        });
        assert_eq!("Total splits: 21\nTotal timelines: 40", summary.to_string());
    }
}
