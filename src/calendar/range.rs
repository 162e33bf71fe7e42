use super::util::one_year_before;
use time::Date;

/// A span of calendar days, possibly still being picked.
///
/// Either endpoint may be absent while the user is partway through choosing
/// a range.  When both are present, `from <= to`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct DateRange {
    from: Option<Date>,
    to: Option<Date>,
}

impl DateRange {
    /// Creates a range, swapping the endpoints if they are out of order
    pub(crate) fn new(from: Option<Date>, to: Option<Date>) -> DateRange {
        match (from, to) {
            (Some(a), Some(b)) if a > b => DateRange {
                from: Some(b),
                to: Some(a),
            },
            _ => DateRange { from, to },
        }
    }

    pub(crate) fn between(from: Date, to: Date) -> DateRange {
        DateRange::new(Some(from), Some(to))
    }

    /// The year of days ending with `today`
    pub(crate) fn year_ending(today: Date) -> DateRange {
        DateRange::new(one_year_before(today).or(Some(today)), Some(today))
    }

    /// Fills in whichever endpoints were not given on the command line
    pub(crate) fn resolve(from: Option<Date>, to: Option<Date>, today: Date) -> DateRange {
        match (from, to) {
            (Some(from), Some(to)) => DateRange::between(from, to),
            (Some(from), None) => DateRange::between(from, today.max(from)),
            (None, Some(to)) => DateRange::year_ending(to),
            (None, None) => DateRange::year_ending(today),
        }
    }

    pub(crate) fn from(&self) -> Option<Date> {
        self.from
    }

    pub(crate) fn to(&self) -> Option<Date> {
        self.to
    }

    /// Returns the endpoints if both are present
    pub(crate) fn bounds(&self) -> Option<(Date, Date)> {
        self.from.zip(self.to)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        self.bounds()
            .is_some_and(|(from, to)| from <= date && date <= to)
    }

    /// Starts picking a new range at `date`, discarding the old end
    pub(crate) fn restart_at(self, date: Date) -> DateRange {
        DateRange::new(Some(date), None)
    }

    /// Completes (or re-completes) the range with a new end
    pub(crate) fn end_at(self, date: Date) -> DateRange {
        DateRange::new(self.from.or(Some(date)), Some(date))
    }
}
