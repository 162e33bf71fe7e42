use super::range::DateRange;
use super::util::{iter_days_from, month_abbrev, DateKey, WeekStart, DAYS_IN_WEEK};
use crate::selection::Selection;
use std::ops::Index;
use time::Date;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DayCell {
    pub(crate) date: Date,
    pub(crate) is_selected: bool,
    pub(crate) is_in_range: bool,
    pub(crate) is_month_start: bool,
}

impl DayCell {
    fn new(date: Date, range: &DateRange, selection: &Selection) -> DayCell {
        DayCell {
            date,
            is_selected: selection.contains(DateKey::from(date)),
            is_in_range: range.contains(date),
            is_month_start: date.day() == 1,
        }
    }

    pub(crate) fn key(&self) -> DateKey {
        DateKey::from(self.date)
    }
}

/// One column of the calendar: seven consecutive days beginning on the
/// configured first day of the week
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Week([DayCell; DAYS_IN_WEEK]);

impl Week {
    pub(crate) fn iter(&self) -> std::slice::Iter<'_, DayCell> {
        self.0.iter()
    }

    pub(crate) fn get(&self, day: usize) -> Option<&DayCell> {
        self.0.get(day)
    }
}

impl Index<usize> for Week {
    type Output = DayCell;

    fn index(&self, day: usize) -> &DayCell {
        &self.0[day]
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct MonthLabel {
    pub(crate) text: &'static str,
    /// Index of the week column containing the first of the month
    pub(crate) column: usize,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Grid {
    weeks: Vec<Week>,
    month_labels: Vec<MonthLabel>,
    week_start: WeekStart,
}

impl Grid {
    fn empty(week_start: WeekStart) -> Grid {
        Grid {
            weeks: Vec::new(),
            month_labels: Vec::new(),
            week_start,
        }
    }

    pub(crate) fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub(crate) fn month_labels(&self) -> &[MonthLabel] {
        &self.month_labels
    }

    pub(crate) fn week_start(&self) -> WeekStart {
        self.week_start
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub(crate) fn cell(&self, week: usize, day: usize) -> Option<&DayCell> {
        self.weeks.get(week)?.get(day)
    }

    /// Returns the (week, day) coordinates of the first in-range cell
    pub(crate) fn first_in_range(&self) -> Option<(usize, usize)> {
        self.cells().find(|(_, c)| c.is_in_range).map(|(pos, _)| pos)
    }

    /// Returns the (week, day) coordinates of the cell for `date`, if shown
    #[cfg(test)]
    pub(crate) fn position_of(&self, date: Date) -> Option<(usize, usize)> {
        self.cells().find(|(_, c)| c.date == date).map(|(pos, _)| pos)
    }

    fn cells(&self) -> impl Iterator<Item = ((usize, usize), &DayCell)> + '_ {
        self.weeks.iter().enumerate().flat_map(|(i, week)| {
            week.iter()
                .enumerate()
                .map(move |(j, cell)| ((i, j), cell))
        })
    }
}

/// Lays out the days of `range` in week columns.
///
/// The first column begins on the `week_start` day on or before the start of
/// the range, and there are `ceil(n / 7)` columns for a range of `n` days.
/// Cells outside the range are still present but have `is_in_range` unset.
/// An incomplete range produces an empty grid.
pub(crate) fn build_grid(range: &DateRange, selection: &Selection, week_start: WeekStart) -> Grid {
    let Some((from, to)) = range.bounds() else {
        return Grid::empty(week_start);
    };
    let Some(grid_start) = week_start.start_of_week(from) else {
        return Grid::empty(week_start);
    };
    let total_days = usize::try_from((to - from).whole_days())
        .unwrap_or_default()
        .saturating_add(1);
    let total_weeks = total_days.div_ceil(DAYS_IN_WEEK);
    let mut days = iter_days_from(grid_start);
    let mut weeks = Vec::with_capacity(total_weeks);
    for _ in 0..total_weeks {
        let cells = days
            .by_ref()
            .take(DAYS_IN_WEEK)
            .map(|date| DayCell::new(date, range, selection))
            .collect::<Vec<_>>();
        // A short week means we ran into the end of time.
        let Ok(cells) = <[DayCell; DAYS_IN_WEEK]>::try_from(cells) else {
            break;
        };
        weeks.push(Week(cells));
    }
    let month_labels = month_labels(&weeks);
    Grid {
        weeks,
        month_labels,
        week_start,
    }
}

fn month_labels(weeks: &[Week]) -> Vec<MonthLabel> {
    weeks
        .iter()
        .flat_map(Week::iter)
        .enumerate()
        .filter(|(_, cell)| cell.is_month_start)
        // The column is floor(week + day/7), and day < 7, so it is simply
        // the week index.
        .map(|(i, cell)| MonthLabel {
            text: month_abbrev(cell.date.month()),
            column: i / DAYS_IN_WEEK,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;
    use time::Duration;

    fn key(s: &str) -> DateKey {
        s.parse().unwrap()
    }

    fn in_range_dates(grid: &Grid) -> Vec<Date> {
        grid.weeks()
            .iter()
            .flat_map(Week::iter)
            .filter(|c| c.is_in_range)
            .map(|c| c.date)
            .collect()
    }

    #[test]
    fn test_incomplete_range_is_empty() {
        let selection = Selection::from_iter([key("2024-06-02")]);
        for range in [
            DateRange::default(),
            DateRange::new(Some(date!(2024 - 06 - 01)), None),
            DateRange::new(None, Some(date!(2024 - 06 - 01))),
        ] {
            for ws in [WeekStart::Sunday, WeekStart::Monday] {
                let grid = build_grid(&range, &selection, ws);
                assert!(grid.is_empty());
                assert!(grid.month_labels().is_empty());
                assert_eq!(grid.first_in_range(), None);
            }
        }
    }

    #[test]
    fn test_week_count() {
        let from = date!(2023 - 11 - 16);
        for len in 0..40 {
            let to = from + Duration::days(len);
            let range = DateRange::between(from, to);
            for ws in [WeekStart::Sunday, WeekStart::Monday] {
                let grid = build_grid(&range, &Selection::new(), ws);
                let days = usize::try_from(len).unwrap() + 1;
                assert_eq!(grid.weeks().len(), days.div_ceil(7), "{len} days after, {ws:?}");
                for week in grid.weeks() {
                    assert_eq!(week.iter().count(), 7);
                }
            }
        }
    }

    #[test]
    fn test_cells_are_consecutive_from_week_start() {
        let range = DateRange::between(date!(2024 - 02 - 21), date!(2024 - 03 - 12));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        let dates = grid
            .weeks()
            .iter()
            .flat_map(Week::iter)
            .map(|c| c.date)
            .collect::<Vec<_>>();
        assert_eq!(dates.len(), 21);
        assert_eq!(dates[0], date!(2024 - 02 - 18));
        for pair in dates.windows(2) {
            assert_eq!(pair[0].next_day(), Some(pair[1]));
        }
    }

    #[test]
    fn test_monday_start() {
        let range = DateRange::between(date!(2024 - 02 - 21), date!(2024 - 03 - 12));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Monday);
        assert_eq!(grid.week_start(), WeekStart::Monday);
        assert_eq!(grid.weeks()[0][0].date, date!(2024 - 02 - 19));
        for week in grid.weeks() {
            assert_eq!(week[0].date.weekday(), time::Weekday::Monday);
        }
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::between(date!(2024 - 01 - 01), date!(2024 - 01 - 01));
        for ws in [WeekStart::Sunday, WeekStart::Monday] {
            let grid = build_grid(&range, &Selection::new(), ws);
            assert_eq!(grid.weeks().len(), 1);
            assert_eq!(in_range_dates(&grid), [date!(2024 - 01 - 01)]);
        }
    }

    #[test]
    fn test_in_range_is_inclusive() {
        let from = date!(2024 - 03 - 06);
        let to = date!(2024 - 04 - 05);
        let range = DateRange::between(from, to);
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        for cell in grid.weeks().iter().flat_map(Week::iter) {
            assert_eq!(
                cell.is_in_range,
                from <= cell.date && cell.date <= to,
                "{}",
                cell.date
            );
        }
        let shown = in_range_dates(&grid);
        assert_eq!(shown.first(), Some(&from));
        assert_eq!(shown.last(), Some(&to));
    }

    #[test]
    fn test_trailing_days_past_last_week_are_not_shown() {
        // 2024-06-01 is a Saturday; two days fit in one week by count, but the
        // Sunday-first week holding the 1st ends on the 1st.
        let range = DateRange::between(date!(2024 - 06 - 01), date!(2024 - 06 - 02));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        assert_eq!(grid.weeks().len(), 1);
        assert_eq!(grid.weeks()[0][0].date, date!(2024 - 05 - 26));
        assert_eq!(in_range_dates(&grid), [date!(2024 - 06 - 01)]);
        assert_eq!(grid.position_of(date!(2024 - 06 - 02)), None);
    }

    #[test]
    fn test_selected_matches_membership() {
        let selection = Selection::from_iter([
            key("2024-03-01"),
            key("2024-03-15"),
            key("2024-02-25"),
            key("2025-01-01"),
        ]);
        let range = DateRange::between(date!(2024 - 03 - 01), date!(2024 - 03 - 31));
        let grid = build_grid(&range, &selection, WeekStart::Sunday);
        let mut selected = Vec::new();
        for cell in grid.weeks().iter().flat_map(Week::iter) {
            assert_eq!(cell.is_selected, selection.contains(cell.key()));
            if cell.is_selected {
                selected.push(cell.date);
            }
        }
        // Out-of-range placeholders still reflect the selection.
        assert_eq!(
            selected,
            [date!(2024 - 02 - 25), date!(2024 - 03 - 01), date!(2024 - 03 - 15)]
        );
    }

    #[test]
    fn test_example_two_days() {
        let range = DateRange::between(date!(2024 - 06 - 01), date!(2024 - 06 - 02));
        let selection = Selection::from_iter([key("2024-06-02")]);
        let grid = build_grid(&range, &selection, WeekStart::Monday);
        assert_eq!(grid.weeks().len(), 1);
        let (w, d) = grid.position_of(date!(2024 - 06 - 01)).unwrap();
        let first = grid.cell(w, d).unwrap();
        assert!(!first.is_selected);
        assert!(first.is_in_range);
        assert!(first.is_month_start);
        let (w, d) = grid.position_of(date!(2024 - 06 - 02)).unwrap();
        let second = grid.cell(w, d).unwrap();
        assert!(second.is_selected);
        assert!(second.is_in_range);
        assert!(!second.is_month_start);
        assert_eq!(in_range_dates(&grid).len(), 2);
    }

    #[test]
    fn test_month_labels() {
        let range = DateRange::between(date!(2024 - 01 - 10), date!(2024 - 04 - 20));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        // Grid starts on Sunday 2024-01-07.
        assert_eq!(
            grid.month_labels(),
            [
                MonthLabel {
                    text: "Feb",
                    column: 3
                },
                MonthLabel {
                    text: "Mar",
                    column: 7
                },
                MonthLabel {
                    text: "Apr",
                    column: 12
                },
            ]
        );
        for label in grid.month_labels() {
            assert!(grid.weeks()[label.column]
                .iter()
                .any(|c| c.is_month_start && month_abbrev(c.date.month()) == label.text));
        }
    }

    #[test]
    fn test_month_label_on_out_of_range_day() {
        // The 1st of March lies in the last week but after the end of the
        // range; it is still labelled.
        let range = DateRange::between(date!(2024 - 02 - 26), date!(2024 - 02 - 28));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Monday);
        assert_eq!(
            grid.month_labels(),
            [MonthLabel {
                text: "Mar",
                column: 0
            }]
        );
    }

    #[test]
    fn test_month_labels_not_deduplicated() {
        let range = DateRange::between(date!(2022 - 01 - 02), date!(2024 - 01 - 01));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        let texts = grid.month_labels().iter().map(|l| l.text).collect::<Vec<_>>();
        assert_eq!(texts.len(), 24);
        assert_eq!(texts.iter().filter(|&&t| t == "Jan").count(), 2);
        assert_eq!(texts.iter().filter(|&&t| t == "Feb").count(), 2);
        let columns = grid.month_labels().iter().map(|l| l.column).collect::<Vec<_>>();
        assert!(columns.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_end_of_time() {
        // 9999-12-31 is a Friday, so its week cannot be completed.
        let range = DateRange::between(date!(9999 - 12 - 01), Date::MAX);
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        assert_eq!(grid.weeks().len(), 4);
        assert!(grid.weeks().iter().all(|w| w.iter().count() == 7));
    }

    #[test]
    fn test_first_in_range() {
        let range = DateRange::between(date!(2024 - 06 - 05), date!(2024 - 06 - 20));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        // Wednesday of the first week
        assert_eq!(grid.first_in_range(), Some((0, 3)));
        assert_eq!(grid.position_of(date!(2024 - 06 - 20)), Some((2, 4)));
    }

    #[test]
    fn test_cell_lookup_off_the_grid() {
        let range = DateRange::between(date!(2024 - 06 - 05), date!(2024 - 06 - 20));
        let grid = build_grid(&range, &Selection::new(), WeekStart::Sunday);
        assert_eq!(grid.cell(2, 6).map(|c| c.date), Some(date!(2024 - 06 - 22)));
        assert_eq!(grid.cell(2, 7), None);
        assert_eq!(grid.cell(3, 0), None);
        assert_eq!(Grid::default().cell(0, 0), None);
    }
}
