use super::grid::{build_grid, DayCell, Grid};
use super::range::DateRange;
use super::util::{DateKey, WeekStart, DAYS_IN_WEEK};
use crate::selection::Selection;
use thiserror::Error;
use tracing::debug;

/// The calendar as seen by the interface: the chosen range and days, the grid
/// built from them, and where the cursor & viewport are.
///
/// The range and selection are only ever replaced wholesale, and the grid is
/// rebuilt from scratch whenever either changes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarState {
    range: DateRange,
    selection: Selection,
    week_start: WeekStart,
    grid: Grid,
    cursor: Cursor,
    /// Index of the leftmost week column on screen
    scroll: usize,
}

/// (week column, day row) coordinates within the grid
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Cursor {
    pub(crate) week: usize,
    pub(crate) day: usize,
}

impl CalendarState {
    pub(crate) fn new(range: DateRange, week_start: WeekStart) -> Self {
        let selection = Selection::new();
        let grid = build_grid(&range, &selection, week_start);
        let mut state = CalendarState {
            range,
            selection,
            week_start,
            grid,
            cursor: Cursor::default(),
            scroll: 0,
        };
        state.jump_to_start();
        state
    }

    pub(crate) fn range(&self) -> DateRange {
        self.range
    }

    pub(crate) fn selection(&self) -> &Selection {
        &self.selection
    }

    pub(crate) fn grid(&self) -> &Grid {
        &self.grid
    }

    pub(crate) fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub(crate) fn current(&self) -> Option<&DayCell> {
        self.grid.cell(self.cursor.week, self.cursor.day)
    }

    pub(crate) fn set_range(&mut self, range: DateRange) {
        debug!(from = ?range.from(), to = ?range.to(), "changing date range");
        self.range = range;
        self.refresh();
        self.scroll = 0;
        self.jump_to_start();
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.refresh();
    }

    /// Selects or deselects the day under the cursor, returning its key and
    /// whether it is now selected
    pub(crate) fn toggle_current(&mut self) -> Result<(DateKey, bool), CalendarError> {
        let cell = self.current().ok_or(CalendarError::NoRange)?;
        if !cell.is_in_range {
            return Err(CalendarError::OutOfRange(cell.key()));
        }
        let key = cell.key();
        let selection = self.selection.toggle(key);
        let selected = selection.contains(key);
        self.set_selection(selection);
        Ok((key, selected))
    }

    pub(crate) fn jump_to_start(&mut self) {
        if let Some((week, day)) = self.grid.first_in_range() {
            self.cursor = Cursor { week, day };
        } else {
            self.cursor = Cursor::default();
        }
    }

    pub(crate) fn week_backwards(&mut self) -> Result<(), CalendarError> {
        self.move_to(self.cursor.week.checked_sub(1), Some(self.cursor.day))
    }

    pub(crate) fn week_forwards(&mut self) -> Result<(), CalendarError> {
        self.move_to(self.cursor.week.checked_add(1), Some(self.cursor.day))
    }

    pub(crate) fn day_backwards(&mut self) -> Result<(), CalendarError> {
        self.move_to(Some(self.cursor.week), self.cursor.day.checked_sub(1))
    }

    pub(crate) fn day_forwards(&mut self) -> Result<(), CalendarError> {
        self.move_to(Some(self.cursor.week), self.cursor.day.checked_add(1))
    }

    fn move_to(&mut self, week: Option<usize>, day: Option<usize>) -> Result<(), CalendarError> {
        if self.grid.is_empty() {
            return Err(CalendarError::NoRange);
        }
        match (week, day) {
            (Some(week), Some(day)) if self.grid.cell(week, day).is_some() => {
                self.cursor = Cursor { week, day };
                Ok(())
            }
            _ => Err(CalendarError::Edge),
        }
    }

    /// Adjusts and returns the index of the first week column to draw so that
    /// the cursor stays visible when `columns` week columns fit on screen
    pub(super) fn ensure_visible(&mut self, columns: usize) -> usize {
        let columns = columns.max(1);
        if self.cursor.week < self.scroll {
            self.scroll = self.cursor.week;
        } else if self.cursor.week >= self.scroll + columns {
            self.scroll = self.cursor.week + 1 - columns;
        }
        // Don't leave blank columns on the right after the window widens.
        self.scroll = self
            .scroll
            .min(self.grid.weeks().len().saturating_sub(columns));
        self.scroll
    }

    fn refresh(&mut self) {
        self.grid = build_grid(&self.range, &self.selection, self.week_start);
        let weeks = self.grid.weeks().len();
        if self.cursor.week >= weeks || self.cursor.day >= DAYS_IN_WEEK {
            self.jump_to_start();
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub(crate) enum CalendarError {
    #[error("reached the edge of the calendar")]
    Edge,
    #[error("{0} is outside the selected range")]
    OutOfRange(DateKey),
    #[error("no date range has been chosen")]
    NoRange,
}
