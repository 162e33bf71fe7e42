use super::grid::DayCell;
use super::state::{CalendarState, Cursor};
use crate::theme::{
    CURSOR_MODIFIER, HINT_STYLE, MONTH_STYLE, OUT_OF_RANGE_STYLE, SELECTED_STYLE,
    UNSELECTED_STYLE, WEEKDAY_STYLE,
};
use ratatui::{prelude::*, widgets::*};
use time::Weekday;

/// Number of columns on the left side of the calendar, used as the margin in
/// which weekday names are written
const LEFT_MARGIN: u16 = 4;

/// Number of columns per week
const CELL_WIDTH: u16 = 2;

/// Number of lines above the day rows, used for month names
const LABEL_LINES: u16 = 1;

/// Total height of the calendar
pub(crate) const CALENDAR_HEIGHT: u16 = LABEL_LINES + 7;

const DAY_SYMBOL: &str = "■";

const OUT_OF_RANGE_SYMBOL: &str = "·";

static INCOMPLETE_HINT: &str = "Enter an end date to show the calendar";

/// Contribution-style calendar: one column per week, one row per weekday
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Calendar;

impl Calendar {
    fn columns_for_width(width: u16) -> usize {
        usize::from(width.saturating_sub(LEFT_MARGIN) / CELL_WIDTH)
    }
}

impl StatefulWidget for Calendar {
    type State = CalendarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let columns = Self::columns_for_width(area.width);
        let scroll = state.ensure_visible(columns);
        let cursor = state.cursor();
        let grid = state.grid();
        let mut canvas = BufferCanvas::new(area, buf);
        if grid.is_empty() {
            canvas.mvprint(0, 0, INCOMPLETE_HINT, Some(HINT_STYLE));
            return;
        }
        for label in grid.month_labels() {
            if let Some(col) = label.column.checked_sub(scroll).filter(|&c| c < columns) {
                canvas.draw_month(col, label.text);
            }
        }
        for (row, wd) in std::iter::zip(0u16.., grid.week_start().weekdays()) {
            canvas.draw_weekday(row, wd);
        }
        for (col, (week_no, week)) in
            std::iter::zip(0..columns, grid.weeks().iter().enumerate().skip(scroll))
        {
            for (row, (day, cell)) in std::iter::zip(0u16.., week.iter().enumerate()) {
                let here = cursor == Cursor { week: week_no, day };
                canvas.draw_day(col, row, cell, here);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn column_x(col: usize) -> u16 {
        u16::try_from(col)
            .unwrap_or(u16::MAX)
            .saturating_mul(CELL_WIDTH)
            .saturating_add(LEFT_MARGIN)
    }

    fn draw_month(&mut self, col: usize, text: &str) {
        self.mvprint(0, Self::column_x(col), text, Some(MONTH_STYLE));
    }

    // GitHub only labels every other weekday
    fn draw_weekday(&mut self, row: u16, wd: Weekday) {
        let name = match wd {
            Weekday::Monday => "Mon",
            Weekday::Wednesday => "Wed",
            Weekday::Friday => "Fri",
            _ => return,
        };
        self.mvprint(LABEL_LINES + row, 0, name, Some(WEEKDAY_STYLE));
    }

    fn draw_day(&mut self, col: usize, row: u16, cell: &DayCell, is_cursor: bool) {
        let (symbol, style) = if !cell.is_in_range {
            (OUT_OF_RANGE_SYMBOL, OUT_OF_RANGE_STYLE)
        } else if cell.is_selected {
            (DAY_SYMBOL, SELECTED_STYLE)
        } else {
            (DAY_SYMBOL, UNSELECTED_STYLE)
        };
        let style = if is_cursor {
            style.add_modifier(CURSOR_MODIFIER)
        } else {
            style
        };
        self.mvprint(LABEL_LINES + row, Self::column_x(col), symbol, Some(style));
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }
}
