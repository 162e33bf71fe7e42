use crate::theme::{
    dateinput::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{Date, Month};

const OUTER_WIDTH: u16 = 20;
const OUTER_HEIGHT: u16 = 8;
const ENTER_POS: usize = 8;

/// Popup for typing in one endpoint of the date range
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DateInput;

impl StatefulWidget for DateInput {
    type State = DateInputState;

    /*
     * ....................
     * .┌─ Range start ──┐.
     * .│                │.
     * .│   YYYY-MM-DD   │.
     * .│                │.
     * .│    [ENTER]     │.
     * .└────────────────┘.
     * ....................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(state.endpoint.title())
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

/// Which end of the range is being entered
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    fn title(self) -> &'static str {
        match self {
            Endpoint::Start => " Range start ",
            Endpoint::End => " Range end ",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DateInputState {
    endpoint: Endpoint,
    year: [Option<u8>; 4],
    month: [Option<u8>; 2],
    day: [Option<u8>; 2],
    pos: usize,
}

impl DateInputState {
    pub(crate) fn new(endpoint: Endpoint) -> DateInputState {
        DateInputState {
            endpoint,
            year: [None; 4],
            month: [None; 2],
            day: [None; 2],
            pos: 0,
        }
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == ENTER_POS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        let mut first = true;
        for (fallback, digits) in [
            ("Y", self.year.as_slice()),
            ("M", self.month.as_slice()),
            ("D", self.day.as_slice()),
        ] {
            if !std::mem::replace(&mut first, false) {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            for dg in digits {
                spans.push(match dg {
                    Some(d) => Span::styled(format!("{d}"), BASE_STYLE),
                    None => Span::styled(fallback, UNFILLED_CELL_STYLE),
                });
            }
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: DateInputKey) -> DateInputOutput {
        match (input, self.pos) {
            (DateInputKey::Digit(d), 0..ENTER_POS) if d < 10 => {
                match self.pos {
                    0..4 => self.year[self.pos] = Some(d),
                    4..6 => self.month[self.pos - 4] = Some(d),
                    6..8 => self.day[self.pos - 6] = Some(d),
                    _ => unreachable!(),
                }
                self.pos += 1;
                DateInputOutput::Ok
            }
            (DateInputKey::Backspace, 1..) => {
                self.pos -= 1;
                match self.pos {
                    0..4 => self.year[self.pos] = None,
                    4..6 => self.month[self.pos - 4] = None,
                    6..8 => self.day[self.pos - 6] = None,
                    _ => unreachable!(),
                }
                DateInputOutput::Ok
            }
            (DateInputKey::Enter, ENTER_POS) => match self.date() {
                Some(date) => DateInputOutput::Done(date),
                None => DateInputOutput::Invalid,
            },
            _ => DateInputOutput::Invalid,
        }
    }

    fn date(&self) -> Option<Date> {
        let year = self
            .year
            .iter()
            .try_fold(0i32, |acc, d| Some(acc * 10 + i32::from((*d)?)))?;
        let month = self
            .month
            .iter()
            .try_fold(0u8, |acc, d| Some(acc * 10 + (*d)?))?;
        let day = self
            .day
            .iter()
            .try_fold(0u8, |acc, d| Some(acc * 10 + (*d)?))?;
        let month = Month::try_from(month).ok()?;
        Date::from_calendar_date(year, month, day).ok()
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DateInputKey {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum DateInputOutput {
    Ok,
    Invalid,
    Done(Date),
}
