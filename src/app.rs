use crate::calendar::{
    long_date, Calendar, CalendarState, DateKey, DateRange, CALENDAR_HEIGHT,
};
use crate::dateinput::{DateInput, DateInputKey, DateInputOutput, DateInputState, Endpoint};
use crate::help::Help;
use crate::script::{self, commit_command, generate_script};
use crate::scriptview::{ScriptView, ScriptViewState};
use crate::selection::Selection;
use crate::theme::{
    BASE_STYLE, ERROR_STYLE, HINT_STYLE, SELECTED_STYLE, TITLE_STYLE, UNSELECTED_STYLE,
};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::path::PathBuf;
use time::Date;
use tracing::{debug, info, warn};

static HINTS: &str = "SPACE toggle · r range · s script · w write · c clear · ? help · q quit";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    calendar: CalendarState,
    output: PathBuf,
    state: AppState,
    /// Outcome of the last action, shown in place of the cursor description
    /// until the next key press
    notice: Option<Notice>,
}

impl App {
    pub(crate) fn new(calendar: CalendarState, output: PathBuf) -> App {
        App {
            calendar,
            output,
            state: AppState::Calendar,
            notice: None,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        // Notices raised in the script view stay up until the key after the
        // one that closes it.
        if !matches!(self.state, AppState::Script(_)) {
            self.notice = None;
        }
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.calendar.week_backwards().is_ok(),
                KeyCode::Char('l') | KeyCode::Right => self.calendar.week_forwards().is_ok(),
                KeyCode::Char('k') | KeyCode::Up => self.calendar.day_backwards().is_ok(),
                KeyCode::Char('j') | KeyCode::Down => self.calendar.day_forwards().is_ok(),
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle(),
                KeyCode::Char('0') | KeyCode::Home => {
                    self.calendar.jump_to_start();
                    true
                }
                KeyCode::Char('r') => {
                    self.state = AppState::PickingStart(DateInputState::new(Endpoint::Start));
                    true
                }
                KeyCode::Char('s') => {
                    debug!(
                        dates = self.calendar.selection().len(),
                        "showing generated script"
                    );
                    self.state = AppState::Script(ScriptViewState::new());
                    true
                }
                KeyCode::Char('w') => {
                    self.write_script();
                    true
                }
                KeyCode::Char('c') => self.clear(),
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::PickingStart(input) => {
                if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    return true;
                }
                match date_input(input, key) {
                    DateInputOutput::Ok => true,
                    DateInputOutput::Invalid => false,
                    DateInputOutput::Done(date) => {
                        let previous = self.calendar.range();
                        self.calendar.set_range(previous.restart_at(date));
                        self.state = AppState::PickingEnd {
                            input: DateInputState::new(Endpoint::End),
                            previous,
                        };
                        true
                    }
                }
            }
            AppState::PickingEnd { input, previous } => {
                if matches!(key, KeyCode::Char('q') | KeyCode::Esc) {
                    let previous = *previous;
                    self.calendar.set_range(previous);
                    self.state = AppState::Calendar;
                    return true;
                }
                match date_input(input, key) {
                    DateInputOutput::Ok => true,
                    DateInputOutput::Invalid => false,
                    DateInputOutput::Done(date) => {
                        let range = self.calendar.range().end_at(date);
                        info!(from = ?range.from(), to = ?range.to(), "new date range");
                        self.calendar.set_range(range);
                        self.state = AppState::Calendar;
                        true
                    }
                }
            }
            AppState::Script(view) => match key {
                KeyCode::Char('j') | KeyCode::Down => view.scroll_down(),
                KeyCode::Char('k') | KeyCode::Up => view.scroll_up(),
                KeyCode::Char('w') => {
                    self.write_script();
                    true
                }
                KeyCode::Char('q' | 's') | KeyCode::Esc => {
                    self.state = AppState::Calendar;
                    true
                }
                _ => false,
            },
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn toggle(&mut self) -> bool {
        match self.calendar.toggle_current() {
            Ok((key, true)) => {
                info!(date = %key, command = %commit_command(key), "selected date");
                true
            }
            Ok((key, false)) => {
                info!(date = %key, "deselected date");
                true
            }
            Err(e) => {
                debug!(error = %e, "cannot toggle date");
                false
            }
        }
    }

    // Returns `false` if there was nothing to clear
    fn clear(&mut self) -> bool {
        if self.calendar.selection().is_empty() {
            false
        } else {
            info!(
                dates = self.calendar.selection().len(),
                "clearing selection"
            );
            self.calendar.set_selection(Selection::new());
            true
        }
    }

    fn script(&self) -> String {
        generate_script(self.calendar.selection().keys())
    }

    fn write_script(&mut self) {
        let script = self.script();
        let dates = self.calendar.selection().len();
        self.notice = Some(match script::save(&self.output, &script) {
            Ok(()) => {
                info!(path = %self.output.display(), dates, "wrote script");
                Notice::new(
                    format!("Wrote {} ({dates} dates)", self.output.display()),
                    SELECTED_STYLE,
                )
            }
            Err(e) => {
                warn!(path = %self.output.display(), error = %e, "failed to write script");
                Notice::new(
                    format!("Failed to write {}: {e}", self.output.display()),
                    ERROR_STYLE,
                )
            }
        });
    }

    fn title_line(&self) -> Line<'static> {
        let range = self.calendar.range();
        let endpoint = |d: Option<Date>| {
            d.map_or_else(|| String::from("…"), |d| DateKey::from(d).to_string())
        };
        Line::from_iter([
            Span::styled("gittravel", TITLE_STYLE),
            Span::styled(
                format!(
                    "  {} to {}  ·  {} selected",
                    endpoint(range.from()),
                    endpoint(range.to()),
                    self.calendar.selection().len()
                ),
                BASE_STYLE,
            ),
        ])
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(notice) = &self.notice {
            return Line::styled(notice.text.clone(), notice.style);
        }
        match self.calendar.current() {
            Some(cell) if !cell.is_in_range => Line::styled("Outside selected range", HINT_STYLE),
            Some(cell) if cell.is_selected => Line::styled(
                format!(
                    "Selected for commit on {} (SPACE to remove)",
                    long_date(cell.date)
                ),
                BASE_STYLE,
            ),
            Some(cell) => Line::styled(
                format!("Not selected on {} (SPACE to select)", long_date(cell.date)),
                BASE_STYLE,
            ),
            None => Line::default(),
        }
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [title_area, _, calendar_area, _, legend_area, status_area, hints_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(CALENDAR_HEIGHT),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area.inner(Margin::new(1, 0)));
        self.title_line().render(title_area, buf);
        Calendar.render(calendar_area, buf, &mut self.calendar);
        Line::from_iter([
            Span::styled("Not Selected ", BASE_STYLE),
            Span::styled("■", UNSELECTED_STYLE),
            Span::styled("  Selected ", BASE_STYLE),
            Span::styled("■", SELECTED_STYLE),
        ])
        .render(legend_area, buf);
        self.status_line().render(status_area, buf);
        Line::styled(HINTS, HINT_STYLE).render(hints_area, buf);
        match self.state {
            AppState::Helping => Help(BASE_STYLE).render(area, buf),
            AppState::PickingStart(ref mut input) | AppState::PickingEnd { ref mut input, .. } => {
                DateInput.render(area, buf, input);
            }
            AppState::Script(ref mut view) => {
                let script = generate_script(self.calendar.selection().keys());
                let name = self.output.display().to_string();
                let notice = self
                    .notice
                    .as_ref()
                    .map(|n| Line::styled(n.text.as_str(), n.style));
                ScriptView::new(&script, &name)
                    .notice(notice)
                    .render(area, buf, view);
            }
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

fn date_input(input: &mut DateInputState, key: KeyCode) -> DateInputOutput {
    let key = match key {
        KeyCode::Char(c) => match c.to_digit(10).and_then(|d| u8::try_from(d).ok()) {
            Some(d) => DateInputKey::Digit(d),
            None => return DateInputOutput::Invalid,
        },
        KeyCode::Backspace | KeyCode::Delete => DateInputKey::Backspace,
        KeyCode::Enter => DateInputKey::Enter,
        _ => return DateInputOutput::Invalid,
    };
    input.handle_input(key)
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    PickingStart(DateInputState),
    /// The start has been chosen; `previous` is restored if entry is
    /// cancelled
    PickingEnd {
        input: DateInputState,
        previous: DateRange,
    },
    Script(ScriptViewState),
    Quitting,
}

#[derive(Clone, Debug, Eq, PartialEq)]
struct Notice {
    text: String,
    style: Style,
}

impl Notice {
    fn new(text: String, style: Style) -> Notice {
        Notice { text, style }
    }
}
