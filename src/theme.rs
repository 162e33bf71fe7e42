use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const SELECTED_STYLE: Style = BASE_STYLE.fg(Color::LightGreen);

pub(crate) const UNSELECTED_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const OUT_OF_RANGE_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) const CURSOR_MODIFIER: Modifier = Modifier::REVERSED;

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const ERROR_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

pub(crate) mod dateinput {
    use super::*;

    pub(crate) const UNFILLED_CELL_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

    pub(crate) const READY_ENTER_STYLE: Style = BASE_STYLE.add_modifier(Modifier::UNDERLINED);
}
