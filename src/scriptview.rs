use crate::theme::{BASE_STYLE, HINT_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, StatefulWidget, Widget},
};

static FOOTER: &str = " j/k scroll · w write · q close ";

/// Popup displaying the generated script and how to run it
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct ScriptView<'a> {
    script: &'a str,
    title: String,
    usage: [String; 4],
    notice: Option<Line<'a>>,
}

impl<'a> ScriptView<'a> {
    pub(crate) fn new(script: &'a str, file_name: &str) -> Self {
        ScriptView {
            script,
            title: format!(" {file_name} "),
            usage: [
                String::new(),
                String::from("Run it in a clone of your repo:"),
                format!("  chmod +x {file_name} && ./{file_name}"),
                format!("  (Windows: bash {file_name})"),
            ],
            notice: None,
        }
    }

    /// Shows `notice` on the bottom border in place of the key hints
    pub(crate) fn notice(mut self, notice: Option<Line<'a>>) -> Self {
        self.notice = notice;
        self
    }
}

impl StatefulWidget for ScriptView<'_> {
    type State = ScriptViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let outer_area = area.inner(Margin::new(2, 1));
        Clear.render(outer_area, buf);
        let bottom = match self.notice {
            Some(notice) => notice.left_aligned(),
            None => Line::styled(FOOTER, HINT_STYLE).centered(),
        };
        let block = Block::bordered()
            .title(self.title)
            .title_alignment(Alignment::Center)
            .title_bottom(bottom)
            .style(BASE_STYLE);
        let inner = block.inner(outer_area);
        block.render(outer_area, buf);
        let usage_height = u16::try_from(self.usage.len()).unwrap_or(u16::MAX);
        let [script_area, usage_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(usage_height)]).areas(inner);
        let text = Text::raw(self.script);
        state.max_offset = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .saturating_sub(script_area.height);
        state.offset = state.offset.min(state.max_offset);
        Paragraph::new(text)
            .scroll((state.offset, 0))
            .render(script_area, buf);
        Paragraph::new(Text::from_iter(self.usage))
            .style(HINT_STYLE)
            .render(usage_area, buf);
    }
}

/// How far the script has been scrolled down, and how far it can go as of the
/// last render
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ScriptViewState {
    offset: u16,
    max_offset: u16,
}

impl ScriptViewState {
    pub(crate) fn new() -> Self {
        ScriptViewState::default()
    }

    // Returns `false` if already at the bottom
    pub(crate) fn scroll_down(&mut self) -> bool {
        if self.offset < self.max_offset {
            self.offset += 1;
            true
        } else {
            false
        }
    }

    // Returns `false` if already at the top
    pub(crate) fn scroll_up(&mut self) -> bool {
        match self.offset.checked_sub(1) {
            Some(offset) => {
                self.offset = offset;
                true
            }
            None => false,
        }
    }
}
