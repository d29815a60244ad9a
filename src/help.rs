use crate::theme::{BASE_STYLE, TITLE_STYLE};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph, Widget},
};

static KEYS: &[(&str, &str)] = &[
    ("h, LEFT", "Previous week"),
    ("l, RIGHT", "Next week"),
    ("k, UP", "Previous day"),
    ("j, DOWN", "Next day"),
    ("[, PAGE UP", "Previous year"),
    ("], PAGE DOWN", "Next year"),
    ("t, HOME", "Jump to today"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

const KEY_COLUMN_WIDTH: usize = 16;

static DISMISS: &str = "Press the Any Key to dismiss.";

/// Popup listing the key bindings, centred over the heatmap
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help;

impl Help {
    fn text() -> Text<'static> {
        let mut lines = KEYS
            .iter()
            .map(|&(key, action)| {
                Line::from(vec![
                    Span::styled(format!("{key:KEY_COLUMN_WIDTH$}"), TITLE_STYLE),
                    Span::raw(action),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.push(Line::raw(DISMISS));
        Text::from(lines)
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = Help::text();
        let height = u16::try_from(text.height())
            .unwrap_or(u16::MAX)
            .min(area.height)
            .saturating_add(2);
        let width = u16::try_from(text.width())
            .unwrap_or(u16::MAX)
            .min(area.width)
            .saturating_add(2);
        let [popup] = Layout::horizontal([width]).flex(Flex::Center).areas(area);
        let [popup] = Layout::vertical([height]).flex(Flex::Center).areas(popup);
        Clear.render(popup, buf);
        Paragraph::new(text)
            .block(
                Block::bordered()
                    .title(" Keys ")
                    .title_alignment(Alignment::Center),
            )
            .style(BASE_STYLE)
            .render(popup, buf);
    }
}
