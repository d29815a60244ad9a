use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const STATUS_STYLE: Style = BASE_STYLE.fg(Color::Gray);

pub(crate) const DIM_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

/// Color painted over the selected day on the heatmap
pub(crate) const CURSOR_COLOR: Color = Color::LightMagenta;

/// Background of the heatmap canvas
pub(crate) const CANVAS_BACKGROUND: Color = Color::Black;
