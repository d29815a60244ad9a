use super::HeatmapView;
use crate::calendar::DateExt;
use crate::scene::Scene;
use crate::theme::{
    BASE_STYLE, CANVAS_BACKGROUND, CURSOR_COLOR, DIM_STYLE, STATUS_STYLE, TITLE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::Color,
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Line as CanvasLine, Painter, Shape},
    widgets::{Paragraph, StatefulWidget, Widget},
};
use time::Date;

const LEGEND_SWATCH: &str = "■ ";

/// Draws the year on display as a canvas of colored cells with month
/// outlines, framed by a title, a color legend, and a status line describing
/// the selected day.
///
/// One pixel of the scene is one terminal column wide and half a terminal
/// row tall.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct Heatmap;

impl StatefulWidget for Heatmap {
    type State = HeatmapView;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [title_area, map_area, legend_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let year = state.year();
        let total = state.year_total();
        let title = format!(" Workshops in {year}: {total} ");
        Paragraph::new(title)
            .style(TITLE_STYLE)
            .alignment(Alignment::Center)
            .render(title_area, buf);
        if let Some(scene) = state.scene() {
            render_scene(scene, state.cursor(), map_area, buf);
        }
        legend(state).render(legend_area, buf);
        Paragraph::new(status(state))
            .style(STATUS_STYLE)
            .render(status_area, buf);
    }
}

fn render_scene(scene: &Scene, cursor: Date, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let right = f64::from(area.width) - 1.0;
    let top = f64::from(area.height) * 2.0 - 1.0;
    Canvas::default()
        .marker(Marker::HalfBlock)
        .background_color(CANVAS_BACKGROUND)
        .x_bounds([0.0, right])
        .y_bounds([0.0, top])
        .paint(|ctx| {
            ctx.draw(&SceneShape {
                scene,
                cursor,
                top,
            });
        })
        .render(area, buf);
}

/// Paints a [`Scene`] onto a canvas whose bounds are one unit per pixel, with
/// the y axis flipped so that the scene's origin is the top-left corner
#[derive(Clone, Copy, Debug)]
struct SceneShape<'a> {
    scene: &'a Scene,
    cursor: Date,
    top: f64,
}

impl SceneShape<'_> {
    fn canvas_point(&self, x: u32, y: u32) -> (f64, f64) {
        let (dx, dy) = self.scene.translate;
        (dx.floor() + f64::from(x), self.top - (dy.floor() + f64::from(y)))
    }
}

impl Shape for SceneShape<'_> {
    fn draw(&self, painter: &mut Painter<'_, '_>) {
        // Outlines run along the gutter to the upper-left of each cell
        // boundary, and are painted first so that cells win any overlap.
        let outline = Color::from(self.scene.outline_color);
        for month in &self.scene.outlines {
            let vertices = month
                .path
                .corners()
                .into_iter()
                .map(|(x, y)| {
                    self.canvas_point(x.saturating_sub(1), y.saturating_sub(1))
                })
                .collect::<Vec<_>>();
            let ends = vertices.iter().skip(1).chain(vertices.first());
            for (&(x1, y1), &(x2, y2)) in vertices.iter().zip(ends) {
                CanvasLine::new(x1, y1, x2, y2, outline).draw(painter);
            }
        }
        let size = self.scene.cell_size();
        // Leave a one pixel gutter between cells when there is room for it
        let fill = if size > 1 { size - 1 } else { size };
        for cell in &self.scene.cells {
            let color = if cell.date == self.cursor {
                CURSOR_COLOR
            } else {
                Color::from(cell.fill)
            };
            for i in 0..fill {
                for j in 0..fill {
                    let (x, y) = self.canvas_point(cell.x + i, cell.y + j);
                    if let Some((px, py)) = painter.get_point(x, y) {
                        painter.paint(px, py, color);
                    }
                }
            }
        }
    }
}

fn legend(state: &HeatmapView) -> Paragraph<'static> {
    let renderer = state.renderer();
    let mut spans = vec![Span::styled("Less ", DIM_STYLE)];
    spans.extend(
        renderer
            .palette
            .colors()
            .iter()
            .map(|&c| Span::styled(LEGEND_SWATCH, BASE_STYLE.fg(Color::from(c)))),
    );
    spans.push(Span::styled("More", DIM_STYLE));
    Paragraph::new(Line::from(spans))
        .style(BASE_STYLE)
        .alignment(Alignment::Center)
}

fn status(state: &HeatmapView) -> String {
    let cursor = state.cursor();
    let date = cursor.iso_date();
    let weekday = cursor.weekday();
    let summary = match state.selected_cell().and_then(|c| c.count) {
        Some(1) => String::from("1 workshop"),
        Some(n) => format!("{n} workshops"),
        None => String::from("no workshops"),
    };
    format!(" {date} ({weekday}): {summary}    ? for help")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::counts::{EventCountIndex, WorkshopRecord};
    use crate::scale::Palette;
    use ratatui::layout::Size;
    use time::macros::date;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    fn rendered_view() -> (HeatmapView, Buffer) {
        let index = EventCountIndex::from_records(&[
            WorkshopRecord::new("2015-01-01"),
            WorkshopRecord::new("2015-01-01"),
            WorkshopRecord::new("2015-01-01"),
            WorkshopRecord::new("2015-03-17"),
        ]);
        let mut view = HeatmapView::new(
            Config::default().renderer(),
            index,
            date!(2015 - 01 - 01),
        );
        let area = Rect::new(0, 0, 106, 12);
        view.resize(area.as_size());
        let mut buf = Buffer::empty(area);
        Heatmap.render(area, &mut buf, &mut view);
        (view, buf)
    }

    #[test]
    fn test_title_and_status() {
        let (_, buf) = rendered_view();
        assert_eq!(row(&buf, 0).trim(), "Workshops in 2015: 4");
        assert_eq!(
            row(&buf, 11).trim_end(),
            " 2015-01-01 (Thursday): 3 workshops    ? for help"
        );
    }

    #[test]
    fn test_legend_colors() {
        let (_, buf) = rendered_view();
        let legend = row(&buf, 10);
        assert_eq!(legend.trim(), "Less ■ ■ ■ ■ ■ ■ ■ ■ More");
        let first = u16::try_from(legend.find('■').unwrap()).unwrap();
        for (i, &color) in (0u16..).zip(Palette::default().colors()) {
            assert_eq!(buf[(first + 2 * i, 10)].fg, Color::from(color));
        }
    }

    #[test]
    fn test_cells_are_painted() {
        let (view, buf) = rendered_view();
        let scene = view.scene().unwrap();
        assert_eq!(scene.cell_size(), 2);
        // 2015-03-17 is a Tuesday in week 11: pixel (22, 4), i.e. column 22,
        // upper half of the third canvas row (row 3 of the buffer)
        let cell = scene.cell(date!(2015 - 03 - 17)).unwrap();
        assert_eq!((cell.x, cell.y), (22, 4));
        assert_eq!(buf[(22, 3)].fg, Color::from(cell.fill));
        // The cursor is on 2015-01-01: pixel (0, 8), row 5 of the buffer
        assert_eq!(buf[(0, 5)].fg, CURSOR_COLOR);
    }

    #[test]
    fn test_status_for_empty_day() {
        let index = EventCountIndex::default();
        let mut view = HeatmapView::new(
            Config::default().renderer(),
            index,
            date!(2015 - 06 - 02),
        );
        view.resize(Size::new(53, 10));
        assert_eq!(status(&view), " 2015-06-02 (Tuesday): no workshops    ? for help");
    }

    #[test]
    fn test_tiny_area() {
        let index = EventCountIndex::default();
        let mut view = HeatmapView::new(
            Config::default().renderer(),
            index,
            date!(2015 - 06 - 02),
        );
        let area = Rect::new(0, 0, 10, 3);
        view.resize(area.as_size());
        let mut buf = Buffer::empty(area);
        Heatmap.render(area, &mut buf, &mut view);
        assert_eq!(view.scene().map(Scene::cell_size), Some(0));
    }
}
