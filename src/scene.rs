use crate::calendar::{DateExt, LayoutContext, MonthOutline};
use crate::counts::{EventCountIndex, WorkshopRecord};
use crate::scale::{build_color_scale, color_for, Palette, Rgb};
use std::fmt;
use time::Date;

/// A drawing target of a given width.  Drawing into it replaces whatever was
/// drawn before.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Container {
    width: u32,
    scene: Option<Scene>,
}

impl Container {
    pub(crate) fn new(width: u32) -> Container {
        Container { width, scene: None }
    }

    /// Changes the width.  The current scene is kept until the next draw.
    pub(crate) fn set_width(&mut self, width: u32) {
        self.width = width;
    }

    pub(crate) fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub(crate) fn clear(&mut self) {
        self.scene = None;
    }
}

/// Everything drawn for one year
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Scene {
    pub(crate) year: i32,
    pub(crate) width: u32,
    pub(crate) height: f64,
    pub(crate) layout: LayoutContext,
    /// Offset applied to every cell and outline
    pub(crate) translate: (f64, f64),
    pub(crate) cells: Vec<Cell>,
    pub(crate) outlines: Vec<MonthOutline>,
    pub(crate) outline_color: Rgb,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Cell {
    pub(crate) date: Date,
    pub(crate) x: u32,
    pub(crate) y: u32,
    pub(crate) fill: Rgb,
    /// The date as `YYYY-MM-DD`, shown as the cell's tooltip
    pub(crate) label: String,
    pub(crate) count: Option<u32>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Renderer {
    pub(crate) palette: Palette,
    pub(crate) empty_fill: Rgb,
    pub(crate) outline_color: Rgb,
}

impl Renderer {
    /// Replaces the contents of `container` with the heatmap for `year`.
    /// Only the dates that occur in `records` are colored through the scale;
    /// all others keep the empty fill.
    pub(crate) fn draw_year<'c>(
        &self,
        container: &'c mut Container,
        year: i32,
        records: &[WorkshopRecord],
    ) -> &'c Scene {
        let index = EventCountIndex::from_records(records);
        self.draw_year_with_index(container, year, &index)
    }

    pub(crate) fn draw_year_with_index<'c>(
        &self,
        container: &'c mut Container,
        year: i32,
        index: &EventCountIndex,
    ) -> &'c Scene {
        container.clear();
        let layout = LayoutContext::from_container_width(container.width);
        let scale = build_color_scale(&self.palette);
        let cells = layout
            .layout_year(year)
            .map(|pos| {
                let label = pos.date.iso_date();
                let fill = color_for(&label, index, &scale, self.empty_fill);
                let count = index.get(&label);
                Cell {
                    date: pos.date,
                    x: pos.x,
                    y: pos.y,
                    fill,
                    label,
                    count,
                }
            })
            .collect::<Vec<_>>();
        let outlines = layout.month_outlines(year).collect::<Vec<_>>();
        log::debug!(
            "Laid out {year} at width {}: cell size {}, {} cells, {} outlines",
            container.width,
            layout.cell_size(),
            cells.len(),
            outlines.len()
        );
        container.scene.insert(Scene {
            year,
            width: container.width,
            height: layout.height(),
            layout,
            translate: layout.translation(container.width),
            cells,
            outlines,
            outline_color: self.outline_color,
        })
    }
}

impl Scene {
    pub(crate) fn cell_size(&self) -> u32 {
        self.layout.cell_size()
    }

    pub(crate) fn cell(&self, date: Date) -> Option<&Cell> {
        self.cells
            .binary_search_by_key(&date, |c| c.date)
            .ok()
            .and_then(|i| self.cells.get(i))
    }

    /// Renders the scene as a standalone SVG document
    pub(crate) fn to_svg(&self) -> String {
        Svg(self).to_string()
    }
}

#[derive(Clone, Copy, Debug)]
struct Svg<'a>(&'a Scene);

impl fmt::Display for Svg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scene = self.0;
        let size = scene.cell_size();
        let (dx, dy) = scene.translate;
        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
            scene.width, scene.height
        )?;
        writeln!(
            f,
            "<style>.day {{ stroke: #ccc; }} .month {{ fill: none; stroke: {}; stroke-width: 2px; }}</style>",
            scene.outline_color
        )?;
        writeln!(f, "<title>Workshops in {}</title>", scene.year)?;
        writeln!(f, r#"<g transform="translate({dx},{dy})">"#)?;
        for cell in &scene.cells {
            writeln!(
                f,
                r#"<rect class="day" width="{size}" height="{size}" x="{}" y="{}" fill="{}"><title>{}</title></rect>"#,
                cell.x,
                cell.y,
                cell.fill,
                escape_xml(&cell.label)
            )?;
        }
        for outline in &scene.outlines {
            writeln!(
                f,
                r#"<path class="month" data-first="{}" data-last="{}" d="{}"/>"#,
                outline.first.iso_date(),
                outline.last.iso_date(),
                outline.path.to_svg_data()
            )?;
        }
        f.write_str("</g>\n</svg>\n")
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}
