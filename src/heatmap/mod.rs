mod widget;
pub(crate) use self::widget::Heatmap;
use crate::counts::EventCountIndex;
use crate::scene::{Cell, Container, Renderer, Scene};
use ratatui::layout::Size;
use thiserror::Error;
use time::{Date, Duration, Month};

/// State of the interactive heatmap: which year is shown, which day is
/// selected, and the scene most recently drawn for the current width
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HeatmapView {
    container: Container,
    renderer: Renderer,
    index: EventCountIndex,
    year: i32,
    today: Date,
    cursor: Date,
}

impl HeatmapView {
    pub(crate) fn new(renderer: Renderer, index: EventCountIndex, today: Date) -> Self {
        HeatmapView {
            container: Container::new(0),
            renderer,
            index,
            year: today.year(),
            today,
            cursor: today,
        }
    }

    /// Shows `year` instead of the current year.  The cursor moves to the same
    /// month and day of that year.
    pub(crate) fn start_year(mut self, year: i32) -> Result<Self, OutOfTimeError> {
        self.cursor = same_day_in_year(self.cursor, year)?;
        self.year = year;
        Ok(self)
    }

    pub(crate) fn year(&self) -> i32 {
        self.year
    }

    pub(crate) fn cursor(&self) -> Date {
        self.cursor
    }

    pub(crate) fn scene(&self) -> Option<&Scene> {
        self.container.scene()
    }

    pub(crate) fn selected_cell(&self) -> Option<&Cell> {
        self.scene().and_then(|s| s.cell(self.cursor))
    }

    /// Total number of workshops in the year on display
    pub(crate) fn year_total(&self) -> u64 {
        let year = self.year;
        self.index.total_with_prefix(&format!("{year:04}-"))
    }

    pub(crate) fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Lays the year out again for a viewport of the given size
    pub(crate) fn resize(&mut self, size: Size) {
        self.container.set_width(u32::from(size.width));
        self.redraw();
    }

    fn redraw(&mut self) {
        self.renderer
            .draw_year_with_index(&mut self.container, self.year, &self.index);
    }

    fn set_year(&mut self, year: i32) -> Result<(), OutOfTimeError> {
        self.cursor = same_day_in_year(self.cursor, year)?;
        self.year = year;
        self.redraw();
        Ok(())
    }

    pub(crate) fn next_year(&mut self) -> Result<(), OutOfTimeError> {
        self.set_year(self.year.checked_add(1).ok_or(OutOfTimeError)?)
    }

    pub(crate) fn previous_year(&mut self) -> Result<(), OutOfTimeError> {
        self.set_year(self.year.checked_sub(1).ok_or(OutOfTimeError)?)
    }

    pub(crate) fn jump_to_today(&mut self) {
        self.cursor = self.today;
        if self.year != self.today.year() {
            self.year = self.today.year();
            self.redraw();
        }
    }

    /// Moves the cursor by `days`, staying within the year on display
    pub(crate) fn move_cursor(&mut self, days: i64) -> Result<(), OutOfYearError> {
        match self.cursor.checked_add(Duration::days(days)) {
            Some(d) if d.year() == self.year => {
                self.cursor = d;
                Ok(())
            }
            _ => Err(OutOfYearError),
        }
    }
}

fn same_day_in_year(date: Date, year: i32) -> Result<Date, OutOfTimeError> {
    Date::from_calendar_date(year, date.month(), date.day())
        .or_else(|_| Date::from_calendar_date(year, Month::February, 28))
        .map_err(|_| OutOfTimeError)
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("cannot move the cursor outside of the year on display")]
pub(crate) struct OutOfYearError;
