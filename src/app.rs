use crate::calendar::WEEK_COLUMNS;
use crate::heatmap::{Heatmap, HeatmapView};
use crate::help::Help;
use crate::resize::{HookHandle, ResizeHooks};
use crate::theme::BASE_STYLE;
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Rect, Size},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};

/// Days moved by the cursor when stepping to the neighbouring column
const DAYS_PER_COLUMN: i64 = 7;

#[derive(Debug)]
pub(crate) struct App {
    view: HeatmapView,
    hooks: ResizeHooks<HeatmapView>,
    /// Hook that runs only for the first layout
    startup_hook: Option<HookHandle>,
    state: AppState,
}

impl App {
    pub(crate) fn new(view: HeatmapView) -> App {
        let mut hooks = ResizeHooks::new();
        hooks.register(|view: &mut HeatmapView, size| view.resize(size));
        hooks.register(|view: &mut HeatmapView, size| {
            if let Some(scene) = view.scene() {
                log::debug!(
                    "Terminal resized to {}x{}; cell size is now {}",
                    size.width,
                    size.height,
                    scene.cell_size()
                );
            }
        });
        let startup_hook = hooks.register(|view: &mut HeatmapView, size| {
            if view.scene().is_some_and(|s| s.cell_size() == 0) {
                log::warn!(
                    "Terminal is only {} columns wide; the heatmap needs at least {}",
                    size.width,
                    WEEK_COLUMNS
                );
            }
        });
        log::debug!("Registered {} resize hooks", hooks.len());
        App {
            view,
            hooks,
            startup_hook: Some(startup_hook),
            state: AppState::Heatmap,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        self.resize(terminal.size()?);
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

    fn resize(&mut self, size: Size) {
        self.hooks.fire(&mut self.view, size);
        if let Some(handle) = self.startup_hook.take() {
            self.hooks.unregister(handle);
        }
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match read()? {
            Event::Resize(width, height) => self.resize(Size::new(width, height)),
            event => {
                if let Some(KeyEvent {
                    code, modifiers, ..
                }) = event.as_key_press_event()
                {
                    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                        self.state = AppState::Quitting;
                    } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                        self.beep()?;
                    }
                }
            }
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or tried to move
    // past the edge of the calendar
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Heatmap => match key {
                KeyCode::Char('h') | KeyCode::Left => {
                    self.view.move_cursor(-DAYS_PER_COLUMN).is_ok()
                }
                KeyCode::Char('l') | KeyCode::Right => {
                    self.view.move_cursor(DAYS_PER_COLUMN).is_ok()
                }
                KeyCode::Char('k') | KeyCode::Up => self.view.move_cursor(-1).is_ok(),
                KeyCode::Char('j') | KeyCode::Down => self.view.move_cursor(1).is_ok(),
                KeyCode::Char('[') | KeyCode::PageUp => self.view.previous_year().is_ok(),
                KeyCode::Char(']') | KeyCode::PageDown => self.view.next_year().is_ok(),
                KeyCode::Char('t') | KeyCode::Home => {
                    self.view.jump_to_today();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Heatmap;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        Heatmap.render(area, buf, &mut self.view);
        if self.state == AppState::Helping {
            Help.render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Heatmap,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::counts::{EventCountIndex, WorkshopRecord};
    use crate::scene::Scene;
    use time::macros::date;

    fn app() -> App {
        let index = EventCountIndex::from_records(&[
            WorkshopRecord::new("2015-03-01"),
            WorkshopRecord::new("2015-03-08"),
            WorkshopRecord::new("2016-03-01"),
        ]);
        let mut app = App::new(HeatmapView::new(
            Config::default().renderer(),
            index,
            date!(2015 - 03 - 01),
        ));
        app.resize(Size::new(106, 14));
        app
    }

    fn render(app: &mut App) -> Buffer {
        let area = Rect::new(0, 0, 106, 14);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn test_resize_hooks_relayout() {
        let mut app = app();
        assert_eq!(app.hooks.len(), 2);
        assert_eq!(app.view.scene().map(Scene::cell_size), Some(2));
        app.resize(Size::new(212, 30));
        assert_eq!(app.view.scene().map(Scene::cell_size), Some(4));
    }

    #[test]
    fn test_move_cursor_by_week() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Right));
        assert_eq!(app.view.cursor(), date!(2015 - 03 - 08));
        let buf = render(&mut app);
        assert!(row(&buf, 13).starts_with(" 2015-03-08 (Sunday): 1 workshop "));
        assert!(app.handle_key(KeyCode::Char('k')));
        assert_eq!(app.view.cursor(), date!(2015 - 03 - 07));
    }

    #[test]
    fn test_switch_year() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char(']')));
        assert_eq!(app.view.year(), 2016);
        let buf = render(&mut app);
        assert_eq!(row(&buf, 0).trim(), "Workshops in 2016: 1");
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.view.year(), 2015);
    }

    #[test]
    fn test_cursor_stays_in_year() {
        let mut app = app();
        for _ in 0..8 {
            assert!(app.handle_key(KeyCode::Left));
        }
        assert_eq!(app.view.cursor(), date!(2015 - 01 - 04));
        assert!(!app.handle_key(KeyCode::Left));
        assert_eq!(app.view.cursor(), date!(2015 - 01 - 04));
    }

    #[test]
    fn test_help_and_quit() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        assert_eq!(app.state, AppState::Helping);
        let buf = render(&mut app);
        assert!((0..14).any(|y| row(&buf, y).contains(" Keys ")));
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Heatmap);
        assert!(!app.handle_key(KeyCode::Char('x')));
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }
}
