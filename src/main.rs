mod app;
mod calendar;
mod config;
mod counts;
mod heatmap;
mod help;
mod logging;
mod resize;
mod scale;
mod scene;
mod theme;
use crate::app::App;
use crate::config::Config;
use crate::counts::{load_records, EventCountIndex, WorkshopRecord};
use crate::heatmap::HeatmapView;
use crate::scene::Container;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use time::{Date, OffsetDateTime};

/// Path argument meaning standard input or standard output
const STDIO_PATH: &str = "-";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(RunOptions),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct RunOptions {
    records: PathBuf,
    year: Option<i32>,
    svg: Option<PathBuf>,
    width: Option<u16>,
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut records = None;
        let mut opts = RunOptions::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('y') | Arg::Long("year") => opts.year = Some(parser.value()?.parse()?),
                Arg::Short('o') | Arg::Long("svg") => opts.svg = Some(PathBuf::from(parser.value()?)),
                Arg::Short('w') | Arg::Long("width") => opts.width = Some(parser.value()?.parse()?),
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if records.is_none() => records = Some(PathBuf::from(value)),
                _ => return Err(arg.unexpected()),
            }
        }
        opts.records = records.ok_or("missing <RECORDS> argument")?;
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => opts.run(),
            Command::Help => {
                println!("Usage: workheat [OPTIONS] <RECORDS>");
                println!();
                println!("Calendar heatmap of workshop counts for the terminal and SVG");
                println!();
                println!("<RECORDS> is a JSON array of objects with a \"date\" field");
                println!("(YYYY-MM-DD), or - to read it from standard input.");
                println!();
                println!("Options:");
                println!("  -y, --year YEAR       Show YEAR instead of the current year");
                println!("  -o, --svg FILE        Write an SVG document to FILE (- for stdout)");
                println!("                        instead of starting the viewer");
                println!("  -w, --width PX        Width of the SVG document in pixels");
                println!("  -c, --config FILE     Read configuration from FILE");
                println!("      --log-file FILE   Write log messages to FILE");
                println!("  -h, --help            Display this help message and exit");
                println!("  -V, --version         Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl RunOptions {
    fn run(self) -> anyhow::Result<()> {
        let _logger = logging::init(self.log_file.as_deref(), self.svg.is_none())
            .context("failed to initialize logging")?;
        let config = Config::load(self.config.as_deref())?;
        let records = read_records(&self.records)?;
        log::info!(
            "Read {} workshop records from {}",
            records.len(),
            self.records.display()
        );
        match self.svg {
            Some(ref path) => {
                let year = match self.year {
                    Some(y) => y,
                    None => today()?.year(),
                };
                let width = self.width.unwrap_or(config.svg_width);
                write_svg(&config, year, width, &records, path)
            }
            None => {
                let index = EventCountIndex::from_records(&records);
                log::debug!("Workshops fall on {} distinct dates", index.len());
                let mut view = HeatmapView::new(config.renderer(), index, today()?);
                if let Some(year) = self.year {
                    view = view
                        .start_year(year)
                        .with_context(|| format!("cannot show year {year}"))?;
                }
                with_terminal(|terminal| {
                    App::new(view).run(terminal)?;
                    Ok(())
                })
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn today() -> anyhow::Result<Date> {
    Ok(OffsetDateTime::now_local()
        .context("failed to determine local date")?
        .date())
}

fn read_records(path: &Path) -> anyhow::Result<Vec<WorkshopRecord>> {
    if path == Path::new(STDIO_PATH) {
        load_records(io::stdin().lock()).context("failed to read records from standard input")
    } else {
        let fp = File::open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        load_records(BufReader::new(fp))
            .with_context(|| format!("failed to read records from {}", path.display()))
    }
}

fn write_svg(
    config: &Config,
    year: i32,
    width: u16,
    records: &[WorkshopRecord],
    path: &Path,
) -> anyhow::Result<()> {
    let mut container = Container::new(u32::from(width));
    let svg = config
        .renderer()
        .draw_year(&mut container, year, records)
        .to_svg();
    if path == Path::new(STDIO_PATH) {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(svg.as_bytes())
            .and_then(|()| stdout.flush())
            .context("failed to write SVG to standard output")
    } else {
        fs::write(path, svg).with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("Wrote heatmap for {year} to {}", path.display());
        Ok(())
    }
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
