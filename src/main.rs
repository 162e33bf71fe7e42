mod app;
mod calendar;
mod dateinput;
mod help;
mod script;
mod scriptview;
mod selection;
mod theme;
use crate::app::App;
use crate::calendar::{CalendarState, DateKey, DateRange, WeekStart};
use crate::selection::Selection;
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::{Date, OffsetDateTime};
use tracing::{debug, info, Subscriber};
use tracing_subscriber::EnvFilter;

static DEFAULT_OUTPUT: &str = "run.sh";

static DEFAULT_LOG_FILTER: &str = "gittravel=debug";

/// Settings shared by the interactive and script-printing modes
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    from: Option<Date>,
    to: Option<Date>,
    week_start: WeekStart,
    output: Option<PathBuf>,
    log_file: Option<PathBuf>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Script {
        dates: Vec<DateKey>,
        options: Options,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut options = Options::default();
        let mut script = false;
        let mut dates = Vec::new();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('f') | Arg::Long("from") => {
                    options.from = Some(parser.value()?.parse::<DateKey>()?.date());
                }
                Arg::Short('t') | Arg::Long("to") => {
                    options.to = Some(parser.value()?.parse::<DateKey>()?.date());
                }
                Arg::Short('m') | Arg::Long("monday") => options.week_start = WeekStart::Monday,
                Arg::Short('o') | Arg::Long("output") => {
                    options.output = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('l') | Arg::Long("log-file") => {
                    options.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('s') | Arg::Long("script") => script = true,
                Arg::Value(value) if script => dates.push(value.parse::<DateKey>()?),
                _ => return Err(arg.unexpected()),
            }
        }
        if script {
            if options.from.is_some()
                || options.to.is_some()
                || options.week_start != WeekStart::default()
            {
                return Err("--from, --to and --monday cannot be used with --script".into());
            }
            Ok(Command::Script { dates, options })
        } else {
            Ok(Command::Run(options))
        }
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(options) => {
                if let Some(path) = &options.log_file {
                    init_logging(path)?;
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let range = DateRange::resolve(options.from, options.to, today);
                let output = options
                    .output
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));
                info!(
                    from = ?range.from(),
                    to = ?range.to(),
                    week_start = ?options.week_start,
                    output = %output.display(),
                    "starting calendar"
                );
                let calendar = CalendarState::new(range, options.week_start);
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(calendar, output).run(terminal)?;
                    Ok(())
                })
            }
            Command::Script { dates, options } => {
                if let Some(path) = &options.log_file {
                    init_logging(path)?;
                }
                let selection = dates.into_iter().collect::<Selection>();
                let text = script::generate_script(selection.keys());
                debug!(dates = selection.len(), "generated script");
                match options.output {
                    Some(path) => {
                        script::save(&path, &text)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        info!(path = %path.display(), "wrote script");
                    }
                    None => io::stdout()
                        .write_all(text.as_bytes())
                        .context("failed to write script to stdout")?,
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage:");
                println!("  gittravel [options]");
                println!("  gittravel [-o PATH] [-l PATH] --script YYYY-MM-DD ...");
                println!();
                println!("Pick days on a contribution calendar and generate a bash script that");
                println!("makes one backdated git commit on each of them");
                println!();
                println!("Options:");
                println!("  -f, --from YYYY-MM-DD  Start of the date range [default: one year ago]");
                println!("  -t, --to YYYY-MM-DD    End of the date range [default: today]");
                println!("  -m, --monday           Start weeks on Monday instead of Sunday");
                println!("  -o, --output PATH      Write the script to PATH [default: run.sh, or");
                println!("                         stdout with --script]");
                println!("  -s, --script           Print the script for the given dates and exit");
                println!("  -l, --log-file PATH    Append debug logs to PATH");
                println!("  -h, --help             Display this help message and exit");
                println!("  -V, --version          Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing::subscriber::set_global_default(log_subscriber(file, filter))
        .context("failed to install logger")?;
    Ok(())
}

fn log_subscriber(file: File, filter: EnvFilter) -> impl Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .finish()
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
