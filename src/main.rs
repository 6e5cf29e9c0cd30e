use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use gavel::{
    app::{App, Control},
    app_dirs::AppDirs,
    clock::{HighlightMode, StartMode, TimeSource},
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, ChannelEventSource, EventSource, Runner},
    session::SessionConfig,
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{info, warn};

/// presiding officer tracker for Congressional debate
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Track speeches, questions, precedence and speech timing while presiding over a Congressional debate chamber."
)]
pub struct Cli {
    /// total competitors in the chamber, used for majority and 2/3 thresholds
    #[clap(short = 'c', long, value_parser = clap::value_parser!(u32).range(1..))]
    competitors: Option<u32>,

    /// continue from the paused time when the timer is started again
    #[clap(long)]
    resume_timer: bool,

    /// only highlight the exact 2:00, 2:30 and 3:00 marks
    #[clap(long)]
    exact_highlight: bool,

    /// screen refresh interval in milliseconds
    #[clap(long)]
    tick_rate_ms: Option<u64>,

    /// config file to read (and write with --save-config)
    #[clap(long)]
    config: Option<PathBuf>,

    /// log file location
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// write the effective settings to the config file and exit
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    /// Command line flags win over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(n) = self.competitors {
            config.total_competitors = n;
        }
        if let Some(ms) = self.tick_rate_ms {
            config.tick_rate_ms = ms.max(1);
        }
        if self.resume_timer {
            config.timer.start_mode = StartMode::Resume;
        }
        if self.exact_highlight {
            config.timer.highlight = HighlightMode::ExactBoundary;
        }
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_path = cli
        .log_file
        .clone()
        .or_else(AppDirs::log_path)
        .unwrap_or_else(|| PathBuf::from("gavel.log"));
    if let Err(e) = logging::init(&log_path) {
        eprintln!("logging disabled ({}): {e}", log_path.display());
    }

    let store = cli.config_store();
    let mut config = store.load();
    cli.apply(&mut config);

    if cli.save_config {
        store.save(&config)?;
        println!("saved settings to {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(SessionConfig::from(&config));
    let runner = Runner::new(
        ChannelEventSource::crossterm(),
        Duration::from_millis(config.tick_rate_ms.max(1)),
    );
    info!(
        competitors = config.total_competitors,
        tick_rate_ms = runner.tick_rate().as_millis() as u64,
        "starting"
    );
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        tracing::error!(error = %e, "session ended with an error");
    }
    result
}

/// Every pass polls the clock before drawing, so the timer is current
/// after key presses as well as on idle ticks.
fn start_tui<B: Backend, T: TimeSource, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App<T>,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            AppEvent::Tick => {}
            AppEvent::Key(key) => {
                if app.handle_key(key)? == Control::Quit {
                    info!(round = app.session.round().number, "quitting");
                    break;
                }
            }
            AppEvent::Closed => {
                warn!("input closed, leaving");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use gavel::clock::ManualTimeSource;
    use gavel::session::Session;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["gavel"]);

        assert_eq!(cli.competitors, None);
        assert!(!cli.resume_timer);
        assert!(!cli.exact_highlight);
        assert_eq!(cli.tick_rate_ms, None);
        assert_eq!(cli.config, None);
        assert!(!cli.save_config);
    }

    #[test]
    fn test_cli_competitors() {
        let cli = Cli::parse_from(["gavel", "-c", "20"]);
        assert_eq!(cli.competitors, Some(20));

        let cli = Cli::parse_from(["gavel", "--competitors", "7"]);
        assert_eq!(cli.competitors, Some(7));
    }

    #[test]
    fn test_cli_rejects_zero_competitors() {
        assert!(Cli::try_parse_from(["gavel", "-c", "0"]).is_err());
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "gavel",
            "-c",
            "12",
            "--resume-timer",
            "--exact-highlight",
            "--tick-rate-ms",
            "50",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.total_competitors, 12);
        assert_eq!(config.tick_rate_ms, 50);
        assert_eq!(config.timer.start_mode, StartMode::Resume);
        assert_eq!(config.timer.highlight, HighlightMode::ExactBoundary);
    }

    #[test]
    fn test_cli_without_flags_keeps_config() {
        let cli = Cli::parse_from(["gavel"]);
        let mut config = Config {
            total_competitors: 30,
            ..Config::default()
        };
        cli.apply(&mut config);
        assert_eq!(config.total_competitors, 30);
        assert_eq!(config.timer.start_mode, StartMode::Reset);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["gavel", "--config", "/tmp/gavel-test.json"]);
        assert_eq!(
            cli.config_store().path(),
            std::path::Path::new("/tmp/gavel-test.json")
        );
    }

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn test_runner() -> (mpsc::Sender<AppEvent>, Runner<ChannelEventSource>) {
        let (tx, rx) = mpsc::channel();
        let runner = Runner::new(ChannelEventSource::new(rx), Duration::from_millis(1));
        (tx, runner)
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_start_tui_runs_until_quit() {
        let (tx, runner) = test_runner();

        tx.send(key(KeyCode::Char('q'))).unwrap();
        for c in "Bob".chars() {
            tx.send(key(KeyCode::Char(c))).unwrap();
        }
        tx.send(key(KeyCode::Enter)).unwrap();
        tx.send(AppEvent::Tick).unwrap();
        tx.send(key(KeyCode::Esc)).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        let mut app = App::new(SessionConfig::default());
        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert_eq!(app.session.questions().len(), 1);
        assert_eq!(app.session.questions()[0].questioner, "Bob");
    }

    #[test]
    fn test_start_tui_redraws_current_time_after_keys() {
        let (tx, runner) = test_runner();
        let source = ManualTimeSource::new();
        let session = Session::with_time_source(source.clone(), SessionConfig::default());
        let mut app = App::with_session(session);
        app.session.start_timer();
        source.advance(Duration::from_secs(65));

        // a key opens the form, the final Esc quits before any idle tick is
        // needed; the frame drawn in between must show the advanced time
        tx.send(key(KeyCode::Char('s'))).unwrap();
        tx.send(key(KeyCode::Esc)).unwrap();
        tx.send(key(KeyCode::Esc)).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        start_tui(&mut terminal, &mut app, &runner).unwrap();

        let content = screen(&terminal);
        assert!(content.contains("1:05"));
        assert!(!content.contains("0:00"));
    }

    #[test]
    fn test_start_tui_leaves_when_input_closes() {
        let (tx, runner) = test_runner();
        drop(tx);

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        let mut app = App::new(SessionConfig::default());
        start_tui(&mut terminal, &mut app, &runner).unwrap();
        assert_eq!(app.session.round().number, 1);
    }
}
