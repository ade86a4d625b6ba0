mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
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
use tracing::{info, level_filters::LevelFilter, warn};
use typerush::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, TIME_PRESETS},
    driver::SessionDriver,
    history::{HistoryRecord, HistoryStore},
    language::{Dictionary, WordOrder},
    layout::{wrap_rows, ScrollState},
    logging,
    runtime::{
        AppEvent, AppEventSource, CrosstermEventSource, FixedTicker, Runner, ThreadTickScheduler,
        Ticker,
    },
    session::{SessionConfig, Transition},
    typing_policy::Keystroke,
};

const FRAME_RATE_MS: u64 = 100;
const SESSION_TICK: Duration = Duration::from_secs(1);

/// timed typing speed test with live wpm and accuracy
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 's', long)]
    secs: Option<u64>,

    /// number of words to sample from the dictionary
    #[clap(short = 'w', long)]
    words: Option<usize>,

    /// built-in dictionary to pull words from
    #[clap(short = 'd', long)]
    dictionary: Option<String>,

    /// JSON dictionary file: {"name": "...", "words": ["..."]}
    #[clap(short = 'f', long, conflicts_with = "dictionary")]
    dictionary_file: Option<PathBuf>,

    /// custom prompt to type, word for word and in order
    #[clap(short = 'p', long, conflicts_with_all = ["dictionary", "dictionary_file"])]
    prompt: Option<String>,

    /// print the last N finished sessions and exit
    #[clap(long, value_name = "N")]
    history: Option<usize>,

    /// log level for the log file (defaults to RUST_LOG, then info)
    #[clap(long)]
    log_level: Option<LevelFilter>,
}

impl Cli {
    /// Loaded config with command line overrides applied
    fn merge(&self, mut config: Config) -> Config {
        if let Some(secs) = self.secs {
            config.time_limit_secs = secs;
        }
        if let Some(words) = self.words {
            config.sample_size = words;
        }
        if let Some(ref name) = self.dictionary {
            config.dictionary = name.clone();
        }
        config
    }

    fn word_source(&self, config: &Config) -> typerush::error::Result<(Dictionary, WordOrder)> {
        if let Some(ref prompt) = self.prompt {
            let words = prompt.split_whitespace().map(str::to_string).collect();
            return Ok((Dictionary::from_words("prompt", words)?, WordOrder::InOrder));
        }
        let dictionary = match self.dictionary_file {
            Some(ref path) => Dictionary::from_path(path)?,
            None => Dictionary::builtin(&config.dictionary)?,
        };
        Ok((dictionary, WordOrder::Shuffled))
    }
}

/// Session settings for the chosen word source; a prompt is typed whole
fn session_config(config: &Config, dictionary: &Dictionary, order: WordOrder) -> SessionConfig {
    SessionConfig {
        sample_size: match order {
            WordOrder::InOrder => dictionary.len(),
            WordOrder::Shuffled => config.sample_size,
        },
        time_limit_secs: config.time_limit_secs,
        order,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

pub struct App {
    pub driver: SessionDriver<ThreadTickScheduler>,
    pub state: AppState,
    pub scroll: ScrollState,
    pub text_width: u16,
    /// Config as stored on disk, without command line overrides
    saved_config: Config,
    config_store: FileConfigStore,
    history: Option<HistoryStore>,
}

impl App {
    fn new(
        driver: SessionDriver<ThreadTickScheduler>,
        text_width: u16,
        saved_config: Config,
        config_store: FileConfigStore,
        history: Option<HistoryStore>,
    ) -> Self {
        Self {
            driver,
            state: AppState::Typing,
            scroll: ScrollState::default(),
            text_width,
            saved_config,
            config_store,
            history,
        }
    }

    fn keystroke(&mut self, keystroke: Keystroke) {
        let before = self.driver.session().word_index();
        let transition = self.driver.input(keystroke);

        let after = self.driver.session().word_index();
        if after != before && after < self.driver.session().words().len() {
            let rows = wrap_rows(self.driver.session().words(), self.text_width);
            self.scroll.on_word_change(rows[before], rows[after], 1);
        }

        if transition == Transition::Finished {
            self.show_results();
        }
    }

    fn tick(&mut self, generation: u64) {
        if self.driver.tick(generation) == Transition::Finished {
            self.show_results();
        }
    }

    fn show_results(&mut self) {
        self.state = AppState::Results;
        let Some(record) = HistoryRecord::from_session(self.driver.session()) else {
            return;
        };
        if let Some(ref history) = self.history {
            if let Err(err) = history.append(&record) {
                warn!(%err, path = %history.path().display(), "could not record session");
            }
        }
    }

    fn reset(&mut self) {
        self.driver.reset();
        self.scroll = ScrollState::default();
        self.state = AppState::Typing;
    }

    fn retry(&mut self) {
        self.driver.retry();
        self.scroll = ScrollState::default();
        self.state = AppState::Typing;
    }

    fn select_time_limit(&mut self, secs: u64) {
        self.driver.set_time_limit(secs);
        self.scroll = ScrollState::default();
        self.saved_config.time_limit_secs = secs;
        if let Err(err) = self.config_store.save(&self.saved_config) {
            warn!(%err, "could not save config");
        }
        info!(secs, "time limit changed");
    }

    /// Keep the active row on screen after the terminal width changed
    fn relayout(&mut self) {
        let session = self.driver.session();
        let rows = wrap_rows(session.words(), self.text_width);
        let active_row = rows.get(session.word_index()).copied().unwrap_or_default();
        self.scroll.offset = if active_row > 1 { active_row } else { 0 };
    }

    /// Number keys pick a time limit while Idle, unless the first word starts with that digit
    fn preset_for(&self, c: char) -> Option<u64> {
        let session = self.driver.session();
        if !session.is_idle() || session.active_word().is_some_and(|w| w.starts_with(c)) {
            return None;
        }
        preset(c)
    }

    /// Returns false when the app should quit
    fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return false;
        }
        if key.code == KeyCode::Tab {
            self.reset();
            return true;
        }

        match self.state {
            AppState::Typing => match key.code {
                KeyCode::Backspace => self.keystroke(Keystroke::Backspace),
                KeyCode::Char(' ') => self.keystroke(Keystroke::Space),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    match self.preset_for(c) {
                        Some(secs) => self.select_time_limit(secs),
                        None => self.keystroke(Keystroke::Char(c)),
                    }
                }
                _ => {}
            },
            AppState::Results => {
                if key.code == KeyCode::Char('r') {
                    self.retry();
                }
            }
        }
        true
    }
}

/// Time limit bound to a number key
fn preset(c: char) -> Option<u64> {
    let idx = c.to_digit(10)?.checked_sub(1)?;
    TIME_PRESETS.get(idx as usize).copied()
}

fn print_history(n: usize) -> Result<(), Box<dyn Error>> {
    let Some(store) = HistoryStore::new() else {
        println!("no state directory available");
        return Ok(());
    };
    let records = store.recent(n)?;
    if records.is_empty() {
        println!("no sessions recorded yet");
    }
    for record in records {
        println!("{}", record.summary_line());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(n) = cli.history {
        return print_history(n);
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(log_dir) = AppDirs::log_dir() {
        if let Err(err) = logging::enable_logging(&log_dir, cli.log_level) {
            eprintln!("logging disabled: {err}");
        }
    }

    let config_store = FileConfigStore::new();
    let saved_config = config_store.load();
    let config = cli.merge(saved_config.clone());
    let (dictionary, order) = cli.word_source(&config)?;
    let session_config = session_config(&config, &dictionary, order);
    info!(
        dictionary = %dictionary.name,
        words = session_config.sample_size,
        secs = session_config.time_limit_secs,
        "starting"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let event_source = CrosstermEventSource::new();
    let scheduler = ThreadTickScheduler::new(event_source.sender(), SESSION_TICK);
    let runner = Runner::new(
        event_source,
        FixedTicker::new(Duration::from_millis(FRAME_RATE_MS)),
    );

    let mut app = App::new(
        SessionDriver::new(dictionary, session_config, scheduler),
        ui::text_width(terminal.size()?.width),
        saved_config,
        config_store,
        HistoryStore::new(),
    );
    let result = run_app(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            AppEvent::Key(key) => {
                if key.kind == KeyEventKind::Press && !app.on_key(key) {
                    break;
                }
            }
            AppEvent::Tick { generation } => app.tick(generation),
            AppEvent::Resize => {
                app.text_width = ui::text_width(terminal.size()?.width);
                app.relayout();
            }
            AppEvent::Frame => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{path::Path, sync::mpsc};
    use tempfile::tempdir;

    fn app(args: &[&str], dir: &Path) -> App {
        let cli = Cli::parse_from(std::iter::once("typerush").chain(args.iter().copied()));
        let store = FileConfigStore::with_path(dir.join("config.json"));
        let saved = store.load();
        let config = cli.merge(saved.clone());
        let (dictionary, order) = cli.word_source(&config).unwrap();
        let session_config = session_config(&config, &dictionary, order);
        let (tx, _rx) = mpsc::channel();
        let scheduler = ThreadTickScheduler::new(tx, Duration::from_secs(3600));
        App::new(
            SessionDriver::new(dictionary, session_config, scheduler),
            80,
            saved,
            store,
            None,
        )
    }

    fn press(app: &mut App, keys: &str) {
        for c in keys.chars() {
            app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    #[test]
    fn number_keys_map_to_presets() {
        assert_eq!(preset('1'), Some(15));
        assert_eq!(preset('4'), Some(120));
        assert_eq!(preset('0'), None);
        assert_eq!(preset('5'), None);
        assert_eq!(preset('a'), None);
    }

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from(["typerush", "-s", "30", "-w", "25"]);
        let merged = cli.merge(Config::default());

        assert_eq!(merged.time_limit_secs, 30);
        assert_eq!(merged.sample_size, 25);
        assert_eq!(merged.dictionary, Dictionary::DEFAULT);
    }

    #[test]
    fn prompt_is_typed_in_order() {
        let cli = Cli::parse_from(["typerush", "-p", "one two  three"]);
        let (dictionary, order) = cli.word_source(&Config::default()).unwrap();

        assert_eq!(dictionary.words, vec!["one", "two", "three"]);
        assert_eq!(order, WordOrder::InOrder);
    }

    #[test]
    fn prompt_conflicts_with_dictionary() {
        assert!(Cli::try_parse_from(["typerush", "-p", "hi", "-d", "common200"]).is_err());
    }

    #[test]
    fn unknown_dictionary_is_an_error() {
        let cli = Cli::parse_from(["typerush", "-d", "nope"]);
        let config = cli.merge(Config::default());
        assert!(cli.word_source(&config).is_err());
    }

    #[test]
    fn digit_that_starts_the_first_word_is_typed() {
        let dir = tempdir().unwrap();
        let mut app = app(&["-p", "1984 was", "-s", "60"], dir.path());
        press(&mut app, "1");

        let s = app.driver.session();
        assert!(s.is_running());
        assert_eq!(s.total_chars(), 1);
        assert_eq!(s.char_buffer(), &['1']);
        assert_eq!(s.time_limit_secs(), 60);
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn number_key_picks_preset_while_idle() {
        let dir = tempdir().unwrap();
        let mut app = app(&["-p", "the quick", "-s", "60"], dir.path());
        press(&mut app, "2");

        let s = app.driver.session();
        assert!(s.is_idle());
        assert_eq!(s.total_chars(), 0);
        assert_eq!(s.time_limit_secs(), 30);

        press(&mut app, "t3");
        let s = app.driver.session();
        assert_eq!(s.char_buffer(), &['t', '3']);
        assert_eq!(s.time_limit_secs(), 30);
    }

    #[test]
    fn preset_saves_only_the_time_limit() {
        let dir = tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let stored = Config {
            sample_size: 50,
            ..Config::default()
        };
        store.save(&stored).unwrap();

        let mut app = app(&["-w", "5", "-d", "common200", "-s", "90"], dir.path());
        assert_eq!(app.driver.session().words().len(), 5);
        press(&mut app, "2");

        assert_eq!(
            store.load(),
            Config {
                time_limit_secs: 30,
                ..stored
            }
        );
    }

    #[test]
    fn committing_words_scrolls_by_rows() {
        let dir = tempdir().unwrap();
        let mut app = app(&["-p", "aa bb cc dd ee ff gg"], dir.path());
        // "aa bb" / "cc dd" / "ee ff" / "gg"
        app.text_width = 5;

        press(&mut app, "aa bb ");
        assert_eq!(app.driver.session().word_index(), 2);
        assert_eq!(app.scroll.offset, 0);

        press(&mut app, "cc dd ");
        assert_eq!(app.scroll.offset, 2);

        press(&mut app, "ee ff ");
        assert_eq!(app.scroll.offset, 3);

        app.on_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE));
        assert_eq!(app.scroll.offset, 0);
    }

    #[test]
    fn retry_keeps_words_and_tab_resets() {
        let dir = tempdir().unwrap();
        let mut app = app(&["-w", "3"], dir.path());
        let words = app.driver.session().words().to_vec();

        for word in &words {
            press(&mut app, word);
            press(&mut app, " ");
        }
        assert_eq!(app.state, AppState::Results);

        press(&mut app, "r");
        assert_eq!(app.state, AppState::Typing);
        assert!(app.driver.session().is_idle());
        assert_eq!(app.driver.session().words(), words.as_slice());
    }
}
