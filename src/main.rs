use clamtap::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    field::{MAX_COLUMNS, MAX_ITEMS_PER_KIND},
    game::{Game, GameBuilder},
    hud::Hud,
    runtime::{EventPump, GameEvent, IDLE_WAKEUP},
    schedule::IntervalSchedule,
    session::Session,
    ui::{layout::Hit, Board},
};
use clap::{builder::RangedU64ValueParser, error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Frame, Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// collect every clam before the clock runs out, and keep away from the crabs
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed terminal clicker. Click every clam on the field before the countdown ends; one click on a crab and the round is lost."
)]
pub struct Cli {
    /// seconds on the clock
    #[clap(short = 'd', long = "duration", value_parser = clap::value_parser!(u32).range(1..))]
    game_duration_secs: Option<u32>,

    /// number of clams to collect
    #[clap(short = 'c', long = "clams", value_parser = RangedU64ValueParser::<usize>::new().range(1..=MAX_ITEMS_PER_KIND as u64))]
    clam_count: Option<usize>,

    /// number of crabs to avoid
    #[clap(short = 'x', long = "crabs", value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_ITEMS_PER_KIND as u64))]
    crab_count: Option<usize>,

    /// width of the field in slots
    #[clap(long, value_parser = clap::value_parser!(u16).range(1..=MAX_COLUMNS as i64))]
    columns: Option<u16>,

    /// seed for the field layout, for reproducible rounds
    #[clap(long)]
    seed: Option<u64>,

    /// write the effective settings back to the config file
    #[clap(long)]
    save_config: bool,

    /// write logs to this file (otherwise only when RUST_LOG is set)
    #[clap(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    /// Overlay command line flags on top of the stored config
    fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.game_duration_secs {
            config.game_duration_secs = secs;
        }
        if let Some(clams) = self.clam_count {
            config.clam_count = clams;
        }
        if let Some(crabs) = self.crab_count {
            config.crab_count = crabs;
        }
        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        config
    }
}

pub struct App {
    pub game: Game<Hud, IntervalSchedule>,
    pub session: Session,
}

impl App {
    pub fn new(config: &Config, seed: Option<u64>) -> Self {
        let mut builder = GameBuilder::from_config(config);
        if let Some(seed) = seed {
            builder = builder.with_seed(seed);
        }
        let mut game = builder.build(Hud::default(), IntervalSchedule::new());
        let session = Session::new();
        game.set_stop_listener(session.listener());

        Self { game, session }
    }

    pub fn board(&self) -> Board<'_> {
        Board {
            hud: self.game.view(),
            field: self.game.field(),
            popup: self.session.popup(),
            tally: self.session.tally(),
        }
    }

    /// Whether the whole field can be drawn, and so played, in `area`
    pub fn field_fits(&self, area: Rect) -> bool {
        self.board().layout(area).field_fits
    }

    /// Presses the start/stop button, if it is showing. A round only
    /// starts when the whole field fits on screen; stopping always works.
    pub fn press_button(&mut self, area: Rect) {
        if !self.game.view().button_visible {
            return;
        }
        if !self.game.is_running() && !self.field_fits(area) {
            debug!(?area, "start ignored, terminal too small");
            return;
        }
        self.game.on_button_click();
    }

    /// Starts a new round from the result popup
    pub fn replay(&mut self, area: Rect) {
        if self.session.popup().is_none() {
            return;
        }
        if !self.field_fits(area) {
            debug!(?area, "replay ignored, terminal too small");
            return;
        }
        self.session.dismiss_popup();
        self.game.start();
    }

    pub fn on_click(&mut self, area: Rect, x: u16, y: u16) {
        let hit = self.board().layout(area).hit(
            x,
            y,
            self.game.view().button_visible,
            self.session.popup().is_some(),
            self.game.field().columns(),
            self.game.field().rows(),
        );
        debug!(?hit, x, y, "click");

        match hit {
            Hit::Button => self.press_button(area),
            Hit::Popup => self.replay(area),
            Hit::Slot(cell) => {
                self.game.on_field_click(cell);
            }
            Hit::Nothing => {}
        }
    }

    /// Delivers due countdown ticks and collects any reported outcome
    pub fn update(&mut self, now: Instant) {
        self.game.poll_schedule(now);
        self.session.drain();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(cli.log_file.as_deref())?;

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "config saved");
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, cli.seed);
    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(tally = %app.session.tally(), "bye");
    result
}

/// File logging only; the terminal belongs to the game
fn init_logging(log_file: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None if std::env::var_os("RUST_LOG").is_some() => match AppDirs::log_path() {
            Some(path) => path,
            None => return Ok(()),
        },
        None => return Ok(()),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    // runs before raw mode, so a failure still reaches the plain terminal
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| format!("cannot start logging to {}: {err}", path.display()))?;

    info!(path = %path.display(), "logging started");
    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let pump = EventPump::crossterm(IDLE_WAKEUP);

    terminal.draw(|f| ui(app, f))?;

    loop {
        let event = pump.next();
        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);

        match event {
            GameEvent::Quit => break,
            GameEvent::Click { x, y } => app.on_click(area, x, y),
            GameEvent::Toggle => app.press_button(area),
            GameEvent::Replay => app.replay(area),
            GameEvent::Idle | GameEvent::Resize => {}
        }

        app.update(Instant::now());
        terminal.draw(|f| ui(app, f))?;
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    let board = app.board();
    f.render_widget(&board, f.area());
}
