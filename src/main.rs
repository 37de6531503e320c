use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use crossterm::cursor::{self, MoveTo, MoveToNextLine};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{execute, queue};
use env_logger::Env;
use log::warn;
use rand::{rngs::StdRng, SeedableRng};

use slide_2048::config::Config;
use slide_2048::engine::{Direction, Score};
use slide_2048::highscore::HighScoreFile;
use slide_2048::session::{
    DebugCommand, DebugConsole, DebugEdit, EndReason, InputEvent, InputSource, Renderer, Session, Snapshot,
};
use slide_2048::EngineError;

#[derive(Debug, Parser)]
#[command(name = "slide-2048", about = "2048 in the terminal: w/a/s/d or arrow keys to move, q to quit")]
struct Args {
    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seed the tile RNG for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Where to keep the high score (overrides the config file)
    #[arg(long, value_name = "PATH")]
    highscore_file: Option<PathBuf>,

    /// Play without reading or writing a high score
    #[arg(long)]
    no_highscore: bool,

    /// Disable the debug console
    #[arg(long)]
    no_debug: bool,
}

/// A single key press as the game sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Key {
    Char(char),
    Arrow(Direction),
    Interrupt,
}

impl Key {
    fn from_event(key: KeyEvent) -> Option<Key> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Key::Interrupt),
            KeyCode::Char(c) => Some(Key::Char(c)),
            KeyCode::Up => Some(Key::Arrow(Direction::Up)),
            KeyCode::Down => Some(Key::Arrow(Direction::Down)),
            KeyCode::Left => Some(Key::Arrow(Direction::Left)),
            KeyCode::Right => Some(Key::Arrow(Direction::Right)),
            KeyCode::Esc => Some(Key::Interrupt),
            _ => None,
        }
    }
}

/// Where keys and typed lines come from.
trait Keyboard {
    /// Block for the next recognised key; `None` once input is closed.
    fn next_key(&mut self) -> io::Result<Option<Key>>;
    /// Read one full line of text, echoed; `None` once input is closed.
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Keyboard backed by crossterm raw mode.
///
/// Raw mode is entered on construction and left on drop, so the terminal is
/// restored however the game ends.
struct RawKeyboard;

impl RawKeyboard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), cursor::Hide)?;
        Ok(RawKeyboard)
    }
}

impl Drop for RawKeyboard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode().and_then(|()| execute!(io::stdout(), cursor::Show)) {
            warn!("failed to restore terminal: {e}");
        }
    }
}

impl Keyboard for RawKeyboard {
    fn next_key(&mut self) -> io::Result<Option<Key>> {
        loop {
            if let Event::Key(key) = event::read()? {
                if let Some(key) = Key::from_event(key) {
                    return Ok(Some(key));
                }
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        // cooked mode for the prompt so the player sees and can edit what they type
        terminal::disable_raw_mode()?;
        execute!(io::stdout(), cursor::Show)?;
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line);
        execute!(io::stdout(), cursor::Hide)?;
        terminal::enable_raw_mode()?;
        Ok((read? > 0).then(|| line.trim().to_string()))
    }
}

#[derive(Debug, Clone, Copy)]
enum EditMode {
    Board,
    Score,
}

/// Full-screen terminal front end: single key presses drive the game.
struct Terminal<K: Keyboard, O: Write> {
    keys: K,
    out: O,
    debug_code: Option<String>,
    mode: Option<EditMode>,
    retry: Option<EditMode>,
    last: Option<Snapshot>,
    output_failed: bool,
}

impl<K: Keyboard, O: Write> Terminal<K, O> {
    fn new(keys: K, out: O, debug_code: Option<String>) -> Self {
        Terminal { keys, out, debug_code, mode: None, retry: None, last: None, output_failed: false }
    }

    /// Record a failed write; the first one is logged and ends the game.
    fn check_output(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            if !self.output_failed {
                warn!("failed to write to the terminal: {e}; quitting");
                self.output_failed = true;
            }
        }
    }

    fn draw(&mut self, view: &Snapshot) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), MoveTo(0, 0), MoveToNextLine(1))?;
        let header = [
            format!("    SCORE: {:<11} CONTROLS: WASD", view.score),
            format!("    HIGHSCORE: {:<14} QUIT: Q", view.highscore),
            String::new(),
        ];
        for line in header.into_iter().chain(view.grid.to_string().lines().map(|l| format!("    {l}"))) {
            queue!(self.out, Print(line), MoveToNextLine(1))?;
        }
        self.out.flush()
    }

    fn write_message(&mut self, text: &str) -> io::Result<()> {
        queue!(self.out, MoveToNextLine(1), Print(format!("    {text}")))?;
        self.out.flush()
    }

    fn key(&mut self) -> Option<Key> {
        match self.keys.next_key() {
            Ok(key) => key,
            Err(e) => {
                warn!("failed to read key: {e}");
                None
            }
        }
    }

    fn prompt_line(&mut self, text: &str) -> Option<String> {
        let shown = self.write_message(text);
        self.check_output(shown);
        match self.keys.read_line() {
            Ok(line) => line,
            Err(e) => {
                warn!("failed to read input: {e}");
                None
            }
        }
    }

    fn prompt_key(&mut self, text: &str) -> Option<Key> {
        let shown = self.write_message(text);
        self.check_output(shown);
        self.key()
    }

    fn redraw(&mut self) {
        if let Some(view) = self.last {
            self.render(&view);
        }
    }

    fn choose_mode(&mut self) -> Option<EditMode> {
        let code = self.debug_code.clone()?;
        if self.prompt_line("Enter code: ")? != code {
            self.redraw();
            return None;
        }
        self.redraw();
        match self.prompt_key("Edit board by pressing b or set score by pressing s: ")? {
            Key::Char(c) if c.eq_ignore_ascii_case(&'b') => Some(EditMode::Board),
            Key::Char(c) if c.eq_ignore_ascii_case(&'s') => Some(EditMode::Score),
            _ => {
                self.redraw();
                None
            }
        }
    }
}

impl<K: Keyboard, O: Write> Renderer for Terminal<K, O> {
    fn render(&mut self, view: &Snapshot) {
        self.last = Some(*view);
        let drawn = self.draw(view);
        self.check_output(drawn);
    }

    fn notice(&mut self, message: &str) {
        self.redraw();
        let shown = self.write_message(message);
        self.check_output(shown);
    }
}

impl<K: Keyboard, O: Write> InputSource for Terminal<K, O> {
    fn next_event(&mut self) -> Option<InputEvent> {
        if self.output_failed {
            return Some(InputEvent::Quit);
        }
        match self.key() {
            None | Some(Key::Interrupt) => Some(InputEvent::Quit),
            Some(Key::Arrow(dir)) => Some(InputEvent::Move(dir)),
            Some(Key::Char(c)) => {
                if let Some(dir) = Direction::from_key(c) {
                    return Some(InputEvent::Move(dir));
                }
                match c.to_ascii_lowercase() {
                    'q' => Some(InputEvent::Quit),
                    'x' if self.debug_code.is_some() => Some(InputEvent::DebugRequest),
                    _ => None,
                }
            }
        }
    }
}

impl<K: Keyboard, O: Write> DebugConsole for Terminal<K, O> {
    fn request_edit(&mut self, _view: &Snapshot) -> DebugCommand {
        let mode = match self.retry.take().or_else(|| self.choose_mode()) {
            Some(mode) => mode,
            None => return DebugCommand::Cancel,
        };
        let (question, parse): (&str, fn(&str) -> Result<DebugEdit, EngineError>) = match mode {
            EditMode::Board => ("coordinates and new value (eg: 1 2 8): ", DebugEdit::parse),
            EditMode::Score => ("set score: ", DebugEdit::parse_score),
        };
        self.mode = Some(mode);
        let Some(text) = self.prompt_line(question) else {
            return DebugCommand::Cancel;
        };
        DebugCommand::from(parse(&text))
    }

    fn reject(&mut self, _error: &EngineError) {
        // next request goes straight back to the value prompt
        self.retry = self.mode;
    }
}

fn load_highscore(file: Option<&HighScoreFile>) -> (Score, Option<&HighScoreFile>) {
    let Some(file) = file else { return (0, None) };
    match file.initialize() {
        Ok(score) => (score, Some(file)),
        Err(e) => {
            warn!("high score unavailable ({}): {e}; playing without it", file.path().display());
            (0, None)
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::from_toml(path)?,
        None => Config::default(),
    };

    let hs_file = (config.highscore.enabled && !args.no_highscore)
        .then(|| HighScoreFile::new(args.highscore_file.as_ref().unwrap_or(&config.highscore.path)));
    let (baseline, hs_file) = load_highscore(hs_file.as_ref());

    let rng = match args.seed.or(config.seed) {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let debug_code = (config.debug.enabled && !args.no_debug).then(|| config.debug.code.clone());

    let mut session = Session::new(baseline, rng).with_four_probability(config.spawn.four_probability_or_default());
    let report = {
        // dropping the terminal leaves raw mode, on error as well as on a normal finish
        let mut term = Terminal::new(RawKeyboard::enable()?, io::stdout(), debug_code);
        session.run(&mut term)?
    };

    if let Some(file) = hs_file {
        if let Err(e) = file.record(&report) {
            warn!("could not save high score to {}: {e}", file.path().display());
        }
    }

    match report.reason {
        EndReason::GameOver => println!("\n            G A M E   O V E R"),
        EndReason::Quit => println!("\n            G A M E   Q U I T"),
    }
    println!("    Final score: {}", report.final_score);
    if let Some(hs) = report.new_highscore {
        println!("    New high score! (previous: {}, now: {hs})", report.previous_highscore);
    }
    Ok(())
}
