use anyhow::{Context, Result};
use canfield::{
    action::{Action, apply_action, format_actions, parse_actions},
    board::DrawMode,
    game::{Game, GameConfig},
};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, Log, Metadata, Record};
use std::io::{BufRead, IsTerminal, Write, stdin, stdout};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Rule profile
    #[arg(short, long, value_enum, default_value_t = Mode::Waste)]
    mode: Mode,
    /// Shuffle seed, for a reproducible deal
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
    /// Increase log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Commands to run before reading stdin (e.g. "3D W:F1 R:T2")
    #[arg(value_name = "COMMANDS")]
    commands: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Waste pile, draw three, reserve face-up
    Waste,
    /// Discard pile, draw one, reserve face-down
    Discard,
}

impl From<Mode> for DrawMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Waste => DrawMode::WasteRuleOf3,
            Mode::Discard => DrawMode::Discard,
        }
    }
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    log::set_logger(&LOGGER).map_err(|err| anyhow::anyhow!("Failed to set logger; {err}"))?;
    log::set_max_level(level);
    Ok(())
}

fn main() -> Result<()> {
    let Cli {
        mode,
        seed,
        verbose,
        commands,
    } = Cli::parse();
    init_logger(verbose)?;

    let mut game = Game::new(GameConfig {
        mode: mode.into(),
        seed,
    });
    game.start_game();

    if let Some(commands) = commands {
        run_line(&mut game, &commands);
    }
    println!("{}", status(&game));

    let interactive = stdin().is_terminal();
    if interactive {
        print_help();
    }
    loop {
        if interactive {
            print!("> ");
            stdout().flush()?;
        }
        let mut line = String::new();
        let read = stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        let line = line.trim();
        if read == 0 || line.eq_ignore_ascii_case("q") {
            break;
        }
        if line.is_empty() {
            continue;
        }
        run_line(&mut game, line);
        println!("{}", status(&game));
    }

    Ok(())
}

fn run_line(game: &mut Game, line: &str) {
    let actions = match parse_actions(line) {
        Ok(actions) => actions,
        Err(err) => {
            println!("✗ {err}");
            return;
        }
    };
    for action in &actions {
        let was_active = game.is_active();
        if !apply_action(game, action) {
            println!("✗ Not allowed: {}", format_actions(&[*action]));
            break;
        }
        if was_active && !game.is_active() {
            println!("✓ You won! Score: {}", game.score());
        }
        if matches!(action, Action::NewGame) {
            println!("New game dealt");
        }
    }
}

fn status(game: &Game) -> String {
    let state = if game.is_active() { "playing" } else { "over" };
    let mode = match game.config().mode {
        DrawMode::WasteRuleOf3 => "waste, draw 3",
        DrawMode::Discard => "discard, draw 1",
    };
    format!(
        "{}\nMoves: {}, Score: {}, Mode: {mode}, Game {state}\n",
        game.board().pretty_print(),
        game.moves(),
        game.score()
    )
}

fn print_help() {
    println!(
        r#"Commands:
  D, 3D        turn the stock (recycles when empty)
  C            recycle the talon into the stock
  X:Y          move the top card, piles: S W P R F1-F4 T1-T4
  N            new game
  q            quit
"#
    );
}
