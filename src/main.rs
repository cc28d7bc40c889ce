use std::io;
use std::time::Duration;

use anyhow::Context;
use crossterm::cursor;
use crossterm::event;
use crossterm::event::Event as CtEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;
use crossterm::event::MouseButton;
use crossterm::event::MouseEvent;
use crossterm::event::MouseEventKind;
use crossterm::execute;
use crossterm::terminal;
use tracing_subscriber::EnvFilter;

use toruslife::command::Command;
use toruslife::config::Config;
use toruslife::engine::Engine;
use toruslife::engine::State;
use toruslife::pattern::Pattern;
use toruslife::render::BrailleScreen;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum Event {
    TogglePause,
    Submit(Command),
    Exit,
}

/// Converts a crossterm event into an application event. Pointer coordinates
/// arrive in terminal cells and convert to grid cells here, before they ever
/// reach the engine.
fn convert_event(event: CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(key_event) => match key_event {
            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => Some(Event::Exit),
            KeyEvent {
                code: KeyCode::Char(' ') | KeyCode::Char('p'),
                ..
            } => Some(Event::TogglePause),
            _ => None,
        },
        CtEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            ..
        }) => {
            let (x, y) = BrailleScreen::cell_at(column, row);

            let command = match button {
                MouseButton::Left => Command::toggle(x, y),
                MouseButton::Middle => Command::stamp(Pattern::Acorn, x, y),
                MouseButton::Right => Command::stamp(Pattern::Glider, x, y),
            };

            Some(Event::Submit(command))
        }
        _ => None,
    }
}

fn run(engine: &mut Engine) -> anyhow::Result<()> {
    loop {
        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        let Some(event) = convert_event(event::read()?) else {
            continue;
        };

        match event {
            Event::Exit => break,
            Event::TogglePause => match engine.state() {
                State::Paused => engine.resume()?,
                State::Running => engine.pause()?,
                State::Stopped => break,
            },
            Event::Submit(command) => {
                // An out-of-range click is not worth interrupting the app for
                if let Err(err) = engine.submit(command) {
                    tracing::warn!("Rejected command: {err}");
                }
            }
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Raw-mode output owns stdout, logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_args(std::env::args()).context("Failed to parse flags")?;

    let mut engine = Engine::new(config.width, config.height, config.rule, config.delay);

    if let Some((pattern, x, y)) = config.seed {
        engine
            .stamp_pattern(pattern, x, y)
            .with_context(|| format!("Failed to seed {pattern} at ({x}, {y})"))?;
    }

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();

    execute!(
        stdout,
        terminal::EnterAlternateScreen,
        event::EnableMouseCapture,
        cursor::Hide,
    )?;

    let screen = BrailleScreen::new(
        config.width,
        config.height,
        config.alive_color,
        config.dead_color,
    );
    engine.set_renderer(Box::new(screen));

    // Unpause with space or p; while paused, place cells with the mouse
    let result = run(&mut engine);

    engine.stop();

    execute!(
        stdout,
        cursor::Show,
        event::DisableMouseCapture,
        terminal::LeaveAlternateScreen,
    )?;
    terminal::disable_raw_mode()?;

    result
}
