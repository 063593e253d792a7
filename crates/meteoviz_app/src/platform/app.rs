use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use meteoviz_core::{update, AppState, Msg};
use meteoviz_logging::{set_dispatch_seq, viz_info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use super::cli::Cli;
use super::config::load_config;
use super::effects::EffectRunner;
use super::logging;
use super::theme::{Palette, SessionTheme, ThemeProvider};
use super::ui;

const TICK: Duration = Duration::from_millis(75);
const EXPORT_GRACE: Duration = Duration::from_secs(3);

pub fn run_app(cli: Cli) -> Result<()> {
    let (mut config, source) = load_config(&cli.config)?;
    config.apply_overrides(cli.output_dir, cli.log);
    logging::initialize(config.log);
    viz_info!("{source}");

    let state = AppState::new(Local::now().date_naive())
        .with_catalog(config.catalog()?)
        .with_resolver(config.resolver())
        .with_delays(config.delays())
        .with_initial_filters(config.forecast_hour, config.pressure_level);
    let runner = EffectRunner::new(config.engine_config());
    let mut theme = SessionTheme::default();

    let mut terminal = setup_terminal().context("failed to prepare terminal")?;
    let result = event_loop(&mut terminal, state, &runner, &mut theme);
    let restored = restore_terminal(&mut terminal).context("failed to restore terminal");
    runner.finish(EXPORT_GRACE);
    restored?;
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let terminal = with_rollback(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Terminal::new(CrosstermBackend::new(stdout))
        },
        || {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )?;
    Ok(terminal)
}

/// Run `step`; if it fails, undo what was already done before passing the error on.
fn with_rollback<T>(
    step: impl FnOnce() -> io::Result<T>,
    rollback: impl FnOnce(),
) -> io::Result<T> {
    step().inspect_err(|_| rollback())
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    mut state: AppState,
    runner: &EffectRunner,
    theme: &mut dyn ThemeProvider,
) -> Result<()> {
    let mut dispatch_seq: u64 = 0;
    let mut force_redraw = true;
    let mut last_tick = Instant::now();

    loop {
        if state.consume_dirty() || force_redraw {
            force_redraw = false;
            let view = state.view();
            let palette = Palette::for_mode(theme.mode());
            terminal.draw(|frame| ui::render::render(frame, &view, &palette))?;
        }
        if state.should_quit() {
            viz_info!("quit requested");
            return Ok(());
        }

        let mut inbox = runner.drain_events();
        let timeout = TICK.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    inbox.push(ui::keys::map_key(key, &state.view()));
                }
                Event::Resize(..) => force_redraw = true,
                _ => {}
            }
        }
        if last_tick.elapsed() >= TICK {
            inbox.push(Msg::Tick);
            last_tick = Instant::now();
        }

        for msg in inbox {
            dispatch_seq += 1;
            set_dispatch_seq(dispatch_seq);
            let (next, effects) = update(state, msg);
            state = next;
            let outcome = runner.run(effects, theme);
            force_redraw |= outcome.redraw;
            if outcome.quit {
                return Ok(());
            }
        }
    }
}
