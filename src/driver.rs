use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::{GameConfig, Palette, DEBUG_REPORT_INTERVAL_MS};
use crate::game::{GameState, StepOutcome};
use crate::grid::GridMapper;
use crate::input::{Debouncer, GameInput};
use crate::mailbox::KeyMailbox;
use crate::renderer::{render, SceneOptions};
use crate::surface::Surface;

/// Whatever shows the visible framebuffer after each iteration.
pub trait FrameSink {
    type Error;

    fn show(&mut self, surface: &Surface) -> Result<(), Self::Error>;
}

/// Result of one driver iteration.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum FrameOutcome {
    Continue,
    Quit,
}

/// Single-threaded game loop: input, update, render, present.
pub struct FrameDriver<C: Clock> {
    state: GameState,
    debouncer: Debouncer,
    surface: Surface,
    mapper: GridMapper,
    palette: Palette,
    show_grid: bool,
    mailbox: Arc<KeyMailbox>,
    clock: C,
    frame_count: u64,
    last_report: u64,
}

impl<C: Clock> FrameDriver<C> {
    /// Builds a driver for `config`. `seed` makes food placement reproducible.
    #[must_use]
    pub fn new(
        config: &GameConfig,
        mailbox: Arc<KeyMailbox>,
        clock: C,
        seed: Option<u64>,
    ) -> Self {
        let rules = config.rules();
        let state = match seed {
            Some(seed) => GameState::new_with_seed(config.grid, rules, seed),
            None => GameState::new(config.grid, rules),
        };

        let mut surface = Surface::new(
            usize::from(config.screen.width),
            usize::from(config.screen.height),
        );
        surface.set_double_buffer(config.double_buffer);

        let now = clock.now();
        Self {
            state,
            debouncer: Debouncer::new(config.debounce_ms),
            mapper: GridMapper::new(surface.width(), config.grid),
            surface,
            palette: config.palette,
            show_grid: config.show_grid,
            mailbox,
            clock,
            frame_count: 0,
            last_report: now,
        }
    }

    /// Runs one iteration: drain the mailbox, apply the debounced intent,
    /// advance the simulation if due, redraw and present.
    pub fn run_frame(&mut self) -> FrameOutcome {
        let now = self.clock.now();
        let mut outcome = FrameOutcome::Continue;

        if let Some(event) = self.mailbox.take() {
            if let Some(input) = self.debouncer.accept(event) {
                debug!(code = event.code, ?input, "key accepted");
                self.state.apply_input(input);
                if input == GameInput::Quit {
                    outcome = FrameOutcome::Quit;
                }
            }
        }

        if self.state.step(now) == StepOutcome::Collided {
            info!(score = self.state.score, "game over");
        }

        render(
            &mut self.surface,
            &self.mapper,
            &self.state,
            SceneOptions {
                palette: &self.palette,
                show_grid: self.show_grid,
            },
        );
        self.surface.present();

        self.frame_count += 1;
        self.report_state(now);

        outcome
    }

    /// Loops until a quit intent arrives or the sink fails, sleeping
    /// `frame_delay` after every presented frame.
    pub fn run<S: FrameSink>(
        &mut self,
        sink: &mut S,
        frame_delay: Duration,
    ) -> Result<(), S::Error> {
        info!(
            width = self.surface.width(),
            height = self.surface.height(),
            cell_size = self.mapper.cell_size(),
            double_buffer = self.surface.is_double_buffered(),
            "frame driver started"
        );

        loop {
            let outcome = self.run_frame();
            sink.show(&self.surface)?;

            if outcome == FrameOutcome::Quit {
                info!(frames = self.frame_count, "quit requested");
                return Ok(());
            }

            thread::sleep(frame_delay);
        }
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn report_state(&mut self, now: u64) {
        if now.saturating_sub(self.last_report) <= DEBUG_REPORT_INTERVAL_MS {
            return;
        }

        let head = self.state.snake.head();
        debug!(
            head_x = head.x,
            head_y = head.y,
            length = self.state.snake.len(),
            score = self.state.score,
            ticks = self.state.tick_count,
            status = ?self.state.status,
            frames = self.frame_count,
            "game state"
        );
        self.last_report = now;
    }
}
