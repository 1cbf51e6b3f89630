use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::config::{GameRules, GridSize, MIN_UPDATE_INTERVAL_MS, SPEED_STEP_MS};
use crate::food::spawn_position;
use crate::input::{Direction, GameInput};
use crate::snake::{Position, Snake};

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Running,
    Paused,
    Over,
}

/// What one call to [`GameState::step`] did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StepOutcome {
    /// Not running, or the update interval has not elapsed.
    Idle,
    Moved,
    Ate,
    /// The move was blocked; the round is over and the snake is unchanged.
    Collided,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub snake: Snake,
    pub food: Position,
    pub score: u32,
    pub speed_level: u32,
    pub tick_count: u64,
    pub status: GameStatus,
    bounds: GridSize,
    rules: GameRules,
    last_update: u64,
    rng: StdRng,
}

impl GameState {
    /// Creates a freshly initialized game with an entropy-seeded RNG.
    #[must_use]
    pub fn new(bounds: GridSize, rules: GameRules) -> Self {
        Self::with_rng(bounds, rules, StdRng::from_entropy())
    }

    /// Creates a deterministic state for tests and reproducible simulations.
    #[must_use]
    pub fn new_with_seed(bounds: GridSize, rules: GameRules, seed: u64) -> Self {
        Self::with_rng(bounds, rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(bounds: GridSize, rules: GameRules, rng: StdRng) -> Self {
        let mut state = Self {
            snake: Snake::centered(bounds, rules.initial_length),
            food: Position::new(0, 0),
            score: 0,
            speed_level: 1,
            tick_count: 0,
            status: GameStatus::Running,
            bounds,
            rules,
            last_update: 0,
            rng,
        };
        state.init();
        state
    }

    /// Starts a new round: centered snake facing right, zero score, fresh food.
    ///
    /// The update clock is not rewound; it is process-wide.
    pub fn init(&mut self) {
        self.snake = Snake::centered(self.bounds, self.rules.initial_length);
        self.score = 0;
        self.speed_level = 1;
        self.tick_count = 0;
        self.status = GameStatus::Running;
        self.respawn_food();
    }

    /// Buffers a turn for the next tick. Reversals of the committed
    /// direction are rejected.
    pub fn set_intended_direction(&mut self, direction: Direction) -> bool {
        self.snake.set_next_direction(direction)
    }

    /// Advances the simulation by one tick when running and the update
    /// interval has elapsed since the previous tick.
    pub fn step(&mut self, now: u64) -> StepOutcome {
        if self.status != GameStatus::Running {
            return StepOutcome::Idle;
        }
        if now.saturating_sub(self.last_update) < self.update_interval_ms() {
            return StepOutcome::Idle;
        }

        self.last_update = now;
        self.tick_count += 1;
        self.snake.commit_direction();

        let new_head = self.snake.next_head_position();
        if self.collides(new_head) {
            self.status = GameStatus::Over;
            info!(
                score = self.score,
                length = self.snake.len(),
                x = new_head.x,
                y = new_head.y,
                "collision, round over"
            );
            return StepOutcome::Collided;
        }

        let ate = new_head == self.food;
        self.snake.advance(new_head, ate);
        if !ate {
            return StepOutcome::Moved;
        }

        self.score = self.score.saturating_add(self.rules.points_per_food);
        self.update_speed_level();
        self.respawn_food();
        debug!(
            score = self.score,
            length = self.snake.len(),
            speed_level = self.speed_level,
            "food eaten"
        );

        StepOutcome::Ate
    }

    /// True when `position` is off the board or on a body segment other
    /// than the head.
    #[must_use]
    pub fn collides(&self, position: Position) -> bool {
        !position.is_within_bounds(self.bounds) || self.snake.body_occupies(position)
    }

    /// Switches between running and paused. Has no effect once the round is over.
    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            GameStatus::Running => GameStatus::Paused,
            GameStatus::Paused => GameStatus::Running,
            GameStatus::Over => GameStatus::Over,
        };
    }

    /// Applies one external input event.
    ///
    /// Restart works in every state. Once the round is over, all other
    /// intents except quit are ignored.
    pub fn apply_input(&mut self, input: GameInput) {
        match input {
            GameInput::Restart => {
                info!("restarting round");
                self.init();
            }
            GameInput::Quit => self.status = GameStatus::Over,
            _ if self.status == GameStatus::Over => {}
            GameInput::Direction(direction) => {
                self.set_intended_direction(direction);
            }
            GameInput::Pause => self.toggle_pause(),
        }
    }

    /// Moves the food to `position`, e.g. to set up a scenario.
    pub fn place_food(&mut self, position: Position) {
        self.food = position;
    }

    /// Update interval for the current speed level.
    #[must_use]
    pub fn update_interval_ms(&self) -> u64 {
        let base = self.rules.update_interval_ms;
        if self.rules.speed_increase_score == 0 {
            return base;
        }

        let penalty = u64::from(self.speed_level.saturating_sub(1)) * SPEED_STEP_MS;
        base.saturating_sub(penalty).max(MIN_UPDATE_INTERVAL_MS.min(base))
    }

    #[must_use]
    pub fn bounds(&self) -> GridSize {
        self.bounds
    }

    #[must_use]
    pub fn rules(&self) -> GameRules {
        self.rules
    }

    #[must_use]
    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    fn respawn_food(&mut self) {
        self.food = spawn_position(
            &mut self.rng,
            self.bounds,
            &self.snake,
            self.rules.food_spawn_attempts,
        );
    }

    fn update_speed_level(&mut self) {
        if self.rules.speed_increase_score > 0 {
            self.speed_level = 1 + self.score / self.rules.speed_increase_score;
        }
    }
}
