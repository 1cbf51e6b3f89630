use std::collections::HashSet;
use std::sync::Arc;

use metal_snake::clock::{Clock, TickCounter};
use metal_snake::config::{GameConfig, GameRules, GridSize, ScreenSize};
use metal_snake::driver::{FrameDriver, FrameOutcome};
use metal_snake::game::{GameState, GameStatus, StepOutcome};
use metal_snake::input::{Direction, GameInput, keys};
use metal_snake::mailbox::KeyMailbox;
use metal_snake::snake::{Position, Snake};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BOARD: GridSize = GridSize {
    width: 10,
    height: 10,
};

fn board_state(segments: &[(i32, i32)], direction: Direction) -> GameState {
    let mut state = GameState::new_with_seed(BOARD, GameRules::default(), 42);
    let segments: Vec<Position> = segments.iter().map(|&(x, y)| Position::new(x, y)).collect();
    state.snake = Snake::from_segments(&segments, direction, BOARD.total_cells());
    state
}

fn body(state: &GameState) -> Vec<(i32, i32)> {
    state.snake.segments().map(|p| (p.x, p.y)).collect()
}

#[test]
fn plain_move_shifts_every_segment() {
    let mut state = board_state(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
    state.place_food(Position::new(0, 0));

    assert_eq!(state.step(200), StepOutcome::Moved);

    assert_eq!(body(&state), vec![(6, 5), (5, 5), (4, 5)]);
    assert_eq!(state.score, 0);
    assert_eq!(state.tick_count, 1);
    assert_eq!(state.status, GameStatus::Running);
}

#[test]
fn eating_grows_by_one_and_scores() {
    let mut state = board_state(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
    state.place_food(Position::new(6, 5));

    assert_eq!(state.step(200), StepOutcome::Ate);

    assert_eq!(body(&state), vec![(6, 5), (5, 5), (4, 5), (3, 5)]);
    assert_eq!(state.score, 10);
    assert!(!state.snake.occupies(state.food));
    assert!(state.food.is_within_bounds(BOARD));
}

#[test]
fn hitting_the_right_edge_ends_the_round_without_moving() {
    let mut state = board_state(&[(9, 5), (8, 5), (7, 5)], Direction::Right);
    state.place_food(Position::new(0, 0));

    assert_eq!(state.step(200), StepOutcome::Collided);

    assert_eq!(state.status, GameStatus::Over);
    assert_eq!(body(&state), vec![(9, 5), (8, 5), (7, 5)]);
    assert_eq!(state.step(400), StepOutcome::Idle);
}

#[test]
fn reversal_is_ignored_and_the_snake_keeps_going() {
    let mut state = board_state(&[(5, 5), (4, 5), (3, 5)], Direction::Right);
    state.place_food(Position::new(0, 0));

    state.apply_input(GameInput::Direction(Direction::Left));
    state.step(200);

    assert_eq!(state.snake.head(), Position::new(6, 5));
    assert_eq!(state.snake.direction(), Direction::Right);
}

#[test]
fn random_walk_never_leaves_the_board_or_overlaps_itself() {
    let mut state = GameState::new_with_seed(BOARD, GameRules::default(), 7);
    let mut rng = StdRng::seed_from_u64(99);
    let directions = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];
    let mut rounds = 0;

    for tick in 1..=2_000_u64 {
        let direction = directions[rng.gen_range(0..directions.len())];
        state.apply_input(GameInput::Direction(direction));
        state.step(tick * 1_000);

        if state.status == GameStatus::Over {
            rounds += 1;
            state.apply_input(GameInput::Restart);
            continue;
        }

        let segments: Vec<Position> = state.snake.segments().copied().collect();
        let unique: HashSet<Position> = segments.iter().copied().collect();
        assert_eq!(unique.len(), segments.len(), "segments overlap at tick {tick}");
        assert!(segments.iter().all(|p| p.is_within_bounds(BOARD)));
        assert_eq!(state.snake.len(), 3 + (state.score / 10) as usize);
    }

    assert!(rounds > 0);
}

fn small_config() -> GameConfig {
    GameConfig {
        screen: ScreenSize {
            width: 160,
            height: 120,
        },
        grid: GridSize {
            width: 20,
            height: 15,
        },
        ..GameConfig::default()
    }
}

#[test]
fn driver_debounces_keys_posted_through_the_mailbox() {
    let mailbox = Arc::new(KeyMailbox::new());
    let clock = Arc::new(TickCounter::new());
    let mut driver = FrameDriver::new(
        &small_config(),
        Arc::clone(&mailbox),
        Arc::clone(&clock),
        Some(3),
    );
    driver.state_mut().place_food(Position::new(0, 0));

    clock.advance(10);
    mailbox.post(keys::ARROW_DOWN, clock.now());
    assert_eq!(driver.run_frame(), FrameOutcome::Continue);
    assert_eq!(driver.state().snake.next_direction(), Direction::Down);

    clock.advance(40);
    mailbox.post(keys::ARROW_LEFT, clock.now());
    driver.run_frame();
    assert_eq!(driver.state().snake.next_direction(), Direction::Down);

    clock.advance(150);
    driver.run_frame();
    assert_eq!(driver.state().snake.head(), Position::new(10, 8));

    clock.advance(10);
    mailbox.post(keys::ARROW_LEFT, clock.now());
    driver.run_frame();
    assert_eq!(driver.state().snake.next_direction(), Direction::Left);
}

#[test]
fn pause_key_freezes_the_snake_until_pressed_again() {
    let mailbox = Arc::new(KeyMailbox::new());
    let clock = Arc::new(TickCounter::new());
    let mut driver = FrameDriver::new(
        &small_config(),
        Arc::clone(&mailbox),
        Arc::clone(&clock),
        Some(4),
    );
    driver.state_mut().place_food(Position::new(0, 0));

    mailbox.post(keys::SPACE, clock.now());
    driver.run_frame();
    assert_eq!(driver.state().status, GameStatus::Paused);

    clock.advance(1_000);
    driver.run_frame();
    assert_eq!(driver.state().snake.head(), Position::new(10, 7));

    mailbox.post(keys::P, clock.now());
    driver.run_frame();
    assert_eq!(driver.state().status, GameStatus::Running);
    assert_eq!(driver.state().snake.head(), Position::new(11, 7));
}
