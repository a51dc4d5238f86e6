use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::grid::Grid;
use crate::input::Command;
use crate::sound::Sound;
use crate::tetromino::{Tetromino, TetrominoType};

/// Seconds between gravity steps.
pub const NORMAL_MOVE_DELAY: f32 = 0.1;
pub const SOFT_MOVE_DELAY: f32 = 0.05;

/// Points awarded per lock, indexed by rows cleared.
const LINE_POINTS: [u32; 5] = [0, 100, 300, 500, 800];
const HARD_DROP_POINTS_PER_ROW: u32 = 2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DropMode {
    #[default]
    Normal,
    Soft,
}

impl DropMode {
    pub fn interval(self) -> f32 {
        match self {
            DropMode::Normal => NORMAL_MOVE_DELAY,
            DropMode::Soft => SOFT_MOVE_DELAY,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Playing,
    Paused,
    GameOver,
}

pub struct GameState {
    grid: Grid,
    current: Tetromino,
    next: Tetromino,
    rng: StdRng,

    drop_mode: DropMode,
    status: Status,

    score: u32,
    best_score: u32,
    lines_cleared: u32,
    time: f64,
    fall_timer: f32,

    events: Vec<Sound>,
}

impl GameState {
    /// A fresh game. Queues the start jingle and the music loop.
    pub fn new(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let current = Tetromino::new(TetrominoType::random(&mut rng));
        let next = Tetromino::new(TetrominoType::random(&mut rng));
        Self::from_parts(Grid::new(), current, next, rng)
    }

    /// Builds a game around an existing board, e.g. to replay a position.
    pub fn with_board(grid: Grid, current: Tetromino, next: Tetromino, seed: u64) -> Self {
        Self::from_parts(grid, current, next, StdRng::seed_from_u64(seed))
    }

    fn from_parts(grid: Grid, current: Tetromino, next: Tetromino, rng: StdRng) -> Self {
        GameState {
            grid,
            current,
            next,
            rng,
            drop_mode: DropMode::Normal,
            status: Status::Playing,
            score: 0,
            best_score: 0,
            lines_cleared: 0,
            time: 0.0,
            fall_timer: 0.0,
            events: vec![Sound::Start, Sound::Music],
        }
    }

    /// Starts over on an empty board. The best score is kept.
    pub fn restart(&mut self) {
        self.grid = Grid::new();
        self.current = self.random_piece();
        self.next = self.random_piece();
        self.drop_mode = DropMode::Normal;
        self.status = Status::Playing;
        self.score = 0;
        self.lines_cleared = 0;
        self.time = 0.0;
        self.fall_timer = 0.0;
        self.events.clear();
        self.events.extend([Sound::Start, Sound::Music]);
        info!("new game started");
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            Status::Playing => Status::Paused,
            Status::Paused => Status::Playing,
            Status::GameOver => Status::GameOver,
        };
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::RotateLeft => self.rotate_left(),
            Command::RotateRight => self.rotate_right(),
            Command::SoftDropStart => self.set_drop_mode(DropMode::Soft),
            Command::SoftDropEnd => self.set_drop_mode(DropMode::Normal),
            Command::HardDrop => self.hard_drop(),
        }
    }

    pub fn move_left(&mut self) {
        self.try_replace(self.current.moved(0, -1));
    }

    pub fn move_right(&mut self) {
        self.try_replace(self.current.moved(0, 1));
    }

    pub fn rotate_left(&mut self) {
        if self.try_replace(self.current.rotated(false)) {
            self.events.push(Sound::Rotate);
        }
    }

    pub fn rotate_right(&mut self) {
        if self.try_replace(self.current.rotated(true)) {
            self.events.push(Sound::Rotate);
        }
    }

    pub fn set_drop_mode(&mut self, drop_mode: DropMode) {
        if self.status != Status::Playing {
            return;
        }
        self.drop_mode = drop_mode;
    }

    /// Drops the current piece to its landing row and locks it at once.
    pub fn hard_drop(&mut self) {
        if self.status != Status::Playing {
            return;
        }
        self.fall_timer = 0.0;
        let landed = self.landing_position();
        let rows = (landed.row - self.current.row) as u32;
        self.current = landed;
        self.add_points(rows * HARD_DROP_POINTS_PER_ROW);
        self.events.push(Sound::HardDrop);
        self.lock_current();
    }

    /// Advances the simulation by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        if self.status != Status::Playing {
            return;
        }
        self.time += f64::from(dt);
        self.fall_timer += dt;
        if self.fall_timer > self.drop_mode.interval() {
            self.fall_timer = 0.0;
            self.gravity_step();
        }
    }

    /// Where the current piece would come to rest if dropped straight down.
    pub fn landing_position(&self) -> Tetromino {
        let mut landed = self.current;
        loop {
            let lowered = landed.moved(1, 0);
            if self.grid.collides(&lowered) {
                return landed;
            }
            landed = lowered;
        }
    }

    /// Sounds queued since the last call, oldest first.
    pub fn drain_events(&mut self) -> Vec<Sound> {
        std::mem::take(&mut self.events)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn current_piece(&self) -> &Tetromino {
        &self.current
    }

    pub fn next_piece(&self) -> &Tetromino {
        &self.next
    }

    pub fn drop_mode(&self) -> DropMode {
        self.drop_mode
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// Seconds of play, excluding pauses.
    pub fn time(&self) -> f64 {
        self.time
    }

    fn gravity_step(&mut self) {
        let lowered = self.current.moved(1, 0);
        if !self.grid.collides(&lowered) {
            self.current = lowered;
            return;
        }
        self.events.push(match self.drop_mode {
            DropMode::Normal => Sound::SoftLock,
            DropMode::Soft => Sound::ForceLock,
        });
        self.lock_current();
    }

    /// Commits the current piece, clears rows, and promotes the next piece.
    fn lock_current(&mut self) {
        let fits = self.grid.lock(&self.current);
        let cleared = self.grid.clear_full_rows();
        debug!(
            "locked {:?} at ({}, {}), {} row(s) cleared",
            self.current.t_type, self.current.row, self.current.col, cleared
        );

        if cleared > 0 {
            self.lines_cleared += cleared;
            self.add_points(LINE_POINTS[cleared.min(4) as usize]);
            self.events.push(if cleared >= 4 { Sound::Tetris } else { Sound::LineClear });
        }

        self.current = self.next;
        self.next = self.random_piece();

        if !fits || self.grid.collides(&self.current) {
            self.status = Status::GameOver;
            self.events.push(Sound::GameOver);
            info!("game over: score {}, {} lines", self.score, self.lines_cleared);
        }
    }

    /// Replaces the current piece if `candidate` fits. Returns whether it did.
    fn try_replace(&mut self, candidate: Tetromino) -> bool {
        if self.status != Status::Playing || self.grid.collides(&candidate) {
            return false;
        }
        self.current = candidate;
        true
    }

    fn add_points(&mut self, points: u32) {
        self.score += points;
        self.best_score = self.best_score.max(self.score);
    }

    fn random_piece(&mut self) -> Tetromino {
        Tetromino::new(TetrominoType::random(&mut self.rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{COLS, ROWS};
    use macroquad::prelude::GRAY;

    fn game_with(current: Tetromino) -> GameState {
        let mut game = GameState::with_board(Grid::new(), current, Tetromino::new(TetrominoType::O), 1);
        game.drain_events();
        game
    }

    /// Fills `row` except for the listed columns.
    fn fill_row_except(grid: &mut Grid, row: usize, holes: &[usize]) {
        for col in 0..COLS {
            if !holes.contains(&col) {
                grid.set(row, col, Some(GRAY));
            }
        }
    }

    #[test]
    fn new_game_queues_start_and_music() {
        let mut game = GameState::new(3);
        assert_eq!(game.drain_events(), vec![Sound::Start, Sound::Music]);
        assert!(game.drain_events().is_empty());
        assert_eq!(game.status(), Status::Playing);
    }

    #[test]
    fn moves_are_blocked_by_wall() {
        let mut game = game_with(Tetromino::at(TetrominoType::O, 5, 0));
        game.move_left();
        assert_eq!(game.current_piece().col, 0);
        game.move_right();
        assert_eq!(game.current_piece().col, 1);
    }

    #[test]
    fn move_left_then_right_returns_to_start() {
        let mut game = game_with(Tetromino::at(TetrominoType::T, 5, 5));
        game.move_left();
        game.move_right();
        assert_eq!(game.current_piece().col, 5);
    }

    #[test]
    fn blocked_rotation_is_silent_noop() {
        // Turning counter-clockwise would push the I's tail into (20, 5).
        let mut grid = Grid::new();
        grid.set(20, 5, Some(GRAY));
        let start = Tetromino::at(TetrominoType::I, 18, 5);
        let mut game = GameState::with_board(grid, start, Tetromino::new(TetrominoType::O), 1);
        game.drain_events();

        game.rotate_left();
        assert_eq!(*game.current_piece(), start);
        assert!(game.drain_events().is_empty());

        game.rotate_right();
        assert_eq!(game.current_piece().orientation, 1);
        assert_eq!(game.drain_events(), vec![Sound::Rotate]);
    }

    #[test]
    fn rotation_into_left_wall_above_top_is_rejected() {
        let mut game = game_with(Tetromino::new(TetrominoType::S));
        game.rotate_right();
        for _ in 0..4 {
            game.move_left();
        }
        assert_eq!(game.current_piece().col, 0);
        assert_eq!(game.drain_events(), vec![Sound::Rotate]);

        // orientation 2 here would put a cell at (-1, -1)
        game.rotate_right();
        assert_eq!(game.current_piece().orientation, 1);
        assert_eq!(game.current_piece().col, 0);
        assert!(game.drain_events().is_empty());

        game.update(0.11);
        assert!(!game.is_game_over());
        assert_eq!(game.current_piece().row, 1);
        assert_eq!(game.grid(), &Grid::new());
    }

    #[test]
    fn gravity_waits_for_interval() {
        let mut game = game_with(Tetromino::at(TetrominoType::T, 2, 5));
        game.update(0.05);
        assert_eq!(game.current_piece().row, 2);
        game.update(0.06);
        assert_eq!(game.current_piece().row, 3);
        assert!((game.time() - 0.11).abs() < 1e-6);
    }

    #[test]
    fn soft_drop_halves_interval() {
        let mut game = game_with(Tetromino::at(TetrominoType::T, 2, 5));
        game.apply(Command::SoftDropStart);
        assert_eq!(game.drop_mode(), DropMode::Soft);
        game.update(0.06);
        assert_eq!(game.current_piece().row, 3);
        game.apply(Command::SoftDropEnd);
        game.update(0.06);
        assert_eq!(game.current_piece().row, 3);
    }

    #[test]
    fn gravity_lock_emits_settle_sound_and_promotes_next() {
        let mut game = game_with(Tetromino::at(TetrominoType::O, ROWS as i32 - 2, 3));
        game.update(0.2);
        assert!(game.grid().is_occupied(ROWS - 1, 3));
        assert_eq!(game.current_piece().t_type, TetrominoType::O);
        assert_eq!(game.current_piece().row, 0);
        assert_eq!(game.drain_events(), vec![Sound::SoftLock]);
    }

    #[test]
    fn soft_mode_lock_uses_force_sound() {
        let mut game = game_with(Tetromino::at(TetrominoType::O, ROWS as i32 - 2, 3));
        game.set_drop_mode(DropMode::Soft);
        game.update(0.06);
        assert_eq!(game.drain_events(), vec![Sound::ForceLock]);
    }

    #[test]
    fn single_clear_scores_and_sounds() {
        let mut grid = Grid::new();
        fill_row_except(&mut grid, ROWS - 1, &[4, 5]);
        let o = Tetromino::at(TetrominoType::O, ROWS as i32 - 2, 4);
        let mut game = GameState::with_board(grid, o, Tetromino::new(TetrominoType::T), 1);
        game.drain_events();

        game.update(0.2);
        assert_eq!(game.lines_cleared(), 1);
        assert_eq!(game.score(), 100);
        assert_eq!(game.best_score(), 100);
        assert_eq!(game.drain_events(), vec![Sound::SoftLock, Sound::LineClear]);
        // the upper half of the O fell into the bottom row
        assert!(game.grid().is_occupied(ROWS - 1, 4));
        assert!(game.grid().is_occupied(ROWS - 1, 5));
        assert!(!game.grid().is_occupied(ROWS - 1, 0));
    }

    #[test]
    fn hard_drop_lands_and_locks() {
        let mut game = game_with(Tetromino::at(TetrominoType::I, 0, 4));
        game.hard_drop();
        for col in 3..7 {
            assert!(game.grid().is_occupied(ROWS - 1, col));
        }
        assert_eq!(game.score(), (ROWS as u32 - 1) * HARD_DROP_POINTS_PER_ROW);
        assert_eq!(game.drain_events(), vec![Sound::HardDrop]);
    }

    #[test]
    fn spawn_collision_ends_game() {
        let mut grid = Grid::new();
        grid.set(1, 4, Some(GRAY));
        let current = Tetromino::at(TetrominoType::O, 10, 0);
        let mut game = GameState::with_board(grid, current, Tetromino::new(TetrominoType::O), 1);
        game.drain_events();

        game.hard_drop();
        assert!(game.is_game_over());
        assert_eq!(game.drain_events(), vec![Sound::HardDrop, Sound::GameOver]);

        let frozen = *game.current_piece();
        game.move_left();
        game.rotate_right();
        game.update(1.0);
        game.hard_drop();
        assert_eq!(*game.current_piece(), frozen);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn lock_above_top_ends_game() {
        let mut grid = Grid::new();
        for row in 3..ROWS {
            grid.set(row, 0, Some(GRAY));
        }
        // upright I in column 0 pokes above the field once it rests on the stack
        let upright = Tetromino::at(TetrominoType::I, 0, 0).rotated(true);
        let mut game = GameState::with_board(grid, upright, Tetromino::new(TetrominoType::O), 1);
        game.hard_drop();
        assert!(game.is_game_over());
    }

    #[test]
    fn pause_freezes_time_and_commands() {
        let mut game = game_with(Tetromino::at(TetrominoType::T, 5, 5));
        game.toggle_pause();
        game.update(1.0);
        game.move_left();
        assert_eq!(game.time(), 0.0);
        assert_eq!(game.current_piece().col, 5);
        game.toggle_pause();
        game.move_left();
        assert_eq!(game.current_piece().col, 4);
    }

    #[test]
    fn drop_mode_is_frozen_while_paused_or_over() {
        let mut game = game_with(Tetromino::at(TetrominoType::T, 5, 5));
        game.toggle_pause();
        game.apply(Command::SoftDropStart);
        assert_eq!(game.drop_mode(), DropMode::Normal);
        game.toggle_pause();
        game.apply(Command::SoftDropStart);
        assert_eq!(game.drop_mode(), DropMode::Soft);

        let mut grid = Grid::new();
        grid.set(1, 4, Some(GRAY));
        let current = Tetromino::at(TetrominoType::O, 10, 0);
        let mut over = GameState::with_board(grid, current, Tetromino::new(TetrominoType::O), 1);
        over.hard_drop();
        assert!(over.is_game_over());
        over.set_drop_mode(DropMode::Soft);
        assert_eq!(over.drop_mode(), DropMode::Normal);
    }

    #[test]
    fn restart_keeps_best_score() {
        let mut game = game_with(Tetromino::at(TetrominoType::I, 0, 4));
        game.hard_drop();
        let best = game.score();
        assert!(best > 0);
        game.restart();
        assert_eq!(game.score(), 0);
        assert_eq!(game.best_score(), best);
        assert_eq!(game.status(), Status::Playing);
        assert_eq!(game.grid(), &Grid::new());
        assert_eq!(game.drain_events(), vec![Sound::Start, Sound::Music]);
    }
}
