//! Frame driver shared by the browser and headless entry points
//!
//! Runs exactly one simulation step per frame and applies the game-level
//! rules the core leaves out: re-attaching a lost ball and rebuilding a
//! cleared level.

use crate::sim::{GameState, Key, KeyInput, KeyState, LevelError, LevelLayout, TickReport, tick};
use crate::tuning::Tuning;

/// Whether the driver should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Quit,
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    pub status: FrameStatus,
    /// dt actually simulated after clamping
    pub dt: f32,
    pub tick: TickReport,
    /// Ball fell out and was re-attached to the paddle
    pub ball_lost: bool,
    /// Last breakable brick went down and the level was rebuilt
    pub level_cleared: bool,
}

/// Running totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameStats {
    pub frames: u64,
    /// 1-based level number
    pub level: u32,
    pub bricks_destroyed: u32,
    pub balls_lost: u32,
}

pub struct Game {
    pub state: GameState,
    layout: LevelLayout,
    stats: GameStats,
}

impl Game {
    pub fn new(tuning: Tuning, layout: LevelLayout) -> Result<Self, LevelError> {
        let state = GameState::new(tuning, &layout)?;
        log::info!(
            "Level 1: {} bricks ({} breakable)",
            state.bricks.len(),
            state.bricks_remaining()
        );
        Ok(Self {
            state,
            layout,
            stats: GameStats {
                level: 1,
                ..Default::default()
            },
        })
    }

    pub fn stats(&self) -> GameStats {
        self.stats
    }

    /// Clamp a raw frame time into the range the simulation accepts
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.state.tuning.max_frame_dt)
        } else {
            0.0
        }
    }

    /// Run one logical frame: exactly one simulation step, then game rules
    pub fn frame<I: KeyInput + ?Sized>(&mut self, input: &I, raw_dt: f32) -> FrameReport {
        let dt = self.clamp_dt(raw_dt);

        if input.is_key_down(Key::Quit) {
            return FrameReport {
                status: FrameStatus::Quit,
                dt,
                tick: TickReport::default(),
                ball_lost: false,
                level_cleared: false,
            };
        }

        self.stats.frames += 1;
        let report = tick(&mut self.state, input, dt);

        if report.launched {
            log::info!("Ball launched (frame {})", self.stats.frames);
        }
        if let (Some(index), true) = (report.brick_hit, report.brick_destroyed) {
            self.stats.bricks_destroyed += 1;
            log::debug!(
                "Brick {} destroyed, {} left",
                index,
                self.state.bricks_remaining()
            );
        }

        let ball_lost = self.state.ball_lost();
        if ball_lost {
            self.stats.balls_lost += 1;
            self.state.reset_ball();
            log::info!("Ball lost ({} so far)", self.stats.balls_lost);
        }

        // Only a destroyed brick can clear a level; an all-solid layout never does
        let level_cleared = report.brick_destroyed && self.state.level_cleared();
        if level_cleared {
            self.stats.level += 1;
            match self.state.rebuild_level(&self.layout) {
                Ok(()) => log::info!(
                    "Level cleared! Starting level {} after {} frames",
                    self.stats.level,
                    self.stats.frames
                ),
                Err(e) => log::error!("Failed to rebuild level: {e}"),
            }
        }

        FrameReport {
            status: FrameStatus::Continue,
            dt,
            tick: report,
            ball_lost,
            level_cleared,
        }
    }
}

/// Demo-mode player: keeps the paddle under the ball and launches at once
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// Paddle stops steering once its center is this close to the target
    pub dead_zone: f32,
    /// Fraction of the paddle half-width used to aim off-center
    pub aim: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            dead_zone: 4.0,
            aim: 0.6,
        }
    }
}

impl Autopilot {
    /// Keys to hold this frame
    pub fn keys(&self, state: &GameState, frame: u64) -> KeyState {
        let mut keys = KeyState::new();
        if state.ball.stuck {
            keys.press(Key::Launch);
            return keys;
        }

        // Oscillating aim offset so rallies don't repeat the same bounce forever
        let t = frame as f32 * 0.013;
        let half_width = state.paddle.size.x / 2.0;
        let offset = (t.sin() * 0.7 + (t * 2.3).sin() * 0.3) * half_width * self.aim;

        let target = state.ball.center().x - offset;
        let delta = target - state.paddle.center().x;
        if delta > self.dead_zone {
            keys.press(Key::MoveRight);
        } else if delta < -self.dead_zone {
            keys.press(Key::MoveLeft);
        }
        keys
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::consts::HEADLESS_DT;

    fn new_game() -> Game {
        Game::new(Tuning::default(), LevelLayout::default()).unwrap()
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut game = new_game();
        assert_eq!(game.clamp_dt(5.0), 0.1);
        assert_eq!(game.clamp_dt(-1.0), 0.0);
        assert_eq!(game.clamp_dt(f32::NAN), 0.0);

        let report = game.frame(&KeyState::with(&[Key::MoveRight]), 3.0);
        assert_eq!(report.dt, 0.1);
        // 500 px/s * 0.1 s
        assert!((game.state.paddle.pos.x - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_quit_skips_simulation() {
        let mut game = new_game();
        let before = game.state.clone();
        let report = game.frame(&KeyState::with(&[Key::Quit, Key::MoveLeft]), HEADLESS_DT);
        assert_eq!(report.status, FrameStatus::Quit);
        assert_eq!(game.state, before);
        assert_eq!(game.stats().frames, 0);
    }

    #[test]
    fn test_lost_ball_is_reattached() {
        let mut game = new_game();
        game.state.ball.stuck = false;
        game.state.ball.pos = Vec2::new(100.0, 598.0);
        game.state.ball.vel = Vec2::new(0.0, 400.0);

        let report = game.frame(&KeyState::new(), 0.05);
        assert!(report.ball_lost);
        assert!(game.state.ball.stuck);
        assert_eq!(game.state.ball.vel, game.state.tuning.launch_velocity());
        assert_eq!(game.stats().balls_lost, 1);
        assert_eq!(game.state.ball.center().x, game.state.paddle.center().x);
    }

    #[test]
    fn test_clearing_level_rebuilds_bricks() {
        let mut game = Game::new(Tuning::default(), LevelLayout::grid(1, 2)).unwrap();
        game.state.bricks[0].destroyed = true;
        game.state.ball.stuck = false;
        // Center inside brick 1 (x 400..796, y 50..71)
        game.state.ball.pos = Vec2::new(500.0, 50.0);
        game.state.ball.vel = Vec2::new(0.0, -250.0);

        let report = game.frame(&KeyState::new(), 0.0);
        assert!(report.tick.brick_destroyed);
        assert!(report.level_cleared);
        assert_eq!(game.stats().level, 2);
        assert_eq!(game.stats().bricks_destroyed, 1);
        assert_eq!(game.state.bricks_remaining(), 2);
        assert!(game.state.ball.stuck);
    }

    #[test]
    fn test_all_solid_layout_never_clears() {
        let layout = LevelLayout::parse("111\n1.1").unwrap();
        let mut game = Game::new(Tuning::default(), layout).unwrap();
        assert_eq!(game.state.bricks_remaining(), 0);

        for _ in 0..10 {
            let report = game.frame(&KeyState::with(&[Key::Launch]), HEADLESS_DT);
            assert!(!report.level_cleared);
        }
        assert_eq!(game.stats().level, 1);
    }

    #[test]
    fn test_autopilot_launches_and_tracks() {
        let mut game = new_game();
        let pilot = Autopilot {
            aim: 0.0,
            ..Default::default()
        };

        let keys = pilot.keys(&game.state, 0);
        assert!(keys.is_key_down(Key::Launch));

        game.state.ball.stuck = false;
        game.state.ball.pos = Vec2::new(100.0, 300.0);
        let keys = pilot.keys(&game.state, 0);
        assert!(keys.is_key_down(Key::MoveLeft));
        assert!(!keys.is_key_down(Key::MoveRight));

        game.state.ball.pos = Vec2::new(390.0, 300.0);
        assert!(pilot.keys(&game.state, 0).is_empty());
    }

    #[test]
    fn test_autopilot_breaks_bricks() {
        let mut game = new_game();
        let pilot = Autopilot::default();

        for _ in 0..60 * 60 {
            let keys = pilot.keys(&game.state, game.stats().frames);
            let report = game.frame(&keys, HEADLESS_DT);
            assert_eq!(report.status, FrameStatus::Continue);
        }

        let stats = game.stats();
        assert_eq!(stats.frames, 3600);
        assert!(stats.bricks_destroyed > 0);
    }
}
