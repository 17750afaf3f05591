//! Per-frame simulation step
//!
//! Advances the game state by one variable timestep. The order of the phases
//! matters: paddle, launch, stuck-follow, ball motion, paddle hit, brick hit.

use super::collision::{Aabb, aabb_circle_overlap};
use super::input::{Key, KeyInput};
use super::state::{Ball, GameState};

/// What happened during a single step (read by the frame driver for logging)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    /// Ball left the paddle this step
    pub launched: bool,
    /// Walls the ball bounced off (left, right, top)
    pub wall_bounces: u8,
    pub paddle_hit: bool,
    /// Index of the brick the ball hit, destroyed or not
    pub brick_hit: Option<usize>,
    /// Whether that brick was destroyed (false for solid bricks)
    pub brick_destroyed: bool,
}

/// Advance the game state by `dt` seconds
///
/// Explicit Euler with a single sub-step and no swept collision: a fast ball
/// can pass through a thin brick at low frame rates. At most one brick is hit
/// per step.
///
/// A stuck ball skips motion and collisions entirely, so launching always
/// starts from the configured launch velocity.
pub fn tick<I: KeyInput + ?Sized>(state: &mut GameState, input: &I, dt: f32) -> TickReport {
    debug_assert!(dt >= 0.0, "negative dt: {dt}");

    let mut report = TickReport::default();
    let field = state.field();

    // Paddle control (horizontal only)
    let left = input.is_key_down(Key::MoveLeft);
    let right = input.is_key_down(Key::MoveRight);
    if left || right {
        let dir = f32::from(right as u8) - f32::from(left as u8);
        let paddle = &mut state.paddle;
        let max_x = (field.x - paddle.size.x).max(0.0);
        paddle.pos.x = (paddle.pos.x + dir * state.tuning.paddle_speed * dt).clamp(0.0, max_x);
    }

    let ball = &mut state.ball;

    // Launch
    if ball.stuck && input.is_key_down(Key::Launch) {
        ball.stuck = false;
        report.launched = true;
    }

    // Stuck ball rides the paddle and takes no part in collisions
    if ball.stuck {
        ball.follow(&state.paddle);
        return report;
    }

    // Motion + wall reflection: velocity points away from each wall (bottom is open)
    ball.pos += ball.vel * dt;

    if ball.pos.x <= 0.0 {
        ball.pos.x = 0.0;
        ball.vel.x = ball.vel.x.abs();
        report.wall_bounces += 1;
    }
    if ball.pos.x + ball.diameter() >= field.x {
        ball.pos.x = field.x - ball.diameter();
        ball.vel.x = -ball.vel.x.abs();
        report.wall_bounces += 1;
    }
    if ball.pos.y <= 0.0 {
        ball.pos.y = 0.0;
        ball.vel.y = ball.vel.y.abs();
        report.wall_bounces += 1;
    }

    // Paddle: always bounce upward, steer by where the ball hit
    let center = ball.center();
    if aabb_circle_overlap(&state.paddle.aabb(), center, ball.radius) {
        ball.vel.y = -ball.vel.y.abs();

        let half_width = state.paddle.size.x / 2.0;
        let offset = (center.x - state.paddle.center().x) / half_width;
        ball.vel.x = offset * state.tuning.steering_speed;
        report.paddle_hit = true;
    }

    // Bricks: first live brick in storage order wins
    let hit = state
        .bricks
        .iter()
        .position(|b| !b.destroyed && aabb_circle_overlap(&b.aabb(), center, ball.radius));
    if let Some(index) = hit {
        let brick = &mut state.bricks[index];
        if brick.solid {
            bounce_off_solid(ball, &brick.aabb());
        } else {
            brick.destroyed = true;
            report.brick_destroyed = true;
            ball.vel.y = -ball.vel.y;
        }
        report.brick_hit = Some(index);
    }

    report
}

/// Push the ball out of a solid brick along the shallower axis and point that
/// velocity component away from it. Solid bricks stay in play, so a plain
/// flip would re-trigger every frame while the ball still overlaps.
fn bounce_off_solid(ball: &mut Ball, brick: &Aabb) {
    let center = ball.center();
    let r = ball.radius;
    let min = brick.pos;
    let max = brick.max();
    let mid = brick.center();

    let (dx, from_left) = if center.x < mid.x {
        (center.x + r - min.x, true)
    } else {
        (max.x - (center.x - r), false)
    };
    let (dy, from_top) = if center.y < mid.y {
        (center.y + r - min.y, true)
    } else {
        (max.y - (center.y - r), false)
    };

    if dx < dy {
        if from_left {
            ball.pos.x -= dx;
            ball.vel.x = -ball.vel.x.abs();
        } else {
            ball.pos.x += dx;
            ball.vel.x = ball.vel.x.abs();
        }
    } else if from_top {
        ball.pos.y -= dy;
        ball.vel.y = -ball.vel.y.abs();
    } else {
        ball.pos.y += dy;
        ball.vel.y = ball.vel.y.abs();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::sim::input::KeyState;
    use crate::sim::level::LevelLayout;
    use crate::tuning::Tuning;

    const DT: f32 = 1.0 / 60.0;

    fn new_state() -> GameState {
        GameState::new(Tuning::default(), &LevelLayout::default()).unwrap()
    }

    /// Free ball somewhere in the middle of the field, away from paddle and bricks
    fn free_ball_state() -> GameState {
        let mut state = new_state();
        state.ball.stuck = false;
        state.ball.pos = Vec2::new(400.0, 350.0);
        state
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_paddle_moves_and_clamps() {
        let mut state = new_state();
        let right = KeyState::with(&[Key::MoveRight]);

        tick(&mut state, &right, 0.1);
        assert!(approx(state.paddle.pos.x, 400.0));
        // y never changes
        assert_eq!(state.paddle.pos.y, 560.0);

        // Far past the right edge
        tick(&mut state, &right, 10.0);
        assert_eq!(state.paddle.pos.x, 700.0);

        let left = KeyState::with(&[Key::MoveLeft]);
        tick(&mut state, &left, 10.0);
        assert_eq!(state.paddle.pos.x, 0.0);

        // Both held cancel out
        let both = KeyState::with(&[Key::MoveLeft, Key::MoveRight]);
        tick(&mut state, &both, 0.5);
        assert_eq!(state.paddle.pos.x, 0.0);
    }

    #[test]
    fn test_launch_releases_ball() {
        let mut state = new_state();
        let start = state.ball.pos;

        let report = tick(&mut state, &KeyState::new(), DT);
        assert!(!report.launched);
        assert!(state.ball.stuck);
        assert_eq!(state.ball.pos, start);

        let report = tick(&mut state, &KeyState::with(&[Key::Launch]), DT);
        assert!(report.launched);
        assert!(!state.ball.stuck);
        // Moved with the launch velocity, not re-snapped to the paddle
        assert!(approx(state.ball.pos.x, start.x + 250.0 * DT));
        assert!(approx(state.ball.pos.y, start.y - 250.0 * DT));
        assert_eq!(state.ball.vel, Vec2::new(250.0, -250.0));
        assert!(!report.paddle_hit);
    }

    #[test]
    fn test_stuck_ball_follows_paddle() {
        let mut state = new_state();
        let moves = [
            (Key::MoveLeft, 0.05),
            (Key::MoveLeft, 0.3),
            (Key::MoveRight, 0.0),
            (Key::MoveRight, 2.0),
            (Key::MoveLeft, 0.017),
        ];

        for (key, dt) in moves {
            tick(&mut state, &KeyState::with(&[key]), dt);
            assert!(state.ball.stuck);
            assert!(approx(state.ball.center().x, state.paddle.center().x));
            assert!(approx(
                state.ball.pos.y + state.ball.diameter(),
                state.paddle.pos.y
            ));
        }
        // Launch velocity untouched while riding
        assert_eq!(state.ball.vel, state.tuning.launch_velocity());
    }

    #[test]
    fn test_left_wall_reflection() {
        let mut state = free_ball_state();
        state.ball.pos.x = 0.0;
        state.ball.vel = Vec2::new(-50.0, 0.0);

        let report = tick(&mut state, &KeyState::new(), DT);
        assert_eq!(state.ball.vel.x, 50.0);
        assert_eq!(state.ball.pos.x, 0.0);
        assert_eq!(report.wall_bounces, 1);
    }

    #[test]
    fn test_right_and_top_wall_reflection() {
        let mut state = free_ball_state();
        state.ball.pos = Vec2::new(785.0, 5.0);
        state.ball.vel = Vec2::new(120.0, -600.0);

        let report = tick(&mut state, &KeyState::new(), DT);
        assert_eq!(report.wall_bounces, 2);
        assert_eq!(state.ball.pos, Vec2::new(780.0, 0.0));
        assert_eq!(state.ball.vel, Vec2::new(-120.0, 600.0));
    }

    #[test]
    fn test_bottom_edge_is_open() {
        let mut state = free_ball_state();
        state.paddle.pos.x = 0.0;
        state.ball.pos = Vec2::new(600.0, 595.0);
        state.ball.vel = Vec2::new(0.0, 300.0);

        let report = tick(&mut state, &KeyState::new(), 0.1);
        assert_eq!(report.wall_bounces, 0);
        assert_eq!(state.ball.vel.y, 300.0);
        assert!(state.ball_lost());
    }

    #[test]
    fn test_paddle_center_hit_goes_straight_up() {
        let mut state = free_ball_state();
        // Centered on the paddle, touching its top edge
        state.ball.pos = Vec2::new(390.0, 541.0);
        state.ball.vel = Vec2::new(180.0, 250.0);

        let report = tick(&mut state, &KeyState::new(), 0.0);
        assert!(report.paddle_hit);
        assert!(state.ball.vel.x.abs() < 1e-4);
        assert_eq!(state.ball.vel.y, -250.0);
    }

    #[test]
    fn test_paddle_edge_hit_steers_fully() {
        let mut state = free_ball_state();
        // Ball center exactly over the paddle's right edge (x = 450)
        state.ball.pos = Vec2::new(440.0, 541.0);
        state.ball.vel = Vec2::new(0.0, 250.0);

        tick(&mut state, &KeyState::new(), 0.0);
        assert!(approx(state.ball.vel.x, state.tuning.steering_speed));
        assert_eq!(state.ball.vel.y, -250.0);

        // Left edge mirrors it
        state.ball.pos = Vec2::new(340.0, 541.0);
        state.ball.vel = Vec2::new(0.0, 250.0);
        tick(&mut state, &KeyState::new(), 0.0);
        assert!(approx(state.ball.vel.x, -state.tuning.steering_speed));
    }

    #[test]
    fn test_paddle_bounce_is_always_upward() {
        let mut state = free_ball_state();
        state.ball.pos = Vec2::new(400.0, 545.0);
        // Already moving up (e.g. caught from below)
        state.ball.vel = Vec2::new(0.0, -200.0);

        tick(&mut state, &KeyState::new(), 0.0);
        assert_eq!(state.ball.vel.y, -200.0);
    }

    #[test]
    fn test_only_first_brick_destroyed() {
        let mut state = free_ball_state();
        // Center at (80, 70): overlaps bricks 0 (x 0..76) and 1 (x 80..156) of row 0
        state.ball.pos = Vec2::new(70.0, 60.0);
        state.ball.vel = Vec2::new(0.0, -250.0);
        assert!(aabb_circle_overlap(
            &state.bricks[1].aabb(),
            state.ball.center(),
            state.ball.radius
        ));

        let report = tick(&mut state, &KeyState::new(), 0.0);
        assert_eq!(report.brick_hit, Some(0));
        assert!(report.brick_destroyed);
        assert!(state.bricks[0].destroyed);
        assert!(state.bricks[1..].iter().all(|b| !b.destroyed));
        assert_eq!(state.ball.vel.y, 250.0);

        // Next step picks the second brick, the destroyed one is skipped
        let report = tick(&mut state, &KeyState::new(), 0.0);
        assert_eq!(report.brick_hit, Some(1));
        assert!(state.bricks[1].destroyed);
        assert_eq!(state.ball.vel.y, -250.0);
    }

    #[test]
    fn test_solid_brick_reflects_without_breaking() {
        let mut state = free_ball_state();
        state.bricks[0].solid = true;
        state.ball.pos = Vec2::new(30.0, 66.0);
        state.ball.vel = Vec2::new(40.0, -250.0);

        let report = tick(&mut state, &KeyState::new(), 0.0);
        assert_eq!(report.brick_hit, Some(0));
        assert!(!report.brick_destroyed);
        assert!(!state.bricks[0].destroyed);
        assert_eq!(state.ball.vel, Vec2::new(40.0, 250.0));
        // Pushed out below the brick (bottom edge y = 71)
        assert!(approx(state.ball.pos.y, 71.0));

        // Still touching: a second step must not flip it back up
        let report = tick(&mut state, &KeyState::new(), 0.0);
        assert_eq!(report.brick_hit, Some(0));
        assert_eq!(state.ball.vel, Vec2::new(40.0, 250.0));
    }

    #[test]
    fn test_solid_brick_side_hit_turns_ball_back() {
        let layout = LevelLayout::parse("0 1 0").unwrap();
        let mut state = GameState::new(Tuning::default(), &layout).unwrap();
        let brick = state.bricks[0].clone();
        assert!(brick.solid);

        state.ball.stuck = false;
        // Just left of the brick, level with it, heading right and down
        state.ball.pos = Vec2::new(244.7, 50.0);
        state.ball.vel = Vec2::new(300.0, 250.0);

        let mut hits = 0;
        for _ in 0..30 {
            let report = tick(&mut state, &KeyState::new(), DT);
            if report.brick_hit.is_some() {
                hits += 1;
            }
            assert!(state.ball.center().x <= brick.pos.x + 1e-3);
            assert!(!state.bricks[0].destroyed);
        }

        assert_eq!(hits, 1);
        assert_eq!(state.ball.vel.x, -300.0);
        // Vertical motion untouched by a side hit
        assert_eq!(state.ball.vel.y, 250.0);
    }

    #[test]
    fn test_zero_dt_is_idempotent() {
        let mut state = new_state();
        let before = state.clone();
        for _ in 0..3 {
            let report = tick(&mut state, &KeyState::new(), 0.0);
            assert_eq!(report, TickReport::default());
        }
        assert_eq!(state, before);

        let mut state = free_ball_state();
        state.ball.vel = Vec2::new(-120.0, 80.0);
        let before = state.clone();
        tick(&mut state, &KeyState::new(), 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn test_deterministic_replay() {
        let script: Vec<(KeyState, f32)> = (0..600)
            .map(|i| {
                let keys = match i % 97 {
                    0..=20 => KeyState::with(&[Key::MoveLeft]),
                    21..=30 => KeyState::with(&[Key::Launch]),
                    31..=60 => KeyState::with(&[Key::MoveRight]),
                    _ => KeyState::new(),
                };
                let dt = if i % 7 == 0 { 1.0 / 30.0 } else { DT };
                (keys, dt)
            })
            .collect();

        let run = || {
            let mut state = new_state();
            let reports: Vec<_> = script
                .iter()
                .map(|(keys, dt)| tick(&mut state, keys, *dt))
                .collect();
            (state, reports)
        };

        let (a, reports_a) = run();
        let (b, reports_b) = run();
        assert_eq!(a, b);
        assert_eq!(reports_a, reports_b);
    }

    #[test]
    fn test_dyn_input() {
        let mut state = new_state();
        let keys: Box<dyn KeyInput> = Box::new(KeyState::with(&[Key::Launch]));
        assert!(tick(&mut state, keys.as_ref(), DT).launched);
    }

    #[test]
    fn test_destroyed_bricks_are_skipped() {
        let mut state = free_ball_state();
        for brick in &mut state.bricks {
            brick.destroyed = true;
        }
        state.ball.pos = Vec2::new(30.0, 66.0);
        state.ball.vel = Vec2::new(0.0, -250.0);

        let report = tick(&mut state, &KeyState::new(), 0.0);
        assert_eq!(report.brick_hit, None);
        assert_eq!(state.ball.vel.y, -250.0);

        // Storage never shrinks
        assert_eq!(state.bricks.len(), 50);
    }
}
