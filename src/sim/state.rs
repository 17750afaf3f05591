//! Entity model and simulation state
//!
//! Plain data: the paddle and every brick are [`Body`] rectangles, the ball is
//! a [`Ball`]. [`GameState`] owns all of them and is only mutated by
//! [`super::tick`] and the frame driver's reset events.

use glam::Vec2;

use super::collision::Aabb;
use super::level::{LevelError, LevelLayout};
use crate::tuning::Tuning;

/// A rectangle entity (paddle or brick)
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels/second
    pub vel: Vec2,
    /// Indestructible
    pub solid: bool,
    /// Removed from play; kept in storage so brick indices stay stable
    pub destroyed: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        debug_assert!(
            size.x > 0.0 && size.y > 0.0,
            "body size must be positive, got {size}"
        );
        Self {
            pos,
            size,
            vel: Vec2::ZERO,
            solid: false,
            destroyed: false,
        }
    }

    pub fn solid(mut self) -> Self {
        self.solid = true;
        self
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Collision view of this body. Destroyed bodies take no part in collisions.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        debug_assert!(!self.destroyed, "destroyed body used for collision");
        Aabb::new(self.pos, self.size)
    }
}

/// The ball; `pos` is the top-left of its bounding square
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub radius: f32,
    pub vel: Vec2,
    /// Riding the paddle: ignores velocity and wall physics until launched
    pub stuck: bool,
}

impl Ball {
    pub fn new(pos: Vec2, radius: f32, vel: Vec2) -> Self {
        debug_assert!(radius > 0.0, "ball radius must be positive");
        Self {
            pos,
            radius,
            vel,
            stuck: true,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius)
    }

    #[inline]
    pub fn diameter(&self) -> f32 {
        self.radius * 2.0
    }

    /// Place the ball on top of the paddle, centered horizontally
    pub fn follow(&mut self, paddle: &Body) {
        self.pos = Self::resting_pos(paddle, self.radius);
    }

    /// Top-left position of a ball of `radius` resting on `paddle`
    pub fn resting_pos(paddle: &Body, radius: f32) -> Vec2 {
        Vec2::new(
            paddle.pos.x + paddle.size.x / 2.0 - radius,
            paddle.pos.y - radius * 2.0,
        )
    }

    /// Reposition and re-attach the ball (it waits for the next launch)
    pub fn reset(&mut self, pos: Vec2, vel: Vec2) {
        self.pos = pos;
        self.vel = vel;
        self.stuck = true;
    }
}

/// Complete simulation state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub tuning: Tuning,
    pub paddle: Body,
    pub ball: Ball,
    /// Storage order is scan order; never resized during play
    pub bricks: Vec<Body>,
}

impl GameState {
    /// Build a level: paddle centered at the bottom, ball resting on it
    pub fn new(tuning: Tuning, layout: &LevelLayout) -> Result<Self, LevelError> {
        let bricks = layout.build(&tuning)?;
        let paddle = Body::new(tuning.paddle_start(), tuning.paddle_size());
        let ball = Ball::new(
            Ball::resting_pos(&paddle, tuning.ball_radius),
            tuning.ball_radius,
            tuning.launch_velocity(),
        );

        Ok(Self {
            tuning,
            paddle,
            ball,
            bricks,
        })
    }

    /// Play-field size (pixels)
    #[inline]
    pub fn field(&self) -> Vec2 {
        self.tuning.field_size()
    }

    /// Re-attach the ball to the paddle with the launch velocity
    pub fn reset_ball(&mut self) {
        let pos = Ball::resting_pos(&self.paddle, self.ball.radius);
        self.ball.reset(pos, self.tuning.launch_velocity());
    }

    /// Replace the bricks with a fresh copy of `layout` and re-attach the ball
    pub fn rebuild_level(&mut self, layout: &LevelLayout) -> Result<(), LevelError> {
        self.bricks = layout.build(&self.tuning)?;
        self.reset_ball();
        Ok(())
    }

    /// Ball has fallen completely below the bottom edge
    pub fn ball_lost(&self) -> bool {
        !self.ball.stuck && self.ball.pos.y > self.tuning.field_height
    }

    /// Breakable bricks still in play
    pub fn bricks_remaining(&self) -> usize {
        self.bricks
            .iter()
            .filter(|b| !b.destroyed && !b.solid)
            .count()
    }

    pub fn level_cleared(&self) -> bool {
        self.bricks_remaining() == 0
    }

    /// Bricks still drawn and collidable (solid ones included)
    pub fn live_bricks(&self) -> impl Iterator<Item = &Body> {
        self.bricks.iter().filter(|b| !b.destroyed)
    }
}
