//! Draw list generation
//!
//! The render capability is a single operation, [`RectSink::draw_rect`].
//! [`draw_scene`] walks the game state read-only and issues one rectangle per
//! visible entity; [`QuadBatch`] turns those into triangles for the GPU.

use glam::Vec2;

use super::vertex::{Rgb, Vertex, colors};
use crate::sim::GameState;

/// Anything that can draw a colored, axis-aligned rectangle
pub trait RectSink {
    fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Rgb);
}

/// Issue draw calls for the paddle, the ball (as its bounding square) and
/// every brick still in play
pub fn draw_scene<S: RectSink + ?Sized>(state: &GameState, sink: &mut S) {
    let paddle = &state.paddle;
    sink.draw_rect(paddle.pos, paddle.size, colors::PADDLE);

    let ball = &state.ball;
    sink.draw_rect(ball.pos, Vec2::splat(ball.diameter()), colors::BALL);

    for brick in state.live_bricks() {
        let color = if brick.solid {
            colors::BRICK_SOLID
        } else {
            colors::BRICK
        };
        sink.draw_rect(brick.pos, brick.size, color);
    }
}

/// Two triangles per rectangle, in play-field pixels
#[derive(Debug, Default)]
pub struct QuadBatch {
    vertices: Vec<Vertex>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

impl RectSink for QuadBatch {
    fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Rgb) {
        let max = pos + size;
        let tl = Vertex::opaque(pos.x, pos.y, color);
        let tr = Vertex::opaque(max.x, pos.y, color);
        let br = Vertex::opaque(max.x, max.y, color);
        let bl = Vertex::opaque(pos.x, max.y, color);
        self.vertices.extend_from_slice(&[tl, tr, br, br, bl, tl]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::LevelLayout;
    use crate::tuning::Tuning;

    /// Records draw calls instead of rasterizing them
    #[derive(Default)]
    struct Recorder {
        rects: Vec<(Vec2, Vec2, Rgb)>,
    }

    impl RectSink for Recorder {
        fn draw_rect(&mut self, pos: Vec2, size: Vec2, color: Rgb) {
            self.rects.push((pos, size, color));
        }
    }

    fn state() -> GameState {
        GameState::new(Tuning::default(), &LevelLayout::default()).unwrap()
    }

    #[test]
    fn test_scene_draws_every_visible_entity() {
        let mut state = state();
        state.bricks[3].destroyed = true;
        state.bricks[7].destroyed = true;
        state.bricks[9].solid = true;

        let mut recorder = Recorder::default();
        draw_scene(&state, &mut recorder);

        // Paddle + ball + 48 surviving bricks
        assert_eq!(recorder.rects.len(), 50);
        assert_eq!(
            recorder.rects[0],
            (state.paddle.pos, state.paddle.size, colors::PADDLE)
        );
        assert_eq!(
            recorder.rects[1],
            (state.ball.pos, Vec2::splat(20.0), colors::BALL)
        );
        assert!(
            !recorder
                .rects
                .iter()
                .any(|(pos, _, _)| *pos == state.bricks[3].pos)
        );
        let solid = recorder
            .rects
            .iter()
            .filter(|(_, _, c)| *c == colors::BRICK_SOLID)
            .count();
        assert_eq!(solid, 1);
    }

    #[test]
    fn test_quad_batch_emits_two_triangles() {
        let mut batch = QuadBatch::new();
        batch.draw_rect(Vec2::new(10.0, 20.0), Vec2::new(30.0, 5.0), colors::BRICK);

        let v = batch.vertices();
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[2].position, [40.0, 25.0]);
        assert_eq!(v[4].position, [10.0, 25.0]);
        assert!(v.iter().all(|vx| vx.color == [0.3, 0.9, 0.4, 1.0]));

        batch.clear();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_for_full_scene() {
        let mut batch = QuadBatch::new();
        draw_scene(&state(), &mut batch);
        assert_eq!(batch.vertices().len(), 52 * 6);
    }
}
