//! Collision detection and response for the rectangular arena
//!
//! Everything is axis-aligned: the ball is tested as its bounding square.

use serde::{Deserialize, Serialize};

use super::state::{Ball, Paddle, Side};

/// Axis-aligned rectangle, `(x, y)` is the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Strict overlap; rectangles that only touch do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Reverse `dy` when the ball pokes through the top or bottom wall while
/// still heading into it. The ball is not pushed back inside.
pub fn wall_bounce(ball: &mut Ball, arena_height: f32) -> bool {
    let r = ball.radius();
    let into_top = ball.pos.y - r < 0.0 && ball.vel.y < 0.0;
    let into_bottom = ball.pos.y + r > arena_height && ball.vel.y > 0.0;
    if into_top || into_bottom {
        ball.vel.y = -ball.vel.y;
        return true;
    }
    false
}

/// The paddle the ball is travelling toward, if it is moving horizontally
pub fn approaching_side(ball: &Ball) -> Option<Side> {
    if ball.vel.x < 0.0 {
        Some(Side::Left)
    } else if ball.vel.x > 0.0 {
        Some(Side::Right)
    } else {
        None
    }
}

/// Bounce off `paddle` if overlapping: `dx` flips and `dy` is re-derived from
/// where the ball struck, from `-speed` at the top edge to `+speed` at the
/// bottom edge.
pub fn paddle_bounce(ball: &mut Ball, paddle: &Paddle) -> bool {
    if !ball.rect().overlaps(&paddle.rect()) {
        return false;
    }
    let half = paddle.height / 2.0;
    let offset = (ball.pos.y - paddle.center_y()) / half;
    ball.vel.x = -ball.vel.x;
    ball.vel.y = offset * ball.speed;
    true
}

/// Who scores if the ball's leading edge has left the arena
pub fn goal_scored(ball: &Ball, arena_width: f32) -> Option<Side> {
    let r = ball.radius();
    if ball.pos.x - r < 0.0 {
        Some(Side::Right)
    } else if ball.pos.x + r > arena_width {
        Some(Side::Left)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MatchConfig;
    use glam::Vec2;

    fn ball_at(x: f32, y: f32, vx: f32, vy: f32) -> Ball {
        let mut ball = Ball::new(Vec2::new(x, y), 10.0, 300.0);
        ball.vel = Vec2::new(vx, vy);
        ball.served = true;
        ball
    }

    #[test]
    fn test_rect_overlap_is_strict() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_wall_bounce_only_when_heading_out() {
        let mut ball = ball_at(400.0, 2.0, 300.0, -300.0);
        assert!(wall_bounce(&mut ball, 600.0));
        assert_eq!(ball.vel.y, 300.0);
        // Still overlapping the wall but already heading back in
        assert!(!wall_bounce(&mut ball, 600.0));
        assert_eq!(ball.pos.y, 2.0);

        let mut ball = ball_at(400.0, 598.0, 300.0, 300.0);
        assert!(wall_bounce(&mut ball, 600.0));
        assert_eq!(ball.vel.y, -300.0);
    }

    #[test]
    fn test_paddle_bounce_angles_by_contact_offset() {
        let paddle = Paddle::new(Side::Left, &MatchConfig::default());
        // Paddle spans y 250..350, x 10..20

        let mut center_hit = ball_at(22.0, 300.0, -300.0, 300.0);
        assert!(paddle_bounce(&mut center_hit, &paddle));
        assert_eq!(center_hit.vel, Vec2::new(300.0, 0.0));

        let mut edge_hit = ball_at(22.0, 250.0, -300.0, 0.0);
        assert!(paddle_bounce(&mut edge_hit, &paddle));
        assert_eq!(edge_hit.vel, Vec2::new(300.0, -300.0));

        let mut miss = ball_at(22.0, 400.0, -300.0, 0.0);
        assert!(!paddle_bounce(&mut miss, &paddle));
        assert_eq!(miss.vel.x, -300.0);
    }

    #[test]
    fn test_approaching_side() {
        assert_eq!(approaching_side(&ball_at(0.0, 0.0, -1.0, 0.0)), Some(Side::Left));
        assert_eq!(approaching_side(&ball_at(0.0, 0.0, 1.0, 0.0)), Some(Side::Right));
        assert_eq!(approaching_side(&ball_at(0.0, 0.0, 0.0, 1.0)), None);
    }

    #[test]
    fn test_goal_uses_leading_edge() {
        assert_eq!(goal_scored(&ball_at(4.0, 300.0, -1.0, 0.0), 800.0), Some(Side::Right));
        assert_eq!(goal_scored(&ball_at(5.0, 300.0, -1.0, 0.0), 800.0), None);
        assert_eq!(goal_scored(&ball_at(796.0, 300.0, 1.0, 0.0), 800.0), Some(Side::Left));
    }
}
