//! Per-frame draw plan.
//!
//! The plan is plain data: which mesh to draw, in which color, with which model
//! matrix, in paint order. It depends only on the clock angles, so the same time
//! always produces the same frame.

use glam::{Mat4, Vec3};

use clock_engine::paint::Color;

use crate::time::ClockAngles;

/// Background clear color.
pub const CLEAR_COLOR: Color = Color::BLACK;
/// Rim color (outer disc).
pub const RIM_COLOR: Color = Color::rgb(0.9, 0.5, 0.5);
/// Face color (inner disc), painted over the rim disc.
pub const FACE_COLOR: Color = Color::BLACK;

/// Mesh selector, one per uploaded vertex set.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MeshId {
    OuterDisc,
    InnerDisc,
    Hand,
}

/// The three clock hands, in draw order.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Hand {
    Hour,
    Minute,
    Second,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Hand::Hour, Hand::Minute, Hand::Second];

    pub fn color(self) -> Color {
        match self {
            Hand::Hour => Color::BLUE,
            Hand::Minute => Color::GREEN,
            Hand::Second => Color::RED,
        }
    }

    /// Scale applied to the hand mesh: `x` along the hand, `y` across it.
    pub fn scale(self) -> (f32, f32) {
        match self {
            Hand::Hour => (0.4, 1.5),
            Hand::Minute => (0.7, 1.2),
            Hand::Second => (1.0, 1.0),
        }
    }

    pub fn angle(self, angles: &ClockAngles) -> f32 {
        match self {
            Hand::Hour => angles.hour,
            Hand::Minute => angles.minute,
            Hand::Second => angles.second,
        }
    }

    /// Rotation about the screen normal followed by the hand's scale.
    pub fn model(self, angles: &ClockAngles) -> Mat4 {
        let (sx, sy) = self.scale();
        Mat4::from_rotation_z(self.angle(angles)) * Mat4::from_scale(Vec3::new(sx, sy, 1.0))
    }
}

/// One draw call.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCmd {
    pub mesh: MeshId,
    pub color: Color,
    pub model: Mat4,
}

/// Everything needed to paint one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub clear: Color,
    pub draws: [DrawCmd; FramePlan::DRAW_COUNT],
}

impl FramePlan {
    /// Rim, face, then one draw per hand.
    pub const DRAW_COUNT: usize = 5;

    pub fn build(angles: &ClockAngles) -> Self {
        let hand = |h: Hand| DrawCmd {
            mesh: MeshId::Hand,
            color: h.color(),
            model: h.model(angles),
        };

        Self {
            clear: CLEAR_COLOR,
            draws: [
                DrawCmd {
                    mesh: MeshId::OuterDisc,
                    color: RIM_COLOR,
                    model: Mat4::IDENTITY,
                },
                DrawCmd {
                    mesh: MeshId::InnerDisc,
                    color: FACE_COLOR,
                    model: Mat4::IDENTITY,
                },
                hand(Hand::Hour),
                hand(Hand::Minute),
                hand(Hand::Second),
            ],
        }
    }
}
