use serde::{Deserialize, Serialize};

pub type Vec2 = [f64; 2];

/// Position, rotation and mirror state of a placed item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub r: f64,
    #[serde(default)]
    pub mirrored: bool,
}

impl Pose {
    #[must_use]
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self {
            x,
            y,
            r,
            mirrored: false,
        }
    }

    #[must_use]
    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    #[must_use]
    pub fn xy(&self) -> Vec2 {
        [self.x, self.y]
    }

    /// True when the pose lies left of or above the origin.
    #[must_use]
    pub fn is_before_origin(&self) -> bool {
        self.x < 0.0 || self.y < 0.0
    }
}

/// Normalise an angle into `(-180, 180]`.
#[must_use]
pub fn normalize_angle(angle_deg: f64) -> f64 {
    let mut a = angle_deg % 360.0;
    if a <= -180.0 {
        a += 360.0;
    } else if a > 180.0 {
        a -= 360.0;
    }
    a
}

#[must_use]
pub fn rotate_vec(v: Vec2, angle_deg: f64) -> Vec2 {
    let a = angle_deg.to_radians();
    let (s, c) = a.sin_cos();
    [v[0] * c - v[1] * s, v[0] * s + v[1] * c]
}

#[must_use]
pub fn rotate_point(p: Vec2, angle_deg: f64, origin: Vec2) -> Vec2 {
    let translated = [p[0] - origin[0], p[1] - origin[1]];
    let rotated = rotate_vec(translated, angle_deg);
    [rotated[0] + origin[0], rotated[1] + origin[1]]
}
