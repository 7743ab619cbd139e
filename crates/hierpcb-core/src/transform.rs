use serde::{Deserialize, Serialize};

use crate::pose::{normalize_angle, rotate_vec, Pose, Vec2};

/// Rigid planar transform derived from one anchor correspondence.
///
/// A point is first expressed in the source anchor's local frame, mirrored
/// about the anchor's local vertical axis when the transform flips, and then
/// placed in the target anchor's frame. Rotations compose additively and the
/// mirror state composes by XOR, so `apply_pose(source) == target`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    source: Pose,
    target: Pose,
    rotation: f64,
    flip: bool,
}

impl Transform {
    /// The transform taking `source` onto `target`.
    #[must_use]
    pub fn between(source: &Pose, target: &Pose) -> Self {
        Self {
            source: *source,
            target: *target,
            rotation: normalize_angle(target.r - source.r),
            flip: source.mirrored != target.mirrored,
        }
    }

    #[must_use]
    pub fn identity() -> Self {
        Self::between(&Pose::default(), &Pose::default())
    }

    /// Rotation (degrees) added to every transformed item.
    #[must_use]
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    #[must_use]
    pub fn flips(&self) -> bool {
        self.flip
    }

    #[must_use]
    pub fn apply_point(&self, p: Vec2) -> Vec2 {
        let delta = [p[0] - self.source.x, p[1] - self.source.y];
        let mut local = rotate_vec(delta, -self.source.r);
        if self.flip {
            local[0] = -local[0];
        }
        let placed = rotate_vec(local, self.target.r);
        [self.target.x + placed[0], self.target.y + placed[1]]
    }

    #[must_use]
    pub fn apply_pose(&self, pose: &Pose) -> Pose {
        let [x, y] = self.apply_point(pose.xy());
        Pose {
            x,
            y,
            r: normalize_angle(pose.r + self.rotation),
            mirrored: pose.mirrored != self.flip,
        }
    }
}
