use hierpcb_core::{normalize_angle, Pose, Transform, Vec2};
use serde::{Deserialize, Serialize};

use crate::ids::{FootprintPath, ItemId};

/// Copper side a footprint is mounted on. `Back` is the mirrored state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    #[must_use]
    pub fn from_mirrored(mirrored: bool) -> Self {
        if mirrored {
            Side::Back
        } else {
            Side::Front
        }
    }

    #[must_use]
    pub fn is_mirrored(self) -> bool {
        self == Side::Back
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneConnection {
    Inherited,
    None,
    ThermalRelief,
    Full,
}

/// Per-footprint overrides that propagation copies from the sub-layout.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_clearance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_mask_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_paste_margin: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solder_paste_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_connection: Option<ZoneConnection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pad {
    pub number: String,
    /// Net code, document-local.
    #[serde(default)]
    pub net: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    Reference,
    Value,
}

/// Reference/value label, positioned in board coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootprintText {
    pub kind: TextKind,
    pub position: Vec2,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl FootprintText {
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        Self {
            kind: self.kind,
            position: transform.apply_point(self.position),
            visible: self.visible,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footprint {
    pub id: ItemId,
    /// Schematic path; absent for footprints placed only on the board.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<FootprintPath>,
    pub reference: String,
    #[serde(default)]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_name: Option<String>,
    pub position: Vec2,
    /// Orientation in degrees.
    #[serde(default)]
    pub rotation: f64,
    #[serde(default)]
    pub side: Side,
    /// Bounding box size, used to rank anchor candidates.
    #[serde(default)]
    pub size: Vec2,
    #[serde(default)]
    pub pads: Vec<Pad>,
    #[serde(default)]
    pub texts: Vec<FootprintText>,
    #[serde(default)]
    pub properties: LocalProperties,
}

impl Footprint {
    pub fn new(id: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(id),
            path: None,
            reference: reference.into(),
            value: String::new(),
            sheet_file: None,
            sheet_name: None,
            position: [0.0, 0.0],
            rotation: 0.0,
            side: Side::Front,
            size: [0.0, 0.0],
            pads: Vec::new(),
            texts: Vec::new(),
            properties: LocalProperties::default(),
        }
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        Pose {
            x: self.position[0],
            y: self.position[1],
            r: self.rotation,
            mirrored: self.side.is_mirrored(),
        }
    }

    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.xy();
        self.rotation = normalize_angle(pose.r);
        self.side = Side::from_mirrored(pose.mirrored);
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.size[0].abs() * self.size[1].abs()
    }

    /// Reference designator prefix, e.g. `SW` for `SW12`.
    #[must_use]
    pub fn reference_prefix(&self) -> &str {
        self.reference.trim_end_matches(|c: char| c.is_ascii_digit())
    }

    pub fn pad(&self, number: &str) -> Option<&Pad> {
        self.pads.iter().find(|p| p.number == number)
    }

    pub fn text(&self, kind: TextKind) -> Option<&FootprintText> {
        self.texts.iter().find(|t| t.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn set_pose_normalizes_rotation_and_side() {
        let mut fp = Footprint::new("a", "D1");
        fp.set_pose(&Pose::new(1.0, 2.0, 270.0).mirrored(true));
        assert_eq!(fp.position, [1.0, 2.0]);
        assert_abs_diff_eq!(fp.rotation, -90.0, epsilon = 1e-9);
        assert_eq!(fp.side, Side::Back);
        assert!(fp.pose().mirrored);
    }

    #[test]
    fn reference_prefix_strips_trailing_digits() {
        assert_eq!(Footprint::new("a", "SW12").reference_prefix(), "SW");
        assert_eq!(Footprint::new("b", "LED").reference_prefix(), "LED");
    }
}
