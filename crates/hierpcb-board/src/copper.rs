use hierpcb_core::{Transform, Vec2};
use serde::{Deserialize, Serialize};

use crate::ids::ItemId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: ItemId,
    pub start: Vec2,
    pub end: Vec2,
    pub width: f64,
    pub layer: String,
    #[serde(default)]
    pub net: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcTrack {
    pub id: ItemId,
    pub start: Vec2,
    pub mid: Vec2,
    pub end: Vec2,
    pub width: f64,
    pub layer: String,
    #[serde(default)]
    pub net: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Via {
    pub id: ItemId,
    pub position: Vec2,
    pub size: f64,
    pub drill: f64,
    /// Outermost copper layers spanned, e.g. `["F.Cu", "B.Cu"]`.
    pub layers: [String; 2],
    #[serde(default)]
    pub net: u32,
}

/// A track segment, arc or via.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CopperItem {
    Track(Track),
    Arc(ArcTrack),
    Via(Via),
}

impl CopperItem {
    #[must_use]
    pub fn id(&self) -> &ItemId {
        match self {
            CopperItem::Track(t) => &t.id,
            CopperItem::Arc(a) => &a.id,
            CopperItem::Via(v) => &v.id,
        }
    }

    #[must_use]
    pub fn net(&self) -> u32 {
        match self {
            CopperItem::Track(t) => t.net,
            CopperItem::Arc(a) => a.net,
            CopperItem::Via(v) => v.net,
        }
    }

    /// Copy of this item with its coordinates mapped through `transform`.
    ///
    /// The transform is planar: layers, width and drill are copied verbatim,
    /// even when it flips.
    #[must_use]
    pub fn transformed(&self, transform: &Transform, id: ItemId, net: u32) -> Self {
        match self {
            CopperItem::Track(t) => CopperItem::Track(Track {
                id,
                start: transform.apply_point(t.start),
                end: transform.apply_point(t.end),
                width: t.width,
                layer: t.layer.clone(),
                net,
            }),
            CopperItem::Arc(a) => CopperItem::Arc(ArcTrack {
                id,
                start: transform.apply_point(a.start),
                mid: transform.apply_point(a.mid),
                end: transform.apply_point(a.end),
                width: a.width,
                layer: a.layer.clone(),
                net,
            }),
            CopperItem::Via(v) => CopperItem::Via(Via {
                id,
                position: transform.apply_point(v.position),
                size: v.size,
                drill: v.drill,
                layers: v.layers.clone(),
                net,
            }),
        }
    }
}
