use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

const HIERPCB_NAMESPACE: Uuid = Uuid::from_u128(0x6a1f_2c4e_93d0_4b7a_9e55_1c0f_d3a8_b742);

/// Document-local identity of a board item (the host's item UUID).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Deterministic id derived from `parts`, so regenerated items keep their identity.
    #[must_use]
    pub fn derived(parts: &[&str]) -> Self {
        let name = parts.join("/");
        Self(Uuid::new_v5(&HIERPCB_NAMESPACE, name.as_bytes()).to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Footprint identity relative to a hierarchical instance.
///
/// Inside a sub-layout document this is the footprint's full schematic path;
/// inside the main document it is the path with the instance's sheet prefix
/// removed. Both spellings agree for corresponding footprints.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StableId(pub String);

impl StableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Schematic path of a footprint: `/<sheet>/.../<symbol>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FootprintPath {
    segments: Vec<String>,
}

impl FootprintPath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split('/').filter(|s| !s.is_empty()))
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Sheet part of the path; empty for footprints on the root sheet.
    #[must_use]
    pub fn sheet(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, sheet)) => sheet,
            None => &[],
        }
    }

    #[must_use]
    pub fn symbol(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Stable-ID of this footprint within the instance at `instance`, if it
    /// belongs to that instance or one of its descendants.
    #[must_use]
    pub fn stable_id_within(&self, instance: &[String]) -> Option<StableId> {
        if self.segments.len() <= instance.len() || !self.segments.starts_with(instance) {
            return None;
        }
        Some(StableId(render(&self.segments[instance.len()..])))
    }

    /// Stable-ID of this footprint inside its own document.
    #[must_use]
    pub fn stable_id(&self) -> StableId {
        StableId(render(&self.segments))
    }
}

fn render(segments: &[String]) -> String {
    let mut out = String::new();
    for s in segments {
        out.push('/');
        out.push_str(s);
    }
    out
}

impl From<String> for FootprintPath {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<FootprintPath> for String {
    fn from(path: FootprintPath) -> Self {
        render(&path.segments)
    }
}

impl fmt::Display for FootprintPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_sheet_and_symbol() {
        let p = FootprintPath::parse("/aaa/bbb/sym");
        assert_eq!(p.sheet(), ["aaa".to_string(), "bbb".to_string()]);
        assert_eq!(p.symbol(), Some("sym"));
        assert_eq!(p.to_string(), "/aaa/bbb/sym");
    }

    #[test]
    fn stable_id_strips_instance_prefix() {
        let p = FootprintPath::parse("/top/key1/sw");
        let instance = ["top".to_string()];
        assert_eq!(
            p.stable_id_within(&instance),
            Some(StableId::new("/key1/sw"))
        );
        assert_eq!(p.stable_id_within(&["other".to_string()]), None);
        let whole = ["top".to_string(), "key1".to_string(), "sw".to_string()];
        assert_eq!(p.stable_id_within(&whole), None);
    }

    #[test]
    fn derived_ids_are_deterministic() {
        let a = ItemId::derived(&["subpcb_keyA", "track-1"]);
        let b = ItemId::derived(&["subpcb_keyA", "track-1"]);
        let c = ItemId::derived(&["subpcb_keyB", "track-1"]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
