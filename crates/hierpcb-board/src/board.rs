use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::copper::CopperItem;
use crate::error::BoardError;
use crate::footprint::Footprint;
use crate::fs::write_atomic;
use crate::ids::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Net {
    pub code: u32,
    pub name: String,
}

/// Named container binding footprints and copper together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub members: Vec<ItemId>,
}

impl Group {
    #[must_use]
    pub fn contains(&self, item: &ItemId) -> bool {
        self.members.contains(item)
    }
}

/// In-memory board document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub nets: Vec<Net>,
    #[serde(default)]
    pub footprints: Vec<Footprint>,
    #[serde(default)]
    pub copper: Vec<CopperItem>,
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Board {
    pub fn from_json_str(raw: &str, origin: &Path) -> Result<Self, BoardError> {
        serde_json::from_str(raw).map_err(|source| BoardError::Json {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn load(path: &Path) -> Result<Self, BoardError> {
        let raw = std::fs::read_to_string(path).map_err(|source| BoardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let board = Self::from_json_str(&raw, path)?;
        debug!(
            path = %path.display(),
            footprints = board.footprints.len(),
            copper = board.copper.len(),
            "loaded board"
        );
        Ok(board)
    }

    /// Write the board to `path`, replacing it atomically.
    pub fn save(&self, path: &Path) -> Result<(), BoardError> {
        let json = self.to_json_string().map_err(|source| BoardError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(path, json.as_bytes()).map_err(|source| BoardError::Persist {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn net_name(&self, code: u32) -> Option<&str> {
        self.nets
            .iter()
            .find(|n| n.code == code)
            .map(|n| n.name.as_str())
    }

    #[must_use]
    pub fn footprint(&self, id: &ItemId) -> Option<&Footprint> {
        self.footprints.iter().find(|f| &f.id == id)
    }

    pub fn footprint_mut(&mut self, id: &ItemId) -> Option<&mut Footprint> {
        self.footprints.iter_mut().find(|f| &f.id == id)
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn group_mut(&mut self, name: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.name == name)
    }

    /// The group `item` belongs to, if any.
    #[must_use]
    pub fn group_of(&self, item: &ItemId) -> Option<&Group> {
        self.groups.iter().find(|g| g.contains(item))
    }

    /// Get the group called `name`, creating it with `id` if it does not exist.
    pub fn ensure_group(&mut self, name: &str, id: ItemId) -> &mut Group {
        let idx = match self.groups.iter().position(|g| g.name == name) {
            Some(idx) => idx,
            None => {
                debug!(group = name, "creating group");
                self.groups.push(Group {
                    id,
                    name: name.to_string(),
                    members: Vec::new(),
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    /// Put `item` into the group called `name`, removing it from any other
    /// group first. Returns true when the item had to leave another group.
    pub fn move_to_group(&mut self, item: &ItemId, name: &str) -> bool {
        let mut moved = false;
        for group in &mut self.groups {
            if group.name != name && group.contains(item) {
                group.members.retain(|m| m != item);
                moved = true;
            }
        }
        if let Some(group) = self.group_mut(name) {
            if !group.contains(item) {
                group.members.push(item.clone());
            }
        }
        moved
    }

    /// Remove every copper item whose id is in `ids`, returning how many went.
    pub fn remove_copper(&mut self, ids: &HashSet<ItemId>) -> usize {
        let before = self.copper.len();
        self.copper.retain(|c| !ids.contains(c.id()));
        for group in &mut self.groups {
            group.members.retain(|m| !ids.contains(m));
        }
        before - self.copper.len()
    }

    /// Replace the copper items in `remove` with `items`, inserting the new
    /// items where the first removed one sat so unrelated copper keeps its
    /// order. Returns how many items were removed.
    pub fn replace_copper(&mut self, remove: &HashSet<ItemId>, items: Vec<CopperItem>) -> usize {
        let at = self
            .copper
            .iter()
            .position(|c| remove.contains(c.id()))
            .unwrap_or(self.copper.len());
        let removed = self.remove_copper(remove);
        let at = at.min(self.copper.len());
        self.copper.splice(at..at, items);
        removed
    }
}
