use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use hierpcb_board::{Board, ItemId, StableId};
use tracing::debug;

use crate::path::SheetPath;

/// Where a block's sub-layout lives, by convention next to its schematic.
#[derive(Debug, Clone)]
pub struct SubLayoutBinding {
    pub base_dir: PathBuf,
    pub extension: String,
}

impl SubLayoutBinding {
    pub fn new(base_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            extension: extension.into(),
        }
    }

    /// `dir/key.kicad_sch` becomes `<base_dir>/dir/key.<extension>`.
    #[must_use]
    pub fn candidate(&self, sheet_file: &str) -> PathBuf {
        self.base_dir
            .join(Path::new(sheet_file).with_extension(&self.extension))
    }
}

/// One instantiation of a hierarchical block.
#[derive(Debug, Clone, Default)]
pub struct HierarchyNode {
    pub path: SheetPath,
    /// Human-readable sheet name.
    pub name: Option<String>,
    /// Schematic file of the block; shared by every instance of it.
    pub block_id: Option<String>,
    pub sub_layout: Option<PathBuf>,
    /// Main-document footprints in this instance or below, keyed by their
    /// stable-ID relative to this instance.
    pub footprint_scope: BTreeMap<StableId, ItemId>,
    children: BTreeMap<String, HierarchyNode>,
}

impl HierarchyNode {
    fn new(path: SheetPath) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn human_name(&self) -> String {
        match (&self.name, self.path.segments().last()) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.chars().take(8).collect(),
            (None, None) => "/".to_string(),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.children.values()
    }

    fn has_metadata(&self) -> bool {
        self.name.is_some() && self.block_id.is_some()
    }

    fn get_or_create(&mut self, sheet: &[String]) -> &mut HierarchyNode {
        let mut node = self;
        for segment in sheet {
            let child_path = node.path.child(segment);
            node = node
                .children
                .entry(segment.clone())
                .or_insert_with(|| HierarchyNode::new(child_path));
        }
        node
    }

    fn render_into(&self, out: &mut Vec<String>) {
        let mut head = self.human_name();
        if let Some(sub) = &self.sub_layout {
            head.push_str(&format!(" (+ PCB {})", sub.display()));
        }
        out.push(head);
        for child in self.children.values() {
            let mut lines = Vec::new();
            child.render_into(&mut lines);
            for (i, line) in lines.into_iter().enumerate() {
                if i == 0 {
                    out.push(format!("├─ {line}"));
                } else {
                    out.push(format!("│  {line}"));
                }
            }
        }
    }
}

/// The tree of hierarchical instances of a main board.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    root: HierarchyNode,
}

impl Hierarchy {
    /// Infer the hierarchy from footprint schematic paths, binding sub-layouts
    /// that exist on disk.
    pub fn from_board(board: &Board, binding: &SubLayoutBinding) -> Self {
        Self::from_board_with(board, binding, |p| p.exists())
    }

    /// As [`Hierarchy::from_board`], with an injectable existence probe.
    ///
    /// Sheets no footprint refers to cannot be discovered this way.
    pub fn from_board_with(
        board: &Board,
        binding: &SubLayoutBinding,
        exists: impl Fn(&Path) -> bool,
    ) -> Self {
        let mut root = HierarchyNode::new(SheetPath::root());
        // None: the sheet file is known to have no sub-layout.
        let mut bound: HashMap<String, Option<PathBuf>> = HashMap::new();

        for fp in &board.footprints {
            let Some(path) = &fp.path else {
                debug!(reference = %fp.reference, "footprint has no schematic path, skipping");
                continue;
            };
            let sheet = path.sheet();
            if sheet.is_empty() {
                continue;
            }

            let node = root.get_or_create(sheet);
            if node.has_metadata() {
                continue;
            }
            let (Some(file), Some(name)) = (&fp.sheet_file, &fp.sheet_name) else {
                debug!(reference = %fp.reference, "no sheet file, skipping");
                continue;
            };
            node.name = Some(name.clone());
            node.block_id = Some(file.clone());
            node.sub_layout = bound
                .entry(file.clone())
                .or_insert_with(|| {
                    let candidate = binding.candidate(file);
                    exists(&candidate).then_some(candidate)
                })
                .clone();
        }

        for fp in &board.footprints {
            let Some(path) = &fp.path else { continue };
            let mut node = &mut root;
            if let Some(id) = path.stable_id_within(node.path.segments()) {
                node.footprint_scope.insert(id, fp.id.clone());
            }
            for segment in path.sheet() {
                let Some(child) = node.children.get_mut(segment) else {
                    break;
                };
                node = child;
                if let Some(id) = path.stable_id_within(node.path.segments()) {
                    node.footprint_scope.insert(id, fp.id.clone());
                }
            }
        }

        Self { root }
    }

    #[must_use]
    pub fn root(&self) -> &HierarchyNode {
        &self.root
    }

    #[must_use]
    pub fn get(&self, path: &SheetPath) -> Option<&HierarchyNode> {
        let mut node = &self.root;
        for segment in path.segments() {
            node = node.children.get(segment)?;
        }
        Some(node)
    }

    /// Human path of `path`: sheet names from the root, joined by `/`.
    #[must_use]
    pub fn human_path(&self, path: &SheetPath) -> String {
        let mut node = &self.root;
        let mut names = Vec::new();
        for segment in path.segments() {
            match node.children.get(segment) {
                Some(child) => {
                    names.push(child.human_name());
                    node = child;
                }
                None => names.push(segment.chars().take(8).collect()),
            }
        }
        names.join("/")
    }

    /// Depth-first, pre-order walk; siblings in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.values().rev());
            Some(node)
        })
    }

    /// Text tree with bound sub-layouts, one instance per line.
    #[must_use]
    pub fn render_tree(&self) -> String {
        let mut out = Vec::new();
        self.root.render_into(&mut out);
        out.join("\n")
    }
}
