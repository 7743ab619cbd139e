use crate::path::SheetPath;

#[derive(Debug, thiserror::Error)]
pub enum HierarchyError {
    /// Two enabled paths where one contains the other.
    #[error("conflicting selection: {}", describe(.conflicts))]
    SelectionConflict { conflicts: Vec<(SheetPath, SheetPath)> },
}

fn describe(conflicts: &[(SheetPath, SheetPath)]) -> String {
    conflicts
        .iter()
        .map(|(ancestor, descendant)| format!("{descendant} is inside selected {ancestor}"))
        .collect::<Vec<_>>()
        .join("; ")
}
