use std::path::PathBuf;

use hierpcb_board::{Board, Footprint, FootprintPath, StableId};
use hierpcb_hierarchy::{
    plan_jobs, reset_to_default, reset_to_default_where, resolve_selection, EnforcementSelection,
    Hierarchy, HierarchyError, SheetPath, SubLayoutBinding, DEFAULT_GROUP_PREFIX,
};
use pretty_assertions::assert_eq;

fn p(s: &str) -> SheetPath {
    s.parse().unwrap()
}

fn fp(id: &str, path: &str, file: &str, name: &str) -> Footprint {
    let mut f = Footprint::new(id, id.to_uppercase());
    f.path = Some(FootprintPath::parse(path));
    f.sheet_file = Some(file.into());
    f.sheet_name = Some(name.into());
    f
}

/// Keyboard: a `half` block with its own layout containing two `key` blocks,
/// which also have a (variant) layout of their own. `/mcu` has no layout.
fn keyboard() -> Hierarchy {
    let board = Board {
        footprints: vec![
            fp("l-sw1", "/left/k1/sw", "key.kicad_sch", "K1"),
            fp("l-d1", "/left/k1/d", "key.kicad_sch", "K1"),
            fp("l-sw2", "/left/k2/sw", "key.kicad_sch", "K2"),
            fp("l-d2", "/left/k2/d", "key.kicad_sch", "K2"),
            fp("l-con", "/left/con", "half.kicad_sch", "Left"),
            fp("r-sw1", "/right/k1/sw", "key.kicad_sch", "K1"),
            fp("r-con", "/right/con", "half.kicad_sch", "Right"),
            fp("mcu", "/mcu/u1", "mcu.kicad_sch", "MCU"),
        ],
        ..Board::default()
    };
    let binding = SubLayoutBinding::new("/proj", "kicad_pcb");
    Hierarchy::from_board_with(&board, &binding, |path| {
        path.ends_with("key.kicad_pcb") || path.ends_with("half.kicad_pcb")
    })
}

#[test]
fn default_selection_prefers_outermost_layout() {
    let h = keyboard();
    let selection = reset_to_default(&h);
    let enabled: Vec<&SheetPath> = selection.enabled_paths().collect();
    assert_eq!(enabled, vec![&p("/left"), &p("/right")]);
}

#[test]
fn default_selection_descends_past_rejected_instances() {
    let h = keyboard();
    let selection = reset_to_default_where(&h, |node| {
        node.sub_layout
            .as_ref()
            .is_some_and(|s| s.ends_with("key.kicad_pcb"))
    });
    let enabled: Vec<String> = selection.enabled_paths().map(|p| p.to_string()).collect();
    assert_eq!(enabled, vec!["/left/k1", "/left/k2", "/right/k1"]);
}

#[test]
fn jobs_follow_tree_order_and_carry_scope() {
    let h = keyboard();
    let mut selection = EnforcementSelection::new();
    selection
        .enable(p("/right"), None)
        .enable(p("/left/k2"), Some(StableId::new("/sw")))
        .enable(p("/left/k1"), None);

    let jobs = plan_jobs(&h, &selection, DEFAULT_GROUP_PREFIX).unwrap();
    let paths: Vec<String> = jobs.iter().map(|j| j.path.to_string()).collect();
    assert_eq!(paths, vec!["/left/k1", "/left/k2", "/right"]);

    let k2 = &jobs[1];
    assert_eq!(k2.anchor, Some(StableId::new("/sw")));
    assert_eq!(k2.sub_layout, PathBuf::from("/proj/key.kicad_pcb"));
    assert_eq!(k2.group_name, "subpcb_Left/K2");
    let scope: Vec<&str> = k2.scope.keys().map(StableId::as_str).collect();
    assert_eq!(scope, vec!["/d", "/sw"]);

    let right = &jobs[2];
    let scope: Vec<&str> = right.scope.keys().map(StableId::as_str).collect();
    assert_eq!(scope, vec!["/con", "/k1/sw"]);
}

#[test]
fn ancestor_and_descendant_selection_is_rejected() {
    let h = keyboard();
    let mut selection = EnforcementSelection::new();
    selection
        .enable(p("/left"), None)
        .enable(p("/left/k1"), None);

    let err = plan_jobs(&h, &selection, DEFAULT_GROUP_PREFIX).unwrap_err();
    let HierarchyError::SelectionConflict { conflicts } = &err;
    assert_eq!(conflicts, &vec![(p("/left"), p("/left/k1"))]);
    assert!(err.to_string().contains("/left/k1 is inside selected /left"));
}

#[test]
fn stale_and_unbound_entries_are_dropped_silently() {
    let h = keyboard();
    let mut selection = EnforcementSelection::new();
    selection
        .enable(p("/gone/away"), None)
        .enable(p("/mcu"), None)
        .enable(p("/right/k1"), None);

    let jobs = plan_jobs(&h, &selection, DEFAULT_GROUP_PREFIX).unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].path, p("/right/k1"));
}

#[test]
fn disabled_entry_keeps_anchor_but_produces_no_job() {
    let h = keyboard();
    let mut selection = EnforcementSelection::new();
    selection.enable(p("/left"), Some(StableId::new("/con")));
    selection.disable(&p("/left"));

    assert!(plan_jobs(&h, &selection, DEFAULT_GROUP_PREFIX)
        .unwrap()
        .is_empty());
    assert_eq!(selection.anchor(&p("/left")), Some(&StableId::new("/con")));
}

#[test]
fn instances_sharing_a_name_get_distinct_groups() {
    let board = Board {
        footprints: vec![
            fp("a-sw", "/0f3c2a91-aa/sw", "key.kicad_sch", "Key"),
            fp("b-sw", "/0f3c2a91-bb/sw", "key.kicad_sch", "Key"),
            fp("mcu", "/mcu/u1", "mcu.kicad_sch", "MCU"),
        ],
        ..Board::default()
    };
    let binding = SubLayoutBinding::new("/proj", "kicad_pcb");
    let h = Hierarchy::from_board_with(&board, &binding, |_| true);

    let mut selection = EnforcementSelection::new();
    selection.enable(p("/0f3c2a91-aa"), None);
    let jobs = plan_jobs(&h, &selection, DEFAULT_GROUP_PREFIX).unwrap();
    assert_eq!(jobs[0].human_path, "Key");
    assert_eq!(jobs[0].group_name, "subpcb_/0f3c2a91-aa");

    selection
        .enable(p("/0f3c2a91-bb"), None)
        .enable(p("/mcu"), None);
    let names: Vec<String> = plan_jobs(&h, &selection, DEFAULT_GROUP_PREFIX)
        .unwrap()
        .into_iter()
        .map(|j| j.group_name)
        .collect();
    assert_eq!(
        names,
        vec!["subpcb_/0f3c2a91-aa", "subpcb_/0f3c2a91-bb", "subpcb_MCU"]
    );
}

#[test]
fn resolved_selection_keeps_only_applicable_entries() {
    let h = keyboard();
    let mut selection = EnforcementSelection::new();
    selection
        .enable(p("/gone/away"), None)
        .enable(p("/mcu"), None)
        .enable(p("/right"), Some(StableId::new("/con")));

    let live = resolve_selection(&h, &selection);
    let entries: Vec<(String, bool)> = live
        .entries()
        .map(|(path, entry)| (path.to_string(), entry.enabled))
        .collect();
    assert_eq!(
        entries,
        vec![("/mcu".to_string(), false), ("/right".to_string(), true)]
    );
    assert_eq!(live.anchor(&p("/right")), Some(&StableId::new("/con")));
}
