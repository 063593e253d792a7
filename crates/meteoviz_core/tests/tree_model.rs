use meteoviz_core::{Catalog, NodeKind, TreeNode};
use pretty_assertions::assert_eq;

/// Every (id, expanded) pair in depth-first order.
fn flags(forest: &[TreeNode]) -> Vec<(String, bool)> {
    fn walk(node: &TreeNode, out: &mut Vec<(String, bool)>) {
        out.push((node.id.clone(), node.expanded));
        for child in &node.children {
            walk(child, out);
        }
    }
    let mut out = Vec::new();
    for node in forest {
        walk(node, &mut out);
    }
    out
}

fn root_names(catalog: &Catalog, term: &str) -> Vec<String> {
    catalog
        .filter_by_search_term(term)
        .into_iter()
        .map(|index| catalog.entry(index).unwrap().name.clone())
        .collect()
}

#[test]
fn toggle_flips_exactly_one_flag() {
    let original = Catalog::builtin();
    for (id, _) in flags(&original.to_forest()) {
        let mut catalog = original.clone();
        assert!(catalog.toggle_expand(&id));

        let before = flags(&original.to_forest());
        let after = flags(&catalog.to_forest());
        let changed: Vec<_> = before
            .iter()
            .zip(after.iter())
            .filter(|(b, a)| b != a)
            .map(|(b, _)| b.0.clone())
            .collect();
        assert_eq!(changed, vec![id.clone()]);

        // Names, kinds and structure are untouched.
        let mut restored = catalog.clone();
        restored.toggle_expand(&id);
        assert_eq!(restored, original);
    }
}

#[test]
fn toggle_of_unknown_id_changes_nothing() {
    let original = Catalog::builtin();
    let mut catalog = original.clone();

    assert!(!catalog.toggle_expand("ecmwf"));
    assert_eq!(catalog, original);
}

#[test]
fn empty_search_returns_all_roots() {
    let catalog = Catalog::builtin();
    assert_eq!(
        root_names(&catalog, ""),
        vec![
            "GFS (Global Forecast System)",
            "WRF (Weather Research and Forecasting)",
            "IMD (India Meteorological Department)",
        ]
    );
}

#[test]
fn search_is_case_insensitive() {
    let catalog = Catalog::builtin();
    assert_eq!(root_names(&catalog, "gLoBaL"), vec!["GFS (Global Forecast System)"]);
    assert_eq!(root_names(&catalog, "FORECAST").len(), 2);
}

#[test]
fn search_without_match_is_empty() {
    let catalog = Catalog::builtin();
    assert!(root_names(&catalog, "ecmwf").is_empty());
}

#[test]
fn search_matches_only_root_names() {
    let catalog = Catalog::builtin();
    // "Wind Speed" and "Wind Analysis" live below GFS; children are never matched.
    assert!(root_names(&catalog, "wind").is_empty());
    // A matching root keeps all of its children, matching or not.
    let mut expanded = catalog.clone();
    expanded.toggle_expand("imd");
    let rows = expanded.visible_rows("india");
    let ids: Vec<_> = rows
        .iter()
        .map(|row| expanded.entry(row.index).unwrap().id.as_str())
        .collect();
    assert_eq!(ids, vec!["imd", "imd-monsoon", "imd-cyclone"]);
}

#[test]
fn collapsed_parent_hides_expanded_children() {
    let mut catalog = Catalog::builtin();
    catalog.toggle_expand("gfs-wind");
    assert_eq!(catalog.visible_rows("").len(), 3);

    catalog.toggle_expand("gfs");
    assert_eq!(catalog.visible_rows("").len(), 3 + 3 + 3);
}

#[test]
fn kinds_follow_the_three_tiers() {
    let catalog = Catalog::builtin();
    for &root in catalog.roots() {
        let product = catalog.entry(root).unwrap();
        assert_eq!(product.kind, NodeKind::Product);
        for &category in &product.children {
            let category = catalog.entry(category).unwrap();
            assert_eq!(category.kind, NodeKind::Category);
            assert_eq!(category.parent, Some(root));
            for &variable in &category.children {
                let variable = catalog.entry(variable).unwrap();
                assert_eq!(variable.kind, NodeKind::Variable);
                assert!(variable.children.is_empty());
                assert!(!variable.is_expandable());
            }
        }
    }
}
