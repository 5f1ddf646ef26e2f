#![allow(clippy::unwrap_used)]

use super::*;
use crate::db::Database;

fn rule(id: &str, pattern: &str, category: &str, folder: Option<&str>) -> FilterRule {
    let mut new = NewFilterRule::literal(pattern, "x").in_category(category);
    if let Some(folder) = folder {
        new = new.in_folder(folder);
    }
    FilterRule::from_new(id.into(), new)
}

fn folder(id: &str, name: &str, expanded: bool) -> CustomFolder {
    CustomFolder {
        id: id.into(),
        name: name.into(),
        icon: None,
        expanded,
    }
}

fn labels(rows: &[ListRow]) -> Vec<String> {
    rows.iter()
        .map(|row| match row {
            ListRow::Folder { folder, .. } => format!("F:{}", folder.name),
            ListRow::Category { name, .. } => format!("C:{name}"),
            ListRow::Rule(r) => format!("R:{}", r.id),
        })
        .collect()
}

// ── build_rows ────────────────────────────────────────────────

#[test]
fn test_rows_folders_first_then_sorted_categories() {
    let filters = vec![
        rule("1", "a", "System", None),
        rule("2", "b", "Developer", None),
        rule("3", "c", "Custom", Some("f1")),
        rule("4", "d", "Developer", None),
    ];
    let folders = vec![folder("f1", "Work", true)];
    let rows = build_rows(&filters, &folders, &HashSet::new(), "", &Locale::load("en"));
    assert_eq!(
        labels(&rows),
        vec!["F:Work", "R:3", "C:Developer", "R:2", "R:4", "C:System", "R:1"]
    );
}

#[test]
fn test_rows_collapsed_groups_hide_rules() {
    let filters = vec![
        rule("1", "a", "System", None),
        rule("2", "b", "Custom", Some("f1")),
    ];
    let folders = vec![folder("f1", "Work", false)];
    let collapsed: HashSet<String> = ["System".to_string()].into();
    let rows = build_rows(&filters, &folders, &collapsed, "", &Locale::load("en"));
    assert_eq!(labels(&rows), vec!["F:Work", "C:System"]);
    assert!(matches!(rows[1], ListRow::Category { collapsed: true, total: 1, .. }));
}

#[test]
fn test_rows_count_enabled_members() {
    let mut off = rule("2", "b", "System", None);
    off.enabled = false;
    let filters = vec![rule("1", "a", "System", None), off];
    let rows = build_rows(&filters, &[], &HashSet::new(), "", &Locale::load("en"));
    assert!(matches!(
        rows[0],
        ListRow::Category {
            enabled: 1,
            total: 2,
            ..
        }
    ));
}

#[test]
fn test_rows_dangling_folder_is_listed_under_category() {
    let filters = vec![rule("1", "a", "Finance", Some("gone"))];
    let rows = build_rows(&filters, &[], &HashSet::new(), "", &Locale::load("en"));
    assert_eq!(labels(&rows), vec!["C:Finance", "R:1"]);
}

#[test]
fn test_rows_search_filters_and_expands() {
    let filters = vec![
        rule("1", "token", "System", None),
        rule("2", "other", "System", None),
        rule("3", "TOKENS", "Custom", Some("f1")),
        rule("4", "nothing", "Finance", None),
    ];
    let folders = vec![folder("f1", "Work", false)];
    let collapsed: HashSet<String> = ["System".to_string()].into();
    let rows = build_rows(&filters, &folders, &collapsed, "token", &Locale::load("en"));
    assert_eq!(labels(&rows), vec!["F:Work", "R:3", "C:System", "R:1"]);
}

// ── App ───────────────────────────────────────────────────────

#[test]
fn test_selected_group_walks_up_to_header() {
    let mut app = App::new();
    app.filters = vec![rule("1", "a", "System", None), rule("2", "b", "System", None)];
    app.rebuild_rows();
    app.row_index = 2;
    assert_eq!(app.selected_rule().unwrap().id, "2");
    assert_eq!(app.selected_group(), Some(Group::Category("System".into())));
    app.row_index = 0;
    assert!(app.selected_rule().is_none());
    assert_eq!(app.selected_group(), Some(Group::Category("System".into())));
}

#[test]
fn test_selected_group_on_empty_list() {
    let app = App::new();
    assert_eq!(app.selected_group(), None);
    assert!(app.selected_row().is_none());
}

#[test]
fn test_rebuild_clamps_cursor() {
    let mut app = App::new();
    app.filters = vec![rule("1", "a", "System", None), rule("2", "b", "System", None)];
    app.rebuild_rows();
    app.row_index = 2;
    app.row_scroll = 2;
    app.filters.pop();
    app.rebuild_rows();
    assert_eq!(app.row_index, 1);
    assert_eq!(app.row_scroll, 1);
}

#[test]
fn test_refresh_loads_store_and_locale() {
    let mut manager = FilterManager::open(Database::open_in_memory().unwrap()).unwrap();
    manager
        .update_settings(&AppSettingsPatch {
            language: Some("fr".into()),
            ..AppSettingsPatch::default()
        })
        .unwrap();
    let mut app = App::new();
    app.refresh(&manager).unwrap();
    assert_eq!(app.locale.code(), "fr");
    assert_eq!(app.filters.len(), manager.filters().unwrap().len());
    assert!(!app.rows.is_empty());
}

#[test]
fn test_tester_reruns_on_input() {
    let mut app = App::new();
    app.filters = vec![rule("1", "cat", "Custom", None)];
    app.run_test();
    assert!(app.test_outcome.is_none());
    app.test_input = "cat and CAT".into();
    app.run_test();
    let outcome = app.test_outcome.as_ref().unwrap();
    assert_eq!(outcome.text, "x and x");
    assert_eq!(outcome.matches, 2);
}

#[test]
fn test_settings_field_values() {
    let settings = AppSettings::default();
    assert_eq!(SettingsField::Notifications.value(&settings), "on");
    assert_eq!(SettingsField::AutoStart.value(&settings), "off");
    assert_eq!(SettingsField::Theme.value(&settings), "auto");
    assert_eq!(
        SettingsField::Shortcut.label(&Locale::load("en")),
        "Filtered paste shortcut"
    );
}
