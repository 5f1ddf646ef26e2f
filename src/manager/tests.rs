#![allow(clippy::unwrap_used)]

use super::*;
use crate::db::Database;

fn manager() -> FilterManager<Database> {
    FilterManager::open(Database::open_in_memory().unwrap()).unwrap()
}

/// A manager with no rules at all: seed, then wipe.
fn empty_manager() -> FilterManager<Database> {
    let mut m = manager();
    m.store_mut().save_filters(&[]).unwrap();
    m
}

/// Wraps a database and can be told to fail every write.
struct FlakyStore {
    db: Database,
    fail_writes: bool,
}

impl RuleStore for FlakyStore {
    fn load_filters(&self) -> anyhow::Result<Vec<FilterRule>> {
        self.db.load_filters()
    }
    fn save_filters(&mut self, filters: &[FilterRule]) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("disk full");
        }
        self.db.save_filters(filters)
    }
    fn load_folders(&self) -> anyhow::Result<Vec<CustomFolder>> {
        self.db.load_folders()
    }
    fn save_folders(&mut self, folders: &[CustomFolder]) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("disk full");
        }
        self.db.save_folders(folders)
    }
    fn load_settings(&self) -> anyhow::Result<AppSettings> {
        self.db.load_settings()
    }
    fn save_settings(&mut self, settings: &AppSettings) -> anyhow::Result<()> {
        if self.fail_writes {
            anyhow::bail!("disk full");
        }
        self.db.save_settings(settings)
    }
}

fn flaky_manager() -> FilterManager<FlakyStore> {
    FilterManager::open(FlakyStore {
        db: Database::open_in_memory().unwrap(),
        fail_writes: false,
    })
    .unwrap()
}

// ── Seeding ───────────────────────────────────────────────────

#[test]
fn test_open_seeds_defaults() {
    let m = manager();
    let filters = m.filters().unwrap();
    let defaults = default_filters().unwrap();
    assert_eq!(filters.len(), defaults.len());
    assert!(filters.iter().all(|r| r.is_builtin()));
    assert!(filters.iter().all(|r| !r.id.is_empty()));
}

#[test]
fn test_seeded_ids_are_unique() {
    let m = manager();
    let mut ids: Vec<String> = m.filters().unwrap().into_iter().map(|r| r.id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

#[test]
fn test_open_does_not_reseed_existing_rules() {
    let mut db = Database::open_in_memory().unwrap();
    let rule = FilterRule::from_new("mine".into(), NewFilterRule::literal("a", "b"));
    db.save_filters(&[rule.clone()]).unwrap();
    let m = FilterManager::open(db).unwrap();
    assert_eq!(m.filters().unwrap(), vec![rule]);
}

#[test]
fn test_default_bundle_is_valid() {
    for rule in default_filters().unwrap() {
        assert!(rule.origin.is_builtin());
        assert!(validate_pattern(&rule.pattern, rule.use_regex).is_ok(), "{}", rule.pattern);
    }
}

// ── Add / update / delete ─────────────────────────────────────

#[test]
fn test_add_filter_assigns_id_and_appends() {
    let mut m = empty_manager();
    let a = m.add_filter(NewFilterRule::literal("cat", "dog")).unwrap();
    let b = m.add_filter(NewFilterRule::literal("dog", "fish")).unwrap();
    assert_ne!(a.id, b.id);
    let filters = m.filters().unwrap();
    assert_eq!(filters, vec![a, b]);
}

#[test]
fn test_add_filter_rejects_invalid_regex() {
    let mut m = empty_manager();
    let err = m.add_filter(NewFilterRule::regex("(", "x")).unwrap_err();
    assert!(matches!(err, FilterError::InvalidPattern { .. }));
    assert!(m.filters().unwrap().is_empty());
}

#[test]
fn test_add_filter_rejects_empty_pattern() {
    let mut m = empty_manager();
    let err = m.add_filter(NewFilterRule::literal("", "x")).unwrap_err();
    assert!(matches!(err, FilterError::EmptyPattern));
}

#[test]
fn test_add_literal_paren_is_allowed() {
    let mut m = empty_manager();
    assert!(m.add_filter(NewFilterRule::literal("(", "x")).is_ok());
}

#[test]
fn test_update_filter_merges_and_keeps_identity() {
    let mut m = empty_manager();
    let first = m.add_filter(NewFilterRule::literal("a", "1")).unwrap();
    let second = m
        .add_filter(NewFilterRule::literal("b", "2").with_origin(Origin::custom("label")))
        .unwrap();

    let patch = FilterRulePatch {
        replacement: Some("two".into()),
        enabled: Some(false),
        ..FilterRulePatch::default()
    };
    let updated = m.update_filter(&second.id, &patch).unwrap().unwrap();
    assert_eq!(updated.id, second.id);
    assert_eq!(updated.pattern, "b");
    assert_eq!(updated.replacement, "two");
    assert!(!updated.enabled);
    assert_eq!(updated.origin, Origin::custom("label"));

    // Position is preserved
    let ids: Vec<String> = m.filters().unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![first.id, second.id]);
}

#[test]
fn test_update_builtin_keeps_origin() {
    let mut m = manager();
    let builtin = m.filters().unwrap().into_iter().next().unwrap();
    let patch = FilterRulePatch {
        description: Some(Some("renamed".into())),
        replacement: Some("[X]".into()),
        ..FilterRulePatch::default()
    };
    let updated = m.update_filter(&builtin.id, &patch).unwrap().unwrap();
    assert_eq!(updated.origin, builtin.origin);
    assert_eq!(updated.replacement, "[X]");
}

#[test]
fn test_update_unknown_id_is_noop() {
    let mut m = manager();
    let before = m.filters().unwrap();
    let result = m
        .update_filter("nope", &FilterRulePatch::enabled(false))
        .unwrap();
    assert!(result.is_none());
    assert_eq!(m.filters().unwrap(), before);
}

#[test]
fn test_update_to_invalid_regex_is_rejected() {
    let mut m = empty_manager();
    let rule = m.add_filter(NewFilterRule::literal("(", "x")).unwrap();
    // Turning "(" into a regex must fail and leave the rule as it was
    let patch = FilterRulePatch {
        use_regex: Some(true),
        ..FilterRulePatch::default()
    };
    assert!(m.update_filter(&rule.id, &patch).is_err());
    assert_eq!(m.find_filter(&rule.id).unwrap().unwrap(), rule);
}

#[test]
fn test_delete_filter() {
    let mut m = empty_manager();
    let rule = m.add_filter(NewFilterRule::literal("a", "b")).unwrap();
    assert!(m.delete_filter(&rule.id).unwrap());
    assert!(m.filters().unwrap().is_empty());
    assert!(!m.delete_filter(&rule.id).unwrap());
}

// ── Folders ───────────────────────────────────────────────────

#[test]
fn test_folder_crud() {
    let mut m = empty_manager();
    let folder = m
        .add_custom_folder(NewCustomFolder::new("  Work  ").with_icon("💼"))
        .unwrap();
    assert_eq!(folder.name, "Work");
    assert!(folder.expanded);
    assert_eq!(folder.icon(), "💼");

    let patch = CustomFolderPatch {
        name: Some("Job".into()),
        expanded: Some(false),
        ..CustomFolderPatch::default()
    };
    let updated = m.update_custom_folder(&folder.id, &patch).unwrap().unwrap();
    assert_eq!(updated.name, "Job");
    assert!(!updated.expanded);
    assert_eq!(m.custom_folders().unwrap(), vec![updated]);

    assert!(m
        .update_custom_folder("nope", &CustomFolderPatch::default())
        .unwrap()
        .is_none());
}

#[test]
fn test_folder_name_must_not_be_empty() {
    let mut m = empty_manager();
    assert!(matches!(
        m.add_custom_folder(NewCustomFolder::new("   ")),
        Err(FilterError::EmptyFolderName)
    ));
}

#[test]
fn test_delete_folder_cascades() {
    let mut m = empty_manager();
    let work = m.add_custom_folder(NewCustomFolder::new("Work")).unwrap();
    let home = m.add_custom_folder(NewCustomFolder::new("Home")).unwrap();
    m.add_filter(NewFilterRule::literal("a", "1").in_folder(&work.id))
        .unwrap();
    m.add_filter(NewFilterRule::literal("b", "2").in_folder(&work.id))
        .unwrap();
    let kept_home = m
        .add_filter(NewFilterRule::literal("c", "3").in_folder(&home.id))
        .unwrap();
    let kept_loose = m.add_filter(NewFilterRule::literal("d", "4")).unwrap();

    assert_eq!(m.delete_custom_folder(&work.id).unwrap(), 2);
    assert_eq!(m.filters().unwrap(), vec![kept_home, kept_loose]);
    assert_eq!(m.custom_folders().unwrap(), vec![home]);
}

#[test]
fn test_delete_unknown_folder_is_noop() {
    let mut m = manager();
    let before = m.filters().unwrap();
    assert_eq!(m.delete_custom_folder("nope").unwrap(), 0);
    assert_eq!(m.filters().unwrap(), before);
}

#[test]
fn test_move_and_unfile() {
    let mut m = empty_manager();
    let folder = m.add_custom_folder(NewCustomFolder::new("Work")).unwrap();
    let rule = m.add_filter(NewFilterRule::literal("a", "b")).unwrap();

    m.move_filter_to_folder(&rule.id, Some(&folder.id)).unwrap();
    assert_eq!(m.filters_by_folder(&folder.id).unwrap().len(), 1);
    assert!(m.filters_by_category("Custom").unwrap().is_empty());

    m.move_filter_to_folder(&rule.id, None).unwrap();
    assert!(m.filters_by_folder(&folder.id).unwrap().is_empty());
    assert_eq!(m.filters_by_category("Custom").unwrap().len(), 1);
}

#[test]
fn test_copy_to_folder_clones_under_new_id() {
    let mut m = manager();
    let folder = m.add_custom_folder(NewCustomFolder::new("Mine")).unwrap();
    let source = m.filters().unwrap().into_iter().next().unwrap();
    let total = m.filters().unwrap().len();

    let copy = m
        .copy_filter_to_folder(&source.id, &folder.id)
        .unwrap()
        .unwrap();
    assert_ne!(copy.id, source.id);
    assert_eq!(copy.pattern, source.pattern);
    assert_eq!(copy.origin, source.origin);
    assert_eq!(copy.folder.as_deref(), Some(folder.id.as_str()));
    assert_eq!(m.filters().unwrap().len(), total + 1);
    // The original is untouched
    assert_eq!(m.find_filter(&source.id).unwrap().unwrap(), source);

    assert!(m.copy_filter_to_folder("nope", &folder.id).unwrap().is_none());
    assert!(m.copy_filter_to_folder(&source.id, "nope").unwrap().is_none());
}

#[test]
fn test_dangling_folder_reads_as_unfiled() {
    let mut db = Database::open_in_memory().unwrap();
    let rule = FilterRule::from_new(
        "r".into(),
        NewFilterRule::literal("a", "b").in_category("Misc").in_folder("gone"),
    );
    db.save_filters(&[rule]).unwrap();
    let m = FilterManager::open(db).unwrap();
    assert_eq!(m.categories().unwrap(), vec!["Misc".to_string()]);
    assert_eq!(m.filters_by_category("Misc").unwrap().len(), 1);
}

// ── Categories ────────────────────────────────────────────────

#[test]
fn test_categories_sorted_distinct_unfiled() {
    let mut m = empty_manager();
    let folder = m.add_custom_folder(NewCustomFolder::new("F")).unwrap();
    m.add_filter(NewFilterRule::literal("a", "").in_category("Zeta"))
        .unwrap();
    m.add_filter(NewFilterRule::literal("b", "").in_category("Alpha"))
        .unwrap();
    m.add_filter(NewFilterRule::literal("c", "").in_category("Zeta"))
        .unwrap();
    m.add_filter(
        NewFilterRule::literal("d", "")
            .in_category("Hidden")
            .in_folder(&folder.id),
    )
    .unwrap();
    assert_eq!(m.categories().unwrap(), vec!["Alpha", "Zeta"]);
    assert_eq!(m.filters_by_category("Zeta").unwrap().len(), 2);
}

#[test]
fn test_default_categories_present() {
    let m = manager();
    let cats = m.categories().unwrap();
    for expected in ["Communication", "Developer", "Finance", "Health", "Personal", "System"] {
        assert!(cats.iter().any(|c| c == expected), "missing {expected}");
    }
}

#[test]
fn test_delete_category_removes_unfiled_custom_rules() {
    let mut m = empty_manager();
    let folder = m.add_custom_folder(NewCustomFolder::new("F")).unwrap();
    m.add_filter(NewFilterRule::literal("a", "").in_category("Mine"))
        .unwrap();
    m.add_filter(NewFilterRule::literal("b", "").in_category("Mine"))
        .unwrap();
    let filed = m
        .add_filter(
            NewFilterRule::literal("c", "")
                .in_category("Mine")
                .in_folder(&folder.id),
        )
        .unwrap();

    assert_eq!(m.delete_category("Mine").unwrap(), 2);
    assert_eq!(m.filters().unwrap(), vec![filed]);
}

#[test]
fn test_delete_category_with_builtin_is_refused() {
    let mut m = manager();
    m.add_filter(NewFilterRule::literal("x", "").in_category("Developer"))
        .unwrap();
    let before = m.filters().unwrap();
    let err = m.delete_category("Developer").unwrap_err();
    assert!(matches!(err, FilterError::ProtectedCategory { .. }));
    assert_eq!(m.filters().unwrap(), before);
}

#[test]
fn test_delete_missing_category() {
    let mut m = manager();
    assert_eq!(m.delete_category("Nothing").unwrap(), 0);
}

// ── Groups ────────────────────────────────────────────────────

#[test]
fn test_toggle_category_group() {
    let mut m = empty_manager();
    m.add_filter(NewFilterRule::literal("a", "").in_category("G"))
        .unwrap();
    m.add_filter(NewFilterRule::literal("b", "").in_category("G").disabled())
        .unwrap();
    let group = Group::Category("G".into());

    // Mixed: enable all
    assert_eq!(m.toggle_group(&group).unwrap(), Some(true));
    assert!(m.filters().unwrap().iter().all(|r| r.enabled));

    // All enabled: disable all
    assert_eq!(m.toggle_group(&group).unwrap(), Some(false));
    assert!(m.filters().unwrap().iter().all(|r| !r.enabled));

    assert_eq!(m.toggle_group(&Group::Category("none".into())).unwrap(), None);
}

#[test]
fn test_set_folder_group_enabled() {
    let mut m = empty_manager();
    let folder = m.add_custom_folder(NewCustomFolder::new("F")).unwrap();
    m.add_filter(NewFilterRule::literal("a", "").in_folder(&folder.id))
        .unwrap();
    let outside = m.add_filter(NewFilterRule::literal("b", "")).unwrap();

    let changed = m
        .set_group_enabled(&Group::Folder(folder.id.clone()), false)
        .unwrap();
    assert_eq!(changed, 1);
    assert!(!m.filters_by_folder(&folder.id).unwrap()[0].enabled);
    assert!(m.find_filter(&outside.id).unwrap().unwrap().enabled);
}

// ── Reset ─────────────────────────────────────────────────────

#[test]
fn test_reset_to_defaults_regenerates() {
    let mut m = manager();
    let old_ids: Vec<String> = m.filters().unwrap().into_iter().map(|r| r.id).collect();
    m.add_filter(NewFilterRule::literal("custom", "x")).unwrap();

    let count = m.reset_to_defaults().unwrap();
    let filters = m.filters().unwrap();
    assert_eq!(count, filters.len());
    assert_eq!(count, old_ids.len());
    assert!(filters.iter().all(|r| r.is_builtin()));
    assert!(filters.iter().all(|r| !old_ids.contains(&r.id)));
}

#[test]
fn test_reenable_builtins_keeps_ids_and_custom_rules() {
    let mut m = manager();
    let custom = m
        .add_filter(NewFilterRule::literal("custom", "x").disabled())
        .unwrap();
    let group = Group::Category("Developer".into());
    m.set_group_enabled(&group, false).unwrap();
    let ids_before: Vec<String> = m.filters().unwrap().into_iter().map(|r| r.id).collect();

    let changed = m.reenable_builtins(None).unwrap();
    assert!(changed > 0);

    let filters = m.filters().unwrap();
    let ids_after: Vec<String> = filters.iter().map(|r| r.id.clone()).collect();
    assert_eq!(ids_before, ids_after);
    assert!(filters.iter().filter(|r| r.is_builtin()).all(|r| r.enabled));
    // Custom rules are left alone
    assert!(!m.find_filter(&custom.id).unwrap().unwrap().enabled);
}

#[test]
fn test_reenable_builtins_in_one_category() {
    let mut m = manager();
    m.set_group_enabled(&Group::Category("Developer".into()), false)
        .unwrap();
    m.set_group_enabled(&Group::Category("Finance".into()), false)
        .unwrap();

    m.reenable_builtins(Some("Finance")).unwrap();
    assert!(m
        .filters_by_category("Finance")
        .unwrap()
        .iter()
        .all(|r| r.enabled));
    assert!(m
        .filters_by_category("Developer")
        .unwrap()
        .iter()
        .all(|r| !r.enabled));
}

#[test]
fn test_delete_all_custom() {
    let mut m = manager();
    let builtins = m.filters().unwrap().len();
    let folder = m.add_custom_folder(NewCustomFolder::new("F")).unwrap();
    m.add_filter(NewFilterRule::literal("a", "")).unwrap();
    m.add_filter(NewFilterRule::literal("b", "").in_folder(&folder.id))
        .unwrap();

    let (rules, folders) = m.delete_all_custom().unwrap();
    assert_eq!((rules, folders), (2, 1));
    assert_eq!(m.filters().unwrap().len(), builtins);
    assert!(m.custom_folders().unwrap().is_empty());
}

#[test]
fn test_delete_all_custom_without_custom_rules() {
    let mut m = manager();
    assert!(matches!(
        m.delete_all_custom(),
        Err(FilterError::NothingToDelete)
    ));
}

// ── Filtering ─────────────────────────────────────────────────

#[test]
fn test_apply_filters_uses_stored_order() {
    let mut m = empty_manager();
    m.add_filter(NewFilterRule::literal("cat", "dog")).unwrap();
    let middle = m.add_filter(NewFilterRule::literal("dog", "fish")).unwrap();

    let out = m.apply_filters("cat").unwrap();
    assert_eq!((out.text.as_str(), out.matches), ("fish", 2));
    assert_eq!(m.last_match_count(), 2);

    m.update_filter(&middle.id, &FilterRulePatch::enabled(false))
        .unwrap();
    let out = m.apply_filters("cat").unwrap();
    assert_eq!((out.text.as_str(), out.matches), ("dog", 1));
}

#[test]
fn test_default_filters_redact() {
    let mut m = manager();
    let out = m
        .apply_filters("mail john.doe@example.com from /home/alice/project")
        .unwrap();
    assert_eq!(out.text, "mail [EMAIL] from /home/[USER]/project");
    assert_eq!(out.matches, 2);
}

#[test]
fn test_default_nbsp_literal() {
    let mut m = manager();
    let out = m.apply_filters("a\u{a0}b").unwrap();
    assert_eq!(out.text, "a b");
}

// ── Persistence failures ──────────────────────────────────────

#[test]
fn test_failed_write_leaves_state_unchanged() {
    let mut m = flaky_manager();
    let folder = m.add_custom_folder(NewCustomFolder::new("F")).unwrap();
    m.add_filter(NewFilterRule::literal("a", "").in_folder(&folder.id))
        .unwrap();
    let filters = m.filters().unwrap();
    let folders = m.custom_folders().unwrap();

    m.store_mut().fail_writes = true;
    assert!(matches!(
        m.add_filter(NewFilterRule::literal("b", "")),
        Err(FilterError::Store(_))
    ));
    assert!(m.delete_custom_folder(&folder.id).is_err());
    assert!(m.reset_to_defaults().is_err());
    assert!(m
        .update_settings(&AppSettingsPatch {
            notifications: Some(false),
            ..AppSettingsPatch::default()
        })
        .is_err());

    assert_eq!(m.filters().unwrap(), filters);
    assert_eq!(m.custom_folders().unwrap(), folders);
    assert!(m.settings().unwrap().notifications);

    m.store_mut().fail_writes = false;
    assert_eq!(m.delete_custom_folder(&folder.id).unwrap(), 1);
    assert!(m.store().db.get_folders().unwrap().is_empty());
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_settings_defaults_and_merge() {
    let mut m = manager();
    assert_eq!(m.settings().unwrap(), AppSettings::default());

    let updated = m
        .update_settings(&AppSettingsPatch {
            language: Some("fr".into()),
            theme: Some(Theme::Dark),
            ..AppSettingsPatch::default()
        })
        .unwrap();
    assert_eq!(updated.language, "fr");
    assert_eq!(updated.theme, Theme::Dark);
    assert!(updated.notifications);
    assert_eq!(updated.shortcut_paste, DEFAULT_SHORTCUT);
    assert_eq!(m.settings().unwrap(), updated);
}

#[test]
fn test_settings_validation() {
    let mut m = manager();
    assert!(matches!(
        m.update_settings(&AppSettingsPatch {
            language: Some("xx".into()),
            ..AppSettingsPatch::default()
        }),
        Err(FilterError::UnknownLanguage(_))
    ));
    assert!(matches!(
        m.update_settings(&AppSettingsPatch {
            shortcut_paste: Some("V".into()),
            ..AppSettingsPatch::default()
        }),
        Err(FilterError::InvalidShortcut { .. })
    ));
    assert_eq!(m.settings().unwrap(), AppSettings::default());
}

// ── Templates ─────────────────────────────────────────────────

#[test]
fn test_export_requires_custom_rules() {
    let m = manager();
    assert!(matches!(
        m.export_template(TemplateMeta::named("t")),
        Err(FilterError::NothingToExport)
    ));
}

#[test]
fn test_export_only_custom_rules_with_metadata() {
    let mut m = manager();
    m.add_filter(
        NewFilterRule::regex(r"\bACME-\d+\b", "[TICKET]")
            .in_category("Work")
            .with_origin(Origin::custom("Tickets")),
    )
    .unwrap();
    let template = m.export_template(TemplateMeta::named("Mine")).unwrap();
    assert_eq!(template.name.as_deref(), Some("Mine"));
    assert_eq!(template.description.as_deref(), Some("Custom template"));
    assert_eq!(template.author.as_deref(), Some("Anonymous"));
    assert_eq!(template.version.as_deref(), Some("1.0.0"));
    assert_eq!(template.filters.len(), 1);

    let json: serde_json::Value = serde_json::from_str(&template.to_json().unwrap()).unwrap();
    let entry = &json["filters"][0];
    assert_eq!(entry["category"], "Work");
    assert_eq!(entry["description"], "Tickets");
    assert_eq!(entry["pattern"], r"\bACME-\d+\b");
    assert_eq!(entry["replacement"], "[TICKET]");
    assert_eq!(entry["useRegex"], true);
    assert_eq!(entry["enabled"], true);
    assert!(entry.get("id").is_none());
    assert!(entry.get("descriptionKey").is_none());
}

#[test]
fn test_import_applies_defaults_and_collects_failures() {
    let raw = r#"{
        "name": "shared",
        "filters": [
            {"pattern": "secret-\\d+", "replacement": "[S]"},
            {"pattern": "(", "replacement": "x"},
            {"pattern": "plain", "replacement": "p", "useRegex": false, "enabled": false, "category": "Words"},
            {"replacement": "no pattern"},
            {"pattern": "k", "descriptionKey": "filters.apiKey", "category": "Developer"}
        ]
    }"#;
    let template = Template::parse(raw).unwrap();
    let mut m = empty_manager();
    let report = m.import_template(&template).unwrap();

    assert_eq!(report.imported, 3);
    let failed: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![1, 3]);

    let filters = m.filters().unwrap();
    assert_eq!(filters[0].category, "Custom");
    assert!(filters[0].use_regex);
    assert!(filters[0].enabled);
    assert_eq!(filters[1].category, "Words");
    assert!(!filters[1].use_regex);
    assert!(!filters[1].enabled);
    assert!(filters[2].is_builtin());
}

#[test]
fn test_import_skips_entries_with_the_wrong_shape() {
    let raw = r#"{"filters": [
        {"pattern": 5, "replacement": "x"},
        {"pattern": "ok", "replacement": "y", "useRegex": false},
        {"pattern": "n", "replacement": null},
        "not an object"
    ]}"#;
    let template = Template::parse(raw).unwrap();
    let mut m = empty_manager();
    let report = m.import_template(&template).unwrap();

    assert_eq!(report.imported, 1);
    let failed: Vec<(usize, &str)> = report
        .failures
        .iter()
        .map(|f| (f.index, f.pattern.as_str()))
        .collect();
    assert_eq!(failed, vec![(0, "5"), (2, "n"), (3, "")]);
    assert!(report.failures[0].reason.contains("invalid type"));

    let filters = m.filters().unwrap();
    assert_eq!(filters.len(), 1);
    assert_eq!(filters[0].pattern, "ok");
    assert_eq!(filters[0].replacement, "y");
}

#[test]
fn test_template_requires_filters_array() {
    assert!(matches!(
        Template::parse(r#"{"name": "x"}"#),
        Err(FilterError::InvalidTemplate(_))
    ));
    assert!(matches!(
        Template::parse(r#"{"filters": {}}"#),
        Err(FilterError::InvalidTemplate(_))
    ));
    assert!(matches!(Template::parse("not json"), Err(FilterError::Json(_))));
}

#[test]
fn test_export_import_through_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(template_file_name("My rules!"));
    assert!(path.ends_with("My_rules_.json"));

    let mut source = empty_manager();
    source
        .add_filter(NewFilterRule::literal("foo", "bar").in_category("Mine"))
        .unwrap();
    source
        .write_template(
            TemplateMeta {
                name: "My rules!".into(),
                description: Some("things".into()),
                author: Some("me".into()),
            },
            &path,
        )
        .unwrap();

    let template = Template::read(&path).unwrap();
    assert_eq!(template.author.as_deref(), Some("me"));
    let mut target = empty_manager();
    let report = target.import_template(&template).unwrap();
    assert_eq!(report.imported, 1);
    let imported = &target.filters().unwrap()[0];
    assert_eq!(imported.pattern, "foo");
    assert_eq!(imported.category, "Mine");
    assert!(!imported.use_regex);
}

#[test]
fn test_blank_template_name_gets_dated_file() {
    let name = template_file_name("  ");
    assert!(name.starts_with("clipfilter-template-"));
    assert!(name.ends_with(".json"));
}
