#![allow(clippy::unwrap_used)]

use super::*;
use crate::locale::Locale;

fn stored(new: NewFilterRule) -> FilterRule {
    FilterRule::from_new("id-1".into(), new)
}

// ── Origin ────────────────────────────────────────────────────

#[test]
fn test_origin_from_columns() {
    assert_eq!(
        Origin::from_columns(Some("filters.email".into()), Some("ignored".into())),
        Origin::builtin("filters.email")
    );
    assert_eq!(
        Origin::from_columns(None, Some("mine".into())),
        Origin::custom("mine")
    );
    assert_eq!(Origin::from_columns(None, None), Origin::unlabeled());
    // An empty key does not make a built-in
    assert_eq!(
        Origin::from_columns(Some(String::new()), None),
        Origin::unlabeled()
    );
}

#[test]
fn test_origin_accessors() {
    let builtin = Origin::builtin("filters.jwt");
    assert!(builtin.is_builtin());
    assert_eq!(builtin.description_key(), Some("filters.jwt"));
    assert_eq!(builtin.description(), None);

    let custom = Origin::custom("tokens");
    assert!(!custom.is_builtin());
    assert_eq!(custom.description_key(), None);
    assert_eq!(custom.description(), Some("tokens"));
}

// ── FilterRule ────────────────────────────────────────────────

#[test]
fn test_new_rule_defaults() {
    let rule = NewFilterRule::literal("a", "b");
    assert!(!rule.use_regex);
    assert!(rule.enabled);
    assert_eq!(rule.category, DEFAULT_CATEGORY);
    assert_eq!(rule.folder, None);
    assert!(NewFilterRule::regex("a", "b").use_regex);
}

#[test]
fn test_to_new_round_trip() {
    let new = NewFilterRule::regex("x+", "y")
        .in_category("Dev")
        .in_folder("f1")
        .with_origin(Origin::custom("label"))
        .disabled();
    let rule = stored(new.clone());
    assert_eq!(rule.to_new(), new);
}

#[test]
fn test_display_name() {
    let locale = Locale::load("en");
    let builtin = stored(NewFilterRule::regex("x", "y").with_origin(Origin::builtin("filters.email")));
    assert_eq!(builtin.display_name(&locale), "Email addresses");

    let labeled = stored(NewFilterRule::literal("x", "y").with_origin(Origin::custom("Mine")));
    assert_eq!(labeled.display_name(&locale), "Mine");

    let blank = stored(NewFilterRule::literal("pattern", "y").with_origin(Origin::custom("  ")));
    assert_eq!(blank.display_name(&locale), "pattern");

    let unlabeled = stored(NewFilterRule::literal("raw", "y"));
    assert_eq!(unlabeled.display_name(&locale), "raw");
}

#[test]
fn test_rule_json_shape() {
    let builtin = stored(
        NewFilterRule::regex(r"\d", "#")
            .in_category("Finance")
            .with_origin(Origin::builtin("filters.iban")),
    );
    let json = serde_json::to_value(&builtin).unwrap();
    assert_eq!(json["id"], "id-1");
    assert_eq!(json["descriptionKey"], "filters.iban");
    assert_eq!(json["useRegex"], true);
    assert!(json.get("description").is_none());
    assert!(json.get("folder").is_none());

    let custom = stored(NewFilterRule::literal("a", "b").with_origin(Origin::custom("c")));
    let json = serde_json::to_value(&custom).unwrap();
    assert_eq!(json["description"], "c");
    assert!(json.get("descriptionKey").is_none());
}

// ── Patches ───────────────────────────────────────────────────

#[test]
fn test_patch_only_overrides_set_fields() {
    let mut rule = stored(NewFilterRule::literal("a", "b").in_folder("f1"));
    let original = rule.clone();
    FilterRulePatch::default().apply_to(&mut rule);
    assert_eq!(rule, original);

    let patch = FilterRulePatch {
        pattern: Some("z".into()),
        use_regex: Some(true),
        ..FilterRulePatch::default()
    };
    patch.apply_to(&mut rule);
    assert_eq!(rule.pattern, "z");
    assert!(rule.use_regex);
    assert_eq!(rule.replacement, "b");
    assert_eq!(rule.folder.as_deref(), Some("f1"));
    assert_eq!(rule.id, original.id);
}

#[test]
fn test_patch_clears_nullable_fields() {
    let mut rule = stored(NewFilterRule::literal("a", "b").in_folder("f1"));
    rule.subcategory = Some("sub".into());
    let patch = FilterRulePatch {
        subcategory: Some(None),
        ..FilterRulePatch::folder(None)
    };
    patch.apply_to(&mut rule);
    assert_eq!(rule.folder, None);
    assert_eq!(rule.subcategory, None);
}

#[test]
fn test_patch_description_skips_builtins() {
    let mut builtin = stored(NewFilterRule::regex("x", "y").with_origin(Origin::builtin("filters.jwt")));
    let patch = FilterRulePatch {
        description: Some(Some("renamed".into())),
        ..FilterRulePatch::default()
    };
    patch.apply_to(&mut builtin);
    assert_eq!(builtin.origin, Origin::builtin("filters.jwt"));

    let mut custom = stored(NewFilterRule::literal("x", "y"));
    patch.apply_to(&mut custom);
    assert_eq!(custom.origin, Origin::custom("renamed"));
}

#[test]
fn test_patch_is_empty() {
    assert!(FilterRulePatch::default().is_empty());
    assert!(!FilterRulePatch::enabled(true).is_empty());
}

// ── Folders ───────────────────────────────────────────────────

#[test]
fn test_folder_icon_fallback() {
    let mut folder = CustomFolder {
        id: "f".into(),
        name: "Work".into(),
        icon: None,
        expanded: true,
    };
    assert_eq!(folder.icon(), "📁");
    assert_eq!(folder.to_string(), "📁 Work");
    folder.icon = Some(String::new());
    assert_eq!(folder.icon(), "📁");
    folder.icon = Some("💼".into());
    assert_eq!(folder.to_string(), "💼 Work");
}

#[test]
fn test_find_folder_by_name() {
    let folders = vec![
        CustomFolder {
            id: "1".into(),
            name: "Work".into(),
            icon: None,
            expanded: true,
        },
        CustomFolder {
            id: "2".into(),
            name: "Home".into(),
            icon: None,
            expanded: true,
        },
    ];
    assert_eq!(CustomFolder::find_by_name(&folders, "home").unwrap().id, "2");
    assert!(CustomFolder::find_by_name(&folders, "Garage").is_none());
}

#[test]
fn test_folder_patch() {
    let mut folder = CustomFolder {
        id: "1".into(),
        name: "Work".into(),
        icon: Some("💼".into()),
        expanded: true,
    };
    CustomFolderPatch {
        icon: Some(None),
        expanded: Some(false),
        ..CustomFolderPatch::default()
    }
    .apply_to(&mut folder);
    assert_eq!(folder.name, "Work");
    assert_eq!(folder.icon, None);
    assert!(!folder.expanded);
}

// ── Settings ──────────────────────────────────────────────────

#[test]
fn test_settings_defaults() {
    let s = AppSettings::default();
    assert_eq!(s.language, "en");
    assert!(!s.auto_start);
    assert!(s.notifications);
    assert_eq!(s.theme, Theme::Auto);
    assert_eq!(s.shortcut_paste, DEFAULT_SHORTCUT);
}

#[test]
fn test_settings_patch_merges() {
    let mut s = AppSettings::default();
    AppSettingsPatch {
        auto_start: Some(true),
        theme: Some(Theme::Light),
        ..AppSettingsPatch::default()
    }
    .apply_to(&mut s);
    assert!(s.auto_start);
    assert_eq!(s.theme, Theme::Light);
    assert_eq!(s.language, "en");
    assert!(s.notifications);
}

#[test]
fn test_theme_parse() {
    assert_eq!(Theme::parse("Dark"), Some(Theme::Dark));
    assert_eq!(Theme::parse(" light "), Some(Theme::Light));
    assert_eq!(Theme::parse("neon"), None);
    for theme in Theme::all() {
        assert_eq!(Theme::parse(theme.as_str()), Some(*theme));
    }
}

#[test]
fn test_settings_json_shape() {
    let json = serde_json::to_value(AppSettings::default()).unwrap();
    assert_eq!(json["autoStart"], false);
    assert_eq!(json["theme"], "auto");
    assert_eq!(json["shortcutPaste"], "CommandOrControl+Shift+V");
}
