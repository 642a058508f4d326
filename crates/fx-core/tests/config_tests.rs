// Catalog and configuration resolution behavior.

use fx_core::catalog::{defaults_for, is_particle_effect, resolve_alias, EFFECT_NAMES};
use fx_core::config::{resolve_effect_config, ConfigValue};

#[test]
fn canonical_names_resolve_to_themselves() {
    for name in EFFECT_NAMES {
        let (canonical, implied) = resolve_alias(name).expect("canonical name must resolve");
        assert_eq!(canonical, *name);
        assert!(implied.is_none());
    }
}

#[test]
fn legacy_fade_pair_collapses_into_fade() {
    let (name, implied) = resolve_alias("fadeIn").unwrap();
    assert_eq!(name, "fade");
    assert_eq!(implied.unwrap().string("mode", ""), "in");

    let (name, implied) = resolve_alias("fadeOut").unwrap();
    assert_eq!(name, "fade");
    assert_eq!(implied.unwrap().string("mode", ""), "out");

    // one-way: the alias never appears in the public list
    assert!(!EFFECT_NAMES.contains(&"fadeIn"));
    assert!(!EFFECT_NAMES.contains(&"fadeOut"));
}

#[test]
fn unknown_names_do_not_resolve() {
    assert!(resolve_alias("definitelyNotAnEffect").is_none());
    assert!(resolve_alias("").is_none());
}

#[test]
fn every_effect_has_duration_and_cleanup_buffer() {
    for name in EFFECT_NAMES {
        let d = defaults_for(name);
        assert!(
            d.number("durationMs", -1.0) > 0.0,
            "{name} is missing durationMs"
        );
        assert_eq!(d.number("cleanupBufferMs", -1.0), 120.0, "{name}");
    }
}

#[test]
fn stored_config_sits_between_defaults_and_overrides() {
    let defaults = defaults_for("confetti");
    let stored = ConfigValue::obj(vec![
        ("count", ConfigValue::num(50.0)),
        ("sizeMin", ConfigValue::num(4.0)),
    ]);
    let overrides = ConfigValue::obj(vec![("count", ConfigValue::num(7.0))]);
    let merged = resolve_effect_config(&defaults, Some(&stored), Some(&overrides));
    assert_eq!(merged.number("count", 0.0), 7.0, "override wins");
    assert_eq!(merged.number("sizeMin", 0.0), 4.0, "stored beats default");
    assert_eq!(merged.number("durationMs", 0.0), 3000.0, "default survives");
}

#[test]
fn alias_implied_fields_merge_like_a_layer() {
    let defaults = defaults_for("fade");
    let (_, implied) = resolve_alias("fadeOut").unwrap();
    let merged = resolve_effect_config(&defaults, implied.as_ref(), None);
    assert_eq!(merged.string("mode", ""), "out");
    // caller overrides still beat the alias
    let force_in = ConfigValue::obj(vec![("mode", ConfigValue::text("in"))]);
    let merged = resolve_effect_config(&defaults, implied.as_ref(), Some(&force_in));
    assert_eq!(merged.string("mode", ""), "in");
}

#[test]
fn validation_rejects_nested_non_finite_numbers() {
    let bad = ConfigValue::obj(vec![(
        "inner",
        ConfigValue::obj(vec![("v", ConfigValue::num(f64::INFINITY))]),
    )]);
    let err = bad.validate().unwrap_err();
    assert!(err.to_string().contains("inner.v"));
}

#[test]
fn particle_effect_partition_is_consistent() {
    let particle_count = EFFECT_NAMES.iter().filter(|n| is_particle_effect(n)).count();
    assert_eq!(particle_count, 18);
    assert!(is_particle_effect("confetti"));
    assert!(!is_particle_effect("crackedGlass"));
    assert!(!is_particle_effect("fade"));
}
