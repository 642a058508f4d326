//! Effect catalog: canonical names, legacy aliases and default parameters.
//!
//! Aliases are one-way renames kept for callers that predate the current
//! naming; they resolve to a canonical name plus any fields the old name
//! implied (`fadeIn` → `fade` with `mode: "in"`).

use crate::config::ConfigValue;

/// Canonical effect names, in registry order. Aliases are excluded.
pub const EFFECT_NAMES: &[&str] = &[
    // particle batches
    "confetti",
    "sparkle",
    "glitter",
    "dust",
    "rain",
    "smoke",
    "snow",
    "snowflakes",
    "bubbles",
    "leaves",
    "eggs",
    "fire",
    "water",
    "wind",
    "embers",
    "fireworks",
    "halloween",
    "fallingStars",
    // css layer
    "fade",
    "flash",
    "shake",
    "pulse",
    "blur",
    "vignette",
    "zoom",
    // independently-looped canvas / gpu
    "crackedGlass",
    "spiderWeb",
    "matrixRain",
    "shaderFire",
    "waterRipple",
];

/// Resolve a caller-facing name to its canonical form plus any parameters
/// the legacy name implied. `None` for unknown names.
pub fn resolve_alias(name: &str) -> Option<(&'static str, Option<ConfigValue>)> {
    if let Some(canonical) = EFFECT_NAMES.iter().copied().find(|n| *n == name) {
        return Some((canonical, None));
    }
    // One-way renames. The old two-variant fade pair collapses into the
    // configurable "fade".
    let (canonical, implied) = match name {
        "fadeIn" => ("fade", Some(ConfigValue::obj(vec![("mode", ConfigValue::text("in"))]))),
        "fadeOut" => ("fade", Some(ConfigValue::obj(vec![("mode", ConfigValue::text("out"))]))),
        "snowflake" => ("snowflakes", None),
        "bubble" => ("bubbles", None),
        "leaf" => ("leaves", None),
        "spiders" => ("halloween", Some(ConfigValue::obj(vec![(
            "mode",
            ConfigValue::text("spiderDrop"),
        )]))),
        "shootingStars" => ("fallingStars", None),
        "matrix" => ("matrixRain", None),
        _ => return None,
    };
    Some((canonical, implied))
}

/// Default parameter tree for a canonical effect name.
///
/// Every effect carries `durationMs` and `cleanupBufferMs`; the rest is
/// per-effect. Unknown names get an empty tree (the orchestrator rejects
/// them before this matters).
pub fn defaults_for(name: &str) -> ConfigValue {
    use ConfigValue as V;
    let base: Vec<(&str, ConfigValue)> = match name {
        "confetti" => vec![
            ("count", V::num(120.0)),
            ("durationMs", V::num(3000.0)),
            ("sizeMin", V::num(6.0)),
            ("sizeMax", V::num(12.0)),
        ],
        "sparkle" => vec![
            ("count", V::num(40.0)),
            ("durationMs", V::num(2500.0)),
        ],
        "glitter" => vec![
            ("count", V::num(90.0)),
            ("durationMs", V::num(2800.0)),
        ],
        "dust" => vec![
            ("count", V::num(50.0)),
            ("durationMs", V::num(9000.0)),
        ],
        "rain" => vec![
            ("count", V::num(140.0)),
            ("durationMs", V::num(4000.0)),
            ("slant", V::num(0.18)),
        ],
        "smoke" => vec![
            ("count", V::num(30.0)),
            ("durationMs", V::num(5000.0)),
        ],
        "snow" => vec![
            ("count", V::num(110.0)),
            ("durationMs", V::num(8000.0)),
        ],
        "snowflakes" => vec![
            ("count", V::num(36.0)),
            ("durationMs", V::num(9000.0)),
        ],
        "bubbles" => vec![
            ("count", V::num(45.0)),
            ("durationMs", V::num(6000.0)),
        ],
        "leaves" => vec![
            ("count", V::num(40.0)),
            ("durationMs", V::num(8000.0)),
        ],
        "eggs" => vec![
            ("count", V::num(24.0)),
            ("durationMs", V::num(5000.0)),
        ],
        "fire" => vec![
            ("count", V::num(80.0)),
            ("durationMs", V::num(3500.0)),
            ("originYFrac", V::num(0.95)),
        ],
        "water" => vec![
            ("count", V::num(70.0)),
            ("durationMs", V::num(3000.0)),
        ],
        "wind" => vec![
            ("count", V::num(50.0)),
            ("durationMs", V::num(4000.0)),
            ("speed", V::num(900.0)),
        ],
        "embers" => vec![
            ("count", V::num(60.0)),
            ("durationMs", V::num(7000.0)),
        ],
        "fireworks" => vec![
            ("count", V::num(6.0)),
            ("durationMs", V::num(5000.0)),
            ("sparksPerShell", V::num(48.0)),
        ],
        "halloween" => vec![
            ("count", V::num(28.0)),
            ("durationMs", V::num(7000.0)),
            ("mode", V::text("emoji")),
        ],
        "fallingStars" => vec![
            ("count", V::num(16.0)),
            ("durationMs", V::num(6000.0)),
            ("reverse", V::Bool(false)),
            ("circularClip", V::Bool(false)),
        ],
        "fade" => vec![
            ("mode", V::text("in")),
            ("durationMs", V::num(1200.0)),
            ("color", V::text("#000000")),
        ],
        "flash" => vec![
            ("durationMs", V::num(450.0)),
            ("color", V::text("#ffffff")),
        ],
        "shake" => vec![
            ("durationMs", V::num(700.0)),
            ("magnitudePx", V::num(10.0)),
        ],
        "pulse" => vec![
            ("durationMs", V::num(1400.0)),
            ("color", V::text("#ffffff")),
        ],
        "blur" => vec![
            ("durationMs", V::num(1600.0)),
            ("radiusPx", V::num(6.0)),
        ],
        "vignette" => vec![
            ("durationMs", V::num(2400.0)),
            ("strength", V::num(0.8)),
        ],
        "zoom" => vec![
            ("durationMs", V::num(900.0)),
            ("scale", V::num(1.08)),
        ],
        "crackedGlass" => vec![
            ("countMode", V::text("auto")),
            ("count", V::num(3.0)),
            ("durationMs", V::num(4000.0)),
            ("growMs", V::num(700.0)),
            ("branchDepth", V::num(3.0)),
            ("intensity", V::num(1.0)),
            ("jaggedness", V::num(3.0)),
        ],
        "spiderWeb" => vec![
            ("durationMs", V::num(8000.0)),
            ("growMs", V::num(1500.0)),
            ("spokes", V::num(12.0)),
            ("maxRings", V::num(9.0)),
        ],
        "matrixRain" => vec![
            ("durationMs", V::num(8000.0)),
            ("cellPx", V::num(16.0)),
        ],
        "shaderFire" => vec![
            ("durationMs", V::num(6000.0)),
            ("intensity", V::num(1.0)),
        ],
        "waterRipple" => vec![
            ("durationMs", V::num(3000.0)),
            ("originXFrac", V::num(0.5)),
            ("originYFrac", V::num(0.5)),
        ],
        _ => vec![],
    };
    let mut tree = ConfigValue::obj(base);
    if let ConfigValue::Map(m) = &mut tree {
        m.entry("cleanupBufferMs".to_string())
            .or_insert(ConfigValue::Number(120.0));
    }
    tree
}

/// Effects whose handlers only append a particle batch.
pub fn is_particle_effect(name: &str) -> bool {
    matches!(
        name,
        "confetti"
            | "sparkle"
            | "glitter"
            | "dust"
            | "rain"
            | "smoke"
            | "snow"
            | "snowflakes"
            | "bubbles"
            | "leaves"
            | "eggs"
            | "fire"
            | "water"
            | "wind"
            | "embers"
            | "fireworks"
            | "halloween"
            | "fallingStars"
    )
}
