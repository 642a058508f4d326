#![cfg(target_arch = "wasm32")]
//! Browser overlay effects engine.
//!
//! An explicit engine context ([`FxEngine`]) owns the surface manager, the
//! shared particle pool and the orchestrator; construct as many instances
//! as you need (they do not share state). [`OverlayFx`] is the
//! wasm-bindgen facade for JS hosts.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use wasm_bindgen::prelude::*;

use fx_core::config::{ConfigValue, Motion};
use fx_core::particles::{Particle, ParticleSystem};

mod canvas_surface;
mod constants;
mod disposer;
mod dom;
mod effects;
mod notify;
mod orchestrator;
mod surface_manager;

pub use canvas_surface::CanvasSurface;
pub use disposer::{Disposable, DisposableNodeExt};
pub use notify::{EngineEvent, LogSink, NotificationSink};
pub use orchestrator::{EffectCtx, EffectOrchestrator, Handler};
pub use surface_manager::{SurfaceManager, ThemeCallback};

#[derive(Clone, Copy, Debug)]
pub struct EngineOptions {
    /// Externally-sourced accessibility preference; scales particle counts
    /// and durations.
    pub reduced_motion: bool,
    /// Cap on the effective device pixel ratio.
    pub max_device_pixel_ratio: f64,
    pub seed: u64,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            max_device_pixel_ratio: constants::DEFAULT_MAX_DPR,
            seed: js_sys::Date::now() as u64,
        }
    }
}

pub struct FxEngine {
    manager: Rc<RefCell<SurfaceManager>>,
    particles: Rc<RefCell<ParticleSystem>>,
    orchestrator: RefCell<EffectOrchestrator>,
}

impl FxEngine {
    pub fn new(options: EngineOptions, notifier: Rc<dyn NotificationSink>) -> Self {
        let particles = Rc::new(RefCell::new(ParticleSystem::new()));
        let manager = Rc::new(RefCell::new(SurfaceManager::new(
            options.max_device_pixel_ratio,
            particles.clone(),
            notifier.clone(),
        )));
        let orchestrator = RefCell::new(EffectOrchestrator::new(
            manager.clone(),
            particles.clone(),
            Motion {
                reduced: options.reduced_motion,
            },
            notifier,
            options.seed,
        ));
        Self {
            manager,
            particles,
            orchestrator,
        }
    }

    pub fn ensure_overlay(&self) -> bool {
        surface_manager::ensure_overlay(&self.manager)
    }

    /// Tear down every active effect, then the overlay itself.
    pub fn remove_overlay(&self) {
        self.orchestrator.borrow_mut().dispose_all();
        surface_manager::remove_overlay(&self.manager);
    }

    pub fn play(&self, name: &str, overrides: Option<&ConfigValue>) -> bool {
        self.orchestrator.borrow_mut().play(name, overrides)
    }

    pub fn has_effect(&self, name: &str) -> bool {
        self.orchestrator.borrow().has_effect(name)
    }

    pub fn effects_list(&self) -> Vec<&'static str> {
        self.orchestrator.borrow().effects_list()
    }

    pub fn active_effect(&self) -> Option<String> {
        self.orchestrator.borrow().active_effect().map(String::from)
    }

    pub fn dispose_all(&self) {
        self.orchestrator.borrow_mut().dispose_all();
    }

    /// Append particles directly (host-driven emission, themes).
    pub fn add_particles(&self, batch: Vec<Box<dyn Particle>>) {
        if batch.is_empty() {
            return;
        }
        self.particles.borrow_mut().add_particles(batch);
        surface_manager::request_frame(&self.manager);
    }

    /// Install or clear the per-frame theme callback.
    pub fn set_theme(&self, theme: Option<ThemeCallback>) {
        self.manager.borrow_mut().set_theme(theme);
        surface_manager::request_frame(&self.manager);
    }

    /// Boundary for the external config service.
    pub fn set_stored_config(&self, name: &str, cfg: ConfigValue) {
        self.orchestrator.borrow_mut().set_stored_config(name, cfg);
    }
}

/// Convert a plain JS value (object/array/number/string/bool) into the
/// engine's config tree. Unsupported shapes are dropped silently; numeric
/// sanitization happens at the accessor layer.
fn config_from_js(value: &JsValue) -> Option<ConfigValue> {
    if let Some(n) = value.as_f64() {
        return Some(ConfigValue::Number(n));
    }
    if let Some(b) = value.as_bool() {
        return Some(ConfigValue::Bool(b));
    }
    if let Some(s) = value.as_string() {
        return Some(ConfigValue::Str(s));
    }
    if js_sys::Array::is_array(value) {
        let arr = js_sys::Array::from(value);
        let items = arr.iter().filter_map(|v| config_from_js(&v)).collect();
        return Some(ConfigValue::List(items));
    }
    if value.is_object() {
        let mut map = fnv::FnvHashMap::default();
        let obj: js_sys::Object = value.clone().unchecked_into();
        let entries = js_sys::Object::entries(&obj);
        for entry in entries.iter() {
            let pair = js_sys::Array::from(&entry);
            let Some(key) = pair.get(0).as_string() else {
                continue;
            };
            if let Some(v) = config_from_js(&pair.get(1)) {
                map.insert(key, v);
            }
        }
        return Some(ConfigValue::Map(map));
    }
    None
}

static LOGGING: AtomicBool = AtomicBool::new(false);

fn init_logging() {
    if !LOGGING.swap(true, Ordering::SeqCst) {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
    }
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    init_logging();
    log::info!("fx-web loaded");
    Ok(())
}

/// JS-facing engine handle.
#[wasm_bindgen]
pub struct OverlayFx {
    engine: FxEngine,
}

#[wasm_bindgen]
impl OverlayFx {
    #[wasm_bindgen(constructor)]
    pub fn new(reduced_motion: bool, max_device_pixel_ratio: f64) -> OverlayFx {
        init_logging();
        let options = EngineOptions {
            reduced_motion,
            max_device_pixel_ratio,
            ..EngineOptions::default()
        };
        OverlayFx {
            engine: FxEngine::new(options, Rc::new(LogSink)),
        }
    }

    #[wasm_bindgen(js_name = ensureOverlay)]
    pub fn ensure_overlay(&self) -> bool {
        self.engine.ensure_overlay()
    }

    #[wasm_bindgen(js_name = removeOverlay)]
    pub fn remove_overlay(&self) {
        self.engine.remove_overlay()
    }

    /// `play(name, overrides?)` — overrides is a plain object.
    pub fn play(&self, name: &str, overrides: JsValue) -> bool {
        let cfg = if overrides.is_undefined() || overrides.is_null() {
            None
        } else {
            config_from_js(&overrides)
        };
        self.engine.play(name, cfg.as_ref())
    }

    #[wasm_bindgen(js_name = hasEffect)]
    pub fn has_effect(&self, name: &str) -> bool {
        self.engine.has_effect(name)
    }

    #[wasm_bindgen(js_name = getEffectsList)]
    pub fn effects_list(&self) -> js_sys::Array {
        self.engine
            .effects_list()
            .into_iter()
            .map(JsValue::from_str)
            .collect()
    }

    #[wasm_bindgen(js_name = disposeAll)]
    pub fn dispose_all(&self) {
        self.engine.dispose_all()
    }

    #[wasm_bindgen(js_name = setStoredConfig)]
    pub fn set_stored_config(&self, name: &str, cfg: JsValue) {
        if let Some(tree) = config_from_js(&cfg) {
            self.engine.set_stored_config(name, tree);
        }
    }
}
