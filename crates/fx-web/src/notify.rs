//! Engine notifications.
//!
//! The process-wide bus lives outside this crate; the engine only emits
//! through an injectable sink so the host can bridge events wherever it
//! wants. The default sink just logs.

#[derive(Clone, Debug)]
pub enum EngineEvent {
    OverlayReady {
        root: web_sys::HtmlElement,
        canvas: web_sys::HtmlCanvasElement,
        css_layer: web_sys::HtmlElement,
    },
    OverlayRemoved,
    CanvasResized { width: f32, height: f32 },
    ParticlesAdded { count: usize, total: usize },
    ParticlesCleared { remaining: usize },
    EffectStarted { name: String },
}

/// Events may be emitted while engine internals are borrowed; sinks must
/// forward asynchronously rather than call back into the engine.
pub trait NotificationSink {
    fn notify(&self, event: &EngineEvent);
}

/// Default sink: structured debug logging, no external coupling.
pub struct LogSink;

impl NotificationSink for LogSink {
    fn notify(&self, event: &EngineEvent) {
        match event {
            EngineEvent::OverlayReady { .. } => log::debug!("[fx] overlay ready"),
            EngineEvent::OverlayRemoved => log::debug!("[fx] overlay removed"),
            EngineEvent::CanvasResized { width, height } => {
                log::debug!("[fx] canvas resized to {width}x{height}");
            }
            EngineEvent::ParticlesAdded { count, total } => {
                log::debug!("[fx] +{count} particles (pool {total})");
            }
            EngineEvent::ParticlesCleared { remaining } => {
                log::debug!("[fx] particles cleared (pool {remaining})");
            }
            EngineEvent::EffectStarted { name } => log::debug!("[fx] effect {name}"),
        }
    }
}
