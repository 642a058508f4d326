//! Hardware-accelerated shader effects: procedural fire and water ripple.
//!
//! Each invocation owns its canvas, GPU state and loop. Initialization is
//! async; when no adapter or device is available the effect degrades to a
//! canvas-noise (fire) or CSS-animation (ripple) approximation instead of
//! silently doing nothing. The disposer drops the GPU state before the
//! canvas is detached so repeated invocations never leak contexts.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use web_sys as web;

use fx_core::config::ConfigValue;
use fx_core::procedural::noise::ValueNoise;
use fx_core::surface::{Rgba, Surface};
use fx_core::{FIRE_WGSL, RIPPLE_WGSL};

use crate::canvas_surface::CanvasSurface;
use crate::disposer::{Disposable, DisposableNodeExt};
use crate::dom;
use crate::orchestrator::{EffectCtx, Handler};

use super::{cleanup_deadline_ms, effect_root, schedule_forced_cleanup, EffectLoop};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct FxUniforms {
    resolution: [f32; 2],
    time: f32,
    intensity: f32,
    origin: [f32; 2],
    _pad: [f32; 2],
}

struct GpuFx {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    width: u32,
    height: u32,
    time: f32,
    intensity: f32,
    origin: [f32; 2],
}

impl GpuFx {
    async fn new(
        canvas: &web::HtmlCanvasElement,
        wgsl: &str,
        fs_entry: &str,
        intensity: f32,
        origin: [f32; 2],
    ) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| anyhow::anyhow!("create_surface: {e:?}"))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("no GPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!("request_device: {e:?}"))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .unwrap_or(caps.formats[0]);
        // the overlay must stay transparent where the shader writes no
        // color
        let alpha_mode = if caps
            .alpha_modes
            .contains(&wgpu::CompositeAlphaMode::PreMultiplied)
        {
            wgpu::CompositeAlphaMode::PreMultiplied
        } else {
            caps.alpha_modes[0]
        };
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("fx_shader"),
            source: wgpu::ShaderSource::Wgsl(wgsl.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("fx_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("fx_pl"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("fx_pipeline"),
            layout: Some(&pl),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(fs_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("fx_uniforms"),
            size: std::mem::size_of::<FxUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("fx_bg"),
            layout: &bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_buffer,
            bind_group,
            width,
            height,
            time: 0.0,
            intensity,
            origin,
        })
    }

    fn resize_if_needed(&mut self, width: u32, height: u32) {
        let (width, height) = (width.max(1), height.max(1));
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
    }

    fn render(&mut self, dt: f32) -> anyhow::Result<()> {
        self.time += dt;
        let uniforms = FxUniforms {
            resolution: [self.width as f32, self.height as f32],
            time: self.time,
            intensity: self.intensity,
            origin: self.origin,
            _pad: [0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));

        let frame = self
            .surface
            .get_current_texture()
            .map_err(|e| anyhow::anyhow!("surface texture: {e:?}"))?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("fx_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.draw(0..3, 0..1);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}

enum ShaderKind {
    Fire,
    Ripple,
}

pub fn fire_handler() -> Handler {
    Box::new(|ctx, cfg| shader_effect(ctx, cfg, ShaderKind::Fire))
}

pub fn ripple_handler() -> Handler {
    Box::new(|ctx, cfg| shader_effect(ctx, cfg, ShaderKind::Ripple))
}

fn shader_effect(ctx: &EffectCtx, cfg: &ConfigValue, kind: ShaderKind) -> anyhow::Result<()> {
    let document = ctx
        .document()
        .ok_or_else(|| anyhow::anyhow!("document unavailable"))?;
    let (w, h) = ctx.stage_size();
    let intensity = cfg.number_clamped("intensity", 1.0, 0.1, 3.0) as f32;
    let origin = [
        cfg.number_clamped("originXFrac", 0.5, 0.0, 1.0) as f32,
        cfg.number_clamped("originYFrac", 0.5, 0.0, 1.0) as f32,
    ];
    let (wgsl, fs_entry) = match kind {
        ShaderKind::Fire => (FIRE_WGSL, "fs_fire"),
        ShaderKind::Ripple => (RIPPLE_WGSL, "fs_ripple"),
    };

    let root = effect_root(ctx, "position:absolute;inset:0;")?;
    let canvas = dom::create_canvas(&document, "position:absolute;inset:0;width:100%;height:100%;")
        .ok_or_else(|| anyhow::anyhow!("failed to create canvas"))?;
    root.append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("append failed: {e:?}"))?;
    canvas.set_width((w as u32).max(1));
    canvas.set_height((h as u32).max(1));

    let disposed = Rc::new(Cell::new(false));
    let loop_slot: Rc<RefCell<Option<EffectLoop>>> = Rc::new(RefCell::new(None));
    let gpu_slot: Rc<RefCell<Option<GpuFx>>> = Rc::new(RefCell::new(None));

    {
        let disposed = disposed.clone();
        let loop_slot = loop_slot.clone();
        let gpu_slot = gpu_slot.clone();
        let canvas = canvas.clone();
        let root = root.clone();
        let document = document.clone();
        let duration_ms =
            ctx.scale_duration_ms(cfg.number_clamped("durationMs", 5000.0, 100.0, 600_000.0));
        let seed = ctx.fork_rng().range(0.0, 1.0e9) as u64;
        spawn_local(async move {
            if disposed.get() {
                return;
            }
            match GpuFx::new(&canvas, wgsl, fs_entry, intensity, origin).await {
                Ok(gpu) => {
                    if disposed.get() {
                        // raced with teardown: release before anything is
                        // retained
                        drop(gpu);
                        return;
                    }
                    *gpu_slot.borrow_mut() = Some(gpu);
                    let gpu_tick = gpu_slot.clone();
                    let canvas_tick = canvas.clone();
                    let fx_loop = EffectLoop::start(move |dt| {
                        let mut slot = gpu_tick.borrow_mut();
                        let Some(gpu) = slot.as_mut() else {
                            return false;
                        };
                        gpu.resize_if_needed(canvas_tick.width(), canvas_tick.height());
                        if let Err(e) = gpu.render(dt) {
                            log::error!("[fx] shader render error: {e:?}");
                            return false;
                        }
                        true
                    });
                    *loop_slot.borrow_mut() = Some(fx_loop);
                }
                Err(e) => {
                    log::warn!("[fx] GPU unavailable ({e}); using fallback");
                    if disposed.get() {
                        return;
                    }
                    match kind {
                        ShaderKind::Fire => {
                            if let Some(fx_loop) =
                                start_fire_fallback(&canvas, w, h, intensity, seed)
                            {
                                *loop_slot.borrow_mut() = Some(fx_loop);
                            }
                        }
                        ShaderKind::Ripple => {
                            install_ripple_fallback(
                                &document, &root, w, h, origin, duration_ms,
                            );
                        }
                    }
                }
            }
        });
    }

    let root_node = root.clone();
    let disposable = Disposable::new(move || {
        disposed.set(true);
        if let Some(fx_loop) = loop_slot.borrow_mut().take() {
            fx_loop.cancel();
        }
        // GPU handles go first, then the DOM subtree
        gpu_slot.borrow_mut().take();
        root_node.remove();
    });
    disposable.attach_to_node(&root);
    schedule_forced_cleanup(&disposable, cleanup_deadline_ms(ctx, cfg));
    ctx.track(disposable);
    Ok(())
}

/// Canvas approximation of the fire shader: coarse fbm grid, bottom-up
/// heat ramp.
fn start_fire_fallback(
    canvas: &web::HtmlCanvasElement,
    w: f32,
    h: f32,
    intensity: f32,
    seed: u64,
) -> Option<EffectLoop> {
    let mut surface = CanvasSurface::from_canvas(canvas)?;
    let noise = ValueNoise::new(seed);
    let mut t = 0.0f32;
    const COLS: usize = 48;
    const ROWS: usize = 27;
    Some(EffectLoop::start(move |dt| {
        t += dt;
        surface.clear(w, h);
        let cw = w / COLS as f32;
        let ch = h / ROWS as f32;
        for row in 0..ROWS {
            let y_frac = row as f32 / ROWS as f32;
            let ramp = (y_frac).powf(1.6);
            if ramp < 0.05 {
                continue;
            }
            for col in 0..COLS {
                let n = noise.fbm(col as f32 * 0.35, row as f32 * 0.3 + t * 2.2, 4);
                let heat = (n * ramp * (1.1 + intensity)).clamp(0.0, 1.0);
                if heat < 0.22 {
                    continue;
                }
                let g = (0x40 as f32 + 0x90 as f32 * heat) as u8;
                surface.set_global_alpha(heat * 0.85);
                surface.set_fill_color(Rgba::opaque(0xff, g, 0x18));
                surface.fill_rect(col as f32 * cw, row as f32 * ch, cw + 0.5, ch + 0.5);
            }
        }
        true
    }))
}

/// CSS approximation of the ripple shader: expanding rings at the origin.
fn install_ripple_fallback(
    document: &web::Document,
    root: &web::HtmlElement,
    w: f32,
    h: f32,
    origin: [f32; 2],
    duration_ms: f64,
) {
    dom::ensure_style(
        document,
        "fx-kf-ripple",
        "@keyframes fx-ripple{from{transform:translate(-50%,-50%) scale(.08);opacity:.8}\
         to{transform:translate(-50%,-50%) scale(1);opacity:0}}",
    );
    let cx = origin[0] * w;
    let cy = origin[1] * h;
    let diameter = w.min(h) * 0.9;
    for i in 0..3 {
        let delay = i as f64 * duration_ms * 0.18;
        let ring_ms = duration_ms * 0.7;
        if let Some(ring) = dom::create_div(
            document,
            &format!(
                "position:absolute;left:{cx}px;top:{cy}px;width:{diameter}px;height:{diameter}px;\
                 border:2px solid rgba(158,204,242,.8);border-radius:50%;opacity:0;\
                 transform:translate(-50%,-50%) scale(.08);\
                 animation:fx-ripple {ring_ms}ms ease-out {delay}ms forwards;"
            ),
        ) {
            _ = root.append_child(&ring);
        }
    }
}
