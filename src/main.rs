// main.rs — 窗口、事件循环与输入转换

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // Release 模式下隐藏控制台窗口

use panorama_explorer::app::App;
use panorama_explorer::catalog;
use panorama_explorer::config::Settings;
use panorama_explorer::controls::TouchPhase;
use panorama_explorer::error::Result;
use panorama_explorer::i18n::{self, tr, tr_with};
use panorama_explorer::panorama::PanoramaConfig;
use panorama_explorer::preload;
use panorama_explorer::renderer::Renderer;
use panorama_explorer::toolbar::{self, MenuAction, UiFlags, UiView};

use clap::Parser;
use glam::Vec2;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use winit::{
    dpi::LogicalSize,
    event::*,
    event_loop::{ControlFlow, EventLoop},
    window::{Fullscreen, Window, WindowBuilder},
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::parse();
    i18n::init(settings.lang.clone());

    let (catalog, catalog_error) = load_catalog(&settings);

    if settings.check_only {
        return check_catalog(&catalog, &settings.assets_dir);
    }

    match run(settings, catalog, catalog_error) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// 目录文件损坏时回退到内置全景图，错误信息显示在工具栏。
fn load_catalog(settings: &Settings) -> (PanoramaConfig, Option<String>) {
    let Some(path) = &settings.catalog else {
        return (catalog::default_config(), None);
    };
    match catalog::load_from_path(path) {
        Ok(config) => {
            log::info!(
                "{}",
                tr_with(
                    "log.catalog_loaded",
                    &[
                        ("path", path.display().to_string()),
                        ("count", config.panoramas.len().to_string()),
                    ]
                )
            );
            (config, None)
        }
        Err(err) => {
            let message = tr_with("error.catalog", &[("err", err.to_string())]);
            log::error!("{message}");
            (catalog::default_config(), Some(message))
        }
    }
}

fn check_catalog(catalog: &PanoramaConfig, assets_dir: &Path) -> ExitCode {
    let assets = preload::preload_many(&catalog.panoramas, assets_dir);
    let ok = assets.iter().filter(|a| a.is_loaded).count();

    for asset in &assets {
        match &asset.error {
            None => log::info!("{}", tr_with("check.ok", &[("id", asset.id.clone())])),
            Some(err) => log::error!(
                "{}",
                tr_with("check.failed", &[("id", asset.id.clone()), ("err", err.clone())])
            ),
        }
    }
    log::info!(
        "{}",
        tr_with(
            "check.summary",
            &[("ok", ok.to_string()), ("total", assets.len().to_string())]
        )
    );

    if ok == assets.len() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn pick_image() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter(&tr("file.filter.images"), &["jpg", "jpeg", "png", "bmp", "webp"])
        .pick_file()
}

fn toggle_fullscreen(window: &Window) -> bool {
    let enter = window.fullscreen().is_none();
    window.set_fullscreen(enter.then_some(Fullscreen::Borderless(None)));
    enter
}

fn run(settings: Settings, catalog: PanoramaConfig, catalog_error: Option<String>) -> Result<()> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title(tr("app.title"))
        .with_inner_size(LogicalSize::new(1280, 720))
        .build(&event_loop)?;

    let mut renderer = pollster::block_on(Renderer::new(&window))?;
    let mut app = App::new(catalog, &settings);
    if let Some(message) = catalog_error {
        app.set_error(message);
    }

    let mut cursor = Vec2::ZERO;
    let mut is_fullscreen = false;
    let mut flags = UiFlags::default();

    let mut last_frame = Instant::now();
    let mut fps_window_start = Instant::now();
    let mut frame_count = 0u32;
    let mut fps = 0.0f32;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => {
                let response = renderer.egui_state.on_event(&renderer.egui_ctx, &event);
                if response.consumed {
                    // 在工具栏上松开的拖拽也要结束
                    if let WindowEvent::MouseInput {
                        state: ElementState::Released,
                        button: MouseButton::Left,
                        ..
                    } = event
                    {
                        app.controls_mut().pointer_up();
                    }
                    return;
                }

                match event {
                    WindowEvent::CloseRequested => *control_flow = ControlFlow::Exit,

                    WindowEvent::Resized(new_size) => renderer.resize(new_size),
                    WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                        renderer.resize(*new_inner_size)
                    }

                    WindowEvent::KeyboardInput { input, .. } if input.state == ElementState::Pressed => {
                        match input.virtual_keycode {
                            Some(VirtualKeyCode::O) => {
                                if let Some(path) = pick_image() {
                                    app.open_local(&path);
                                }
                            }
                            Some(VirtualKeyCode::F11) => is_fullscreen = toggle_fullscreen(&window),
                            Some(VirtualKeyCode::V) => app.toggle_vr_mode(),
                            Some(VirtualKeyCode::R) => app.reset_view(),
                            _ => {}
                        }
                    }

                    WindowEvent::MouseInput {
                        state,
                        button: MouseButton::Left,
                        ..
                    } => match state {
                        ElementState::Pressed => app.controls_mut().pointer_down(cursor),
                        ElementState::Released => app.controls_mut().pointer_up(),
                    },

                    WindowEvent::CursorMoved { position, .. } => {
                        cursor = Vec2::new(position.x as f32, position.y as f32);
                        if let Some(change) = app.controls_mut().pointer_move(cursor) {
                            app.apply(change);
                        }
                    }

                    WindowEvent::MouseWheel { delta, .. } => {
                        let scroll = match delta {
                            MouseScrollDelta::LineDelta(_, y) => y,
                            MouseScrollDelta::PixelDelta(pos) => pos.y as f32,
                        };
                        if let Some(change) = app.controls_mut().wheel(scroll) {
                            app.apply(change);
                        }
                    }

                    WindowEvent::Touch(touch) => {
                        let phase = match touch.phase {
                            winit::event::TouchPhase::Started => TouchPhase::Started,
                            winit::event::TouchPhase::Moved => TouchPhase::Moved,
                            winit::event::TouchPhase::Ended => TouchPhase::Ended,
                            winit::event::TouchPhase::Cancelled => TouchPhase::Cancelled,
                        };
                        let pos = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                        if let Some(change) = app.controls_mut().touch(phase, touch.id, pos) {
                            app.apply(change);
                        }
                    }

                    WindowEvent::DroppedFile(path) => {
                        app.open_local(&path);
                    }

                    _ => {}
                }
            }

            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.duration_since(last_frame).as_secs_f32();
                last_frame = now;

                frame_count += 1;
                let elapsed = now.duration_since(fps_window_start).as_secs_f32();
                if elapsed >= 1.0 {
                    fps = frame_count as f32 / elapsed;
                    frame_count = 0;
                    fps_window_start = now;
                }

                if let Some(image) = app.frame(dt) {
                    renderer.load_panorama(image);
                }
                let camera = app.camera();
                renderer.update_camera(&camera);

                let mut output = toolbar::UiOutput::default();
                let view = UiView {
                    panoramas: app.panoramas(),
                    selected_id: app.store().selected_panorama_id(),
                    zoom: app.store().zoom(),
                    is_vr_mode: app.store().is_vr_mode(),
                    is_loading: app.is_loading(),
                    error: app.error(),
                    camera,
                    fps,
                    is_fullscreen,
                };
                let render_result = renderer.render_with_ui(&window, |ctx| {
                    output = toolbar::draw_ui(ctx, &view, &mut flags);
                });

                for action in output.toolbar {
                    app.handle(action);
                }
                for action in output.menu {
                    match action {
                        MenuAction::OpenImage => {
                            if let Some(path) = pick_image() {
                                app.open_local(&path);
                            }
                        }
                        MenuAction::Exit => *control_flow = ControlFlow::Exit,
                        MenuAction::ResetView => app.reset_view(),
                        MenuAction::ToggleFullscreen => is_fullscreen = toggle_fullscreen(&window),
                        MenuAction::SetLanguage(code) => {
                            i18n::init(code);
                            window.set_title(&tr("app.title"));
                        }
                    }
                }

                match render_result {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost) => renderer.resize(renderer.size),
                    Err(wgpu::SurfaceError::OutOfMemory) => *control_flow = ControlFlow::Exit,
                    Err(err) => log::warn!("render error: {err:?}"),
                }
            }

            Event::MainEventsCleared => window.request_redraw(),

            Event::LoopDestroyed => app.controls_mut().cancel(),

            _ => {}
        }
    })
}
