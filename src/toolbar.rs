// toolbar.rs — egui overlay: menu bar, panorama toolbar and status bar

use crate::app::CameraView;
use crate::catalog;
use crate::i18n::{self, tr, tr_with};
use crate::panorama::PanoramaMetadata;

/// View-state changes requested from the toolbar.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolbarAction {
    Select(String),
    SetZoom(f32),
    SetVrMode(bool),
    Retry,
}

/// Window-level requests from the menu bar.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuAction {
    OpenImage,
    Exit,
    ResetView,
    ToggleFullscreen,
    SetLanguage(String),
}

pub struct UiView<'a> {
    pub panoramas: &'a [PanoramaMetadata],
    pub selected_id: Option<&'a str>,
    pub zoom: f32,
    pub is_vr_mode: bool,
    pub is_loading: bool,
    pub error: Option<&'a str>,
    pub camera: CameraView,
    pub fps: f32,
    pub is_fullscreen: bool,
}

#[derive(Debug, Default)]
pub struct UiFlags {
    pub show_fps: bool,
}

#[derive(Debug, Default)]
pub struct UiOutput {
    pub toolbar: Vec<ToolbarAction>,
    pub menu: Vec<MenuAction>,
    /// Toolbar widget rects of the last frame, keyed by widget name.
    #[cfg(test)]
    pub(crate) rects: std::collections::HashMap<String, egui::Rect>,
}

#[cfg(test)]
fn mark(out: &mut UiOutput, name: &str, rect: egui::Rect) {
    out.rects.insert(name.to_string(), rect);
}

#[cfg(not(test))]
fn mark(_: &mut UiOutput, _: &str, _: egui::Rect) {}

pub fn selector_label(panoramas: &[PanoramaMetadata], selected_id: Option<&str>) -> String {
    selected_id
        .and_then(|id| panoramas.iter().find(|p| p.id == id))
        .map(|p| p.title.clone())
        .unwrap_or_else(|| tr("toolbar.select_placeholder"))
}

pub fn zoom_label(zoom: f32) -> String {
    tr_with("toolbar.zoom_label", &[("zoom", format!("{zoom:.1}"))])
}

pub fn vr_label(is_vr_mode: bool) -> String {
    if is_vr_mode {
        tr("toolbar.vr_on")
    } else {
        tr("toolbar.vr_off")
    }
}

pub fn draw_ui(ctx: &egui::Context, view: &UiView<'_>, flags: &mut UiFlags) -> UiOutput {
    let mut out = UiOutput::default();
    draw_menu_bar(ctx, view, flags, &mut out.menu);
    draw_toolbar(ctx, view, &mut out);
    draw_status_bar(ctx, view, flags);

    if view.panoramas.is_empty() {
        egui::Area::new(egui::Id::new("no_panoramas"))
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.heading(tr("status.no_panoramas"));
            });
    }
    out
}

fn draw_menu_bar(
    ctx: &egui::Context,
    view: &UiView<'_>,
    flags: &mut UiFlags,
    actions: &mut Vec<MenuAction>,
) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button(tr("menu.file"), |ui| {
                if ui.button(tr("menu.open_image")).clicked() {
                    actions.push(MenuAction::OpenImage);
                    ui.close_menu();
                }
                if ui.button(tr("menu.exit")).clicked() {
                    actions.push(MenuAction::Exit);
                }
            });

            ui.menu_button(tr("menu.view"), |ui| {
                if ui.button(tr("view.reset")).clicked() {
                    actions.push(MenuAction::ResetView);
                    ui.close_menu();
                }
                let fullscreen = if view.is_fullscreen {
                    tr("view.fullscreen.exit")
                } else {
                    tr("view.fullscreen.enter")
                };
                if ui.button(fullscreen).clicked() {
                    actions.push(MenuAction::ToggleFullscreen);
                    ui.close_menu();
                }
                ui.separator();
                if ui.checkbox(&mut flags.show_fps, tr("view.show_fps")).clicked() {
                    ui.close_menu();
                }
            });

            ui.menu_button(tr("menu.language"), |ui| {
                let mut current = i18n::current_lang();
                for (code, name) in i18n::LANGUAGES {
                    if ui.radio_value(&mut current, code.to_string(), name).clicked() {
                        actions.push(MenuAction::SetLanguage(code.to_string()));
                        ui.close_menu();
                    }
                }
            });
        });
    });
}

fn draw_toolbar(ctx: &egui::Context, view: &UiView<'_>, out: &mut UiOutput) {
    let enabled = !view.is_loading;

    egui::TopBottomPanel::top("panorama_toolbar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.add_enabled_ui(enabled, |ui| {
                let selector = egui::ComboBox::from_id_source("panorama_selector")
                    .selected_text(selector_label(view.panoramas, view.selected_id))
                    .show_ui(ui, |ui| {
                        for p in view.panoramas {
                            let active = view.selected_id == Some(p.id.as_str());
                            let option = ui
                                .selectable_label(active, p.title.as_str())
                                .on_hover_text(p.description.as_str());
                            mark(out, &p.id, option.rect);
                            if option.clicked() {
                                out.toolbar.push(ToolbarAction::Select(p.id.clone()));
                            }
                        }
                    })
                    .response
                    .on_hover_text(tr("toolbar.select_hint"));
                mark(out, "selector", selector.rect);
            });

            ui.separator();
            ui.label(zoom_label(view.zoom));
            let mut zoom = view.zoom;
            let slider = egui::Slider::new(&mut zoom, catalog::MIN_ZOOM..=catalog::MAX_ZOOM)
                .step_by(0.1)
                .show_value(false);
            let slider = ui
                .add_enabled(enabled, slider)
                .on_hover_text(tr("toolbar.zoom_hint"));
            mark(out, "zoom", slider.rect);
            if slider.changed() {
                out.toolbar.push(ToolbarAction::SetZoom(zoom));
            }

            ui.separator();
            let vr = egui::SelectableLabel::new(view.is_vr_mode, vr_label(view.is_vr_mode));
            let vr = ui
                .add_enabled(enabled, vr)
                .on_hover_text(tr("toolbar.vr_tooltip"));
            mark(out, "vr", vr.rect);
            if vr.clicked() {
                out.toolbar.push(ToolbarAction::SetVrMode(!view.is_vr_mode));
            }
        });

        if view.is_loading {
            ui.label(egui::RichText::new(tr("status.loading")).color(egui::Color32::YELLOW));
        }
        if let Some(error) = view.error {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(error).color(egui::Color32::LIGHT_RED));
                let retry = ui.button(tr("toolbar.retry"));
                mark(out, "retry", retry.rect);
                if retry.clicked() {
                    out.toolbar.push(ToolbarAction::Retry);
                }
            });
        }
    });
}

fn draw_status_bar(ctx: &egui::Context, view: &UiView<'_>, flags: &UiFlags) {
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("Yaw: {:.1}°", view.camera.yaw));
            ui.label("|");
            ui.label(format!("Pitch: {:.1}°", view.camera.pitch));
            ui.label("|");
            ui.label(format!("FOV: {:.1}°", view.camera.fov));
            if view.camera.stereo {
                ui.label("|");
                ui.label("VR");
            }
            if flags.show_fps {
                ui.label("|");
                ui.label(
                    egui::RichText::new(format!("FPS: {:.1}", view.fps))
                        .color(egui::Color32::GREEN),
                );
            }
        });
    });
}
