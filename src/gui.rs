//! Native GUI viewer using egui
//!
//! 3D view of a generated structure with an auto-rotating orbit camera.
//! Each regeneration runs to completion before the next frame is drawn,
//! so the plot only ever shows a finished event sequence.

use eframe::egui;
use std::collections::BTreeMap;
use tracing::{info, warn};

use foliage::config::Config;
use foliage::{generate_events, Color, DrawEvent, EventSummary, Vec3};

use crate::snapshot::ground_corners;

/// Highest polar angle the orbit camera may reach, in radians (80 degrees)
const MAX_PITCH: f32 = 80.0 * std::f32::consts::PI / 180.0;

/// Run the native GUI viewer
pub fn run_viewer(config: Config, seed: Option<String>) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Foliage"),
        ..Default::default()
    };

    eframe::run_native(
        "Foliage",
        options,
        Box::new(|cc| Ok(Box::new(FoliageApp::new(cc, config, seed)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {}", e))
}

struct FoliageApp {
    config: Config,
    selected_grammar: String,
    seed: String,
    iterations: i64,
    events: Vec<DrawEvent>,
    summary: EventSummary,
    last_error: Option<String>,
    // Camera state
    camera_angle_x: f32, // Pitch (up/down)
    camera_angle_y: f32, // Yaw (left/right)
    // UI state
    show_grid: bool,
    show_ground: bool,
    show_points: bool,
    show_arrows: bool,
    show_markers: bool,
    point_size: f32,
    auto_rotate: bool,
}

impl FoliageApp {
    fn new(cc: &eframe::CreationContext<'_>, config: Config, seed: Option<String>) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let selected_grammar = config
            .default_grammar()
            .map(|g| g.id.clone())
            .unwrap_or_default();
        let seed = seed.unwrap_or_else(|| config.generation.seed.clone());
        let iterations = config.generation.iterations;

        let mut app = Self {
            config,
            selected_grammar,
            seed,
            iterations,
            events: Vec::new(),
            summary: EventSummary::default(),
            last_error: None,
            camera_angle_x: 0.3,
            camera_angle_y: 0.0,
            show_grid: true,
            show_ground: true,
            show_points: true,
            show_arrows: true,
            show_markers: true,
            point_size: 2.0,
            auto_rotate: true,
        };
        app.regenerate();
        app
    }

    /// Run one full generation with the current controls
    fn regenerate(&mut self) {
        let result = self
            .config
            .get_grammar(&self.selected_grammar)
            .map_err(foliage::GenerateError::from)
            .and_then(|entry| {
                let generation = foliage::config::GenerationConfig {
                    iterations: self.iterations,
                    seed: self.seed.clone(),
                    ..self.config.generation.clone()
                };
                let params = generation.to_params(self.config.limits)?;
                generate_events(&entry.grammar, &params)
            });

        match result {
            Ok(events) => {
                info!("Generated {} events for {}", events.len(), self.selected_grammar);
                self.summary = EventSummary::from_events(&events);
                self.events = events;
                self.last_error = None;
            }
            Err(e) => {
                warn!("Generation failed: {}", e);
                self.last_error = Some(e.to_string());
            }
        }
    }

    fn center_view(&mut self) {
        self.camera_angle_x = 0.3;
        self.camera_angle_y = 0.0;
    }

    fn project_point(&self, p: Vec3) -> [f64; 2] {
        let (x, y, z) = (p.x as f32, p.y as f32, p.z as f32);
        let cos_x = self.camera_angle_x.cos();
        let sin_x = self.camera_angle_x.sin();
        let cos_y = self.camera_angle_y.cos();
        let sin_y = self.camera_angle_y.sin();

        // Rotate around Y axis (yaw)
        let x1 = x * cos_y + z * sin_y;
        let z1 = -x * sin_y + z * cos_y;

        // Rotate around X axis (pitch)
        let y1 = y * cos_x - z1 * sin_x;

        [x1 as f64, y1 as f64]
    }
}

fn color32(c: Color) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

impl eframe::App for FoliageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.auto_rotate {
            self.camera_angle_y += 0.005;
            ctx.request_repaint();
        }

        // Left panel - grammar and generation controls
        egui::SidePanel::left("grammar_panel").min_width(250.0).show(ctx, |ui| {
            ui.heading("Foliage");
            ui.separator();

            let mut changed = false;

            let old_grammar = self.selected_grammar.clone();
            ui.horizontal(|ui| {
                ui.label("Grammar:");
                egui::ComboBox::from_id_salt("grammar")
                    .selected_text(&self.selected_grammar)
                    .show_ui(ui, |ui| {
                        for entry in &self.config.grammars {
                            ui.selectable_value(&mut self.selected_grammar, entry.id.clone(), &entry.name);
                        }
                    });
            });
            changed |= self.selected_grammar != old_grammar;

            ui.horizontal(|ui| {
                ui.label("Seed:");
                changed |= ui.text_edit_singleline(&mut self.seed).lost_focus();
            });

            let max_iterations = i64::from(self.config.limits.max_iterations);
            changed |= ui
                .add(egui::Slider::new(&mut self.iterations, 0..=max_iterations).text("Iterations"))
                .changed();

            if ui.button("Regenerate").clicked() {
                changed = true;
            }
            if changed {
                self.regenerate();
            }

            ui.separator();
            if let Ok(entry) = self.config.get_grammar(&self.selected_grammar) {
                ui.label(format!("Axiom: {}", entry.grammar.axiom()));
                for rule in entry.grammar.rules() {
                    ui.monospace(format!("{} -> {} ({})", rule.input, rule.output, rule.probability));
                }
            }

            ui.separator();
            ui.label(format!(
                "{} points | {} arrows | {} markers",
                self.summary.points, self.summary.arrows, self.summary.markers
            ));
            if let Some(err) = &self.last_error {
                ui.colored_label(egui::Color32::LIGHT_RED, err);
            }
        });

        // Bottom panel - view controls
        egui::TopBottomPanel::bottom("controls_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.show_grid, "Grid");
                ui.checkbox(&mut self.show_ground, "Ground");
                ui.checkbox(&mut self.show_points, "Points");
                ui.checkbox(&mut self.show_arrows, "Arrows");
                ui.checkbox(&mut self.show_markers, "Markers");
                ui.checkbox(&mut self.auto_rotate, "Auto-rotate");

                ui.separator();
                ui.label("Rotate:");
                ui.add(egui::DragValue::new(&mut self.camera_angle_x).speed(0.02).prefix("X:"));
                ui.add(egui::DragValue::new(&mut self.camera_angle_y).speed(0.02).prefix("Y:"));

                ui.separator();
                ui.add(egui::Slider::new(&mut self.point_size, 0.5..=6.0).text("Point size"));
                if ui.button("Center").clicked() {
                    self.center_view();
                }
            });
        });

        // Central panel - 3D view
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label("Right-drag: rotate | Arrow keys: rotate | Home: reset");

            ctx.input(|i| {
                if i.key_down(egui::Key::ArrowLeft) { self.camera_angle_y -= 0.03; }
                if i.key_down(egui::Key::ArrowRight) { self.camera_angle_y += 0.03; }
                if i.key_down(egui::Key::ArrowUp) { self.camera_angle_x -= 0.03; }
                if i.key_down(egui::Key::ArrowDown) { self.camera_angle_x += 0.03; }
                if i.key_pressed(egui::Key::Home) { self.center_view(); }
                if i.pointer.secondary_down() {
                    let delta = i.pointer.delta();
                    self.camera_angle_y += delta.x * 0.005;
                    self.camera_angle_x += delta.y * 0.005;
                }
            });

            self.camera_angle_x = self.camera_angle_x.clamp(-MAX_PITCH, MAX_PITCH);

            let plot = egui_plot::Plot::new("foliage_plot")
                .data_aspect(1.0)
                .allow_drag(true)
                .allow_zoom(true)
                .allow_scroll(true)
                .show_axes(true)
                .show_grid(self.show_grid);

            plot.show(ui, |plot_ui| {
                if self.show_ground {
                    let mut outline: Vec<[f64; 2]> = ground_corners()
                        .iter()
                        .map(|&c| self.project_point(c))
                        .collect();
                    outline.push(outline[0]);
                    plot_ui.line(
                        egui_plot::Line::new(egui_plot::PlotPoints::from(outline))
                            .color(egui::Color32::DARK_GREEN)
                            .name("ground"),
                    );
                }

                let mut points: BTreeMap<u32, Vec<[f64; 2]>> = BTreeMap::new();
                for event in &self.events {
                    match *event {
                        DrawEvent::Arrow { origin, direction, length, color } if self.show_arrows => {
                            let a = self.project_point(origin);
                            let b = self.project_point(origin + direction * length);
                            plot_ui.line(
                                egui_plot::Line::new(egui_plot::PlotPoints::from(vec![a, b]))
                                    .color(color32(color))
                                    .width(self.point_size * 0.5),
                            );
                        }
                        DrawEvent::Point { position, color, marker }
                            if (marker && self.show_markers) || (!marker && self.show_points) =>
                        {
                            points.entry(color.to_hex()).or_default().push(self.project_point(position));
                        }
                        _ => {}
                    }
                }

                // One series per color
                for (hex, series) in points {
                    plot_ui.points(
                        egui_plot::Points::new(egui_plot::PlotPoints::from(series))
                            .color(color32(Color::from_hex(hex)))
                            .radius(self.point_size),
                    );
                }
            });
        });
    }
}
