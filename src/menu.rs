//! egui screens: the menu system and the in-simulation overlay.
//!
//! Every button routes through [`Session::handle_command`] so the mouse and
//! the keyboard drive the same state machine.

use std::time::Duration;

use crate::patterns::PATTERNS;
use crate::save;
use crate::session::{Command, Screen};
use crate::state::State;

/// Draws the UI for the active screen. Returns true when the user asked to
/// quit the application.
pub fn draw(ctx: &egui::Context, state: &mut State) -> bool {
    match state.session.screen {
        Screen::MainMenu => return main_menu(ctx, state),
        Screen::NewMenu => new_menu(ctx, state),
        Screen::LoadMenu => load_menu(ctx, state),
        Screen::Sim { running } => sim_overlay(ctx, state, running),
        Screen::SimMenu => sim_menu(ctx, state),
        Screen::Settings => settings_menu(ctx, state),
        Screen::SaveMenu => save_menu(ctx, state),
    }
    false
}

/// Semi-transparent frame for overlays drawn on top of the grid.
fn overlay_frame(ctx: &egui::Context) -> egui::Frame {
    egui::Frame {
        fill: egui::Color32::from_rgba_unmultiplied(25, 25, 25, 160),
        ..egui::Frame::window(&ctx.style())
    }
}

fn status_line(ui: &mut egui::Ui, status: &Option<String>) {
    if let Some(status) = status {
        ui.add_space(12.0);
        ui.colored_label(egui::Color32::LIGHT_RED, status);
    }
}

fn main_menu(ctx: &egui::Context, state: &mut State) -> bool {
    let mut exit = false;
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.25);
            ui.heading("Game of Life");
            ui.add_space(30.0);
            if ui.button("New simulation").clicked() {
                state.session.handle_command(Command::Confirm);
            }
            if ui.button("Load simulation").clicked() {
                state.session.handle_command(Command::Down);
            }
            if ui.button("Quit").clicked() {
                exit = true;
            }
            ui.add_space(20.0);
            ui.weak("Space: new simulation, Down: load, Esc: quit");
        });
    });
    exit
}

fn new_menu(ctx: &egui::Context, state: &mut State) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.heading("New simulation");
            ui.add_space(20.0);
            ui.horizontal(|ui| {
                ui.label("Width:");
                ui.add(
                    egui::DragValue::new(&mut state.session.new_width).clamp_range(1..=4096),
                );
                ui.label("Height:");
                ui.add(
                    egui::DragValue::new(&mut state.session.new_height).clamp_range(1..=4096),
                );
            });
            ui.add_space(20.0);
            if ui.button("Start").clicked() {
                state.session.handle_command(Command::Confirm);
            }
            if ui.button("Back").clicked() {
                state.session.handle_command(Command::Back);
            }
            status_line(ui, &state.session.status);
            ui.add_space(20.0);
            ui.weak("Left/Right: width, Up/Down: height, Space: start, Esc: back");
        });
    });
}

fn load_menu(ctx: &egui::Context, state: &mut State) {
    let age = save::save_age(&state.session.save_path);
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.heading("Load simulation");
            ui.add_space(20.0);
            match age {
                Some(age) => ui.label(format!("Save found, written {} ago.", format_age(age))),
                None => ui.label("No save file found."),
            };
            ui.add_space(20.0);
            if ui.button("Load").clicked() {
                state.session.handle_command(Command::Confirm);
            }
            if ui.button("Back").clicked() {
                state.session.handle_command(Command::Back);
            }
            status_line(ui, &state.session.status);
            ui.add_space(20.0);
            ui.weak("Space: load, Esc: back");
        });
    });
}

fn sim_overlay(ctx: &egui::Context, state: &mut State, running: bool) {
    let (grid_w, grid_h, live) = match &state.session.grid {
        Some(grid) => (grid.size_x(), grid.size_y(), grid.live_cells()),
        None => (0, 0, 0),
    };
    let generation = state.session.generation;

    egui::Area::new(egui::Id::new("sim_status"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(5.0, 5.0))
        .show(ctx, |ui| {
            ui.label(if running {
                "Simulation (running)"
            } else {
                "Simulation (paused)"
            });
            ui.weak(format!(
                "Generation {generation} — grid {grid_w}x{grid_h}, {live} alive"
            ));
            if let Some(status) = &state.session.status {
                ui.colored_label(egui::Color32::LIGHT_RED, status);
            }
        });

    egui::Area::new(egui::Id::new("sim_controls"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-5.0, 5.0))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button(if running { "Pause" } else { "Run" }).clicked() {
                    state.session.handle_command(Command::Confirm);
                }
                if !running {
                    if ui.button("Step").clicked() {
                        state.session.step_once();
                    }
                    egui::ComboBox::from_id_source("pattern_selector")
                        .selected_text(PATTERNS[state.selected_pattern].name())
                        .show_ui(ui, |ui| {
                            for (i, pattern) in PATTERNS.iter().enumerate() {
                                ui.selectable_value(&mut state.selected_pattern, i, pattern.name());
                            }
                        });
                    if ui.button("Place").clicked() {
                        state.place_pattern(PATTERNS[state.selected_pattern]);
                    }
                }
                if ui.button("Menu").clicked() {
                    state.session.handle_command(Command::Back);
                }
            });
        });

    egui::Area::new(egui::Id::new("sim_hints"))
        .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(5.0, -5.0))
        .show(ctx, |ui| {
            ui.weak("Left click: revive cell, Right click: kill cell, Middle drag: pan, Wheel: zoom");
            ui.weak(if running {
                "Space: pause, Esc: menu"
            } else {
                "Space: run, Right: step, Esc: menu"
            });
        });
}

fn sim_menu(ctx: &egui::Context, state: &mut State) {
    egui::Window::new("Simulation menu")
        .anchor(egui::Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
        .frame(overlay_frame(ctx))
        .collapsible(false)
        .resizable(false)
        .show(ctx, |ui| {
            ui.vertical_centered_justified(|ui| {
                if ui.button("Resume").clicked() {
                    state.session.handle_command(Command::Back);
                }
                if ui.button("Settings").clicked() {
                    state.session.handle_command(Command::Up);
                }
                if ui.button("Save").clicked() {
                    state.session.handle_command(Command::Down);
                }
                if ui.button("Quit to main menu").clicked() {
                    state.session.handle_command(Command::Abandon);
                }
            });
            ui.add_space(10.0);
            ui.weak("Esc: resume, Up: settings, Down: save, Q: quit to main menu");
        });
}

fn settings_menu(ctx: &egui::Context, state: &mut State) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.heading("Settings");
            ui.add_space(20.0);

            let settings = &mut state.session.settings;
            let mut speed = 1000.0 / settings.step_interval.as_millis().max(1) as f32;
            if ui
                .add(egui::Slider::new(&mut speed, 0.5..=60.0).text("generations / second"))
                .changed()
            {
                settings.step_interval = Duration::from_millis((1000.0 / speed) as u64);
            }
            ui.add(egui::Slider::new(&mut settings.brush_radius, 0..=20).text("Brush radius"));
            ui.checkbox(&mut settings.show_ghosts, "Show ghosts of dead cells");
            ui.label(format!("Cell size: {:.1} px (mouse wheel zooms)", state.zoom));

            ui.add_space(20.0);
            if ui.button("Back").clicked() {
                state.session.handle_command(Command::Back);
            }
            ui.add_space(20.0);
            ui.weak("Esc: back to simulation menu");
        });
    });
}

fn save_menu(ctx: &egui::Context, state: &mut State) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.2);
            ui.heading("Save simulation");
            ui.add_space(20.0);
            ui.label(format!("Save file: {}", state.session.save_path.display()));
            ui.add_space(20.0);
            if ui.button("Save").clicked() {
                state.session.handle_command(Command::Confirm);
            }
            if ui.button("Back").clicked() {
                state.session.handle_command(Command::Back);
            }
            if let Some(status) = &state.session.status {
                ui.add_space(12.0);
                ui.label(status);
            }
            ui.add_space(20.0);
            ui.weak("Space: save, Esc: back");
        });
    });
}

fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        format!("{secs} seconds")
    } else if secs < 3600 {
        format!("{} minutes", secs / 60)
    } else {
        format!("{} hours", secs / 3600)
    }
}
