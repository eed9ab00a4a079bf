//! Left panel UI: longitude controls and solar time read-outs.

use super::colors;
use crate::solar::{format_longitude, format_offset_minutes};
use crate::state::{AppState, LongitudePolicy, LongitudeReadout};
use eframe::egui::{self, RichText};

/// Slider step in degrees.
const SLIDER_STEP: f64 = 0.1;

pub fn render_longitude_panel(ctx: &egui::Context, state: &mut AppState, dataset: Option<&str>) {
    egui::SidePanel::left("longitude_panel")
        .resizable(true)
        .default_width(260.0)
        .min_width(220.0)
        .max_width(400.0)
        .show(ctx, |ui| {
            ui.heading("Longitude");
            ui.separator();

            render_selected_section(ui, state);
            ui.add_space(12.0);

            if let Some(readout) = state.selection.hover_readout() {
                render_hover_section(ui, &readout);
                ui.add_space(12.0);
            }

            render_settings_section(ui, state);
            ui.add_space(12.0);

            render_attribution(ui, dataset);
        });
}

fn render_selected_section(ui: &mut egui::Ui, state: &mut AppState) {
    let selected = state.selection.selected();

    // Numeric entry is unbounded; out-of-range values go through the policy
    let mut typed = selected;
    ui.horizontal(|ui| {
        ui.label(RichText::new("Selected:").color(colors::ui::LABEL));
        let response = ui.add(
            egui::DragValue::new(&mut typed)
                .speed(SLIDER_STEP)
                .max_decimals(3)
                .suffix(" deg"),
        );
        if response.changed() {
            state.commit_longitude(typed);
        }
    });

    let mut slid = state.selection.selected();
    let response = ui.add(
        egui::Slider::new(&mut slid, -180.0..=180.0)
            .step_by(SLIDER_STEP)
            .show_value(false),
    );
    if response.changed() {
        state.commit_longitude(slid);
    }

    render_readout(ui, "selected_readout", &state.selection.selected_readout());
}

fn render_hover_section(ui: &mut egui::Ui, readout: &LongitudeReadout) {
    ui.horizontal(|ui| {
        ui.label(RichText::new("At cursor:").color(colors::ui::LABEL));
        ui.label(
            RichText::new(format!("{} deg", format_longitude(readout.longitude)))
                .monospace()
                .color(colors::ui::VALUE),
        );
    });
    render_readout(ui, "hover_readout", readout);
}

fn render_readout(ui: &mut egui::Ui, id_salt: &str, readout: &LongitudeReadout) {
    egui::Grid::new(id_salt)
        .num_columns(2)
        .spacing([12.0, 4.0])
        .show(ui, |ui| {
            ui.label(RichText::new("Solar time").color(colors::ui::LABEL));
            ui.label(
                RichText::new(readout.solar_time.to_string())
                    .monospace()
                    .size(16.0)
                    .color(colors::ui::VALUE),
            );
            ui.end_row();

            ui.label(RichText::new("Offset").color(colors::ui::LABEL));
            ui.label(
                RichText::new(format!(
                    "{} minutes",
                    format_offset_minutes(readout.offset_minutes)
                ))
                .monospace()
                .color(colors::ui::VALUE),
            );
            ui.end_row();
        });
}

fn render_settings_section(ui: &mut egui::Ui, state: &mut AppState) {
    egui::CollapsingHeader::new(RichText::new("Settings").strong())
        .default_open(false)
        .show(ui, |ui| {
            let mut policy = state.selection.policy();
            egui::ComboBox::from_label("Out of range")
                .selected_text(policy.label())
                .show_ui(ui, |ui| {
                    for option in LongitudePolicy::all() {
                        ui.selectable_value(&mut policy, *option, option.label());
                    }
                });
            if policy != state.selection.policy() {
                state.change_policy(policy);
            }

            ui.checkbox(&mut state.show_graticule, "Meridians and parallels");
        });
}

fn render_attribution(ui: &mut egui::Ui, dataset: Option<&str>) {
    ui.separator();
    ui.horizontal_wrapped(|ui| {
        ui.label(RichText::new("Map data:").small().color(colors::ui::LABEL));
        match dataset {
            Some(crate::BUILTIN_DATASET_NAME) => {
                ui.hyperlink_to(
                    RichText::new(crate::BUILTIN_DATASET_NAME).small(),
                    "https://www.naturalearthdata.com/",
                );
            }
            Some(name) => {
                ui.label(RichText::new(name).small().monospace());
            }
            None => {
                ui.label(RichText::new("none loaded").small().italics());
            }
        }
    });
}
