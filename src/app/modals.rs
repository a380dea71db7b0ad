//! Settings modal

use super::App;
use crate::constants::*;
use crate::db::Database;
use crate::theme;
use crate::utils::format_count;
use eframe::egui;
use egui_phosphor::regular as icons;
use tracing::{info, warn};

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.add(
        egui::Label::new(
            egui::RichText::new(text)
                .size(13.0)
                .strong()
                .color(theme::TEXT_PRIMARY),
        )
        .selectable(false),
    );
    ui.add_space(2.0);
}

fn section_break(ui: &mut egui::Ui) {
    ui.add_space(theme::SPACING_MD);
    ui.separator();
    ui.add_space(theme::SPACING_SM);
}

impl App {
    pub(crate) fn render_settings_modal(&mut self, ctx: &egui::Context) {
        if !self.show_settings {
            return;
        }

        let modal_response = egui::Modal::new(egui::Id::new("settings_modal"))
            .backdrop_color(egui::Color32::from_black_alpha(90))
            .frame(theme::modal_frame())
            .show(ctx, |ui| {
                ui.set_width(420.0);

                ui.horizontal(|ui| {
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("Configurações")
                                .size(theme::FONT_HEADING)
                                .strong()
                                .color(theme::TEXT_PRIMARY),
                        )
                        .selectable(false),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let close = ui.add(
                            egui::Button::new(
                                egui::RichText::new(icons::X).size(16.0).color(theme::TEXT_MUTED),
                            )
                            .frame(false),
                        );
                        if close.clicked() {
                            self.show_settings = false;
                        }
                    });
                });
                ui.add_space(4.0);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                // Workbook
                section_label(ui, "Planilha de dados");
                let path_committed = ui
                    .horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 4.0;
                        let text_width = (ui.available_width() - 32.0).max(40.0);
                        let te = ui.add(
                            egui::TextEdit::singleline(&mut self.workbook_path_str)
                                .hint_text(DEFAULT_WORKBOOK)
                                .desired_width(text_width)
                                .font(egui::FontId::proportional(13.0)),
                        );
                        let browse = ui
                            .add(theme::button(icons::FOLDER_OPEN))
                            .on_hover_text("Escolher planilha");
                        let mut picked = false;
                        if browse.clicked() {
                            let mut dialog = rfd::FileDialog::new().add_filter("Excel", &["xlsx", "xls"]);
                            if let Some(dir) = self.workbook_path().parent().filter(|d| d.is_dir()) {
                                dialog = dialog.set_directory(dir);
                            }
                            if let Some(path) = dialog.pick_file() {
                                self.workbook_path_str = path.to_string_lossy().to_string();
                                picked = true;
                            }
                        }
                        picked || (te.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)))
                    })
                    .inner;
                if std::env::var_os(WORKBOOK_ENV_VAR).is_some() {
                    let note = format!(
                        "{WORKBOOK_ENV_VAR} está definida e tem prioridade: usando {}",
                        self.workbook_path().display()
                    );
                    ui.label(
                        egui::RichText::new(note)
                            .size(theme::FONT_SMALL)
                            .color(theme::TEXT_MUTED),
                    );
                }
                if path_committed {
                    info!(path = %self.workbook_path().display(), "Workbook path changed");
                    self.save_settings();
                    self.start_load(ctx, true);
                }

                section_break(ui);

                // Report
                section_label(ui, "Relatório");
                let mut changed = false;
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([theme::SPACING_LG, theme::SPACING_MD])
                    .show(ui, |ui| {
                        ui.label("Atividades no ranking");
                        let top_n = ui.add(egui::DragValue::new(&mut self.top_n).range(1..=50));
                        if top_n.changed() {
                            self.invalidate_rankings();
                            changed = true;
                        }
                        ui.end_row();

                        ui.label("Ano inicial");
                        let years = self
                            .report
                            .as_ref()
                            .map(|r| r.available_years())
                            .unwrap_or_default();
                        let selected_text = self
                            .default_year
                            .map(|y| y.to_string())
                            .unwrap_or_else(|| "Automático".to_string());
                        egui::ComboBox::from_id_salt("default_year")
                            .selected_text(selected_text)
                            .show_ui(ui, |ui| {
                                changed |= ui
                                    .selectable_value(&mut self.default_year, None, "Automático")
                                    .changed();
                                for year in years {
                                    changed |= ui
                                        .selectable_value(&mut self.default_year, Some(year), year.to_string())
                                        .changed();
                                }
                            });
                        ui.end_row();

                        ui.label("Validade do cache (dias)");
                        changed |= ui
                            .add(egui::DragValue::new(&mut self.cache_ttl_days).range(0..=365))
                            .changed();
                        ui.end_row();
                    });
                if changed {
                    self.save_settings();
                }

                section_break(ui);

                // Data
                section_label(ui, "Dados");
                ui.horizontal(|ui| {
                    let reload = ui.add_enabled(
                        !self.is_loading(),
                        theme::button_brand(format!("{}  Recarregar planilha", icons::ARROW_CLOCKWISE)),
                    );
                    if reload.clicked() {
                        self.start_load(ctx, true);
                        self.show_settings = false;
                    }

                    if ui
                        .add(theme::button_danger(format!("{}  Limpar cache", icons::TRASH)))
                        .clicked()
                    {
                        let cleared = Database::open(&self.db_path).and_then(|db| {
                            let count = db.record_count()?;
                            db.clear()?;
                            Ok(count)
                        });
                        match cleared {
                            Ok(count) => {
                                info!(records = count, "Cache cleared");
                                self.show_toast(format!("Cache limpo ({} registros)", format_count(count)));
                            }
                            Err(e) => {
                                warn!(error = %format!("{e:#}"), "Failed to clear cache");
                                self.error_message = Some(format!("Falha ao limpar cache: {e:#}"));
                            }
                        }
                    }

                    if ui
                        .add(theme::button(format!("{}  Abrir pasta", icons::FOLDER_OPEN)))
                        .on_hover_text(self.data_dir.display().to_string())
                        .clicked()
                    {
                        if let Err(e) = open::that(&self.data_dir) {
                            warn!(error = %e, "Failed to open data folder");
                        }
                    }
                });
            });

        if modal_response.should_close() {
            self.show_settings = false;
        }
    }
}
