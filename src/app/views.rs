//! View rendering (header, year selector, chart, table, footer)

use super::App;
use crate::constants::*;
use crate::theme;
use crate::types::*;
use crate::ui::{chart::bar_chart, components};
use crate::utils::{self, format_count, format_duration};
use eframe::egui;
use egui_phosphor::regular as icons;

const TOAST_SECS: f32 = 3.0;

impl App {
    pub(crate) fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header")
            .exact_height(theme::HEADER_HEIGHT)
            .show_separator_line(false)
            .frame(theme::header_frame())
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let size = (theme::LOGO_SIZE * 2.0) as u32;
                        let image = utils::rasterize_logo_square(size)
                            .map(|(pixels, w, h)| {
                                egui::ColorImage::from_rgba_unmultiplied(
                                    [w as usize, h as usize],
                                    &pixels,
                                )
                            })
                            .unwrap_or_else(|| egui::ColorImage::new([1, 1], theme::CREA_BLUE));
                        ctx.load_texture("logo", image, egui::TextureOptions::LINEAR)
                    });
                    ui.image(egui::load::SizedTexture::new(
                        texture.id(),
                        egui::vec2(theme::LOGO_SIZE, theme::LOGO_SIZE),
                    ));
                    ui.add_space(theme::SPACING_MD);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new(format!("{ORG_SHORT} - Relatório de Inspeções Técnicas"))
                                .size(theme::FONT_TITLE)
                                .strong()
                                .color(theme::TEXT_ON_BRAND),
                        )
                        .selectable(false),
                    );

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let settings = ui.add(
                            egui::Button::new(
                                egui::RichText::new(icons::GEAR)
                                    .size(theme::FONT_TITLE)
                                    .color(theme::TEXT_ON_BRAND),
                            )
                            .frame(false),
                        );
                        if settings.on_hover_text("Configurações").clicked() {
                            self.show_settings = true;
                        }
                    });
                });
            });
    }

    pub(crate) fn render_footer(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer")
            .exact_height(theme::FOOTER_HEIGHT)
            .show_separator_line(false)
            .frame(theme::footer_frame())
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.spacing_mut().item_spacing.y = 2.0;
                    ui.label(
                        egui::RichText::new(ORG_NAME)
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_ON_BRAND),
                    );
                    ui.label(
                        egui::RichText::new(ORG_ADDRESS)
                            .size(theme::FONT_LABEL)
                            .color(theme::TEXT_ON_BRAND),
                    );
                    ui.hyperlink_to(
                        egui::RichText::new(ORG_URL_LABEL)
                            .size(theme::FONT_LABEL)
                            .color(theme::CREA_YELLOW),
                        ORG_URL,
                    );
                });
            });
    }

    pub(crate) fn render_central(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme::BG_BASE).inner_margin(egui::Margin::same(16)))
            .show(ctx, |ui| {
                if let Some(message) = self.error_message.clone() {
                    components::error_banner(ui, &message);
                    ui.add_space(theme::SPACING_MD);
                }

                self.render_year_bar(ui, ctx);
                ui.add_space(theme::SPACING_SM);
                ui.separator();
                ui.add_space(theme::SPACING_SM);

                if self.report.is_none() {
                    if self.is_loading() {
                        Self::render_spinner(ui, "Carregando dados…");
                    } else if self.error_message.is_none() {
                        Self::render_spinner(ui, "Aguardando dados…");
                    }
                    return;
                }

                // Reload in progress: the previous report stays visible
                if self.is_loading() {
                    ui.horizontal(|ui| {
                        ui.add(egui::Spinner::new().size(14.0).color(theme::CREA_BLUE));
                        ui.label(
                            egui::RichText::new("Gerando relatório…")
                                .size(theme::FONT_LABEL)
                                .color(theme::TEXT_MUTED),
                        );
                    });
                }

                self.render_summary(ui);
                ui.add_space(theme::SPACING_SM);

                match self.view_mode {
                    ViewMode::Chart => self.render_chart_view(ui),
                    ViewMode::Table => self.render_table_view(ui),
                }
            });
    }

    fn render_spinner(ui: &mut egui::Ui, message: &str) {
        ui.vertical_centered(|ui| {
            ui.add_space(80.0);
            ui.add(egui::Spinner::new().size(32.0).color(theme::CREA_BLUE));
            ui.add_space(theme::SPACING_MD);
            ui.label(egui::RichText::new(message).color(theme::TEXT_MUTED));
        });
    }

    fn render_year_bar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let years = self
            .report
            .as_ref()
            .map(Report::available_years)
            .unwrap_or_default();

        ui.horizontal(|ui| {
            let count = years.len().max(1) as f32;
            let controls_width = 260.0;
            let spacing = ui.spacing().item_spacing.x;
            let button_width = ((ui.available_width() - controls_width) / count - spacing)
                .clamp(80.0, 220.0);

            let mut clicked = None;
            for &year in &years {
                let selected = self.selected_year == Some(year);
                if components::year_button(ui, year, selected, button_width).clicked() {
                    clicked = Some(year);
                }
            }
            if let Some(year) = clicked {
                self.select_year(year);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let loading = self.is_loading();
                let reload = ui.add_enabled(
                    !loading,
                    theme::button(format!("{}  Recarregar", icons::ARROW_CLOCKWISE)),
                );
                if reload
                    .on_hover_text("Ler a planilha novamente, ignorando o cache")
                    .clicked()
                {
                    self.start_load(ctx, true);
                }

                let has_chart = self.selected_year.is_some() && self.report.is_some();
                let export = ui.add_enabled(
                    has_chart,
                    theme::button(format!("{}  Exportar", icons::DOWNLOAD_SIMPLE)),
                );
                if export.on_hover_text("Salvar o gráfico como PNG ou SVG").clicked() {
                    self.export_current_chart();
                }

                let (icon, hint, next) = match self.view_mode {
                    ViewMode::Chart => (icons::TABLE, "Ver tabela", ViewMode::Table),
                    ViewMode::Table => (icons::CHART_BAR_HORIZONTAL, "Ver gráfico", ViewMode::Chart),
                };
                if ui
                    .add(theme::button(icon))
                    .on_hover_text(hint)
                    .clicked()
                {
                    self.view_mode = next;
                    self.save_settings();
                }
            });
        });
    }

    fn render_summary(&mut self, ui: &mut egui::Ui) {
        let Some(report) = self.report.as_ref() else {
            return;
        };
        let origin = match report.origin {
            DataOrigin::Cache => "cache",
            DataOrigin::Workbook => "planilha",
        };
        let loaded = format!(
            "{} ({}, {})",
            report.loaded_at.format("%d/%m/%Y %H:%M"),
            origin,
            format_duration(report.load_time)
        );

        let Some(ranking) = self.current_ranking() else {
            return;
        };
        let total = format_count(ranking.total);
        let unclassified = ranking.unclassified;
        let distinct = ranking.entries.len();

        ui.horizontal(|ui| {
            components::stat(ui, "Inspeções classificadas", &total);
            ui.add_space(theme::SPACING_XL);
            components::stat(ui, "Atividades no ranking", &distinct.to_string());
            if unclassified > 0 {
                ui.add_space(theme::SPACING_XL);
                components::stat(ui, "Sem atividade", &format_count(unclassified));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new(format!("Dados de {loaded}"))
                        .size(theme::FONT_SMALL)
                        .color(theme::TEXT_MUTED),
                );
            });
        });
    }

    fn render_chart_view(&mut self, ui: &mut egui::Ui) {
        let Some(ranking) = self.current_ranking().cloned() else {
            return;
        };
        if ranking.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(40.0);
                ui.label(
                    egui::RichText::new(format!("Nenhuma atividade classificada em {}", ranking.year))
                        .color(theme::TEXT_MUTED),
                );
            });
            return;
        }
        theme::card_frame().show(ui, |ui| {
            bar_chart(ui, &ranking);
        });
    }

    fn render_table_view(&mut self, ui: &mut egui::Ui) {
        use egui_extras::{Column, TableBuilder};

        let Some(ranking) = self.current_ranking().cloned() else {
            return;
        };

        theme::card_frame().show(ui, |ui| {
            ui.label(
                egui::RichText::new(crate::chart::title(ranking.year))
                    .size(theme::FONT_HEADING)
                    .strong()
                    .color(theme::TEXT_PRIMARY),
            );
            ui.add_space(theme::SPACING_MD);

            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::exact(40.0))
                .column(Column::remainder().at_least(240.0).clip(true))
                .column(Column::exact(100.0))
                .column(Column::exact(90.0))
                .header(24.0, |mut header| {
                    for title in ["#", CHART_Y_LABEL, "Inspeções", "%"] {
                        header.col(|ui| {
                            ui.label(egui::RichText::new(title).strong().color(theme::TEXT_PRIMARY));
                        });
                    }
                })
                .body(|mut body| {
                    for (i, entry) in ranking.entries.iter().enumerate() {
                        body.row(26.0, |mut row| {
                            row.col(|ui| {
                                ui.label((i + 1).to_string());
                            });
                            row.col(|ui| {
                                ui.label(entry.activity.trim())
                                    .on_hover_text(entry.activity.trim());
                            });
                            row.col(|ui| {
                                ui.label(format_count(entry.count));
                            });
                            row.col(|ui| {
                                ui.label(format!("{:.1}%", entry.percent));
                            });
                        });
                    }
                });
        });
    }

    pub(crate) fn render_toast(&mut self, ctx: &egui::Context) {
        let (Some(message), Some(start)) = (self.toast_message.clone(), self.toast_start) else {
            return;
        };
        let elapsed = start.elapsed().as_secs_f32();
        if elapsed > TOAST_SECS {
            self.toast_message = None;
            self.toast_start = None;
            return;
        }

        egui::Area::new(egui::Id::new("toast"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -(theme::FOOTER_HEIGHT + 16.0)))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(theme::CREA_BLUE)
                    .corner_radius(theme::RADIUS_LARGE)
                    .inner_margin(egui::Margin::symmetric(16, 10))
                    .show(ui, |ui| {
                        ui.label(
                            egui::RichText::new(format!("{}  {message}", icons::CHECK_CIRCLE))
                                .color(theme::TEXT_ON_BRAND),
                        );
                    });
            });
        ctx.request_repaint_after(std::time::Duration::from_millis(250));
    }
}
