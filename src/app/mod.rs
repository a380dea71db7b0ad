//! App module - contains the main application state and logic

mod loading;
mod modals;
mod views;

use crate::constants::*;
use crate::export;
use crate::ranking::{rank_activities, ActivityRanking};
use crate::settings::{effective_workbook_path, saved_workbook_path, Settings};
use crate::theme;
use crate::types::*;
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{error, info};

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    pub(crate) report: Option<Report>,
    pub(crate) load_state: Arc<Mutex<LoadState>>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) selected_year: Option<i32>,
    /// Rankings are computed once per year and reused every frame
    pub(crate) rankings: HashMap<i32, ActivityRanking>,
    pub(crate) view_mode: ViewMode,
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Settings
    /// Path as typed or picked by the user; blank means the default
    pub(crate) workbook_path_str: String,
    pub(crate) cache_ttl_days: u64,
    pub(crate) default_year: Option<i32>,
    pub(crate) top_n: usize,
    pub(crate) show_settings: bool,
    // Messages
    pub(crate) error_message: Option<String>,
    pub(crate) toast_message: Option<String>,
    pub(crate) toast_start: Option<std::time::Instant>,
    // Window
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
    pub(crate) db_path: PathBuf,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        data_dir: PathBuf,
        runtime: tokio::runtime::Runtime,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Light);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        theme::apply_visuals(&cc.egui_ctx);

        let mut app = Self {
            report: None,
            load_state: Arc::new(Mutex::new(LoadState::Idle)),
            runtime,
            selected_year: None,
            rankings: HashMap::new(),
            view_mode: if settings.show_table { ViewMode::Table } else { ViewMode::Chart },
            logo_texture: None,
            workbook_path_str: settings.workbook_path.clone().unwrap_or_default(),
            cache_ttl_days: settings.cache_ttl_days,
            default_year: settings.default_year,
            top_n: settings.top_n.max(1),
            show_settings: false,
            error_message: None,
            toast_message: None,
            toast_start: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            db_path: data_dir.join("report.db"),
            data_dir,
        };

        app.start_load(&cc.egui_ctx, false);
        app
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            workbook_path: saved_workbook_path(&self.workbook_path_str),
            cache_ttl_days: self.cache_ttl_days,
            default_year: self.default_year,
            top_n: self.top_n,
            show_table: self.view_mode == ViewMode::Table,
        };
        settings.save(&self.data_dir);
    }

    /// Workbook the next load reads, after env var and default are applied
    pub fn workbook_path(&self) -> PathBuf {
        effective_workbook_path(Some(&self.workbook_path_str))
    }

    /// Year shown when nothing is selected: the configured default, the
    /// preferred year, or the latest one.
    pub fn initial_year(years: &[i32], configured: Option<i32>) -> Option<i32> {
        configured
            .filter(|y| years.contains(y))
            .or_else(|| years.contains(&PREFERRED_YEAR).then_some(PREFERRED_YEAR))
            .or_else(|| years.last().copied())
    }

    pub fn select_year(&mut self, year: i32) {
        if self.selected_year != Some(year) {
            info!(year, "Year selected");
        }
        self.selected_year = Some(year);
    }

    /// Ranking of the selected year, computed on first use
    pub fn current_ranking(&mut self) -> Option<&ActivityRanking> {
        let year = self.selected_year?;
        let dataset = self.report.as_ref()?.years.get(&year)?;
        let top_n = self.top_n;
        Some(
            self.rankings
                .entry(year)
                .or_insert_with(|| rank_activities(dataset, top_n)),
        )
    }

    pub fn invalidate_rankings(&mut self) {
        self.rankings.clear();
    }

    pub fn show_toast(&mut self, message: impl Into<String>) {
        self.toast_message = Some(message.into());
        self.toast_start = Some(std::time::Instant::now());
    }

    /// Ask for a destination and save the current chart there
    pub fn export_current_chart(&mut self) {
        let Some(ranking) = self.current_ranking().cloned() else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(export::default_file_name(ranking.year))
            .add_filter("PNG", &["png"])
            .add_filter("SVG", &["svg"])
            .save_file()
        else {
            return;
        };

        match export::save_chart(&ranking, &path) {
            Ok(()) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                self.show_toast(format!("Gráfico salvo em {name}"));
            }
            Err(e) => {
                error!(error = %format!("{e:#}"), "Chart export failed");
                self.error_message = Some(format!("Falha ao exportar gráfico: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_year_prefers_configured() {
        assert_eq!(App::initial_year(&[2022, 2023, 2024], Some(2024)), Some(2024));
    }

    #[test]
    fn test_initial_year_falls_back_to_preferred() {
        assert_eq!(App::initial_year(&[2022, 2023, 2024], None), Some(2023));
        assert_eq!(App::initial_year(&[2022, 2023, 2024], Some(1999)), Some(2023));
    }

    #[test]
    fn test_initial_year_latest_without_preferred() {
        assert_eq!(App::initial_year(&[2024, 2025], None), Some(2025));
        assert_eq!(App::initial_year(&[], None), None);
    }
}
