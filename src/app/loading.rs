//! Background report loading

use super::App;
use crate::report::{load_report, LoadRequest};
use crate::settings::ttl_from_days;
use crate::types::*;
use crate::utils::format_duration;
use eframe::egui;
use tracing::{debug, error, info};

impl App {
    pub fn is_loading(&self) -> bool {
        self.load_state
            .lock()
            .map(|s| matches!(*s, LoadState::Loading))
            .unwrap_or(false)
    }

    /// Load the report off the UI thread. `force_reload` skips the cache.
    pub fn start_load(&mut self, ctx: &egui::Context, force_reload: bool) {
        if self.is_loading() {
            debug!("Load already running");
            return;
        }

        let request = LoadRequest {
            workbook: self.workbook_path(),
            db_path: self.db_path.clone(),
            ttl: ttl_from_days(self.cache_ttl_days),
            force_reload,
        };
        info!(
            workbook = %request.workbook.display(),
            force_reload,
            "Starting report load"
        );

        if let Ok(mut state) = self.load_state.lock() {
            *state = LoadState::Loading;
        }
        self.error_message = None;

        let state = self.load_state.clone();
        let ctx = ctx.clone();
        self.runtime.spawn_blocking(move || {
            let outcome = match load_report(&request) {
                Ok(report) => LoadState::Done(report),
                Err(e) => {
                    error!(error = %format!("{e:#}"), "Report load failed");
                    LoadState::Failed(format!("{e:#}"))
                }
            };
            if let Ok(mut s) = state.lock() {
                *s = outcome;
            }
            ctx.request_repaint();
        });
    }

    /// Pick up a finished load, if any
    pub fn poll_load_state(&mut self) {
        let finished = {
            let Ok(mut state) = self.load_state.lock() else {
                return;
            };
            match *state {
                LoadState::Done(_) | LoadState::Failed(_) => std::mem::take(&mut *state),
                _ => return,
            }
        };

        match finished {
            LoadState::Done(report) => self.apply_report(report),
            LoadState::Failed(message) => {
                self.error_message = Some(format!("Falha ao carregar dados: {message}"));
            }
            LoadState::Idle | LoadState::Loading => {}
        }
    }

    fn apply_report(&mut self, report: Report) {
        let years = report.available_years();
        debug!(
            ?years,
            origin = ?report.origin,
            load_time = %format_duration(report.load_time),
            "Report applied"
        );

        // Keep the user's year across reloads when it still exists
        let keep = self.selected_year.filter(|y| years.contains(y));
        self.selected_year = keep.or_else(|| Self::initial_year(&years, self.default_year));
        self.invalidate_rankings();
        self.report = Some(report);
    }
}
