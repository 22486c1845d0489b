use crate::error::Result;
use tracing::info;

use super::r#trait::{RawWindow, WindowService};

/// Эмуляция сервиса окон для режима сухого запуска
pub struct DryRunWindowService {
    windows: Vec<RawWindow>,
}

impl DryRunWindowService {
    pub fn new() -> Self {
        let fake = [
            (1, "Terminal - dry_run", "Alacritty", "Alacritty,utilities-terminal"),
            (2, "Browser - dry_run", "firefox", "firefox"),
            (3, "Editor - dry_run", "Code", "code,visual-studio-code"),
            (4, "Docs - dry_run", "Firefox", "firefox"),
            (5, "Top bar", "Gnome-shell", ""),
        ];

        let windows = fake
            .into_iter()
            .map(|(id, title, class, icon)| (id, title.to_string(), class.to_string(), icon.to_string()))
            .collect();

        Self { windows }
    }
}

#[async_trait::async_trait]
impl WindowService for DryRunWindowService {
    async fn list(&self) -> Result<Vec<RawWindow>> {
        info!("[DRY RUN] List -> {} окон", self.windows.len());
        Ok(self.windows.clone())
    }

    async fn activate(&self, id: i32) -> Result<String> {
        let known = self.windows.iter().any(|(window_id, ..)| *window_id == id);
        info!("[DRY RUN] Activate({})", id);
        Ok(if known { "OK" } else { "NOT_FOUND" }.to_string())
    }
}
