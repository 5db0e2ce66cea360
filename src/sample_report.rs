//! Sample cash-closing report: download, share, copy link, print, preview

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{error, info, warn};

use crate::clipboard::ClipboardAccess;
use crate::notification::{NotificationLevel, Notifier};
use crate::system_command::SystemCommandExecutor;

pub const SAMPLE_ASSET: &str = "cierre_1_27-06-2025_17-52.pdf";
pub const DOWNLOAD_NAME: &str = "Ejemplo_Cierre_Caja_Inti_Cash_Bot.pdf";
pub const SHARE_TITLE: &str = "Reporte de Cierre de Caja - Inti Cash Bot";
pub const SHARE_TEXT: &str = "Mira este ejemplo de reporte automático generado por Inti Cash Bot";

pub const DOWNLOAD_MESSAGE: &str = "Descargando PDF de ejemplo...";
pub const DOWNLOAD_FAILED_MESSAGE: &str = "No se pudo descargar el PDF de ejemplo";
pub const SHARED_MESSAGE: &str = "PDF compartido exitosamente";
pub const LINK_COPIED_MESSAGE: &str = "Enlace del PDF copiado al portapapeles";
pub const LINK_FAILED_MESSAGE: &str = "No se pudo copiar el enlace";
pub const PRINT_MESSAGE: &str = "Abriendo PDF para imprimir...";
pub const PRINT_FAILED_MESSAGE: &str =
    "No se pudo abrir el PDF. Verifica que no estén bloqueadas las ventanas emergentes.";

const PULSE: Duration = Duration::from_secs(1);

/// Figures shown on a sample report card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleSummary {
    pub key: &'static str,
    pub title: &'static str,
    pub date: &'static str,
    pub balance: &'static str,
    pub sales: &'static str,
    pub expenses: &'static str,
}

pub const SAMPLES: [SampleSummary; 2] = [
    SampleSummary {
        key: "sample1",
        title: "Cierre diario",
        date: "25/12/2024",
        balance: "S/ 1,250.00",
        sales: "S/ 1,580.00",
        expenses: "S/ 330.00",
    },
    SampleSummary {
        key: "sample2",
        title: "Resumen semanal",
        date: "22/12 - 28/12/2024",
        balance: "S/ 8,750.00",
        sales: "S/ 11,200.00",
        expenses: "S/ 2,450.00",
    },
];

/// Look up a sample by key; unknown keys get the daily report
pub fn sample_summary(key: &str) -> &'static SampleSummary {
    SAMPLES
        .iter()
        .find(|sample| sample.key == key)
        .unwrap_or(&SAMPLES[0])
}

/// The static sample asset and where it is published
#[derive(Debug, Clone)]
pub struct SampleReport {
    asset_path: PathBuf,
    site_origin: String,
    download_dir: PathBuf,
}

impl SampleReport {
    pub fn new(
        asset_path: impl Into<PathBuf>,
        site_origin: impl Into<String>,
        download_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            asset_path: asset_path.into(),
            site_origin: site_origin.into(),
            download_dir: download_dir.into(),
        }
    }

    pub fn asset_path(&self) -> &Path {
        &self.asset_path
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Public URL of the asset
    pub fn url(&self) -> String {
        let name = self
            .asset_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(SAMPLE_ASSET);
        format!("{}/{}", self.site_origin.trim_end_matches('/'), name)
    }

    /// `mailto:` link carrying the share title, text and URL
    pub fn share_url(&self) -> String {
        let body = format!("{SHARE_TEXT}\n{}", self.url());
        format!(
            "mailto:?subject={}&body={}",
            urlencoding::encode(SHARE_TITLE),
            urlencoding::encode(&body)
        )
    }

    /// Copy the asset into the download directory under its public name
    pub fn download(&self, notifier: &mut dyn Notifier) -> Option<PathBuf> {
        match self.copy_to_downloads() {
            Ok(target) => {
                info!("Sample report saved to {}", target.display());
                notifier.notify(DOWNLOAD_MESSAGE.to_string(), NotificationLevel::Success);
                Some(target)
            }
            Err(e) => {
                error!("Sample report download failed: {e:#}");
                notifier.notify(DOWNLOAD_FAILED_MESSAGE.to_string(), NotificationLevel::Error);
                None
            }
        }
    }

    fn copy_to_downloads(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.download_dir).with_context(|| {
            format!("failed to create {}", self.download_dir.display())
        })?;
        let target = self.download_dir.join(DOWNLOAD_NAME);
        fs::copy(&self.asset_path, &target).with_context(|| {
            format!(
                "failed to copy {} to {}",
                self.asset_path.display(),
                target.display()
            )
        })?;
        Ok(target)
    }

    /// Hand the share link to the mail client; copy the link if that fails
    pub fn share(
        &self,
        opener: &dyn SystemCommandExecutor,
        clipboard: &mut dyn ClipboardAccess,
        notifier: &mut dyn Notifier,
    ) -> bool {
        match opener.open(&self.share_url()) {
            Ok(()) => {
                notifier.notify(SHARED_MESSAGE.to_string(), NotificationLevel::Success);
                true
            }
            Err(e) => {
                warn!("Share failed ({e:#}), copying the link instead");
                self.copy_link(clipboard, notifier)
            }
        }
    }

    pub fn copy_link(&self, clipboard: &mut dyn ClipboardAccess, notifier: &mut dyn Notifier) -> bool {
        match clipboard.set_text(&self.url()) {
            Ok(()) => {
                notifier.notify(LINK_COPIED_MESSAGE.to_string(), NotificationLevel::Success);
                true
            }
            Err(e) => {
                error!("Failed to copy report link: {e:#}");
                notifier.notify(LINK_FAILED_MESSAGE.to_string(), NotificationLevel::Error);
                false
            }
        }
    }

    /// Open the asset in the system viewer, which offers printing
    pub fn print(&self, opener: &dyn SystemCommandExecutor, notifier: &mut dyn Notifier) -> bool {
        let target = self.asset_path.to_string_lossy();
        match opener.open(&target) {
            Ok(()) => {
                notifier.notify(PRINT_MESSAGE.to_string(), NotificationLevel::Info);
                true
            }
            Err(e) => {
                error!("Failed to open sample report for printing: {e:#}");
                notifier.notify(PRINT_FAILED_MESSAGE.to_string(), NotificationLevel::Error);
                false
            }
        }
    }
}

/// Highlight on the report card after a preview request
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportCardPulse {
    until: Option<Instant>,
}

impl ReportCardPulse {
    pub fn start(&mut self, now: Instant) {
        self.until = Some(now + PULSE);
    }

    pub fn is_active(&self, now: Instant) -> bool {
        self.until.is_some_and(|until| now < until)
    }

    /// Returns true when the pulse just ended
    pub fn tick(&mut self, now: Instant) -> bool {
        if self.until.is_some_and(|until| now >= until) {
            self.until = None;
            return true;
        }
        false
    }
}
