//! PDF report generation
//!
//! Renders the fixed HTML template and prints it through a pooled headless
//! Chromium process. The browser is launched lazily once and reused across
//! calls behind a mutex (launching per request is far too slow, and the lock
//! prevents duplicate-launch races across tasks); each call opens and closes
//! its own tab so pages never leak between calls. Callers must invoke
//! [`ReportGenerator::close_browser`] during teardown to avoid orphaned
//! browser processes.

pub mod template;

pub use template::{grade_color, render_report_html, MAX_TREND_ENTRIES};

use crate::error::ReportError;
use crate::types::{EvaluationResult, HistoryEntry, PersistedEvaluation, SubjectProfile};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Evidence floor for report generation, stricter than the runtime
/// validator's 100 characters: a report should not be built from thin
/// evaluations.
pub const REPORT_MIN_EVIDENCE_CHARS: usize = 1000;

/// A4 paper, inches.
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.69;

const FOOTER_TEMPLATE: &str = r#"<div style="font-size:10px; width:100%; text-align:center; color:#6b7280;">
<span class="pageNumber"></span> / <span class="totalPages"></span></div>"#;

/// Pre-flight check: every criterion's evidence must meet the report floor.
pub fn validate_evaluation_data(result: &EvaluationResult) -> bool {
    result
        .criteria
        .entries()
        .iter()
        .all(|(_, c)| c.evidence.chars().count() >= REPORT_MIN_EVIDENCE_CHARS)
}

/// PDF generator pooling a single browser process across calls.
pub struct ReportGenerator {
    browser: Mutex<Option<Browser>>,
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            browser: Mutex::new(None),
        }
    }

    /// Render the report and print it to PDF bytes.
    pub async fn generate_pdf(
        &self,
        subject: &SubjectProfile,
        evaluation: &PersistedEvaluation,
        history: &[HistoryEntry],
    ) -> Result<Vec<u8>, ReportError> {
        if !validate_evaluation_data(&evaluation.result) {
            return Err(ReportError::InvalidEvaluation);
        }

        let html = render_report_html(subject, evaluation, history);
        let browser = self.browser_handle().await?;
        let data_url = format!("data:text/html;base64,{}", STANDARD.encode(html));

        let pdf = tokio::task::spawn_blocking(move || print_pdf(&browser, &data_url))
            .await
            .map_err(|e| ReportError::Browser(e.to_string()))??;

        info!(
            subject_id = %evaluation.subject_id,
            bytes = pdf.len(),
            "report PDF generated"
        );
        Ok(pdf)
    }

    /// Get the shared browser, launching it on first use.
    async fn browser_handle(&self) -> Result<Browser, ReportError> {
        let mut guard = self.browser.lock().await;
        if let Some(browser) = guard.as_ref() {
            return Ok(browser.clone());
        }

        debug!("launching headless browser");
        let browser = tokio::task::spawn_blocking(launch_browser)
            .await
            .map_err(|e| ReportError::Browser(e.to_string()))??;
        *guard = Some(browser.clone());
        Ok(browser)
    }

    /// Explicitly shut down the pooled browser process.
    pub async fn close_browser(&self) {
        let mut guard = self.browser.lock().await;
        if guard.take().is_some() {
            info!("headless browser closed");
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn launch_browser() -> Result<Browser, ReportError> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .build()
        .map_err(|e| ReportError::Browser(e.to_string()))?;
    Browser::new(options).map_err(|e| ReportError::Browser(e.to_string()))
}

fn print_pdf(browser: &Browser, data_url: &str) -> Result<Vec<u8>, ReportError> {
    let tab = browser
        .new_tab()
        .map_err(|e| ReportError::Browser(e.to_string()))?;

    let result = tab
        .navigate_to(data_url)
        .and_then(|tab| tab.wait_until_navigated())
        .and_then(|tab| {
            tab.print_to_pdf(Some(PrintToPdfOptions {
                print_background: Some(true),
                display_header_footer: Some(true),
                header_template: Some("<span></span>".to_string()),
                footer_template: Some(FOOTER_TEMPLATE.to_string()),
                paper_width: Some(PAPER_WIDTH_IN),
                paper_height: Some(PAPER_HEIGHT_IN),
                ..Default::default()
            }))
        })
        .map_err(|e| ReportError::Browser(e.to_string()));

    // Close the tab regardless of print outcome so pages never accumulate
    // in the pooled browser.
    let _ = tab.close(true);

    result
}
