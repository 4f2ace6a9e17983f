//! Implements InputPort. Inquire-based interactive session.
//!
//! Menu loop: paste text / attach PDF / analyze / download report. Results are drawn
//! with the animated gauge followed by the four feedback panels.

use super::gauge::{GaugeAnimator, render_lines};
use super::notifier::TerminalNotifier;
use super::results::ResultView;
use crate::domain::{DomainError, ResumeDocument, ResumeInput};
use crate::ports::InputPort;
use crate::usecases::{AnalysisOrchestrator, SubmitOutcome};
use async_trait::async_trait;
use crossterm::QueueableCommand;
use crossterm::cursor::MoveUp;
use crossterm::style::{Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use indicatif::{ProgressBar, ProgressStyle};
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::validator::Validation;
use inquire::{CustomUserError, Editor, InquireError, Select, Text};
use std::fmt;
use std::io::{Write, stdout};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Applies the prompt theme globally for all inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("›").with_fg(Color::LightBlue))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightMagenta));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    PasteText,
    AttachDocument,
    Analyze,
    DownloadReport,
    ClearInput,
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::PasteText => "Paste resume text",
            MenuAction::AttachDocument => "Upload a PDF",
            MenuAction::Analyze => "Analyze Resume",
            MenuAction::DownloadReport => "Download Detailed Report",
            MenuAction::ClearInput => "Clear input",
            MenuAction::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Menu entries for the current state. Analyze is hidden while a request is pending;
/// the report entry only appears once there is a result.
fn menu_options(pending: bool, has_result: bool) -> Vec<MenuAction> {
    let mut options = vec![MenuAction::PasteText, MenuAction::AttachDocument];
    if !pending {
        options.push(MenuAction::Analyze);
    }
    if has_result {
        options.push(MenuAction::DownloadReport);
    }
    options.push(MenuAction::ClearInput);
    options.push(MenuAction::Quit);
    options
}

fn describe_input(input: &ResumeInput) -> String {
    match input {
        ResumeInput::Empty => "no resume yet".to_string(),
        ResumeInput::Text(text) => format!(
            "pasted text ({} words)",
            text.split_whitespace().count()
        ),
        ResumeInput::Document(d) => format!("{} ({} KB)", d.file_name, d.bytes.len().div_ceil(1024)),
    }
}

/// Accepts existing files ending in `.pdf`. Surrounding quotes (drag and drop) are ignored.
fn validate_pdf_path(raw: &str) -> Validation {
    let path = Path::new(clean_path(raw));
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        Validation::Invalid("Only PDF files are accepted".into())
    } else if !path.is_file() {
        Validation::Invalid("File not found".into())
    } else {
        Validation::Valid
    }
}

fn pdf_validator(input: &str) -> Result<Validation, CustomUserError> {
    Ok(validate_pdf_path(input))
}

fn clean_path(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'')
}

fn is_cancel(e: &InquireError) -> bool {
    matches!(
        e,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// TUI adapter. Inquire prompts over the orchestrator.
pub struct TuiInputPort {
    orchestrator: Arc<AnalysisOrchestrator>,
    /// Same notifier the orchestrator reports through; drained between prompts.
    notifier: Arc<TerminalNotifier>,
    /// Background report downloads. Awaited before `run` returns.
    exports: Mutex<JoinSet<()>>,
}

impl TuiInputPort {
    pub fn new(orchestrator: Arc<AnalysisOrchestrator>, notifier: Arc<TerminalNotifier>) -> Self {
        Self {
            orchestrator,
            notifier,
            exports: Mutex::new(JoinSet::new()),
        }
    }

    fn exports(&self) -> std::sync::MutexGuard<'_, JoinSet<()>> {
        self.exports.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn show_notices(&self) {
        if let Err(e) = self.notifier.flush_to(&mut stdout()) {
            warn!(error = %e, "failed to print notices");
        }
    }

    fn paste_text(&self) -> Result<(), DomainError> {
        let current = self.orchestrator.input();
        let answer = Editor::new("Paste your resume here...")
            .with_predefined_text(current.text())
            .with_file_extension(".txt")
            .prompt();
        match answer {
            Ok(text) => {
                self.orchestrator.set_text(text);
                Ok(())
            }
            Err(e) if is_cancel(&e) => Ok(()),
            Err(e) => Err(DomainError::Ui(e.to_string())),
        }
    }

    async fn attach_document(&self) -> Result<(), DomainError> {
        let answer = Text::new("Path to resume PDF:")
            .with_validator(pdf_validator)
            .prompt();
        let raw = match answer {
            Ok(raw) => raw,
            Err(e) if is_cancel(&e) => return Ok(()),
            Err(e) => return Err(DomainError::Ui(e.to_string())),
        };

        let path = Path::new(clean_path(&raw));
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| DomainError::Io(format!("read {}: {}", path.display(), e)))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.pdf".to_string());
        self.orchestrator
            .set_document(ResumeDocument::pdf(file_name, bytes));
        Ok(())
    }

    async fn analyze(&self) -> Result<(), DomainError> {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Analyzing...");
        spinner.enable_steady_tick(Duration::from_millis(80));

        let outcome = self.orchestrator.submit().await;
        spinner.finish_and_clear();
        self.show_notices();

        if let SubmitOutcome::Analyzed(result) = outcome {
            show_results(&ResultView::from_result(&result)).await?;
        }
        Ok(())
    }

    /// Runs in the background so the menu stays usable while the report downloads.
    fn download_report(&self) {
        let orchestrator = Arc::clone(&self.orchestrator);
        info!("report download started");
        let mut exports = self.exports();
        while exports.try_join_next().is_some() {}
        exports.spawn(async move {
            orchestrator.export_report().await;
        });
    }

    /// Wait for in-flight downloads so quitting never drops a report half-written.
    async fn finish_exports(&self) {
        let mut exports = std::mem::take(&mut *self.exports());
        if !exports.is_empty() {
            info!(count = exports.len(), "waiting for report download to finish");
        }
        while let Some(joined) = exports.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "report download task failed");
            }
        }
    }

    async fn menu_loop(&self) -> Result<(), DomainError> {
        loop {
            self.show_notices();
            let input = self.orchestrator.input();
            println!("{} {}", "Resume:".dark_grey(), describe_input(&input));

            let options = menu_options(
                self.orchestrator.is_pending(),
                self.orchestrator.result().is_some(),
            );
            let action = match Select::new("What would you like to do?", options).prompt() {
                Ok(action) => action,
                Err(e) if is_cancel(&e) => break,
                Err(e) => return Err(DomainError::Ui(e.to_string())),
            };

            let step = match action {
                MenuAction::PasteText => self.paste_text(),
                MenuAction::AttachDocument => self.attach_document().await,
                MenuAction::Analyze => self.analyze().await,
                MenuAction::DownloadReport => {
                    self.download_report();
                    Ok(())
                }
                MenuAction::ClearInput => {
                    self.orchestrator.clear_input();
                    Ok(())
                }
                MenuAction::Quit => break,
            };
            if let Err(e) = step {
                warn!(error = %e, "menu action failed");
                println!("{}", e.to_string().red());
            }
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let outcome = self.menu_loop().await;
        self.finish_exports().await;
        self.show_notices();
        outcome
    }
}

/// Animate the gauge in place, then print the panels below it.
async fn show_results(view: &ResultView) -> Result<(), DomainError> {
    let mut animator = GaugeAnimator::new();
    let mut frames = animator.subscribe();
    animator.set_target(view.score_target);

    let mut out = stdout();
    let mut drawn: u16 = 0;
    loop {
        let frame = *frames.borrow_and_update();
        let lines = render_lines(&frame);
        draw_in_place(&mut out, &lines, drawn).map_err(|e| DomainError::Ui(e.to_string()))?;
        drawn = lines.len() as u16;
        if frame.done || frames.changed().await.is_err() {
            break;
        }
    }
    drop(animator);

    let mut text = String::from("\r\n");
    for panel in &view.panels {
        for line in panel.render() {
            text.push_str(&line);
            text.push_str("\r\n");
        }
        text.push_str("\r\n");
    }
    out.queue(Print(text))
        .and_then(|o| o.flush())
        .map_err(|e| DomainError::Ui(e.to_string()))
}

fn draw_in_place(out: &mut impl Write, lines: &[String], previous: u16) -> std::io::Result<()> {
    if previous > 0 {
        out.queue(MoveUp(previous))?;
    }
    for line in lines {
        out.queue(Clear(ClearType::CurrentLine))?;
        out.queue(Print(line))?;
        out.queue(Print("\r\n"))?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::persistence::FsReportSink;
    use crate::domain::{AnalysisRequest, AnalysisResult, Notice, ReportDocument};
    use crate::ports::AnalysisPort;

    /// Instant analysis, slow report.
    struct SlowReport;

    #[async_trait]
    impl AnalysisPort for SlowReport {
        async fn analyze(&self, _: &AnalysisRequest) -> Result<AnalysisResult, DomainError> {
            Ok(AnalysisResult {
                ats_score: 70,
                strengths: vec!["Python".into()],
                weaknesses: vec![],
                missing_skills: vec![],
                improvement_suggestions: vec![],
            })
        }

        async fn render_report(&self, _: &AnalysisResult) -> Result<ReportDocument, DomainError> {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(ReportDocument {
                extension: "md".into(),
                bytes: b"# Report".to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn test_quit_waits_for_report_download() {
        let dir = tempfile::tempdir().unwrap();
        let notifier = Arc::new(TerminalNotifier::new());
        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            Arc::new(SlowReport),
            Arc::new(FsReportSink::new(dir.path())),
            notifier.clone(),
        ));
        orchestrator.set_text("Senior engineer, 10 years Python");
        assert!(matches!(
            orchestrator.submit().await,
            SubmitOutcome::Analyzed(_)
        ));

        let tui = TuiInputPort::new(Arc::clone(&orchestrator), Arc::clone(&notifier));
        tui.download_report();
        tui.finish_exports().await;

        let saved = dir.path().join("resume-analysis-report.md");
        assert_eq!(std::fs::read(&saved).unwrap(), b"# Report");
        assert!(!orchestrator.is_exporting());
        assert_eq!(notifier.take_pending(), vec![Notice::ReportSaved(saved)]);
    }

    #[tokio::test]
    async fn test_finish_exports_without_downloads() {
        let orchestrator = Arc::new(AnalysisOrchestrator::new(
            Arc::new(SlowReport),
            Arc::new(FsReportSink::new(".")),
            Arc::new(TerminalNotifier::new()),
        ));
        let tui = TuiInputPort::new(orchestrator, Arc::new(TerminalNotifier::new()));
        tui.finish_exports().await;
        assert!(tui.exports().is_empty());
    }

    #[test]
    fn test_menu_hides_analyze_while_pending() {
        let options = menu_options(true, false);
        assert!(!options.contains(&MenuAction::Analyze));
        assert!(!options.contains(&MenuAction::DownloadReport));
    }

    #[test]
    fn test_menu_offers_report_with_result() {
        let options = menu_options(false, true);
        assert!(options.contains(&MenuAction::Analyze));
        assert!(options.contains(&MenuAction::DownloadReport));
        assert_eq!(options.last(), Some(&MenuAction::Quit));
    }

    #[test]
    fn test_validate_pdf_path() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("cv.PDF");
        std::fs::write(&pdf, b"%PDF").unwrap();
        let txt = dir.path().join("cv.txt");
        std::fs::write(&txt, b"text").unwrap();

        let quoted = format!("'{}'", pdf.display());
        assert!(matches!(validate_pdf_path(&quoted), Validation::Valid));
        assert!(matches!(
            validate_pdf_path(&txt.display().to_string()),
            Validation::Invalid(_)
        ));
        let missing = dir.path().join("missing.pdf");
        assert!(matches!(
            validate_pdf_path(&missing.display().to_string()),
            Validation::Invalid(_)
        ));
    }

    #[test]
    fn test_describe_input() {
        assert_eq!(describe_input(&ResumeInput::Empty), "no resume yet");
        assert_eq!(
            describe_input(&ResumeInput::Text("Senior Engineer, 10 years Python".into())),
            "pasted text (5 words)"
        );
        let doc = ResumeDocument::pdf("cv.pdf", vec![0; 1500]);
        assert_eq!(describe_input(&ResumeInput::Document(doc)), "cv.pdf (2 KB)");
    }

    #[test]
    fn test_draw_in_place_moves_cursor_back() {
        let mut first = Vec::new();
        draw_in_place(&mut first, &["a".to_string(), "b".to_string()], 0).unwrap();
        let mut redraw = Vec::new();
        draw_in_place(&mut redraw, &["a".to_string(), "b".to_string()], 2).unwrap();
        assert!(redraw.len() > first.len());
        assert!(String::from_utf8_lossy(&first).contains('a'));
    }
}
