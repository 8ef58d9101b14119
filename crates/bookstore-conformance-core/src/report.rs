// crates/bookstore-conformance-core/src/report.rs
// ============================================================================
// Module: Scenario Reporting
// Description: Step grouping and typed artifact capture for scenario runs.
// Purpose: Persist deterministic diagnostic artifacts and run summaries.
// Dependencies: serde, serde_jcs
// ============================================================================

//! ## Overview
//! Reporting is an explicit collaborator: the scenario receives a
//! [`Reporter`] and attaches named, typed artifacts as it executes. The
//! filesystem implementation writes JSON artifacts as canonical JCS bytes so
//! two runs against an unchanged target produce byte-identical artifacts,
//! and finalizes a summary even when a run panics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Artifact Types
// ============================================================================

/// Artifact content type, selecting the file extension on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Plain UTF-8 text.
    Text,
    /// JSON content, stored verbatim as provided.
    Json,
}

impl ArtifactKind {
    /// Returns the file extension for this artifact kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
        }
    }
}

/// Reporting errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The run root could not be created.
    #[error("failed to create run root {path}: {source}")]
    CreateRoot {
        /// Run root path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// An artifact could not be written.
    #[error("failed to write artifact {name}: {source}")]
    Write {
        /// Artifact name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A summary value could not be encoded as canonical JSON.
    #[error("failed to encode {name}: {reason}")]
    Encode {
        /// Artifact name.
        name: String,
        /// Encoder diagnostic.
        reason: String,
    },
}

// ============================================================================
// SECTION: Reporter Interface
// ============================================================================

/// Explicit reporting surface handed to the scenario.
///
/// Implementations group attachments under the most recently begun step and
/// persist them under a per-run root.
pub trait Reporter {
    /// Begins a named step; subsequent attachments belong to it.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when step bookkeeping cannot be recorded.
    fn begin_step(&mut self, title: &str) -> Result<(), ReportError>;

    /// Attaches a named, typed artifact to the current step.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the artifact cannot be persisted.
    fn attach(&mut self, name: &str, kind: ArtifactKind, content: &str) -> Result<(), ReportError>;
}

// ============================================================================
// SECTION: Run Artifacts
// ============================================================================

/// Returns milliseconds since the unix epoch.
fn now_millis() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Returns the default run root for a scenario.
fn default_run_root(scenario: &str) -> PathBuf {
    let stamp = now_millis();
    PathBuf::from("target/bookstore-conformance").join(format!("run_{stamp}")).join(scenario)
}

/// Maps an artifact display name to a deterministic file name.
///
/// Alphanumerics are lowercased; every other character becomes `_`, so
/// `"Request URL"` lands at `request_url.txt`.
#[must_use]
pub fn artifact_file_name(name: &str, kind: ArtifactKind) -> String {
    let stem: String = name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch.to_ascii_lowercase() } else { '_' })
        .collect();
    format!("{stem}.{}", kind.extension())
}

/// Artifact store for a single scenario run.
#[derive(Debug, Clone)]
pub struct RunArtifacts {
    /// Directory receiving every artifact of this run.
    root: PathBuf,
}

impl RunArtifacts {
    /// Creates the artifact root, making directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::CreateRoot`] when the directory cannot be
    /// created.
    pub fn new(root: PathBuf) -> Result<Self, ReportError> {
        fs::create_dir_all(&root).map_err(|source| ReportError::CreateRoot {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self {
            root,
        })
    }

    /// Returns the root directory for the run artifacts.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a named artifact and returns its file name.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Write`] when the file cannot be written.
    pub fn write_artifact(
        &self,
        name: &str,
        kind: ArtifactKind,
        content: &str,
    ) -> Result<String, ReportError> {
        let file_name = artifact_file_name(name, kind);
        let path = self.root.join(&file_name);
        fs::write(&path, content.as_bytes()).map_err(|source| ReportError::Write {
            name: name.to_string(),
            source,
        })?;
        Ok(file_name)
    }

    /// Writes a value as a canonical JSON artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when encoding or writing fails.
    pub fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> Result<(), ReportError> {
        let bytes = serde_jcs::to_vec(value).map_err(|err| ReportError::Encode {
            name: file_name.to_string(),
            reason: err.to_string(),
        })?;
        let path = self.root.join(file_name);
        fs::write(&path, bytes).map_err(|source| ReportError::Write {
            name: file_name.to_string(),
            source,
        })
    }

    /// Writes a text file under the run root.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Write`] when the file cannot be written.
    pub fn write_text(&self, file_name: &str, value: &str) -> Result<(), ReportError> {
        let path = self.root.join(file_name);
        fs::write(&path, value.as_bytes()).map_err(|source| ReportError::Write {
            name: file_name.to_string(),
            source,
        })
    }
}

// ============================================================================
// SECTION: Filesystem Reporter
// ============================================================================

/// One recorded step and the artifacts attached under it.
#[derive(Debug, Clone, Serialize)]
struct StepSummary {
    /// Step title.
    title: String,
    /// File names of artifacts attached during the step.
    artifacts: Vec<String>,
}

/// Serialized run summary, written as `summary.json` and `summary.md`.
#[derive(Debug, Serialize)]
struct RunSummary {
    /// Scenario name.
    scenario: String,
    /// Feature tag grouping the scenario.
    feature: String,
    /// Category label for selective execution.
    category: String,
    /// Final status string.
    status: String,
    /// Start time in unix milliseconds.
    started_at_ms: u128,
    /// End time in unix milliseconds.
    ended_at_ms: u128,
    /// Elapsed milliseconds.
    duration_ms: u128,
    /// Recorded steps in execution order.
    steps: Vec<StepSummary>,
    /// Free-form notes supplied at finish time.
    notes: Vec<String>,
}

/// Filesystem-backed reporter that writes summaries even when a run panics.
pub struct FsReporter {
    /// Artifact store for this run.
    artifacts: RunArtifacts,
    /// Scenario name.
    scenario: String,
    /// Feature tag grouping the scenario.
    feature: String,
    /// Category label for selective execution.
    category: String,
    /// Start time in unix milliseconds.
    started_at_ms: u128,
    /// Recorded steps in execution order.
    steps: Vec<StepSummary>,
    /// Whether a summary has been written.
    finalized: bool,
}

impl FsReporter {
    /// Creates a reporter for the named scenario.
    ///
    /// When `run_root` is `None` a timestamped directory under
    /// `target/bookstore-conformance` is used.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the run root cannot be created.
    pub fn new(
        scenario: &str,
        feature: &str,
        category: &str,
        run_root: Option<PathBuf>,
    ) -> Result<Self, ReportError> {
        let root = run_root.unwrap_or_else(|| default_run_root(scenario));
        Ok(Self {
            artifacts: RunArtifacts::new(root)?,
            scenario: scenario.to_string(),
            feature: feature.to_string(),
            category: category.to_string(),
            started_at_ms: now_millis(),
            steps: Vec::new(),
            finalized: false,
        })
    }

    /// Returns the artifact store.
    #[must_use]
    pub const fn artifacts(&self) -> &RunArtifacts {
        &self.artifacts
    }

    /// Writes the final summary for the run.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when a summary file cannot be written.
    pub fn finish(&mut self, status: &str, notes: Vec<String>) -> Result<(), ReportError> {
        let ended_at_ms = now_millis();
        let summary = RunSummary {
            scenario: self.scenario.clone(),
            feature: self.feature.clone(),
            category: self.category.clone(),
            status: status.to_string(),
            started_at_ms: self.started_at_ms,
            ended_at_ms,
            duration_ms: ended_at_ms.saturating_sub(self.started_at_ms),
            steps: self.steps.clone(),
            notes,
        };
        self.artifacts.write_json("summary.json", &summary)?;
        self.artifacts.write_text("summary.md", &summary_markdown(&summary))?;
        self.finalized = true;
        Ok(())
    }
}

impl Reporter for FsReporter {
    fn begin_step(&mut self, title: &str) -> Result<(), ReportError> {
        self.steps.push(StepSummary {
            title: title.to_string(),
            artifacts: Vec::new(),
        });
        Ok(())
    }

    fn attach(&mut self, name: &str, kind: ArtifactKind, content: &str) -> Result<(), ReportError> {
        let file_name = self.artifacts.write_artifact(name, kind, content)?;
        if self.steps.is_empty() {
            self.begin_step("scenario")?;
        }
        if let Some(step) = self.steps.last_mut() {
            step.artifacts.push(file_name);
        }
        Ok(())
    }
}

impl Drop for FsReporter {
    fn drop(&mut self) {
        if self.finalized {
            return;
        }
        let status = if std::thread::panicking() { "panic" } else { "unknown" };
        let _ = self.finish(
            status,
            vec!["scenario terminated without explicit summary".to_string()],
        );
    }
}

/// Renders a run summary as markdown.
fn summary_markdown(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("# Scenario Summary\n\n");
    out.push_str("## Status\n\n");
    out.push_str(&format!("- Scenario: {}\n", summary.scenario));
    out.push_str(&format!("- Feature: {}\n", summary.feature));
    out.push_str(&format!("- Category: {}\n", summary.category));
    out.push_str(&format!("- Status: {}\n", summary.status));
    out.push_str(&format!("- Duration (ms): {}\n", summary.duration_ms));
    out.push_str("\n## Steps\n\n");
    if summary.steps.is_empty() {
        out.push_str("- None\n");
    } else {
        for step in &summary.steps {
            out.push_str(&format!("- {}\n", step.title));
            for artifact in &step.artifacts {
                out.push_str(&format!("  - {artifact}\n"));
            }
        }
    }
    out.push_str("\n## Notes\n\n");
    if summary.notes.is_empty() {
        out.push_str("- None\n");
    } else {
        for note in &summary.notes {
            out.push_str(&format!("- {note}\n"));
        }
    }
    out
}
