use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::ValidationError;
use crate::validation::{ARTIFACT_VALUE_LIMIT, ValidatedRequest, truncate};

/// Workspace stem suffix that forces a simulated upstream failure.
pub const FAILURE_SUFFIX: &str = "_fails";

/// Workspace stem suffix that succeeds without producing a result.
pub const NO_ARTIFACT_SUFFIX: &str = "_nofiles";

/// Identifier of the simulated job: a workspace or repository path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace(String);

impl Workspace {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self(identifier.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name without its final extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.0)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or_default()
    }

    pub fn verdict(&self) -> Verdict {
        let stem = self.stem();

        if stem.ends_with(FAILURE_SUFFIX) {
            Verdict::Fail
        } else if stem.ends_with(NO_ARTIFACT_SUFFIX) {
            Verdict::NoArtifact
        } else {
            Verdict::Produce
        }
    }
}

/// What the naming convention of a workspace asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Fail,
    NoArtifact,
    Produce,
}

/// Where a produced artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Written to the output directory of a desktop run.
    Written(PathBuf),
    /// Available from the download endpoint of the server doubles.
    Download(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub mime_type: &'static str,
    pub delivery: Delivery,
}

impl Artifact {
    /// Non-empty reference a client can use to retrieve the artifact.
    pub fn reference(&self) -> String {
        match &self.delivery {
            Delivery::Written(path) => path.display().to_string(),
            Delivery::Download(url) => url.clone(),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Success(Option<Artifact>),
    SimulatedFailure,
    ValidationFailure(ValidationError),
}

impl From<ValidationError> for Outcome {
    fn from(err: ValidationError) -> Self {
        Outcome::ValidationFailure(err)
    }
}

/// Decides the simulated result of a validated request and produces the
/// result file when one is due.
#[derive(Debug, Clone)]
pub struct OutcomeSimulator {
    title: &'static str,
    artifact_name: &'static str,
}

impl OutcomeSimulator {
    pub const fn new(title: &'static str, artifact_name: &'static str) -> Self {
        Self {
            title,
            artifact_name,
        }
    }

    /// Run a desktop job: fail, succeed silently or write the audit file in
    /// `folder_out`. `context` lines are written before the parameters.
    pub fn run(
        &self,
        workspace: &Workspace,
        folder_out: &Path,
        request: &ValidatedRequest,
        context: &[(&str, String)],
    ) -> Outcome {
        match workspace.verdict() {
            Verdict::Fail => {
                tracing::info!("Workspace {} simulates a failure", workspace.as_str());
                Outcome::SimulatedFailure
            }
            Verdict::NoArtifact => {
                tracing::info!("Workspace configured to produce no files");
                Outcome::Success(None)
            }
            Verdict::Produce => {
                let content = self.audit(workspace, request, context);
                match write_artifact(folder_out, self.artifact_name, content.as_bytes()) {
                    Ok(path) => {
                        tracing::info!("Created output file: {}", path.display());
                        Outcome::Success(Some(Artifact {
                            filename: self.artifact_name.to_string(),
                            mime_type: "text/plain",
                            delivery: Delivery::Written(path),
                        }))
                    }
                    Err(err) => Outcome::ValidationFailure(err),
                }
            }
        }
    }

    /// Server jobs never touch the local filesystem; the result is fetched
    /// later from `download_url`.
    pub fn publish(&self, workspace: &Workspace, download_url: String) -> Outcome {
        match workspace.verdict() {
            Verdict::Fail => {
                tracing::info!("Workspace {} simulates a failure", workspace.as_str());
                Outcome::SimulatedFailure
            }
            Verdict::NoArtifact | Verdict::Produce => Outcome::Success(Some(Artifact {
                filename: self.artifact_name.to_string(),
                mime_type: "application/zip",
                delivery: Delivery::Download(download_url),
            })),
        }
    }

    fn audit(
        &self,
        workspace: &Workspace,
        request: &ValidatedRequest,
        context: &[(&str, String)],
    ) -> String {
        let mut lines = vec![
            format!("{} - Execution successful", self.title),
            format!("Workspace: {}", workspace.as_str()),
        ];

        lines.extend(
            context
                .iter()
                .map(|(label, value)| format!("{}: {}", label, truncate(value, ARTIFACT_VALUE_LIMIT))),
        );

        lines.extend(
            request
                .iter()
                .map(|(name, value)| format!("{}: {}", name, truncate(&value.raw, ARTIFACT_VALUE_LIMIT))),
        );

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }
}

fn write_artifact(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf, ValidationError> {
    if !dir.is_dir() {
        return Err(ValidationError::OutputDirectoryMissing(dir.to_path_buf()));
    }

    let path = dir.join(filename);
    let mut writer = BufWriter::new(File::create(&path)?);
    writer.write_all(content)?;
    writer.flush()?;

    Ok(path)
}
