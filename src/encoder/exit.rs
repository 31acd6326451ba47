use std::process::ExitCode;

use crate::error::ValidationError;
use crate::services::Outcome;
use crate::validation::FeatureError;

/// Exit codes shared by both desktop conventions.
pub mod code {
    pub const SUCCESS: u8 = 0;
    pub const NO_WORKSPACE: u8 = 10;
    pub const INVALID_WORKSPACE: u8 = 15;
    pub const SIMULATED_FAILURE: u8 = 100;
    pub const UNEXPECTED: u8 = 1;

    /// Legacy `--Name value` convention.
    pub mod v1 {
        pub const MISSING_FOLDER_OUT: u8 = 20;
        pub const MALFORMED_ARGUMENTS: u8 = 30;
        pub const OUTPUT_DIRECTORY_MISSING: u8 = 35;
        pub const INVALID_VALUE: u8 = 40;
        pub const MISSING_PARAMETERS: u8 = 50;
    }

    /// Parameters-file convention.
    pub mod v2 {
        pub const MISSING_PARAMETERS_FILE: u8 = 20;
        pub const PARAMETERS_FILE_NOT_FOUND: u8 = 25;
        pub const INVALID_JSON: u8 = 30;
        pub const INVALID_FEATURE: u8 = 35;
        pub const INVALID_PROPERTY: u8 = 40;
        pub const OUTPUT_DIRECTORY_MISSING: u8 = 50;
    }
}

pub const SIMULATED_FAILURE_MESSAGE: &str = "The FME workspace resulted in an error (simulated)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesktopProtocol {
    V1,
    V2,
}

/// How a desktop run terminates: exit code plus the line written to stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitStatus {
    pub code: u8,
    pub stderr: Option<String>,
}

impl ExitStatus {
    pub fn success() -> Self {
        Self {
            code: code::SUCCESS,
            stderr: None,
        }
    }

    pub fn failure(code: u8, message: impl Into<String>) -> Self {
        Self {
            code,
            stderr: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == code::SUCCESS
    }

    /// Print the failure line, if any, and hand back the process exit code.
    pub fn report(self) -> ExitCode {
        if let Some(message) = &self.stderr {
            eprintln!("{}", message);
        }
        ExitCode::from(self.code)
    }
}

pub fn encode(outcome: &Outcome, protocol: DesktopProtocol) -> ExitStatus {
    match outcome {
        Outcome::Success(_) => ExitStatus::success(),
        Outcome::SimulatedFailure => {
            ExitStatus::failure(code::SIMULATED_FAILURE, SIMULATED_FAILURE_MESSAGE)
        }
        Outcome::ValidationFailure(err) => {
            let exit_code = match protocol {
                DesktopProtocol::V1 => v1_code(err),
                DesktopProtocol::V2 => v2_code(err),
            };
            ExitStatus::failure(exit_code, failure_message(err, protocol))
        }
    }
}

fn failure_message(err: &ValidationError, protocol: DesktopProtocol) -> String {
    match (protocol, err) {
        (DesktopProtocol::V1, ValidationError::MissingParameters(_)) if err.is_missing("FolderOut") => {
            "Missing --FolderOut parameter".to_string()
        }
        (DesktopProtocol::V2, ValidationError::MissingParameters(_))
            if err.is_missing("parametersFile") =>
        {
            "No --parametersFile argument provided".to_string()
        }
        _ => err.to_string(),
    }
}

fn v1_code(err: &ValidationError) -> u8 {
    match err {
        ValidationError::MissingWorkspace => code::NO_WORKSPACE,
        ValidationError::InvalidWorkspace(_) => code::INVALID_WORKSPACE,
        ValidationError::MissingParameters(_) if err.is_missing("FolderOut") => {
            code::v1::MISSING_FOLDER_OUT
        }
        ValidationError::MissingParameters(_) => code::v1::MISSING_PARAMETERS,
        ValidationError::PositionalArgument(_)
        | ValidationError::MissingValue(_)
        | ValidationError::DuplicateParameter(_) => code::v1::MALFORMED_ARGUMENTS,
        ValidationError::InvalidValue { .. } => code::v1::INVALID_VALUE,
        ValidationError::OutputDirectoryMissing(_) | ValidationError::ArtifactWrite(_) => {
            code::v1::OUTPUT_DIRECTORY_MISSING
        }
        _ => code::UNEXPECTED,
    }
}

fn v2_code(err: &ValidationError) -> u8 {
    match err {
        ValidationError::MissingWorkspace => code::NO_WORKSPACE,
        ValidationError::InvalidWorkspace(_) => code::INVALID_WORKSPACE,
        ValidationError::MissingParameters(_) if err.is_missing("parametersFile") => {
            code::v2::MISSING_PARAMETERS_FILE
        }
        ValidationError::PositionalArgument(_)
        | ValidationError::MissingValue(_)
        | ValidationError::DuplicateParameter(_) => code::v2::MISSING_PARAMETERS_FILE,
        ValidationError::InvalidValue { name, .. } if name == "parametersFile" => {
            code::v2::MISSING_PARAMETERS_FILE
        }
        ValidationError::ParametersFileNotFound(_) => code::v2::PARAMETERS_FILE_NOT_FOUND,
        ValidationError::InvalidJson(_) => code::v2::INVALID_JSON,
        ValidationError::InvalidFeature(FeatureError::MissingProperty(_))
        | ValidationError::MissingParameters(_)
        | ValidationError::InvalidValue { .. } => code::v2::INVALID_PROPERTY,
        ValidationError::InvalidFeature(_) => code::v2::INVALID_FEATURE,
        ValidationError::OutputDirectoryMissing(_) | ValidationError::ArtifactWrite(_) => {
            code::v2::OUTPUT_DIRECTORY_MISSING
        }
        ValidationError::Unauthorized(_) => code::UNEXPECTED,
    }
}
