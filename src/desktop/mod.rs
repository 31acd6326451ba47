pub mod v1;
pub mod v2;

use std::ffi::OsString;

use crate::encoder::ExitStatus;
use crate::error::ValidationError;
use crate::services::Workspace;
use crate::validation::{FLAG_PREFIX, LOG_VALUE_LIMIT, TypeKind, ValidatedRequest, truncate, validate};

/// Split the workspace off the argument list.
fn workspace_argument(args: &[String]) -> Result<(Workspace, &[String]), ValidationError> {
    let (first, rest) = args.split_first().ok_or(ValidationError::MissingWorkspace)?;

    if first.starts_with(FLAG_PREFIX) || !validate(TypeKind::FilesystemPath, first) {
        return Err(ValidationError::InvalidWorkspace(first.clone()));
    }

    tracing::info!("Workspace: {}", first);
    Ok((Workspace::new(first.as_str()), rest))
}

/// Convert raw process arguments to strings. A workspace that is not valid
/// UTF-8 is an invalid workspace, a flag value is an invalid value for that
/// flag and anything else is a stray positional argument.
fn utf8_arguments<I>(args: I) -> Result<Vec<String>, ValidationError>
where
    I: IntoIterator<Item = OsString>,
{
    let mut converted: Vec<String> = Vec::new();
    for arg in args {
        let raw = match arg.into_string() {
            Ok(value) => {
                converted.push(value);
                continue;
            }
            Err(raw) => raw.to_string_lossy().into_owned(),
        };

        return Err(match converted.last() {
            None => ValidationError::InvalidWorkspace(raw),
            Some(previous) if converted.len() > 1 && previous.starts_with(FLAG_PREFIX) => {
                let name = previous[FLAG_PREFIX.len()..].to_string();
                ValidationError::InvalidValue {
                    message: format!("Value for parameter {} is not valid UTF-8: {}", name, raw),
                    name,
                }
            }
            Some(_) => ValidationError::PositionalArgument(raw),
        });
    }
    Ok(converted)
}

fn log_parameters(request: &ValidatedRequest) {
    tracing::info!("Parsed parameters:");
    for (name, value) in request.iter() {
        tracing::info!("  {}: {}", name, truncate(&value.raw, LOG_VALUE_LIMIT));
    }
}

fn log_completion(title: &str, status: &ExitStatus) {
    if status.is_success() {
        tracing::info!("{} - Execution completed successfully", title);
    } else {
        tracing::debug!("{} - Exiting with code {}", title, status.code);
    }
}
