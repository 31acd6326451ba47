use std::ffi::OsString;

use super::{log_completion, log_parameters, utf8_arguments, workspace_argument};
use crate::encoder::exit::{self, DesktopProtocol, ExitStatus};
use crate::error::ValidationError;
use crate::services::{Outcome, OutcomeSimulator};
use crate::validation::{DESKTOP_V1, RequestParser, TypedValue};

pub const TITLE: &str = "FME Desktop V1 Mock";

static SIMULATOR: OutcomeSimulator = OutcomeSimulator::new(TITLE, "result_v1.txt");

/// Run the legacy `<workspace> --Name value ...` convention.
pub fn run(args: &[String]) -> ExitStatus {
    tracing::info!("{} - Reading {} arguments", TITLE, args.len());
    tracing::debug!("Arguments: {:?}", args);

    let status = exit::encode(&execute(args), DesktopProtocol::V1);
    log_completion(TITLE, &status);
    status
}

/// Run from the raw process arguments, without the program name.
pub fn run_os<I>(args: I) -> ExitStatus
where
    I: IntoIterator<Item = OsString>,
{
    match utf8_arguments(args) {
        Ok(args) => run(&args),
        Err(err) => {
            let status = exit::encode(&err.into(), DesktopProtocol::V1);
            log_completion(TITLE, &status);
            status
        }
    }
}

fn execute(args: &[String]) -> Outcome {
    let (workspace, flags) = match workspace_argument(args) {
        Ok(parsed) => parsed,
        Err(err) => return err.into(),
    };

    let request = match RequestParser::new(&DESKTOP_V1).parse_flags(flags) {
        Ok(request) => request,
        Err(err) => return err.into(),
    };

    log_parameters(&request);

    for name in DESKTOP_V1.optional_names() {
        if !request.contains(name) {
            tracing::warn!("No --{} parameter provided", name);
        }
    }

    if let Some(TypedValue::Json(serde_json::Value::Object(parameters))) =
        request.get("Parameters").map(|value| &value.typed)
    {
        tracing::info!("Custom parameters count: {}", parameters.len());
    }

    let Some(folder_out) = request
        .get("FolderOut")
        .and_then(|value| value.typed.as_path())
    else {
        return ValidationError::MissingParameters(vec!["FolderOut".to_string()]).into();
    };

    SIMULATOR.run(&workspace, folder_out, &request, &[])
}
