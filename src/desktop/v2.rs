use std::ffi::OsString;
use std::path::Path;

use super::{log_completion, log_parameters, utf8_arguments, workspace_argument};
use crate::encoder::exit::{self, DesktopProtocol, ExitStatus};
use crate::error::ValidationError;
use crate::services::{Outcome, OutcomeSimulator, Workspace};
use crate::validation::{
    DESKTOP_V2_ARGS, DESKTOP_V2_PROPERTIES, GeoJsonFeature, RequestParser, ValidatedRequest,
    validate_feature,
};

pub const TITLE: &str = "FME Desktop V2 Mock";

static SIMULATOR: OutcomeSimulator = OutcomeSimulator::new(TITLE, "result_v2.txt");

/// Run the `<workspace> --parametersFile <path>` convention.
pub fn run(args: &[String]) -> ExitStatus {
    tracing::info!("{} - Reading {} arguments: {:?}", TITLE, args.len(), args);

    let status = exit::encode(&execute(args), DesktopProtocol::V2);
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
            let status = exit::encode(&err.into(), DesktopProtocol::V2);
            log_completion(TITLE, &status);
            status
        }
    }
}

fn execute(args: &[String]) -> Outcome {
    match prepare(args) {
        Ok(job) => SIMULATOR.run(
            &job.workspace,
            Path::new(&job.folder_out),
            &job.request,
            &job.context,
        ),
        Err(err) => err.into(),
    }
}

struct Job {
    workspace: Workspace,
    folder_out: String,
    request: ValidatedRequest,
    context: Vec<(&'static str, String)>,
}

fn prepare(args: &[String]) -> Result<Job, ValidationError> {
    let (workspace, flags) = workspace_argument(args)?;

    let arguments = RequestParser::new(&DESKTOP_V2_ARGS).parse_flags(flags)?;
    let parameters_file = arguments.raw("parametersFile").unwrap_or_default().to_string();
    tracing::info!("Parameters file: {}", parameters_file);

    let feature = read_feature(Path::new(&parameters_file))?;
    tracing::info!("GeoJSON Feature structure is valid");

    let request = RequestParser::new(&DESKTOP_V2_PROPERTIES).parse_mapping(&feature.property_entries())?;
    log_parameters(&request);

    for name in feature.properties.keys() {
        if DESKTOP_V2_PROPERTIES.spec(name).is_none() {
            tracing::debug!("Ignoring legacy property {}", name);
        }
    }

    if let Some(serde_json::Value::Object(parameters)) = feature.properties.get("Parameters") {
        tracing::info!("Parameters count: {}", parameters.len());
    }

    let mut context = vec![("Parameters file", parameters_file)];
    match feature.geometry_kind() {
        Some(kind) => {
            tracing::info!("Geometry type: {}", kind);
            context.push(("Geometry type", kind.to_string()));
        }
        None => tracing::info!("Geometry: null"),
    }

    let folder_out = request.raw("FolderOut").unwrap_or_default().to_string();

    Ok(Job {
        workspace,
        folder_out,
        request,
        context,
    })
}

fn read_feature(path: &Path) -> Result<GeoJsonFeature, ValidationError> {
    if !path.is_file() {
        return Err(ValidationError::ParametersFileNotFound(path.to_path_buf()));
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;

    let document: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| ValidationError::InvalidJson(e.to_string()))?;
    tracing::info!("Successfully parsed parameters file");

    validate_feature(&document, &DESKTOP_V2_PROPERTIES.required_names())
        .map_err(ValidationError::from)
}
