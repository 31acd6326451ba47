pub mod archive;
pub mod outcome;

pub use outcome::{
    Artifact, Delivery, Outcome, OutcomeSimulator, Verdict, Workspace, FAILURE_SUFFIX,
    NO_ARTIFACT_SUFFIX,
};
