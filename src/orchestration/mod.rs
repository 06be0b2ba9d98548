//! Orchestration layer for releasing a package
//!
//! Turns a release decision into a plan and drives the external release
//! steps for it.

pub mod pipeline;
pub mod plan;
pub mod release_publisher;

pub use pipeline::{PreparedRelease, check_tag, prepare_release, run_release};
pub use plan::{DocsPlan, ReleasePlan, StepKind};
pub use release_publisher::{
    PublishReport, ReleasePublisher, StepRecord, build_command, docs_deploy_command,
    host_release_command, registry_publish_command, release_tag,
};
