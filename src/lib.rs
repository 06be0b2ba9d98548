pub mod core;
pub mod decision;
pub mod orchestration;
pub mod registry;
pub mod security;
pub mod ui;
pub mod validation;
pub mod version;

pub use core::{ConfigLoadOptions, ConfigLoader, ReleaseConfig, ReleaseError, Result};
pub use decision::{PackageVersionInfo, decide};
pub use orchestration::{
    DocsPlan, PreparedRelease, PublishReport, ReleasePlan, ReleasePublisher, StepKind,
    StepRecord, check_tag, prepare_release, run_release,
};
pub use registry::{PyPiRegistry, RegistryClient, fetch_history};
pub use security::{CommandError, CommandRunner, ExternalCommand, SafeCommandExecutor};
pub use validation::{PackageInfo, read_package_info};
pub use version::{PrereleaseType, Version};
