pub mod manifest;

pub use manifest::{PackageInfo, parse_package_info, read_package_info};
