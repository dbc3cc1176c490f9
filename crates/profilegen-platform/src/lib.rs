mod environment;
mod packages;
mod paths;

pub use environment::{HostArch, expand_env_template, local_app_data_dir};
pub use packages::{PackageQuery, PackageQueryError, SystemPackageQuery};
pub use paths::{AppPaths, AppPathsError};
