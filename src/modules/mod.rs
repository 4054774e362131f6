//! Host resource operations built on the execution engine

pub mod error;
pub mod files;
pub mod system;

pub use error::ModuleError;
pub use files::wait::{wait_for_file_to_be_created, wait_for_file_to_be_unchanged};
pub use system::host;
pub use system::package_managers::{
    batch_exit_code, parse_installed_state, AptPackageManager, InstallOptions, PackageManager,
    PackageResult,
};
pub use system::service_managers::{ServiceManager, ServiceResult, SystemServiceManager};
