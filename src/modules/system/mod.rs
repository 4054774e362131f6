//! Packages, services and host facts

pub mod host;
pub mod package_managers;
pub mod service_managers;
