//! Application services: page sections and the assembly entry point.

pub mod blog;
pub mod contact;
pub mod error;
pub mod navigation;
pub mod publications;
pub mod site;
pub mod source;
