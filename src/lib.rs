//! drush_task: assemble, escape and run Drush command lines as a build step.

pub mod error;
pub mod cmd;
pub mod render;
pub mod exec;
pub mod props;
pub mod task;
pub mod config;
pub mod build;
pub mod prelude;
pub mod macros;

pub use error::DrushError;
