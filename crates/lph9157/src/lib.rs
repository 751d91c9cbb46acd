#![cfg(target_os = "linux")]

pub use crate::args::get_args as args;
pub use crate::draw::run;
pub use crate::error::CliError;

pub(crate) mod args;
pub(crate) mod draw;
pub(crate) mod error;
