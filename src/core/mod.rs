/// Core Module for dbfacade
///
/// This module contains the fundamental components shared by the rest of the
/// crate. Currently that is the error infrastructure; everything else lives
/// in the feature modules at the crate root.

pub mod error;

// Re-export commonly used types for convenience
pub use error::{FacadeError, Result};
