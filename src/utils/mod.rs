//! # Utility Modules
//!
//! ## Available Utilities
//!
//! - **Constants** (`constant`) - Defaults for the throttle and the server
//! - **Secrets** (`secret`) - Credential lookup from secret files or env
//! - **Validators** (`validator`) - Destination format checks

pub mod constant;
pub mod secret;
pub mod validator;
