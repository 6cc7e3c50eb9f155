//! CargaSegura load assistant: wiring of the load session, the advisory
//! runtime and the command-line surface.

pub mod bootstrap;
pub mod cli;
pub mod runtime;
pub mod state;
