//! Support modules for the notebook export BDD tests.

pub(crate) mod state;

pub(crate) use state::{ExportState, ensure_workspace, update_builder};
