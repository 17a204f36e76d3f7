//! Scenario state and workspace initialisation for the notebook export BDD
//! tests.

use camino::Utf8PathBuf;
use ipynb_api::NotebookError;
use ipynb_api::export::test_helpers::NotebookBuilder;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;

/// Scenario state for notebook export tests.
#[derive(ScenarioState, Default)]
pub(crate) struct ExportState {
    pub(crate) workspace: Slot<TempDir>,
    pub(crate) notebook_name: Slot<String>,
    pub(crate) builder: Slot<NotebookBuilder>,
    pub(crate) output: Slot<String>,
    pub(crate) error: Slot<NotebookError>,
}

/// Ensures a temporary workspace exists and returns its path.
pub(crate) fn ensure_workspace(
    export_state: &ExportState,
) -> Result<Utf8PathBuf, Box<dyn std::error::Error>> {
    if export_state.workspace.with_ref(|_| ()).is_none() {
        export_state.workspace.set(TempDir::new()?);
    }

    let path = export_state
        .workspace
        .with_ref(|dir| dir.path().to_path_buf())
        .ok_or("workspace not initialised after set")?;
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| format!("non UTF-8 workspace path: {}", path.display()).into())
}

/// Applies `change` to the notebook under construction.
pub(crate) fn update_builder(
    export_state: &ExportState,
    change: impl FnOnce(NotebookBuilder) -> NotebookBuilder,
) -> Result<(), Box<dyn std::error::Error>> {
    let builder = export_state
        .builder
        .take()
        .ok_or("no notebook has been declared")?;
    export_state.builder.set(change(builder));
    Ok(())
}
