//! Modalità non interattiva
//!
//! Stesso flusso della schermata del catalogo, guidato dalla riga di comando:
//! utile negli script e per provare un catalogo senza aprire la TUI.

use anyhow::Result;
use log::info;

use crate::catalog::{CatalogItem, EMPTY_PLACEHOLDER};
use crate::config::Config;
use crate::controller::SelectionController;
use crate::error::CatalogError;
use crate::navigation::RouteRecorder;
use crate::store::FileStore;

/// Esito della selezione non interattiva
#[derive(Debug)]
pub struct HeadlessOutcome {
    pub selected: Vec<CatalogItem>,
    pub route: Option<String>,
}

fn new_controller(config: &Config) -> SelectionController<FileStore, RouteRecorder> {
    SelectionController::new(FileStore::from_config(config), RouteRecorder::new())
        .with_next_route(config.catalog.next_route.clone())
        .with_resync_after_commit(config.catalog.resync_after_commit)
}

/// Elenca il catalogo, una riga per sorgente
pub fn list_catalog(config: &Config) -> Result<String> {
    let mut controller = new_controller(config);
    controller.initialize()?;

    let catalog = controller.catalog();
    if catalog.is_empty() {
        return Ok(format!("{}\n", EMPTY_PLACEHOLDER));
    }

    let mut output = String::new();
    for (idx, item) in catalog.items().iter().enumerate() {
        output.push_str(&format!("{:>3} {}", idx, item.format_for_list()));
        if !item.logo.is_empty() {
            output.push_str(&format!("  {}", item.logo));
        }
        output.push('\n');
    }

    Ok(output)
}

/// Seleziona le sorgenti indicate per nome e conferma la selezione
///
/// Un nome ripetuto inverte di nuovo la stessa sorgente, come un secondo clic.
pub fn select_and_commit(config: &Config, names: &[String]) -> Result<HeadlessOutcome> {
    let mut controller = new_controller(config);
    controller.initialize()?;

    for name in names {
        let index = controller.catalog().position_of(name)
            .ok_or_else(|| CatalogError::UnknownSource(name.clone()))?;
        controller.toggle(index)?;
    }

    let selected = controller.commit_selection()?;
    let route = controller.navigator().last().map(|r| r.to_string());

    info!("Selezione confermata: {} sorgenti", selected.len());
    Ok(HeadlessOutcome { selected, route })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    use crate::navigation::DATA_PIPELINE_MANAGEMENT_ROUTE;
    use crate::store::load_selected_sources;

    fn config_in(dir: &Path, yaml: &str) -> Config {
        let catalog_file = dir.join("data_sources.yaml");
        fs::write(&catalog_file, yaml).unwrap();

        let mut config = Config::default();
        config.catalog.catalog_file = catalog_file.to_string_lossy().to_string();
        config.catalog.selection_file = dir.join("selected.yaml").to_string_lossy().to_string();
        config
    }

    const TWO_SOURCES: &str = "data_sources:\n  - name: A\n    logo: a.png\n  - name: B\n    logo: b.png\n";

    #[test]
    fn lists_sources_with_markers() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), TWO_SOURCES);

        let output = list_catalog(&config).unwrap();
        assert_eq!(output, "  0 [ ] A  a.png\n  1 [ ] B  b.png\n");
    }

    #[test]
    fn empty_catalog_prints_placeholder() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), "data_sources: []\n");

        assert_eq!(list_catalog(&config).unwrap(), "No data sources available\n");
        assert!(select_and_commit(&config, &[]).is_err());
    }

    #[test]
    fn selection_is_saved_and_navigates() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), TWO_SOURCES);

        let outcome = select_and_commit(&config, &["B".to_string()]).unwrap();
        assert_eq!(outcome.selected.len(), 1);
        assert_eq!(outcome.selected[0].name, "B");
        assert_eq!(outcome.route.as_deref(), Some(DATA_PIPELINE_MANAGEMENT_ROUTE));

        let saved = load_selected_sources(Path::new(&config.catalog.selection_file)).unwrap();
        assert_eq!(saved, outcome.selected);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), TWO_SOURCES);

        let err = select_and_commit(&config, &["Z".to_string()]).unwrap_err();
        assert_eq!(err.downcast_ref::<CatalogError>(), Some(&CatalogError::UnknownSource("Z".to_string())));
        assert!(!Path::new(&config.catalog.selection_file).exists());
    }

    #[test]
    fn selecting_twice_cancels_out() {
        let dir = tempdir().unwrap();
        let config = config_in(dir.path(), TWO_SOURCES);

        let err = select_and_commit(&config, &["A".to_string(), "A".to_string()]).unwrap_err();
        assert_eq!(err.downcast_ref::<CatalogError>(), Some(&CatalogError::NoSelection));
    }
}
