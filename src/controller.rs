//! Controller della selezione delle sorgenti dati
//!
//! Mantiene la copia locale del catalogo, inverte i flag su richiesta
//! dell'utente e, alla conferma, consegna allo store il sottoinsieme
//! selezionato e passa al passo successivo del wizard.

use anyhow::Result;
use log::{info, warn, debug};

use crate::catalog::{Catalog, CatalogItem, compute_has_selection};
use crate::error::CatalogError;
use crate::navigation::{Navigator, DATA_PIPELINE_MANAGEMENT_ROUTE};
use crate::store::DataSourceStore;

/// Controller di una singola attivazione della schermata del catalogo
pub struct SelectionController<S, N> {
    store: S,
    navigator: N,
    catalog: Catalog,
    initialized: bool,
    next_route: String,
    resync_after_commit: bool,
}

impl<S: DataSourceStore, N: Navigator> SelectionController<S, N> {
    /// Crea un controller con catalogo vuoto
    pub fn new(store: S, navigator: N) -> Self {
        SelectionController {
            store,
            navigator,
            catalog: Catalog::new(),
            initialized: false,
            next_route: DATA_PIPELINE_MANAGEMENT_ROUTE.to_string(),
            resync_after_commit: true,
        }
    }

    /// Percorso verso cui navigare dopo la conferma
    pub fn with_next_route(mut self, route: impl Into<String>) -> Self {
        self.next_route = route.into();
        self
    }

    /// Abilita o disabilita la rilettura del catalogo dopo la conferma
    pub fn with_resync_after_commit(mut self, resync: bool) -> Self {
        self.resync_after_commit = resync;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Vero se il pulsante "Next" deve essere abilitato
    pub fn has_selection(&self) -> bool {
        compute_has_selection(&self.catalog)
    }

    /// Richiede il catalogo allo store, una sola volta per attivazione
    ///
    /// In caso di errore il catalogo resta vuoto e la chiamata può essere ripetuta.
    pub fn initialize(&mut self) -> Result<()> {
        if self.initialized {
            debug!("Controller già inizializzato, richiesta ignorata");
            return Ok(());
        }

        self.catalog = self.store.get_available_data_source()?;
        self.initialized = true;

        info!("Catalogo inizializzato con {} sorgenti dati", self.catalog.len());
        Ok(())
    }

    /// Inverte la selezione dell'elemento `index` e pubblica il nuovo catalogo
    pub fn toggle(&mut self, index: usize) -> Result<(), CatalogError> {
        let updated = self.catalog.toggled(index)?;

        debug!(
            "Sorgente {} {}",
            updated.items()[index].name,
            if updated.items()[index].is_selected { "selezionata" } else { "deselezionata" }
        );

        self.store.set_available_data_source(updated.clone());
        self.catalog = updated;
        Ok(())
    }

    /// Conferma la selezione corrente
    ///
    /// Passa il sottoinsieme selezionato allo store, lo salva, riporta la
    /// schermata allo stato iniziale e naviga al passo successivo. Se il
    /// salvataggio fallisce la selezione resta intatta e non si naviga.
    pub fn commit_selection(&mut self) -> Result<Vec<CatalogItem>> {
        if !self.has_selection() {
            return Err(CatalogError::NoSelection.into());
        }

        let selected = self.catalog.selected_subset();
        info!("Conferma di {} sorgenti dati", selected.len());

        self.store.set_selected_sources(selected.clone());
        self.store.save_selected_sources()?;

        self.reset_selection();

        self.navigator.navigate_to(&self.next_route);
        Ok(selected)
    }

    /// Riporta tutti i flag a falso e, se richiesto, riallinea il catalogo con lo store
    fn reset_selection(&mut self) {
        let cleared = self.catalog.cleared();
        self.store.set_available_data_source(cleared.clone());
        self.catalog = cleared;

        if !self.resync_after_commit {
            return;
        }

        // La sorgente può riportare flag già attivi: dopo la conferma restano azzerati
        match self.store.get_available_data_source() {
            Ok(catalog) => {
                let cleared = catalog.cleared();
                self.store.set_available_data_source(cleared.clone());
                self.catalog = cleared;
            },
            Err(e) => warn!("Rilettura del catalogo fallita, uso lo stato locale: {:#}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use crate::navigation::RouteRecorder;

    /// Chiamate ricevute dallo store, nell'ordine
    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Get,
        SetAvailable(Vec<bool>),
        SetSelected(Vec<String>),
        Save,
    }

    #[derive(Default)]
    struct MemoryStore {
        source: Vec<CatalogItem>,
        shared: Catalog,
        calls: Vec<Call>,
        fail_get_after: Option<usize>,
        fail_save: bool,
    }

    impl MemoryStore {
        fn with(names: &[&str]) -> Self {
            MemoryStore {
                source: names.iter().map(|n| CatalogItem::new(*n, format!("{}.png", n))).collect(),
                ..Default::default()
            }
        }

        fn gets(&self) -> usize {
            self.calls.iter().filter(|c| **c == Call::Get).count()
        }
    }

    impl DataSourceStore for MemoryStore {
        fn get_available_data_source(&mut self) -> Result<Catalog> {
            let previous = self.gets();
            self.calls.push(Call::Get);
            if self.fail_get_after.is_some_and(|n| previous >= n) {
                return Err(anyhow!("backend unreachable"));
            }
            self.shared = Catalog::from(self.source.clone());
            Ok(self.shared.clone())
        }

        fn set_available_data_source(&mut self, catalog: Catalog) {
            self.calls.push(Call::SetAvailable(catalog.items().iter().map(|i| i.is_selected).collect()));
            self.shared = catalog;
        }

        fn set_selected_sources(&mut self, selected: Vec<CatalogItem>) {
            self.calls.push(Call::SetSelected(selected.into_iter().map(|i| i.name).collect()));
        }

        fn save_selected_sources(&mut self) -> Result<()> {
            self.calls.push(Call::Save);
            if self.fail_save {
                return Err(anyhow!("disk full"));
            }
            Ok(())
        }
    }

    fn controller(names: &[&str]) -> SelectionController<MemoryStore, RouteRecorder> {
        let mut controller = SelectionController::new(MemoryStore::with(names), RouteRecorder::new());
        controller.initialize().unwrap();
        controller
    }

    #[test]
    fn initialize_fetches_once() {
        let mut controller = controller(&["A", "B"]);
        controller.initialize().unwrap();

        assert!(controller.initialized);
        assert_eq!(controller.store.gets(), 1);
        assert_eq!(controller.catalog().len(), 2);
        assert!(!controller.has_selection());
    }

    #[test]
    fn failed_initialize_leaves_empty_catalog() {
        let store = MemoryStore { fail_get_after: Some(0), ..MemoryStore::with(&["A"]) };
        let mut controller = SelectionController::new(store, RouteRecorder::new());

        assert!(controller.initialize().is_err());
        assert!(!controller.initialized);
        assert!(controller.catalog().is_empty());
        assert!(!controller.has_selection());
    }

    #[test]
    fn toggle_publishes_new_catalog() {
        let mut controller = controller(&["A", "B"]);
        controller.toggle(1).unwrap();

        let flags: Vec<_> = controller.catalog().items().iter().map(|i| i.is_selected).collect();
        assert_eq!(flags, vec![false, true]);
        assert!(controller.has_selection());
        assert_eq!(controller.store.shared, *controller.catalog());
        assert_eq!(controller.store.calls.last(), Some(&Call::SetAvailable(vec![false, true])));
    }

    #[test]
    fn toggle_twice_restores_selection() {
        let mut controller = controller(&["A", "B", "C"]);
        let before = controller.catalog().clone();

        controller.toggle(2).unwrap();
        controller.toggle(2).unwrap();

        assert_eq!(controller.catalog(), &before);
        assert!(!controller.has_selection());
    }

    #[test]
    fn toggle_out_of_range_changes_nothing() {
        let mut controller = controller(&["A", "B"]);
        let calls = controller.store.calls.len();

        assert_eq!(controller.toggle(5), Err(CatalogError::IndexOutOfRange { index: 5, len: 2 }));
        assert_eq!(controller.store.calls.len(), calls);
    }

    #[test]
    fn commit_sends_subset_saves_resets_and_navigates() {
        let mut controller = controller(&["A", "B"]);
        controller.toggle(1).unwrap();

        let selected = controller.commit_selection().unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name, "B");
        assert!(selected[0].is_selected);

        let calls = &controller.store.calls;
        let tail = &calls[calls.len() - 5..];
        assert_eq!(tail, &[
            Call::SetSelected(vec!["B".to_string()]),
            Call::Save,
            Call::SetAvailable(vec![false, false]),
            Call::Get,
            Call::SetAvailable(vec![false, false]),
        ]);

        assert_eq!(controller.navigator().last(), Some(DATA_PIPELINE_MANAGEMENT_ROUTE));
        assert!(!controller.has_selection());
    }

    #[test]
    fn resync_does_not_bring_back_preselected_sources() {
        let mut store = MemoryStore::with(&["A", "B"]);
        store.source[0].is_selected = true;
        let mut controller = SelectionController::new(store, RouteRecorder::new());
        controller.initialize().unwrap();
        controller.toggle(1).unwrap();

        let names: Vec<_> = controller.commit_selection().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["A", "B"]);

        assert_eq!(controller.store.gets(), 2);
        assert!(!controller.has_selection());
        assert!(!controller.store.shared.has_selection());
        assert_eq!(controller.catalog().len(), 2);
    }

    #[test]
    fn commit_keeps_catalog_order() {
        let mut controller = controller(&["A", "B", "C", "D"]);
        controller.toggle(3).unwrap();
        controller.toggle(0).unwrap();
        controller.toggle(2).unwrap();

        let names: Vec<_> = controller.commit_selection().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["A", "C", "D"]);
    }

    #[test]
    fn commit_without_selection_is_refused() {
        let mut controller = controller(&["A"]);
        let calls = controller.store.calls.len();

        let err = controller.commit_selection().unwrap_err();
        assert_eq!(err.downcast_ref::<CatalogError>(), Some(&CatalogError::NoSelection));
        assert_eq!(controller.store.calls.len(), calls);
        assert_eq!(controller.navigator().last(), None);
    }

    #[test]
    fn empty_catalog_cannot_commit() {
        let mut controller = controller(&[]);

        assert!(controller.catalog().is_empty());
        assert!(!controller.has_selection());
        assert!(controller.commit_selection().is_err());
    }

    #[test]
    fn failed_save_keeps_selection_and_stays() {
        let store = MemoryStore { fail_save: true, ..MemoryStore::with(&["A", "B"]) };
        let mut controller = SelectionController::new(store, RouteRecorder::new());
        controller.initialize().unwrap();
        controller.toggle(0).unwrap();

        assert!(controller.commit_selection().is_err());
        assert!(controller.has_selection());
        assert!(controller.catalog().items()[0].is_selected);
        assert_eq!(controller.navigator().last(), None);
        assert_eq!(controller.store.calls.last(), Some(&Call::Save));
    }

    #[test]
    fn failed_resync_still_resets_and_navigates() {
        let store = MemoryStore { fail_get_after: Some(1), ..MemoryStore::with(&["A", "B"]) };
        let mut controller = SelectionController::new(store, RouteRecorder::new());
        controller.initialize().unwrap();
        controller.toggle(0).unwrap();

        controller.commit_selection().unwrap();
        assert!(!controller.has_selection());
        assert_eq!(controller.catalog().len(), 2);
        assert_eq!(controller.navigator().last(), Some(DATA_PIPELINE_MANAGEMENT_ROUTE));
    }

    #[test]
    fn resync_can_be_disabled_and_route_overridden() {
        let mut controller = SelectionController::new(MemoryStore::with(&["A"]), RouteRecorder::new())
            .with_resync_after_commit(false)
            .with_next_route("/elsewhere");
        controller.initialize().unwrap();
        controller.toggle(0).unwrap();
        controller.commit_selection().unwrap();

        assert_eq!(controller.store.gets(), 1);
        assert!(!controller.has_selection());
        assert_eq!(controller.navigator().last(), Some("/elsewhere"));
    }
}
