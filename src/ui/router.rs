//! Navigazione tra le schermate della TUI
//!
//! Il navigatore non apre direttamente le schermate: accoda una callback sul
//! `CbSink` di cursive, che verrà eseguita al termine dell'evento corrente.

use std::sync::{Arc, Mutex};

use cursive::{CbSink, Cursive};
use cursive::views::Dialog;
use log::{error, warn};

use crate::config::Config;
use crate::navigation::{Navigator, Route};
use crate::ui::{catalog_view, pipeline_view};

/// Navigatore collegato al loop degli eventi di cursive
pub struct TuiNavigator {
    sink: CbSink,
    config: Arc<Mutex<Config>>,
}

impl TuiNavigator {
    pub fn new(sink: CbSink, config: Arc<Mutex<Config>>) -> Self {
        TuiNavigator { sink, config }
    }
}

impl Navigator for TuiNavigator {
    fn navigate_to(&mut self, route: &str) {
        let route = route.to_string();
        let config = Arc::clone(&self.config);

        if self.sink.send(Box::new(move |s: &mut Cursive| show_route(s, &route, config))).is_err() {
            error!("Impossibile accodare la navigazione: loop degli eventi terminato");
        }
    }
}

/// Apre la schermata associata a un percorso
pub fn show_route(siv: &mut Cursive, path: &str, config: Arc<Mutex<Config>>) {
    let result = match Route::from_path(path) {
        Some(Route::DataCatalog) => catalog_view::create_catalog_view(siv, config),
        Some(Route::DataPipelineManagement) => pipeline_view::create_pipeline_view(siv, config),
        None => {
            warn!("Percorso sconosciuto: {}", path);
            siv.add_layer(Dialog::info(format!("Schermata non disponibile: {}", path)));
            Ok(())
        }
    };

    if let Err(e) = result {
        error!("Errore durante l'apertura di {}: {:#}", path, e);
        siv.add_layer(Dialog::info(format!("Errore durante il caricamento della schermata: {:#}", e)));
    }
}
