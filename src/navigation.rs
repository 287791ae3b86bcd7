//! Navigazione tra i passi del wizard
//!
//! Il controller conosce solo il trait `Navigator`; la TUI e la modalità
//! non interattiva forniscono le proprie implementazioni.

use log::info;

/// Percorso della schermata del catalogo
pub const DATA_CATALOG_ROUTE: &str = "/data-catalog";

/// Percorso del passo successivo, la gestione delle pipeline
pub const DATA_PIPELINE_MANAGEMENT_ROUTE: &str = "/data-pipeline-management";

/// Schermate raggiungibili
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    DataCatalog,
    DataPipelineManagement,
}

impl Route {
    /// Converte un percorso nella schermata corrispondente
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            DATA_CATALOG_ROUTE => Some(Route::DataCatalog),
            DATA_PIPELINE_MANAGEMENT_ROUTE => Some(Route::DataPipelineManagement),
            _ => None,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::DataCatalog => DATA_CATALOG_ROUTE,
            Route::DataPipelineManagement => DATA_PIPELINE_MANAGEMENT_ROUTE,
        }
    }
}

/// Porta l'utente a un percorso con nome
pub trait Navigator {
    fn navigate_to(&mut self, route: &str);
}

/// Navigatore che si limita a registrare i percorsi richiesti
///
/// Usato dalla modalità non interattiva, che stampa l'ultimo percorso a fine esecuzione.
#[derive(Debug, Default)]
pub struct RouteRecorder {
    visited: Vec<String>,
}

impl RouteRecorder {
    pub fn new() -> Self {
        RouteRecorder::default()
    }

    pub fn last(&self) -> Option<&str> {
        self.visited.last().map(|s| s.as_str())
    }
}

impl Navigator for RouteRecorder {
    fn navigate_to(&mut self, route: &str) {
        info!("Navigazione verso: {}", route);
        self.visited.push(route.to_string());
    }
}
