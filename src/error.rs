//! Errori di dominio del catalogo
//!
//! Gli errori legati allo stato della selezione hanno un tipo proprio; tutto il
//! resto (I/O, rete, parsing) viaggia come `anyhow::Error` con il suo contesto.

use thiserror::Error;

/// Errori della gestione della selezione
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// Indice fuori dall'intervallo `0..len` del catalogo
    #[error("index {index} out of range for a catalog of {len} data sources")]
    IndexOutOfRange { index: usize, len: usize },

    /// Commit richiesto senza alcun elemento selezionato
    #[error("no data source selected")]
    NoSelection,

    /// Nessun elemento del catalogo ha il nome richiesto
    #[error("unknown data source: {0}")]
    UnknownSource(String),
}
