//! Modulo per l'interfaccia utente (TUI)
//!
//! Menu principale, schermata del catalogo e passo di gestione delle pipeline.

pub mod app;
pub mod catalog_view;
pub mod pipeline_view;
pub mod router;
pub mod theme;
