//! Schermata di gestione delle pipeline
//!
//! Passo successivo al catalogo: mostra le sorgenti confermate e salvate.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use anyhow::{Result, anyhow};

use cursive::Cursive;
use cursive::traits::*;
use cursive::views::{Dialog, DummyView, LinearLayout, Panel, TextView};

use crate::catalog::CatalogItem;
use crate::config::Config;
use crate::store::load_selected_sources;

/// Elenco numerato delle sorgenti selezionate
pub fn format_selected_sources(sources: &[CatalogItem]) -> String {
    if sources.is_empty() {
        return "Nessuna sorgente dati selezionata".to_string();
    }

    let mut content = String::new();
    for (i, source) in sources.iter().enumerate() {
        content.push_str(&format!("  {}. {}", i + 1, source.name));
        if !source.logo.is_empty() {
            content.push_str(&format!(" ({})", source.logo));
        }
        content.push('\n');
    }

    content
}

/// Crea la schermata leggendo la selezione salvata
pub fn create_pipeline_view(siv: &mut Cursive, config: Arc<Mutex<Config>>) -> Result<()> {
    let selection_file = {
        let config_guard = config.lock().map_err(|_| anyhow!("Failed to lock config mutex"))?;
        PathBuf::from(&config_guard.catalog.selection_file)
    };

    let sources = load_selected_sources(&selection_file)?;

    let layout = LinearLayout::vertical()
        .child(TextView::new(format!("Sorgenti dati da collegare: {}", sources.len())))
        .child(DummyView.fixed_height(1))
        .child(Panel::new(TextView::new(format_selected_sources(&sources)).scrollable())
            .title("Selezione salvata"))
        .child(DummyView.fixed_height(1))
        .child(TextView::new(format!("Selezione salvata in: {:?}", selection_file)));

    siv.add_layer(Dialog::around(layout)
        .title("Data Pipeline Management")
        .button("Back to catalog", |s| { s.pop_layer(); }));

    Ok(())
}
