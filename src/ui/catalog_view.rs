//! Schermata del catalogo delle sorgenti dati
//!
//! Una riga per sorgente, marcata `[*]` quando selezionata. Invio inverte la
//! selezione; "Next" è abilitato solo con almeno una sorgente selezionata.

use std::sync::{Arc, Mutex};
use anyhow::{Result, anyhow};
use log::error;

use cursive::Cursive;
use cursive::align::HAlign;
use cursive::traits::*;
use cursive::view::Scrollable;
use cursive::views::{Button, Dialog, DummyView, LinearLayout, Panel, SelectView, TextContent, TextView};

use crate::catalog::{Catalog, EMPTY_PLACEHOLDER};
use crate::config::Config;
use crate::controller::SelectionController;
use crate::store::FileStore;
use crate::ui::router::TuiNavigator;

const LIST_NAME: &str = "catalog_list";
const NEXT_BUTTON_NAME: &str = "catalog_next";

type SharedController = Arc<Mutex<SelectionController<FileStore, TuiNavigator>>>;

/// Testo informativo sulla selezione corrente
pub fn selection_summary(catalog: &Catalog) -> String {
    match catalog.selected_count() {
        0 => "Premi 'Invio' per selezionare/deselezionare. Nessuna sorgente selezionata.".to_string(),
        1 => "Premi 'Invio' per selezionare/deselezionare. 1 sorgente selezionata.".to_string(),
        n => format!("Premi 'Invio' per selezionare/deselezionare. {} sorgenti selezionate.", n),
    }
}

/// Crea la schermata del catalogo e carica le sorgenti dallo store
pub fn create_catalog_view(siv: &mut Cursive, config: Arc<Mutex<Config>>) -> Result<()> {
    let (next_route, resync, store) = {
        let config_guard = config.lock().map_err(|_| anyhow!("Failed to lock config mutex"))?;
        (
            config_guard.catalog.next_route.clone(),
            config_guard.catalog.resync_after_commit,
            FileStore::from_config(&config_guard),
        )
    };

    let navigator = TuiNavigator::new(siv.cb_sink().clone(), Arc::clone(&config));
    let mut controller = SelectionController::new(store, navigator)
        .with_next_route(next_route)
        .with_resync_after_commit(resync);

    // Un errore di caricamento lascia il catalogo vuoto: si mostra il segnaposto
    let init_error = controller.initialize().err();
    let catalog = controller.catalog().clone();
    let shared: SharedController = Arc::new(Mutex::new(controller));

    let details = TextContent::new(
        catalog.get(0).map_or_else(String::new, |item| item.format_details())
    );
    let summary = TextContent::new(selection_summary(&catalog));

    let body = if catalog.is_empty() {
        LinearLayout::vertical()
            .child(TextView::new(EMPTY_PLACEHOLDER).h_align(HAlign::Center))
    } else {
        let mut list = SelectView::<usize>::new()
            .h_align(HAlign::Left)
            .autojump();
        fill_list(&mut list, &catalog);

        let details_shared = Arc::clone(&shared);
        let details_content = details.clone();
        list.set_on_select(move |_s, idx| {
            if let Ok(controller) = details_shared.lock() {
                if let Some(item) = controller.catalog().get(*idx) {
                    details_content.set_content(item.format_details());
                }
            }
        });

        let toggle_shared = Arc::clone(&shared);
        let toggle_summary = summary.clone();
        let toggle_details = details.clone();
        list.set_on_submit(move |s, idx: &usize| {
            let outcome = toggle_shared.lock()
                .map_err(|_| anyhow!("Failed to lock controller mutex"))
                .and_then(|mut controller| {
                    controller.toggle(*idx)?;
                    Ok(controller.catalog().clone())
                });

            match outcome {
                Ok(catalog) => refresh(s, &catalog, &toggle_summary, &toggle_details),
                Err(e) => {
                    error!("Errore durante la selezione: {:#}", e);
                    s.add_layer(Dialog::info(format!("Errore durante la selezione: {:#}", e)));
                }
            }
        });

        LinearLayout::horizontal()
            .child(Panel::new(list.with_name(LIST_NAME).scrollable().min_width(30))
                .title("Sorgenti"))
            .child(DummyView.fixed_width(2))
            .child(Panel::new(TextView::new_with_content(details.clone()).scrollable().min_width(40))
                .title("Dettagli"))
    };

    let next_shared = Arc::clone(&shared);
    let next_summary = summary.clone();
    let next_details = details.clone();
    let next_button = Button::new("Next", move |s| {
        let outcome = next_shared.lock()
            .map_err(|_| anyhow!("Failed to lock controller mutex"))
            .and_then(|mut controller| {
                let selected = controller.commit_selection()?;
                Ok((selected, controller.catalog().clone()))
            });

        match outcome {
            Ok((_, catalog)) => refresh(s, &catalog, &next_summary, &next_details),
            Err(e) => {
                error!("Errore durante il salvataggio della selezione: {:#}", e);
                s.add_layer(Dialog::info(format!("Errore durante il salvataggio della selezione: {:#}", e)));
            }
        }
    })
    .with_enabled(catalog.has_selection())
    .with_name(NEXT_BUTTON_NAME);

    let layout = LinearLayout::vertical()
        .child(TextView::new("Data Catalog").h_align(HAlign::Center))
        .child(TextView::new("Select the data source you want to connect").h_align(HAlign::Center))
        .child(DummyView.fixed_height(1))
        .child(body)
        .child(DummyView.fixed_height(1))
        .child(TextView::new_with_content(summary).h_align(HAlign::Center))
        .child(LinearLayout::horizontal()
            .child(DummyView.full_width())
            .child(next_button));

    siv.add_layer(Dialog::around(layout)
        .title("Data Catalog")
        .button("Back", |s| { s.pop_layer(); }));

    if let Some(e) = init_error {
        error!("Errore durante il caricamento del catalogo: {:#}", e);
        siv.add_layer(Dialog::info(format!("Errore durante il caricamento del catalogo: {:#}", e)));
    }

    Ok(())
}

/// Riempie la lista con una riga per sorgente
fn fill_list(list: &mut SelectView<usize>, catalog: &Catalog) {
    list.clear();
    for (idx, item) in catalog.items().iter().enumerate() {
        list.add_item(item.format_for_list(), idx);
    }
}

/// Allinea lista, dettagli, contatore e pulsante "Next" allo stato del catalogo
fn refresh(siv: &mut Cursive, catalog: &Catalog, summary: &TextContent, details: &TextContent) {
    let current = siv.call_on_name(LIST_NAME, |list: &mut SelectView<usize>| {
        let current = list.selected_id();
        fill_list(list, catalog);
        if let Some(idx) = current {
            // La callback di on_select restituita qui aggiornerebbe solo i dettagli, aggiornati sotto
            let _ = list.set_selection(idx);
        }
        current
    }).flatten();

    if let Some(item) = current.and_then(|idx| catalog.get(idx)) {
        details.set_content(item.format_details());
    }

    let has_selection = catalog.has_selection();
    siv.call_on_name(NEXT_BUTTON_NAME, |button: &mut Button| {
        button.set_enabled(has_selection);
    });

    summary.set_content(selection_summary(catalog));
}
