//! Applicazione TUI principale
//!
//! Questo modulo gestisce il menu principale e le impostazioni.

use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use log::{info, error};

use cursive::Cursive;
use cursive::views::{Dialog, TextView, LinearLayout, SelectView, DummyView, Panel};
use cursive::view::Scrollable;
use cursive::traits::*;
use cursive::align::HAlign;

use crate::config::Config;
use crate::logger;
use crate::navigation::Route;
use crate::ui::router;
use crate::ui::theme;

/// Avvia l'applicazione TUI
pub fn run_app(config: Config) -> Result<()> {
    let mut siv = cursive::default();

    siv.set_theme(theme::get_theme(&config.general.ui_theme));

    let config = Arc::new(Mutex::new(config));
    create_main_screen(&mut siv, config);

    info!("Avvio del loop principale");
    siv.run();

    Ok(())
}

/// Crea la schermata principale dell'applicazione
fn create_main_screen(siv: &mut Cursive, config: Arc<Mutex<Config>>) {
    let title = TextView::new("DATA CATALOG")
        .h_align(HAlign::Center);

    let description = TextView::new("Scegli le sorgenti dati da collegare alla pipeline")
        .h_align(HAlign::Center);

    let mut main_menu = SelectView::new()
        .h_align(HAlign::Center)
        .autojump();

    main_menu.add_item("Catalogo sorgenti dati", "catalog");
    main_menu.add_item("Impostazioni", "settings");
    main_menu.add_item("Esci", "quit");

    main_menu.set_on_submit(move |s, item: &str| {
        match item {
            "catalog" => router::show_route(s, Route::DataCatalog.path(), Arc::clone(&config)),
            "settings" => {
                if let Err(e) = create_settings_screen(s, Arc::clone(&config)) {
                    s.add_layer(Dialog::info(format!("Errore durante il caricamento delle impostazioni: {}", e)));
                }
            },
            "quit" => confirm_quit(s),
            _ => s.add_layer(Dialog::info(format!("Opzione non implementata: {}", item))),
        }
    });

    let layout = LinearLayout::vertical()
        .child(title)
        .child(DummyView.fixed_height(1))
        .child(description)
        .child(DummyView.fixed_height(1))
        .child(Panel::new(main_menu.scrollable())
            .title("Menu principale"));

    siv.add_layer(Dialog::around(layout)
        .title("Data Catalog")
        .button("Quit", confirm_quit));
}

fn confirm_quit(siv: &mut Cursive) {
    siv.add_layer(Dialog::around(TextView::new("Sei sicuro di voler uscire?"))
        .title("Conferma uscita")
        .button("No", |s| { s.pop_layer(); })
        .button("Sì", |s| s.quit()));
}

/// Descrizione testuale della configurazione corrente
fn describe_config(config: &Config) -> String {
    let mut content = String::new();

    content.push_str(&format!("Tema UI: {}\n", config.general.ui_theme));
    content.push_str(&format!("Directory log: {}\n", config.general.log_dir));

    match &config.catalog.catalog_url {
        Some(url) => content.push_str(&format!("Catalogo remoto: {}\n", url)),
        None => content.push_str(&format!("File catalogo: {}\n", config.catalog.catalog_file)),
    }

    content.push_str(&format!("Timeout richieste: {} sec\n", config.catalog.fetch_timeout));
    content.push_str(&format!("File selezione: {}\n", config.catalog.selection_file));
    content.push_str(&format!("Rilettura dopo il salvataggio: {}\n",
                              if config.catalog.resync_after_commit { "Sì" } else { "No" }));
    content.push_str(&format!("Passo successivo: {}\n", config.catalog.next_route));

    content.push_str("\nTemi disponibili:\n");
    for theme_name in theme::AVAILABLE_THEMES {
        content.push_str(&format!("  - {}\n", theme_name));
    }

    match &config.config_file_path {
        Some(path) => content.push_str(&format!("\nFile di configurazione: {:?}\n", path)),
        None => content.push_str("\nFile di configurazione: usando valori predefiniti\n"),
    }

    if let Some(log_path) = logger::current_log_path() {
        content.push_str(&format!("File di log: {:?}\n", log_path));
    }

    content
}

/// Crea la schermata delle impostazioni
fn create_settings_screen(siv: &mut Cursive, config: Arc<Mutex<Config>>) -> Result<()> {
    let content = {
        let config_guard = config.lock().map_err(|_| anyhow!("Failed to lock config mutex"))?;
        describe_config(&config_guard)
    };

    siv.add_layer(Dialog::around(TextView::new(content).scrollable())
        .title("Impostazioni")
        .button("Cambia tema", move |s| {
            let mut theme_select = SelectView::new();
            for theme_name in theme::AVAILABLE_THEMES {
                theme_select.add_item(theme_name, theme_name.to_string());
            }

            let config_clone = Arc::clone(&config);
            theme_select.set_on_submit(move |s, theme_name: &String| {
                if let Err(e) = apply_theme(&config_clone, theme_name) {
                    error!("Errore nel salvataggio della configurazione: {:#}", e);
                    s.add_layer(Dialog::info(format!("Errore nel salvataggio della configurazione: {:#}", e)));
                    return;
                }

                s.set_theme(theme::get_theme(theme_name));
                s.pop_layer();
                s.add_layer(Dialog::info(format!("Tema cambiato a: {}", theme_name)));
            });

            s.add_layer(Dialog::around(theme_select.scrollable())
                .title("Seleziona tema")
                .button("Cancel", |s| { s.pop_layer(); }));
        })
        .button("Back", |s| { s.pop_layer(); }));

    Ok(())
}

/// Aggiorna il tema nella configurazione e lo salva, se c'è un file di origine
fn apply_theme(config: &Arc<Mutex<Config>>, theme_name: &str) -> Result<()> {
    let mut config_guard = config.lock().map_err(|_| anyhow!("Failed to lock config mutex"))?;
    config_guard.general.ui_theme = theme_name.to_string();

    if let Some(path) = config_guard.config_file_path.clone() {
        config_guard.save(&path)?;
    }

    Ok(())
}
