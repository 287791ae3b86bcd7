use std::path::Path;
use std::process;
use clap::{Arg, ArgAction, Command};
use anyhow::{Result, Context};
use log::{info, error, LevelFilter};
use env_logger::{Builder, Env};

mod catalog;
mod config;
mod controller;
mod error;
mod headless;
mod logger;
mod navigation;
mod store;
mod ui;

use crate::config::{Config, create_example_config};
use crate::ui::app::run_app;

fn main() -> Result<()> {
    let matches = Command::new("data-catalog")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Seleziona le sorgenti dati da collegare alla pipeline")
        .arg(Arg::new("config")
            .short('c')
            .long("config")
            .value_name("FILE")
            .help("Specifica un file di configurazione personalizzato"))
        .arg(Arg::new("create-example")
            .long("create-example")
            .value_name("FILE")
            .help("Crea un file di configurazione di esempio"))
        .arg(Arg::new("list")
            .short('l')
            .long("list")
            .action(ArgAction::SetTrue)
            .help("Elenca le sorgenti dati disponibili ed esce"))
        .arg(Arg::new("select")
            .short('s')
            .long("select")
            .value_name("NAME")
            .action(ArgAction::Append)
            .help("Seleziona una sorgente per nome (ripetibile) e conferma senza TUI"))
        .get_matches();

    let select: Vec<String> = matches.get_many::<String>("select")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let interactive = !matches.get_flag("list") && select.is_empty()
        && !matches.contains_id("create-example");

    // La TUI scrive i log su file; le altre modalità su stderr
    if !interactive {
        Builder::from_env(Env::default().default_filter_or("info")).init();
    }

    if let Some(example_path) = matches.get_one::<String>("create-example") {
        match create_example_config(Path::new(example_path)) {
            Ok(_) => {
                println!("File di configurazione di esempio creato con successo in: {}", example_path);
                process::exit(0);
            },
            Err(e) => {
                eprintln!("Errore durante la creazione del file di configurazione di esempio: {:#}", e);
                process::exit(1);
            }
        }
    }

    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());
    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Errore durante il caricamento della configurazione: {:#}", e);
            eprintln!("Errore durante il caricamento della configurazione: {:#}", e);
            eprintln!("Prova ad eseguire il programma con l'opzione --create-example per creare una configurazione di esempio");
            process::exit(1);
        }
    };

    if matches.get_flag("list") {
        print!("{}", headless::list_catalog(&config)?);
        return Ok(());
    }

    if !select.is_empty() {
        let outcome = headless::select_and_commit(&config, &select)?;
        for item in &outcome.selected {
            println!("Selezionata: {}", item.name);
        }
        if let Some(route) = outcome.route {
            println!("Passo successivo: {}", route);
        }
        return Ok(());
    }

    match logger::init_file_logger(&config.general.log_dir, LevelFilter::Info) {
        Ok(path) => info!("Log della sessione in {:?}", path),
        Err(e) => eprintln!("Log su file non disponibile: {:#}", e),
    }

    run_app(config).context("Errore durante l'esecuzione dell'applicazione")?;

    Ok(())
}
