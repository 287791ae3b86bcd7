//! Store delle sorgenti dati
//!
//! Lo store possiede il catalogo condiviso e la selezione confermata. Il
//! controller lo riceve alla costruzione e parla con lui solo tramite il trait
//! `DataSourceStore`.

use std::path::{Path, PathBuf};
use std::fs;
use std::time::Duration;
use anyhow::{Context, Result, anyhow};
use chrono::Local;
use log::{info, debug};
use reqwest::blocking::Client;
use serde::{Serialize, Deserialize};

use crate::catalog::{Catalog, CatalogItem};
use crate::config::Config;

/// Operazioni offerte dallo store al controller della selezione
pub trait DataSourceStore {
    /// Recupera il catalogo e sostituisce quello condiviso
    fn get_available_data_source(&mut self) -> Result<Catalog>;

    /// Sostituisce il catalogo condiviso
    fn set_available_data_source(&mut self, catalog: Catalog);

    /// Prepara la selezione da salvare
    fn set_selected_sources(&mut self, selected: Vec<CatalogItem>);

    /// Salva in modo persistente la selezione preparata
    fn save_selected_sources(&mut self) -> Result<()>;
}

/// Provenienza del catalogo
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// File YAML locale
    File(PathBuf),
    /// Endpoint HTTP che restituisce la lista delle sorgenti
    Remote(String),
}

impl CatalogSource {
    pub fn from_config(config: &Config) -> Self {
        match &config.catalog.catalog_url {
            Some(url) if !url.trim().is_empty() => CatalogSource::Remote(url.clone()),
            _ => CatalogSource::File(PathBuf::from(&config.catalog.catalog_file)),
        }
    }
}

/// Formato del file del catalogo
#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    data_sources: Catalog,
}

/// Risposta dell'endpoint remoto: lista semplice o documento come il file locale
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteCatalog {
    List(Catalog),
    Document(CatalogFile),
}

/// Formato del file della selezione salvata
#[derive(Debug, Serialize, Deserialize)]
struct SelectionFile {
    saved_at: String,
    selected_sources: Vec<CatalogItem>,
}

/// Store che legge il catalogo da file o HTTP e salva la selezione su file
#[derive(Debug)]
pub struct FileStore {
    source: CatalogSource,
    selection_file: PathBuf,
    fetch_timeout: u64,
    available: Catalog,
    selected: Vec<CatalogItem>,
}

impl FileStore {
    pub fn new(source: CatalogSource, selection_file: impl Into<PathBuf>, fetch_timeout: u64) -> Self {
        FileStore {
            source,
            selection_file: selection_file.into(),
            fetch_timeout,
            available: Catalog::new(),
            selected: Vec::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        FileStore::new(
            CatalogSource::from_config(config),
            &config.catalog.selection_file,
            config.catalog.fetch_timeout,
        )
    }

    fn fetch(&self) -> Result<Catalog> {
        match &self.source {
            CatalogSource::File(path) => load_catalog_file(path),
            CatalogSource::Remote(url) => fetch_remote_catalog(url, self.fetch_timeout),
        }
    }
}

impl DataSourceStore for FileStore {
    fn get_available_data_source(&mut self) -> Result<Catalog> {
        let catalog = self.fetch()?;
        info!("Catalogo caricato: {} sorgenti dati", catalog.len());

        self.available = catalog.clone();
        Ok(catalog)
    }

    fn set_available_data_source(&mut self, catalog: Catalog) {
        debug!("Catalogo aggiornato ({} selezionate)", catalog.selected_count());
        self.available = catalog;
    }

    fn set_selected_sources(&mut self, selected: Vec<CatalogItem>) {
        debug!("Selezione preparata: {} sorgenti", selected.len());
        self.selected = selected;
    }

    fn save_selected_sources(&mut self) -> Result<()> {
        if self.selected.is_empty() {
            return Err(anyhow!("No data sources staged for saving"));
        }

        let document = SelectionFile {
            saved_at: Local::now().to_rfc3339(),
            selected_sources: self.selected.clone(),
        };

        let content = serde_yaml::to_string(&document)
            .context("Failed to serialize selected data sources")?;

        if let Some(parent) = self.selection_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .context(format!("Failed to create directory: {:?}", parent))?;
            }
        }

        fs::write(&self.selection_file, content)
            .context(format!("Failed to write selection file: {:?}", self.selection_file))?;

        info!("Saved {} selected data sources to {:?}", self.selected.len(), self.selection_file);
        Ok(())
    }
}

/// Legge il catalogo da un file YAML, creando un esempio se il file manca
pub fn load_catalog_file(path: &Path) -> Result<Catalog> {
    if !path.exists() {
        info!("Catalog file {:?} not found, creating an example", path);
        create_example_catalog(path)?;
    }

    let content = fs::read_to_string(path)
        .context(format!("Failed to read catalog file: {:?}", path))?;

    let document: CatalogFile = serde_yaml::from_str(&content)
        .context(format!("Failed to parse YAML from file: {:?}", path))?;

    Ok(document.data_sources)
}

/// Scarica il catalogo da un endpoint HTTP
pub fn fetch_remote_catalog(url: &str, timeout_secs: u64) -> Result<Catalog> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to create HTTP client")?;

    info!("Fetching data sources from {}", url);
    let response = client.get(url)
        .send()
        .context(format!("Failed to fetch data sources from {}", url))?;

    if !response.status().is_success() {
        return Err(anyhow!("HTTP error: {}", response.status()));
    }

    let body = response.text()
        .context("Failed to read response body")?;

    parse_remote_catalog(&body)
}

/// Interpreta la risposta dell'endpoint (JSON è accettato in quanto YAML valido)
fn parse_remote_catalog(body: &str) -> Result<Catalog> {
    let remote: RemoteCatalog = serde_yaml::from_str(body)
        .context("Failed to parse data source listing")?;

    Ok(match remote {
        RemoteCatalog::List(catalog) => catalog,
        RemoteCatalog::Document(document) => document.data_sources,
    })
}

/// Legge la selezione salvata; un file assente equivale a nessuna selezione
pub fn load_selected_sources(path: &Path) -> Result<Vec<CatalogItem>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)
        .context(format!("Failed to read selection file: {:?}", path))?;

    let document: SelectionFile = serde_yaml::from_str(&content)
        .context(format!("Failed to parse selection file: {:?}", path))?;

    Ok(document.selected_sources)
}

/// Crea un file di catalogo di esempio
fn create_example_catalog(path: &Path) -> Result<()> {
    let example_content = r#"# Esempio di catalogo delle sorgenti dati
# Ogni sorgente ha un nome e un riferimento al logo

data_sources:
  - id: 1
    name: PostgreSQL
    logo: "https://www.postgresql.org/media/img/about/press/elephant.png"

  - id: 2
    name: BigQuery
    logo: "https://cdn.worldvectorlogo.com/logos/google-bigquery-logo-1.svg"

  - id: 3
    name: Snowflake
    logo: "https://cdn.worldvectorlogo.com/logos/snowflake.svg"
"#;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {:?}", parent))?;
        }
    }

    fs::write(path, example_content)
        .context(format!("Failed to write example catalog file: {:?}", path))?;

    info!("Created example catalog file: {:?}", path);
    Ok(())
}
