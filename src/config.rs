//! Gestione della configurazione
//!
//! Questo modulo gestisce il caricamento e il salvataggio della configurazione
//! dell'applicazione in formato TOML.

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};
use serde::{Serialize, Deserialize};
use log::{info, warn};

use crate::navigation::DATA_PIPELINE_MANAGEMENT_ROUTE;

/// Nome della directory di configurazione dell'applicazione
const APP_DIR: &str = "data-catalog";

/// Impostazioni generali
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Tema dell'interfaccia utente
    pub ui_theme: String,

    /// Directory per i file di log della TUI
    pub log_dir: String,
}

/// Impostazioni del catalogo e della selezione
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// File YAML con le sorgenti dati disponibili
    pub catalog_file: String,

    /// Endpoint remoto del catalogo; se presente ha la precedenza sul file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_url: Option<String>,

    /// Timeout per le richieste HTTP in secondi
    pub fetch_timeout: u64,

    /// File in cui salvare la selezione confermata
    pub selection_file: String,

    /// Rilegge il catalogo dallo store dopo il salvataggio
    pub resync_after_commit: bool,

    /// Percorso verso cui navigare dopo il salvataggio
    pub next_route: String,
}

/// Struttura principale di configurazione
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Percorso del file di configurazione caricato
    #[serde(skip)]
    pub config_file_path: Option<PathBuf>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            ui_theme: "default".to_string(),
            log_dir: get_base_directory().join("logs").to_string_lossy().to_string(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        let base_dir = get_base_directory();

        CatalogConfig {
            catalog_file: base_dir.join("data_sources.yaml").to_string_lossy().to_string(),
            catalog_url: None,
            fetch_timeout: 30,
            selection_file: base_dir.join("state").join("selected_sources.yaml").to_string_lossy().to_string(),
            resync_after_commit: true,
            next_route: DATA_PIPELINE_MANAGEMENT_ROUTE.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            general: GeneralConfig::default(),
            catalog: CatalogConfig::default(),
            config_file_path: None,
        }
    }
}

impl Config {
    /// Carica la configurazione
    ///
    /// Se `path` è indicato il file deve esistere ed essere valido. Altrimenti si
    /// usa il percorso predefinito, creandolo con i valori di default se manca.
    pub fn load(path: Option<&str>) -> Result<Self> {
        if let Some(explicit_path) = path {
            info!("Tentativo di caricamento configurazione da: {}", explicit_path);
            return Config::load_from_file(Path::new(explicit_path));
        }

        let default_path = get_default_config_path();
        if default_path.exists() {
            info!("Caricamento configurazione dal percorso predefinito: {:?}", default_path);
            return Config::load_from_file(&default_path);
        }

        info!("Creazione di una configurazione di default");
        let mut config = Config::default();
        match config.save(&default_path) {
            Ok(_) => {
                info!("Configurazione di default salvata in: {:?}", default_path);
                config.config_file_path = Some(default_path);
            },
            Err(e) => {
                // Si prosegue con i valori in memoria
                warn!("Impossibile salvare la configurazione di default: {:#}", e);
            }
        }

        Ok(config)
    }

    /// Legge e interpreta un file di configurazione
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .context(format!("Impossibile leggere la configurazione: {:?}", path))?;

        let mut config: Config = toml::from_str(&content)
            .context(format!("Configurazione non valida: {:?}", path))?;
        config.config_file_path = Some(path.to_path_buf());

        info!("Configurazione caricata con successo da: {:?}", path);
        Ok(config)
    }

    /// Salva la configurazione in un file
    pub fn save(&self, path: &Path) -> Result<()> {
        info!("Salvataggio configurazione in: {:?}", path);

        // Assicurati che la directory esista
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .context(format!("Impossibile creare la directory per: {:?}", path))?;
            }
        }

        let content = toml::to_string_pretty(self)
            .context("Impossibile serializzare la configurazione")?;

        fs::write(path, content)
            .context(format!("Impossibile salvare la configurazione in: {:?}", path))?;

        info!("Configurazione salvata con successo");
        Ok(())
    }
}

/// Ottiene la directory di base dell'applicazione
///
/// Usa la directory di configurazione dell'utente; se non è disponibile ripiega
/// sulla directory dell'eseguibile e infine su quella corrente.
pub fn get_base_directory() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join(APP_DIR);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.to_path_buf();
        }
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Ottiene il percorso predefinito per il file di configurazione
pub fn get_default_config_path() -> PathBuf {
    get_base_directory().join("data-catalog.toml")
}

/// Crea un file di configurazione di esempio
pub fn create_example_config(path: &Path) -> Result<()> {
    info!("Creazione configurazione di esempio in: {:?}", path);

    let mut config = Config::default();
    config.general.ui_theme = "dark".to_string();
    config.catalog.catalog_url = Some("http://localhost:8000/data_source".to_string());

    config.save(path)?;

    info!("File di configurazione di esempio creato con successo");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.catalog.catalog_url = Some("http://example.com/ds".to_string());
        config.catalog.resync_after_commit = false;
        config.save(&path).unwrap();

        let loaded = Config::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.catalog, config.catalog);
        assert_eq!(loaded.general, config.general);
        assert_eq!(loaded.config_file_path, Some(path));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        fs::write(&path, "[catalog]\nfetch_timeout = 5\n").unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.catalog.fetch_timeout, 5);
        assert_eq!(loaded.catalog.next_route, DATA_PIPELINE_MANAGEMENT_ROUTE);
        assert!(loaded.catalog.resync_after_commit);
        assert_eq!(loaded.general.ui_theme, "default");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        assert!(Config::load(Some(path.to_str().unwrap())).is_err());
    }

    #[test]
    fn example_config_points_to_remote_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("example.toml");
        create_example_config(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.general.ui_theme, "dark");
        assert!(loaded.catalog.catalog_url.is_some());
    }
}
