//! Modello dati del catalogo delle sorgenti dati
//!
//! Il catalogo è una sequenza ordinata di elementi selezionabili. Ogni modifica
//! produce un nuovo valore: chi possiede un `Catalog` non lo vede mai cambiare.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Testo mostrato quando il catalogo è vuoto
pub const EMPTY_PLACEHOLDER: &str = "No data sources available";

/// Una sorgente dati del catalogo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Identificativo lato backend, se presente
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,

    /// Nome visualizzato
    pub name: String,

    /// Riferimento all'immagine del connettore (URL o identificativo)
    #[serde(default)]
    pub logo: String,

    /// Indica se la sorgente risulta già connessa nel backend
    #[serde(default)]
    pub connected: bool,

    /// Flag di selezione
    #[serde(default, alias = "isSelected")]
    pub is_selected: bool,
}

impl CatalogItem {
    /// Crea un elemento non selezionato
    #[cfg(test)]
    pub fn new(name: impl Into<String>, logo: impl Into<String>) -> Self {
        CatalogItem {
            id: None,
            name: name.into(),
            logo: logo.into(),
            connected: false,
            is_selected: false,
        }
    }

    /// Marcatore di stato per la lista
    pub fn get_status_marker(&self) -> &'static str {
        if self.is_selected { "[*]" } else { "[ ]" }
    }

    /// Formatta l'elemento come riga della lista (il "tile")
    pub fn format_for_list(&self) -> String {
        format!("{} {}", self.get_status_marker(), self.name)
    }

    /// Formatta l'elemento per il pannello dei dettagli
    pub fn format_details(&self) -> String {
        let mut details = format!("Nome: {}\n", self.name);

        if self.logo.is_empty() {
            details.push_str("Logo: -\n");
        } else {
            details.push_str(&format!("Logo: {}\n", self.logo));
        }

        if let Some(id) = self.id {
            details.push_str(&format!("ID: {}\n", id));
        }

        details.push_str(&format!("Connessa: {}\n", if self.connected { "Sì" } else { "No" }));
        details.push_str(&format!("Selezionata: {}\n", if self.is_selected { "Sì" } else { "No" }));

        details
    }
}

/// Sequenza ordinata di sorgenti dati; l'ordine è quello di visualizzazione
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Catalogo vuoto, come al montaggio della schermata
    pub fn new() -> Self {
        Catalog::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&CatalogItem> {
        self.items.get(index)
    }

    /// Posizione del primo elemento con il nome indicato
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    /// Restituisce un nuovo catalogo con il flag dell'elemento `index` invertito
    ///
    /// Gli altri elementi restano invariati; `self` non viene modificato.
    pub fn toggled(&self, index: usize) -> Result<Catalog, CatalogError> {
        if index >= self.items.len() {
            return Err(CatalogError::IndexOutOfRange { index, len: self.items.len() });
        }

        let mut items = self.items.clone();
        items[index].is_selected = !items[index].is_selected;

        Ok(Catalog { items })
    }

    /// Vero se almeno un elemento è selezionato
    pub fn has_selection(&self) -> bool {
        compute_has_selection(self)
    }

    /// Numero di elementi selezionati
    pub fn selected_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_selected).count()
    }

    /// Elementi selezionati, nell'ordine del catalogo
    pub fn selected_subset(&self) -> Vec<CatalogItem> {
        self.items.iter()
            .filter(|item| item.is_selected)
            .cloned()
            .collect()
    }

    /// Copia del catalogo con tutte le selezioni azzerate
    pub fn cleared(&self) -> Catalog {
        let items = self.items.iter()
            .map(|item| CatalogItem { is_selected: false, ..item.clone() })
            .collect();

        Catalog { items }
    }
}

impl From<Vec<CatalogItem>> for Catalog {
    fn from(items: Vec<CatalogItem>) -> Self {
        Catalog { items }
    }
}

/// Vero se almeno un elemento del catalogo è selezionato
///
/// Si ferma al primo elemento selezionato.
pub fn compute_has_selection(catalog: &Catalog) -> bool {
    catalog.items.iter().any(|item| item.is_selected)
}
