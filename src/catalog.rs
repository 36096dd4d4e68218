//! Read-only registries of species, moves and items.
//!
//! A `Catalog` is built once at startup (from the embedded RON data or a file
//! on disk), validated, and then shared by handle with every battle. Listings
//! are reported in data-file order so callers see a stable sequence.

use crate::errors::{CatalogError, CatalogResult};
use schema::{ItemData, MoveCategory, MoveData, SpeciesData};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.ron");

#[derive(Debug, Deserialize)]
struct CatalogData {
    species: Vec<SpeciesData>,
    moves: Vec<MoveData>,
    items: Vec<ItemData>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    species: Vec<SpeciesData>,
    moves: Vec<MoveData>,
    items: Vec<ItemData>,
    species_index: HashMap<String, usize>,
    move_index: HashMap<String, usize>,
    item_index: HashMap<String, usize>,
}

impl Catalog {
    /// The catalog compiled into the binary.
    pub fn builtin() -> CatalogResult<Self> {
        Self::from_ron_str(BUILTIN_CATALOG)
    }

    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> CatalogResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| CatalogError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_ron_str(&content)
    }

    pub fn from_ron_str(content: &str) -> CatalogResult<Self> {
        let data: CatalogData =
            ron::from_str(content).map_err(|e| CatalogError::MalformedData(e.to_string()))?;
        Self::new(data.species, data.moves, data.items)
    }

    pub fn new(
        species: Vec<SpeciesData>,
        moves: Vec<MoveData>,
        items: Vec<ItemData>,
    ) -> CatalogResult<Self> {
        if species.is_empty() {
            return Err(CatalogError::Empty("species"));
        }
        if moves.is_empty() {
            return Err(CatalogError::Empty("moves"));
        }
        if items.is_empty() {
            return Err(CatalogError::Empty("items"));
        }

        let species_index = build_index("species", species.iter().map(|s| s.name.as_str()))?;
        let move_index = build_index("move", moves.iter().map(|m| m.name.as_str()))?;
        let item_index = build_index("item", items.iter().map(|i| i.name.as_str()))?;

        if let Some(bad) = species.iter().find(|s| s.base_stats.hp == 0) {
            return Err(CatalogError::MalformedData(format!(
                "{} has 0 max HP",
                bad.name
            )));
        }
        if let Some(bad) = moves.iter().find(|m| m.max_pp == 0) {
            return Err(CatalogError::MalformedData(format!(
                "{} has 0 max PP",
                bad.name
            )));
        }

        tracing::debug!(
            species = species.len(),
            moves = moves.len(),
            items = items.len(),
            "catalog loaded"
        );

        Ok(Self {
            species,
            moves,
            items,
            species_index,
            move_index,
            item_index,
        })
    }

    pub fn list_pokemon(&self) -> Vec<&str> {
        self.species.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn list_moves(&self) -> Vec<&str> {
        self.moves.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn list_physical_moves(&self) -> Vec<&str> {
        self.list_moves_by_category(MoveCategory::Physical)
    }

    pub fn list_special_moves(&self) -> Vec<&str> {
        self.list_moves_by_category(MoveCategory::Special)
    }

    pub fn list_status_moves(&self) -> Vec<&str> {
        self.list_moves_by_category(MoveCategory::Status)
    }

    pub fn list_items(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.name.as_str()).collect()
    }

    fn list_moves_by_category(&self, category: MoveCategory) -> Vec<&str> {
        self.moves
            .iter()
            .filter(|m| m.category == category)
            .map(|m| m.name.as_str())
            .collect()
    }

    pub fn species(&self, name: &str) -> Option<&SpeciesData> {
        self.species_index.get(name).map(|&i| &self.species[i])
    }

    pub fn move_data(&self, name: &str) -> Option<&MoveData> {
        self.move_index.get(name).map(|&i| &self.moves[i])
    }

    pub fn item(&self, name: &str) -> Option<&ItemData> {
        self.item_index.get(name).map(|&i| &self.items[i])
    }
}

fn build_index<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> CatalogResult<HashMap<String, usize>> {
    let mut index = HashMap::new();
    for (i, name) in names.enumerate() {
        if index.insert(name.to_string(), i).is_some() {
            return Err(CatalogError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(index)
}
