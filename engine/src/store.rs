//! Persistence seam. The derivation engine never touches storage; whatever
//! layer persists characters implements `CharacterStore`.

use indexmap::IndexMap;

use crate::derive::DerivedCharacter;

pub trait CharacterStore {
    fn get_all(&self) -> Vec<DerivedCharacter>;
    fn add(&mut self, character: DerivedCharacter);
    fn remove(&mut self, id: &str) -> Option<DerivedCharacter>;
    fn find_by_id(&self, id: &str) -> Option<DerivedCharacter>;
}

/// Insertion-ordered, in-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    characters: IndexMap<String, DerivedCharacter>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_characters(characters: impl IntoIterator<Item = DerivedCharacter>) -> Self {
        Self {
            characters: characters.into_iter().map(|c| (c.id.clone(), c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl CharacterStore for MemoryStore {
    fn get_all(&self) -> Vec<DerivedCharacter> {
        self.characters.values().cloned().collect()
    }

    /// Replaces any character already stored under the same id.
    fn add(&mut self, character: DerivedCharacter) {
        self.characters.insert(character.id.clone(), character);
    }

    fn remove(&mut self, id: &str) -> Option<DerivedCharacter> {
        self.characters.shift_remove(id)
    }

    fn find_by_id(&self, id: &str) -> Option<DerivedCharacter> {
        self.characters.get(id).cloned()
    }
}
