use crate::{CrateName, Implementor};

/// Implementors of one trait, keyed by the crate that documents them
///
/// Crates keep the order they were inserted in, which is also the order rustdoc's viewer shows
/// them. Each crate name appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementorsTable {
    entries: Vec<CrateImplementors>,
}

/// One crate's fragment of an [`ImplementorsTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrateImplementors {
    pub crate_name: CrateName<'static>,
    pub implementors: Vec<Implementor>,
}

impl ImplementorsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of records across all crates
    pub fn implementor_count(&self) -> usize {
        self.entries.iter().map(|e| e.implementors.len()).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CrateImplementors> {
        self.entries.iter()
    }

    pub fn crate_names(&self) -> impl Iterator<Item = &CrateName<'static>> {
        self.entries.iter().map(|e| &e.crate_name)
    }

    pub fn get(&self, crate_name: &str) -> Option<&[Implementor]> {
        self.position(crate_name)
            .map(|index| &*self.entries[index].implementors)
    }

    pub fn contains(&self, crate_name: &str) -> bool {
        self.position(crate_name).is_some()
    }

    /// Set a crate's implementors, returning the previous list if the crate was present
    ///
    /// A replaced crate keeps its position; a new crate is appended.
    pub fn insert(
        &mut self,
        crate_name: impl Into<CrateName<'static>>,
        implementors: Vec<Implementor>,
    ) -> Option<Vec<Implementor>> {
        let crate_name = crate_name.into();
        match self.position(&crate_name) {
            Some(index) => Some(std::mem::replace(
                &mut self.entries[index].implementors,
                implementors,
            )),
            None => {
                self.entries.push(CrateImplementors {
                    crate_name,
                    implementors,
                });
                None
            }
        }
    }

    pub fn remove(&mut self, crate_name: &str) -> Option<Vec<Implementor>> {
        let index = self.position(crate_name)?;
        Some(self.entries.remove(index).implementors)
    }

    fn position(&self, crate_name: &str) -> Option<usize> {
        let crate_name = CrateName::from(crate_name);
        self.entries.iter().position(|e| e.crate_name == crate_name)
    }
}

impl<'a> IntoIterator for &'a ImplementorsTable {
    type Item = &'a CrateImplementors;
    type IntoIter = std::slice::Iter<'a, CrateImplementors>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
