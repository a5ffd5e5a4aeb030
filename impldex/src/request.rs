use impldex_common::{DocDir, DocIndex};
use std::ops::Deref;
use std::path::Path;

/// Wrapper around a loaded [`DocIndex`] shared by every command
pub(crate) struct Request {
    index: DocIndex,
}

impl Deref for Request {
    type Target = DocIndex;

    fn deref(&self) -> &Self::Target {
        &self.index
    }
}

impl Request {
    pub(crate) fn new(index: DocIndex) -> Self {
        Self { index }
    }

    /// Load every trait script below `doc_root`
    pub(crate) fn load(doc_root: &Path) -> anyhow::Result<Self> {
        log::info!("Loading implementor scripts from {}", doc_root.display());
        Ok(Self::new(DocDir::open(doc_root)?.load()?))
    }

    /// A path shown relative to the documentation root
    pub(crate) fn display_path<'a>(&self, path: &'a Path) -> std::path::Display<'a> {
        path.strip_prefix(self.doc_dir().root())
            .unwrap_or(path)
            .display()
    }
}
