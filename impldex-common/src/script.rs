//! Codec for rustdoc's `trait.impl/**/trait.*.js` scripts
//!
//! Rustdoc writes each implementors table as a self-registering script followed by a metadata
//! comment:
//!
//! ```text
//! (function() {
//!     var implementors = Object.fromEntries([<fragment>,<fragment>]);
//!     if (window.register_implementors) {
//!         window.register_implementors(implementors);
//!     } else {
//!         window.pending_implementors = implementors;
//!     }
//! })()
//! //{"start":57,"fragment_lengths":[548,725]}
//! ```
//!
//! `start` is the byte offset of the first fragment. Each fragment is one crate's compact JSON
//! entry `["crate",[[...],...]]`; its recorded length includes the `,` separator in front of it
//! (so every length after the first is one byte longer than the JSON alone). Rustdoc uses those
//! lengths to splice a single crate's fragment in or out without decoding the rest.

use crate::{CrateName, Implementor, ImplementorsTable, error::ScriptError};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

pub(crate) const PROLOGUE: &str = "(function() {\n    var implementors = Object.fromEntries([";

pub(crate) const EPILOGUE: &str = "]);
    if (window.register_implementors) {
        window.register_implementors(implementors);
    } else {
        window.pending_implementors = implementors;
    }
})()";

const COMMENT_START: &str = "\n//";
const SEPARATOR: char = ',';

/// The trailing `//{"start":..,"fragment_lengths":[..]}` comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentMeta {
    pub start: usize,
    pub fragment_lengths: Vec<usize>,
}

/// A decoded implementors script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImplementorsScript {
    table: ImplementorsTable,
    declared: Option<FragmentMeta>,
}

impl ImplementorsScript {
    pub fn new(table: ImplementorsTable) -> Self {
        Self {
            table,
            declared: None,
        }
    }

    pub fn table(&self) -> &ImplementorsTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ImplementorsTable {
        &mut self.table
    }

    pub fn into_table(self) -> ImplementorsTable {
        self.table
    }

    /// The metadata read from the source this script was parsed from, if any
    pub fn declared_meta(&self) -> Option<&FragmentMeta> {
        self.declared.as_ref()
    }

    /// Decode a script, slicing fragments by the offsets its metadata comment declares
    pub fn parse(source: &str) -> Result<Self, ScriptError> {
        let (body, meta) = source
            .rsplit_once(COMMENT_START)
            .ok_or(ScriptError::MissingMetadata)?;
        let meta: FragmentMeta =
            serde_json::from_str(meta).map_err(ScriptError::InvalidMetadata)?;

        if !body.starts_with(PROLOGUE) {
            return Err(ScriptError::UnexpectedPrologue {
                expected: "`var implementors`",
            });
        }

        if meta.start != PROLOGUE.len() {
            return Err(ScriptError::StartMismatch {
                declared: meta.start,
                actual: PROLOGUE.len(),
            });
        }

        let mut table = ImplementorsTable::new();
        let mut seen = FxHashSet::default();
        let mut offset = meta.start;

        for (index, &length) in meta.fragment_lengths.iter().enumerate() {
            let end = offset
                .checked_add(length)
                .filter(|&end| end <= body.len())
                .ok_or(ScriptError::FragmentOutOfBounds {
                    index,
                    offset,
                    length,
                })?;
            let mut fragment = body
                .get(offset..end)
                .ok_or(ScriptError::NotCharBoundary { index, offset: end })?;

            if index > 0 {
                fragment = fragment.strip_prefix(SEPARATOR).ok_or_else(|| {
                    ScriptError::UnexpectedByte {
                        offset,
                        expected: SEPARATOR,
                        found: fragment.chars().next(),
                    }
                })?;
            }

            let (crate_name, implementors): (CrateName<'static>, Vec<Implementor>) =
                serde_json::from_str(fragment)
                    .map_err(|source| ScriptError::InvalidFragment { index, source })?;

            if !seen.insert(crate_name.clone()) {
                return Err(ScriptError::DuplicateCrate(crate_name.to_string()));
            }

            log::trace!("fragment {index}: {crate_name} ({length} bytes)");
            table.insert(crate_name, implementors);
            offset = end;
        }

        if &body[offset..] != EPILOGUE {
            if !body[offset..].starts_with(']') {
                return Err(ScriptError::UnexpectedByte {
                    offset,
                    expected: ']',
                    found: body[offset..].chars().next(),
                });
            }
            return Err(ScriptError::UnexpectedEpilogue {
                expected: "`register_implementors`",
            });
        }

        Ok(Self {
            table,
            declared: Some(meta),
        })
    }

    /// Decode a script by reading the whole table as JSON, disregarding the metadata comment
    ///
    /// This recovers scripts whose offsets were invalidated by hand edits or concatenation.
    pub fn parse_ignoring_metadata(source: &str) -> Result<Self, ScriptError> {
        let body = source
            .rsplit_once(COMMENT_START)
            .map_or(source, |(body, _)| body);

        if !body.starts_with(PROLOGUE) {
            return Err(ScriptError::UnexpectedPrologue {
                expected: "`var implementors`",
            });
        }

        let Some(array_end) = body.strip_suffix(EPILOGUE).map(|rest| rest.len()) else {
            return Err(ScriptError::UnexpectedEpilogue {
                expected: "`register_implementors`",
            });
        };

        // the prologue ends with `[` and the epilogue starts with `]`
        let array = &body[PROLOGUE.len() - 1..array_end + 1];
        let entries: Vec<(CrateName<'static>, Vec<Implementor>)> = serde_json::from_str(array)
            .map_err(|source| ScriptError::InvalidFragment { index: 0, source })?;

        let mut table = ImplementorsTable::new();
        for (crate_name, implementors) in entries {
            if table.contains(&crate_name) {
                return Err(ScriptError::DuplicateCrate(crate_name.to_string()));
            }
            table.insert(crate_name, implementors);
        }

        Ok(Self::new(table))
    }

    /// Compact JSON for each crate entry, without separators
    pub fn fragments(&self) -> Result<Vec<String>, serde_json::Error> {
        self.table
            .iter()
            .map(|entry| serde_json::to_string(&(&entry.crate_name, &entry.implementors)))
            .collect()
    }

    /// Metadata describing what [`render`](Self::render) will write
    pub fn fragment_meta(&self) -> Result<FragmentMeta, serde_json::Error> {
        Ok(meta_for(&self.fragments()?))
    }

    /// Serialize in rustdoc's layout, with freshly computed metadata
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn meta_for(fragments: &[String]) -> FragmentMeta {
    FragmentMeta {
        start: PROLOGUE.len(),
        fragment_lengths: fragments
            .iter()
            .enumerate()
            .map(|(index, fragment)| {
                if index == 0 {
                    fragment.len()
                } else {
                    fragment.len() + SEPARATOR.len_utf8()
                }
            })
            .collect(),
    }
}

impl Display for ImplementorsScript {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let fragments = self.fragments().map_err(|_| fmt::Error)?;
        let meta = serde_json::to_string(&meta_for(&fragments)).map_err(|_| fmt::Error)?;

        f.write_str(PROLOGUE)?;
        for (index, fragment) in fragments.iter().enumerate() {
            if index > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(fragment)?;
        }
        f.write_str(EPILOGUE)?;
        f.write_str(COMMENT_START)?;
        f.write_str(&meta)
    }
}

impl From<ImplementorsTable> for ImplementorsScript {
    fn from(table: ImplementorsTable) -> Self {
        Self::new(table)
    }
}

#[cfg(test)]
mod tests;
