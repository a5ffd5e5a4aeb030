//! Documentation output directories
//!
//! A rustdoc output directory (usually `target/doc`) keeps one implementor script per trait
//! under `trait.impl/`, mirroring the trait's module path:
//!
//! ```text
//! target/doc/trait.impl/num_enum/trait.TryFromPrimitive.js   -> num_enum::TryFromPrimitive
//! target/doc/trait.impl/core/convert/trait.From.js           -> core::convert::From
//! ```

use crate::{CrateName, Implementor, ImplementorsScript, error::ScriptError};
use anyhow::{Context, Result, anyhow};
use cargo_metadata::MetadataCommand;
use fieldwork::Fieldwork;
use rustc_hash::FxHashMap;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

pub const TRAIT_IMPL_DIR: &str = "trait.impl";

/// A rustdoc output directory containing `trait.impl/`
#[derive(Debug, Clone, Fieldwork)]
#[fieldwork(get)]
pub struct DocDir {
    root: PathBuf,
}

/// One `trait.*.js` file and its decoded contents
#[derive(Debug)]
pub struct TraitFile {
    trait_path: String,
    fs_path: PathBuf,
    source: String,
    parsed: Result<ImplementorsScript, ScriptError>,
}

/// A near miss returned when a trait lookup fails
#[derive(Debug, Clone, PartialEq, Fieldwork)]
#[fieldwork(get)]
pub struct Suggestion {
    path: String,
    #[field = false]
    score: f64,
}

impl Suggestion {
    pub fn score(&self) -> f64 {
        self.score
    }
}

/// One trait implemented by a type, found through the reverse index
#[derive(Debug, Clone)]
pub struct TypeImpl<'a> {
    pub trait_path: &'a str,
    pub crate_name: &'a CrateName<'static>,
    pub implementor: &'a Implementor,
}

/// What a bulk edit did (or would do) to a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Rewritten,
    Deleted,
    Skipped(String),
}

impl DocDir {
    /// Locate a documentation root from a doc directory, a Cargo project directory, or a
    /// `Cargo.toml`
    ///
    /// `~` is expanded. For Cargo projects the doc directory is `<target-dir>/doc`.
    pub fn open(path: &Path) -> Result<Self> {
        let expanded = shellexpand::tilde(&path.to_string_lossy()).into_owned();
        let path = PathBuf::from(expanded);

        if path.join(TRAIT_IMPL_DIR).is_dir() {
            return Ok(Self { root: path });
        }

        if path.file_name().and_then(|n| n.to_str()) == Some(TRAIT_IMPL_DIR) && path.is_dir() {
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."));
            return Ok(Self { root });
        }

        let metadata = if path.is_dir() && path.join("Cargo.toml").is_file() {
            MetadataCommand::new().current_dir(&path).no_deps().exec()?
        } else if path.file_name().and_then(|n| n.to_str()) == Some("Cargo.toml") {
            if !path.exists() {
                return Err(anyhow!("Cargo.toml not found at {}", path.display()));
            }
            MetadataCommand::new().manifest_path(&path).no_deps().exec()?
        } else {
            return Err(anyhow!(
                "{} is neither a rustdoc output directory nor a cargo project",
                path.display()
            ));
        };

        let root = metadata.target_directory.join("doc").into_std_path_buf();
        log::debug!("resolved doc directory {}", root.display());

        if !root.join(TRAIT_IMPL_DIR).is_dir() {
            return Err(anyhow!(
                "no {TRAIT_IMPL_DIR} directory in {}; run `cargo doc` first",
                root.display()
            ));
        }

        Ok(Self { root })
    }

    /// Wrap a directory without checking it
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn trait_impl_dir(&self) -> PathBuf {
        self.root.join(TRAIT_IMPL_DIR)
    }

    /// Read and decode every trait script, sorted by trait path
    ///
    /// A file that fails to decode is kept with its error; only I/O failures are fatal.
    pub fn load(&self) -> Result<DocIndex> {
        let base = self.trait_impl_dir();
        let mut traits = vec![];

        for entry in WalkDir::new(&base).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", base.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&base) else {
                continue;
            };
            let Some(trait_path) = trait_path_for(relative) else {
                log::trace!("ignoring {}", entry.path().display());
                continue;
            };

            let source = fs::read_to_string(entry.path())
                .with_context(|| format!("reading {}", entry.path().display()))?;
            let parsed = ImplementorsScript::parse(&source);
            if let Err(error) = &parsed {
                log::warn!("{trait_path}: {error}");
            }

            traits.push(TraitFile {
                trait_path,
                fs_path: entry.into_path(),
                source,
                parsed,
            });
        }

        traits.sort_by(|a, b| a.trait_path.cmp(&b.trait_path));
        log::info!("loaded {} trait scripts from {}", traits.len(), base.display());

        Ok(DocIndex {
            doc_dir: self.clone(),
            traits,
        })
    }
}

/// `num_enum/trait.TryFromPrimitive.js` -> `num_enum::TryFromPrimitive`
pub fn trait_path_for(relative: &Path) -> Option<String> {
    let file_name = relative.file_name()?.to_str()?;
    let trait_name = file_name.strip_prefix("trait.")?.strip_suffix(".js")?;
    if trait_name.is_empty() {
        return None;
    }

    let mut segments = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .map(|component| component.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    if segments.is_empty() {
        return None;
    }
    segments.push(trait_name);
    Some(segments.join("::"))
}

impl TraitFile {
    pub fn trait_path(&self) -> &str {
        &self.trait_path
    }

    /// Last path segment (`num_enum::TryFromPrimitive` -> `TryFromPrimitive`)
    pub fn trait_name(&self) -> &str {
        self.trait_path
            .rsplit("::")
            .next()
            .unwrap_or(&self.trait_path)
    }

    /// Crate that defines the trait
    pub fn defining_crate(&self) -> &str {
        self.trait_path
            .split("::")
            .next()
            .unwrap_or(&self.trait_path)
    }

    pub fn fs_path(&self) -> &Path {
        &self.fs_path
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn script(&self) -> Option<&ImplementorsScript> {
        self.parsed.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ScriptError> {
        self.parsed.as_ref().err()
    }

    /// The decoded script, falling back to reading the table without its metadata
    pub fn recover(&self) -> Result<ImplementorsScript, ScriptError> {
        match &self.parsed {
            Ok(script) => Ok(script.clone()),
            Err(_) => ImplementorsScript::parse_ignoring_metadata(&self.source),
        }
    }
}

/// All trait scripts of one documentation directory
#[derive(Debug)]
pub struct DocIndex {
    doc_dir: DocDir,
    traits: Vec<TraitFile>,
}

impl DocIndex {
    pub fn doc_dir(&self) -> &DocDir {
        &self.doc_dir
    }

    pub fn traits(&self) -> &[TraitFile] {
        &self.traits
    }

    /// Crate directories present in the documentation root
    pub fn documented_crates(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(self.doc_dir.root()) else {
            return vec![];
        };
        let mut crates: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().join("index.html").is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        crates.sort();
        crates
    }

    /// Find a trait by full path (`num_enum::TryFromPrimitive`) or bare name
    /// (`TryFromPrimitive`)
    ///
    /// On a miss, returns candidates ordered by similarity.
    pub fn find_trait(&self, query: &str) -> Result<&TraitFile, Vec<Suggestion>> {
        if let Some(exact) = self.traits.iter().find(|t| t.trait_path == query) {
            return Ok(exact);
        }

        let by_name: Vec<_> = self
            .traits
            .iter()
            .filter(|t| t.trait_name() == query)
            .collect();
        if let [only] = &*by_name {
            return Ok(*only);
        }

        if !by_name.is_empty() {
            return Err(by_name
                .into_iter()
                .map(|t| Suggestion {
                    path: t.trait_path.clone(),
                    score: 1.0,
                })
                .collect());
        }

        let query_lower = query.to_lowercase();
        let mut suggestions: Vec<_> = self
            .traits
            .iter()
            .map(|t| {
                let full = strsim::jaro_winkler(&query_lower, &t.trait_path.to_lowercase());
                let bare = strsim::jaro_winkler(&query_lower, &t.trait_name().to_lowercase());
                Suggestion {
                    path: t.trait_path.clone(),
                    score: full.max(bare),
                }
            })
            .collect();
        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        Err(suggestions)
    }

    /// Every trait the named type implements, matched by label, full path or path suffix
    pub fn traits_implemented_by(&self, type_query: &str) -> Vec<TypeImpl<'_>> {
        let suffix = format!("::{type_query}");
        let mut found = vec![];

        for (trait_path, crate_name, implementor) in self.records() {
            let Some(target) = implementor.target() else {
                continue;
            };
            let matches = target.label() == type_query
                || target
                    .title_path()
                    .is_some_and(|path| path == type_query || path.ends_with(&suffix));
            if matches {
                found.push(TypeImpl {
                    trait_path,
                    crate_name,
                    implementor,
                });
            }
        }

        found
    }

    /// Implementing type paths mapped to the traits they implement
    pub fn reverse_index(&self) -> FxHashMap<String, Vec<&str>> {
        let mut index: FxHashMap<String, Vec<&str>> = FxHashMap::default();
        for (trait_path, _, implementor) in self.records() {
            let key = match implementor.target() {
                Some(target) => target
                    .title_path()
                    .map(String::from)
                    .unwrap_or_else(|| target.label().to_string()),
                None => continue,
            };
            let traits = index.entry(key).or_default();
            if !traits.contains(&trait_path) {
                traits.push(trait_path);
            }
        }
        index
    }

    fn records(&self) -> impl Iterator<Item = (&str, &CrateName<'static>, &Implementor)> {
        self.traits.iter().flat_map(|trait_file| {
            trait_file
                .script()
                .into_iter()
                .flat_map(|script| script.table().iter())
                .flat_map(move |entry| {
                    entry.implementors.iter().map(move |implementor| {
                        (trait_file.trait_path(), &entry.crate_name, implementor)
                    })
                })
        })
    }

    /// Re-render every script in canonical form, repairing stale metadata
    pub fn rewrite(&self, dry_run: bool) -> Result<Vec<(PathBuf, Change)>> {
        let mut changes = vec![];
        for trait_file in &self.traits {
            let script = match trait_file.recover() {
                Ok(script) => script,
                Err(error) => {
                    changes.push((
                        trait_file.fs_path.clone(),
                        Change::Skipped(error.to_string()),
                    ));
                    continue;
                }
            };

            let rendered = script.render();
            if rendered != trait_file.source {
                if !dry_run {
                    write_atomically(&trait_file.fs_path, &rendered)?;
                }
                changes.push((trait_file.fs_path.clone(), Change::Rewritten));
            }
        }
        Ok(changes)
    }

    /// Drop one crate's fragment from every script, deleting scripts left empty
    pub fn remove_crate(&self, crate_name: &str, dry_run: bool) -> Result<Vec<(PathBuf, Change)>> {
        let mut changes = vec![];
        for trait_file in &self.traits {
            let mut script = match trait_file.recover() {
                Ok(script) => script,
                Err(error) => {
                    changes.push((
                        trait_file.fs_path.clone(),
                        Change::Skipped(error.to_string()),
                    ));
                    continue;
                }
            };

            if script.table_mut().remove(crate_name).is_none() {
                continue;
            }

            if script.table().is_empty() {
                if !dry_run {
                    fs::remove_file(&trait_file.fs_path)
                        .with_context(|| format!("removing {}", trait_file.fs_path.display()))?;
                    remove_empty_parents(&trait_file.fs_path, &self.doc_dir.trait_impl_dir());
                }
                changes.push((trait_file.fs_path.clone(), Change::Deleted));
            } else {
                if !dry_run {
                    write_atomically(&trait_file.fs_path, &script.render())?;
                }
                changes.push((trait_file.fs_path.clone(), Change::Rewritten));
            }
        }
        Ok(changes)
    }

    /// Write a script for the given trait path, creating directories as needed
    pub fn write_trait(&self, trait_path: &str, script: &ImplementorsScript) -> Result<PathBuf> {
        let mut fs_path = self.doc_dir.trait_impl_dir();
        let segments: Vec<_> = trait_path.split("::").collect();
        let Some((trait_name, modules)) = segments.split_last() else {
            return Err(anyhow!("empty trait path"));
        };
        if modules.is_empty() {
            return Err(anyhow!("trait path {trait_path} has no crate"));
        }
        for module in modules {
            fs_path.push(module);
        }
        fs::create_dir_all(&fs_path)
            .with_context(|| format!("creating {}", fs_path.display()))?;
        fs_path.push(format!("trait.{trait_name}.js"));
        write_atomically(&fs_path, &script.render())?;
        Ok(fs_path)
    }
}

fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);
    fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
    if let Err(error) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(error).with_context(|| format!("replacing {}", path.display()));
    }
    log::debug!("wrote {}", path.display());
    Ok(())
}

fn remove_empty_parents(path: &Path, stop_at: &Path) {
    let mut dir = path.parent();
    while let Some(current) = dir {
        if current == stop_at || !current.starts_with(stop_at) {
            break;
        }
        if fs::remove_dir(current).is_err() {
            break;
        }
        dir = current.parent();
    }
}
