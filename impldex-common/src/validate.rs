//! Structural checks for implementor scripts
//!
//! Nothing here fails: every problem becomes a [`Diagnostic`] so that a caller can report all
//! of them at once.

use crate::{CrateName, ImplementorsScript, ImplementorsTable, Implementor};
use rustc_hash::FxHashSet;
use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub crate_name: Option<String>,
    pub message: String,
}

impl Diagnostic {
    fn error(crate_name: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            crate_name: crate_name.map(String::from),
            message: message.into(),
        }
    }

    fn warning(crate_name: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            crate_name: crate_name.map(String::from),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.crate_name {
            Some(crate_name) => write!(f, "{}: [{}] {}", self.severity, crate_name, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// Configurable set of checks
#[derive(Debug, Clone, Default)]
pub struct Validator {
    allowed_crates: Option<FxHashSet<CrateName<'static>>>,
    trait_name: Option<String>,
    doc_root: Option<PathBuf>,
    documented_crates: FxHashSet<String>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only these crates may appear as table keys
    pub fn with_allowed_crates<I, S>(mut self, crates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_crates = Some(
            crates
                .into_iter()
                .map(|name| CrateName::from(name.into()))
                .collect(),
        );
        self
    }

    /// Every record must name this trait
    pub fn with_trait_name(mut self, trait_name: impl Into<String>) -> Self {
        self.trait_name = Some(trait_name.into());
        self
    }

    /// Check that linked pages exist below this documentation root
    pub fn with_doc_root(mut self, doc_root: impl Into<PathBuf>) -> Self {
        self.doc_root = Some(doc_root.into());
        self
    }

    /// Crate directories present in the documentation root; links into any other crate
    /// directory are reported. An empty set disables the check.
    pub fn with_documented_crates<I, S>(mut self, crates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documented_crates = crates.into_iter().map(Into::into).collect();
        self
    }

    /// Check raw script text: framing, metadata, canonical form, then table contents
    pub fn check_source(&self, source: &str) -> Vec<Diagnostic> {
        let mut diagnostics = vec![];

        let script = match ImplementorsScript::parse(source) {
            Ok(script) => script,
            Err(error) => {
                diagnostics.push(Diagnostic::error(None, error.to_string()));
                match ImplementorsScript::parse_ignoring_metadata(source) {
                    Ok(script) => {
                        log::debug!("recovered table by ignoring metadata");
                        diagnostics.push(Diagnostic::error(
                            None,
                            "metadata comment does not describe the table; `rewrite` can repair it",
                        ));
                        script
                    }
                    Err(_) => return diagnostics,
                }
            }
        };

        if let Some(declared) = script.declared_meta() {
            match script.fragment_meta() {
                Ok(computed) if computed.fragment_lengths != declared.fragment_lengths => {
                    diagnostics.push(Diagnostic::error(
                        None,
                        format!(
                            "declared fragment_lengths {:?} differ from serialized lengths {:?}",
                            declared.fragment_lengths, computed.fragment_lengths
                        ),
                    ));
                }
                Ok(_) => {
                    if script.render() != source {
                        diagnostics.push(Diagnostic::warning(
                            None,
                            "re-serializing does not reproduce the original bytes",
                        ));
                    }
                }
                Err(error) => diagnostics.push(Diagnostic::error(None, error.to_string())),
            }
        }

        diagnostics.extend(self.check_table(script.table()));
        diagnostics
    }

    /// Check each crate entry and record
    pub fn check_table(&self, table: &ImplementorsTable) -> Vec<Diagnostic> {
        let mut diagnostics = vec![];

        for entry in table {
            let crate_name = entry.crate_name.as_str();

            if crate_name.is_empty() {
                diagnostics.push(Diagnostic::error(None, "empty crate name"));
            } else if let Some(allowed) = &self.allowed_crates
                && !allowed.contains(&entry.crate_name)
            {
                diagnostics.push(Diagnostic::error(
                    Some(crate_name),
                    "crate is not in the allowed list",
                ));
            }

            let mut seen = FxHashSet::default();
            for implementor in &entry.implementors {
                if !seen.insert(implementor.text()) {
                    diagnostics.push(Diagnostic::warning(
                        Some(crate_name),
                        format!("duplicate record `{}`", implementor.plain_text()),
                    ));
                }
                self.check_implementor(crate_name, implementor, &mut diagnostics);
            }
        }

        diagnostics
    }

    fn check_implementor(
        &self,
        crate_name: &str,
        implementor: &Implementor,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let crate_name = Some(crate_name);
        let plain = implementor.plain_text();

        if !plain.starts_with("impl") {
            diagnostics.push(Diagnostic::error(
                crate_name,
                format!("record `{plain}` does not start with `impl`"),
            ));
            return;
        }

        if let Some(expected) = &self.trait_name {
            match implementor.trait_name() {
                Some(found) if &found == expected => {}
                Some(found) => diagnostics.push(Diagnostic::error(
                    crate_name,
                    format!("record `{plain}` implements `{found}`, expected `{expected}`"),
                )),
                None => diagnostics.push(Diagnostic::error(
                    crate_name,
                    format!("record `{plain}` does not name a trait"),
                )),
            }
        }

        let Some(target) = implementor.target() else {
            return;
        };

        match target.link_item() {
            // `[`, `&T`, `(` and friends link to `primitive.slice.html` and the like
            Some(("primitive", _)) => {}
            Some((_, linked)) if linked == target.label() => {}
            Some((_, linked)) => diagnostics.push(Diagnostic::error(
                crate_name,
                format!(
                    "label `{}` does not match linked item `{linked}` ({})",
                    target.label(),
                    target.href()
                ),
            )),
            None if is_external(target.href()) => {}
            None => diagnostics.push(Diagnostic::error(
                crate_name,
                format!("link `{}` is not an item page", target.href()),
            )),
        }

        if let Some(title_name) = target.title_name()
            && title_name != target.label()
        {
            diagnostics.push(Diagnostic::error(
                crate_name,
                format!(
                    "label `{}` does not match title `{}`",
                    target.label(),
                    title_name
                ),
            ));
        }

        if !self.documented_crates.is_empty()
            && let Some(link_crate) = target.link_crate()
            && !is_external(target.href())
            && !self.documented_crates.contains(link_crate)
        {
            diagnostics.push(Diagnostic::warning(
                crate_name,
                format!("link points into undocumented crate `{link_crate}`"),
            ));
        }

        if let Some(doc_root) = &self.doc_root
            && !is_external(target.href())
        {
            let page = doc_root.join(target.root_relative_href());
            if !page.is_file() {
                diagnostics.push(Diagnostic::warning(
                    crate_name,
                    format!("linked page {} does not exist", target.root_relative_href()),
                ));
            }
        }
    }
}

fn is_external(href: &str) -> bool {
    href.starts_with("http://") || href.starts_with("https://")
}

/// True if any diagnostic is an error
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(Diagnostic::is_error)
}

#[cfg(test)]
mod tests;
