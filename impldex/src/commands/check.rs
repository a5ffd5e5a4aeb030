use crate::commands::list::plural;
use crate::request::Request;
use crate::style;
use impldex_common::{Severity, Validator};

pub(crate) fn execute(request: &Request, crates: &[String], links: bool) -> (String, bool) {
    let documented_crates = if links {
        request.documented_crates()
    } else {
        vec![]
    };
    let mut lines = vec![];
    let mut errors = 0;
    let mut warnings = 0;

    for trait_file in request.traits() {
        let mut validator = Validator::new().with_trait_name(trait_file.trait_name());
        if !crates.is_empty() {
            validator = validator.with_allowed_crates(crates.iter().cloned());
        }
        if links {
            validator = validator
                .with_doc_root(request.doc_dir().root())
                .with_documented_crates(documented_crates.iter().cloned());
        }

        let diagnostics = validator.check_source(trait_file.source());
        log::debug!(
            "{}: {} diagnostics",
            trait_file.trait_path(),
            diagnostics.len()
        );

        for diagnostic in diagnostics {
            let rendered = diagnostic.to_string();
            let rendered = match diagnostic.severity {
                Severity::Error => {
                    errors += 1;
                    style::error(&rendered)
                }
                Severity::Warning => {
                    warnings += 1;
                    style::warning(&rendered)
                }
            };
            lines.push(format!(
                "{}: {rendered}",
                request.display_path(trait_file.fs_path())
            ));
        }
    }

    lines.push(format!(
        "checked {}: {}, {}",
        plural(request.traits().len(), "script"),
        plural(errors, "error"),
        plural(warnings, "warning")
    ));

    (lines.join("\n") + "\n", errors > 0)
}
