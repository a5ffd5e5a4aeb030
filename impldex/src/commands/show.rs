use crate::request::Request;
use crate::style;

pub(crate) fn execute(request: &Request, name: &str) -> (String, bool) {
    log::info!("Looking up trait {name}");

    let trait_file = match request.find_trait(name) {
        Ok(trait_file) => trait_file,
        Err(suggestions) => {
            let mut lines = vec![format!("No trait named '{name}' in this documentation.")];

            let close: Vec<_> = suggestions
                .into_iter()
                .take(5)
                .filter(|s| s.score() > 0.8)
                .collect();

            if !close.is_empty() {
                lines.push("Did you mean one of these?".to_string());
                for suggestion in close {
                    lines.push(format!("  {}", suggestion.path()));
                }
            }

            return (lines.join("\n") + "\n", true);
        }
    };

    let mut lines = vec![style::heading(trait_file.trait_path())];

    let script = match trait_file.recover() {
        Ok(script) => script,
        Err(error) => {
            lines.push(style::error(&format!(
                "{} could not be read: {error}",
                request.display_path(trait_file.fs_path())
            )));
            return (lines.join("\n") + "\n", true);
        }
    };

    if let Some(error) = trait_file.error() {
        lines.push(style::warning(&format!(
            "metadata is stale ({error}); showing the table as written"
        )));
    }

    for entry in script.table() {
        lines.push(String::new());
        lines.push(format!("{}:", style::crate_name(&entry.crate_name)));
        for implementor in &entry.implementors {
            let link = implementor
                .target()
                .map(|target| format!("  {}", style::dimmed(target.root_relative_href())))
                .unwrap_or_default();
            lines.push(format!("  {}{link}", implementor.plain_text()));
        }
    }

    (lines.join("\n") + "\n", false)
}
