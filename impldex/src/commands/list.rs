use crate::request::Request;
use crate::style;

pub(crate) fn execute(request: &Request) -> (String, bool) {
    let mut lines = vec![style::heading("Documented traits:"), String::new()];

    if request.traits().is_empty() {
        lines.push(format!(
            "No implementor scripts found in {}",
            request.doc_dir().trait_impl_dir().display()
        ));
    }

    for trait_file in request.traits() {
        let summary = match trait_file.script() {
            Some(script) => {
                let table = script.table();
                format!(
                    "{} in {}",
                    plural(table.implementor_count(), "implementor"),
                    plural(table.len(), "crate")
                )
            }
            None => style::error(&format!(
                "unreadable: {}",
                trait_file
                    .error()
                    .map(ToString::to_string)
                    .unwrap_or_default()
            )),
        };

        lines.push(format!(
            "  {}  {}",
            style::heading(trait_file.trait_path()),
            style::dimmed(&summary)
        ));
    }

    (lines.join("\n") + "\n", false)
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
