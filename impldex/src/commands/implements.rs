use crate::request::Request;
use crate::style;

pub(crate) fn execute(request: &Request, name: &str) -> (String, bool) {
    let found = request.traits_implemented_by(name);
    log::info!("Found {} impls for {name}", found.len());

    if found.is_empty() {
        return (
            format!("No documented trait implementations for '{name}'.\n"),
            true,
        );
    }

    let mut lines = vec![style::heading(&format!("Traits implemented by {name}:"))];

    for type_impl in found {
        let target = type_impl
            .implementor
            .target()
            .and_then(|target| target.title_path().map(String::from))
            .unwrap_or_default();
        lines.push(format!(
            "  {} for {target} ({})",
            type_impl.trait_path,
            style::crate_name(type_impl.crate_name)
        ));
    }

    (lines.join("\n") + "\n", false)
}
