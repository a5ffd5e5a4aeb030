use crate::commands::list::plural;
use crate::request::Request;
use crate::style;
use impldex_common::Change;
use std::path::PathBuf;

pub(crate) fn rewrite(request: &Request, dry_run: bool) -> (String, bool) {
    match request.rewrite(dry_run) {
        Ok(changes) => report(request, &changes, dry_run),
        Err(error) => {
            log::error!("{error:?}");
            (format!("{}\n", style::error(&format!("{error:#}"))), true)
        }
    }
}

pub(crate) fn remove_crate(request: &Request, name: &str, dry_run: bool) -> (String, bool) {
    log::info!("Removing {name} from implementor scripts");
    match request.remove_crate(name, dry_run) {
        Ok(changes) if changes.is_empty() => (
            format!("crate '{name}' does not appear in any implementor script\n"),
            true,
        ),
        Ok(changes) => report(request, &changes, dry_run),
        Err(error) => {
            log::error!("{error:?}");
            (format!("{}\n", style::error(&format!("{error:#}"))), true)
        }
    }
}

fn report(request: &Request, changes: &[(PathBuf, Change)], dry_run: bool) -> (String, bool) {
    let (rewrite_verb, delete_verb) = if dry_run {
        ("would rewrite", "would delete")
    } else {
        ("rewrote", "deleted")
    };

    let mut lines = vec![];
    let mut modified = 0;
    let mut skipped = 0;

    for (path, change) in changes {
        let path = request.display_path(path);
        match change {
            Change::Rewritten => {
                modified += 1;
                lines.push(format!("{rewrite_verb} {path}"));
            }
            Change::Deleted => {
                modified += 1;
                lines.push(format!("{delete_verb} {path}"));
            }
            Change::Skipped(reason) => {
                skipped += 1;
                lines.push(style::warning(&format!("skipped {path}: {reason}")));
            }
        }
    }

    lines.push(format!(
        "{} changed, {} skipped",
        plural(modified, "file"),
        skipped
    ));

    (lines.join("\n") + "\n", skipped > 0)
}
