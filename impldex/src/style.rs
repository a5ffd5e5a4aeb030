//! Terminal styling that degrades to plain text when stdout is not a color terminal

use owo_colors::{OwoColorize, Stream};

pub(crate) fn heading(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.bold()).to_string()
}

pub(crate) fn crate_name(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.cyan()).to_string()
}

pub(crate) fn dimmed(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.dimmed())
        .to_string()
}

pub(crate) fn error(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.red()).to_string()
}

pub(crate) fn warning(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.yellow())
        .to_string()
}
