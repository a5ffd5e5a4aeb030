//! Implementor records
//!
//! Each record in a `trait.impl` table is a short HTML string such as
//!
//! ```text
//! impl TryFromPrimitive for <a class="enum" href="gw2_mumble/enum.Mount.html" title="enum gw2_mumble::Mount">Mount</a>
//! ```
//!
//! optionally followed by a synthetic marker and the list of types the impl applies to.
//! The string is kept verbatim so that tables re-serialize byte-for-byte; [`ImplTarget`]
//! extracts the linked implementing type on demand.

use fieldwork::Fieldwork;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, SeqAccess, Visitor},
    ser::SerializeSeq,
};
use std::fmt::{self, Formatter};

/// One documented `impl Trait for Type`
#[derive(Debug, Clone, PartialEq, Eq, Fieldwork)]
#[fieldwork(get)]
pub struct Implementor {
    /// the HTML label, exactly as rustdoc wrote it
    text: String,
    /// synthetic (auto trait or blanket) impls carry the list of types they cover
    #[field = false]
    synthetic: bool,
    types: Vec<String>,
}

impl Implementor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            synthetic: false,
            types: vec![],
        }
    }

    pub fn synthetic(text: impl Into<String>, types: Vec<String>) -> Self {
        Self {
            text: text.into(),
            synthetic: true,
            types,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    /// The label with markup removed and entities decoded
    pub fn plain_text(&self) -> String {
        strip_tags(&self.text)
    }

    /// The implemented trait's name as written in the label, without generics or path
    ///
    /// `impl<T> core::convert::From<T> for Foo` yields `From`.
    pub fn trait_name(&self) -> Option<String> {
        let plain = self.plain_text();
        let rest = plain.strip_prefix("impl")?;
        let rest = skip_generics(rest).trim_start();
        let rest = rest.strip_prefix('!').unwrap_or(rest);
        let (trait_part, _) = rest.split_once(" for ")?;
        let trait_path = trait_part.split('<').next()?.trim();
        let name = trait_path.rsplit("::").next()?;
        (!name.is_empty()).then(|| name.to_string())
    }

    /// Whether this is a negative impl (`impl !Send for Foo`)
    pub fn is_negative(&self) -> bool {
        let plain = self.plain_text();
        plain
            .strip_prefix("impl")
            .map(|rest| skip_generics(rest).trim_start().starts_with('!'))
            .unwrap_or(false)
    }

    /// The implementing type's link, if the label links to one
    ///
    /// Anchors inside a trailing where clause are bounds, not the implementing type.
    pub fn target(&self) -> Option<ImplTarget> {
        let (_, after_for) = self.text.split_once(" for ")?;
        ImplTarget::parse_anchor(before_where_clause(after_for))
    }
}

/// The implementing type referenced by an implementor label
#[derive(Debug, Clone, PartialEq, Eq, Fieldwork)]
#[fieldwork(get)]
pub struct ImplTarget {
    /// the anchor's `class`, e.g. `enum` or `struct`
    kind: String,
    /// text shown to the reader
    label: String,
    /// link relative to the documentation root
    href: String,
    /// `title` attribute, e.g. `enum gw2_mumble::Mount`
    title: Option<String>,
}

impl ImplTarget {
    /// Parse the first `<a ...>label</a>` in `html`
    pub fn parse_anchor(html: &str) -> Option<Self> {
        let start = html.find("<a ")?;
        let after_tag = &html[start + 3..];
        let close = after_tag.find('>')?;
        let attributes = &after_tag[..close];
        let body = &after_tag[close + 1..];
        let end = body.find("</a>")?;
        let label = strip_tags(&body[..end]);

        let mut kind = None;
        let mut href = None;
        let mut title = None;
        for (name, value) in attributes_of(attributes) {
            match name {
                "class" => kind = Some(value.to_string()),
                "href" => href = Some(value.to_string()),
                "title" => title = Some(decode_entities(value)),
                _ => {}
            }
        }

        Some(Self {
            kind: kind.unwrap_or_default(),
            label,
            href: href?,
            title,
        })
    }

    /// The href with any leading `./` or `../` components removed
    pub fn root_relative_href(&self) -> &str {
        let mut href = self.href.as_str();
        loop {
            if let Some(rest) = href.strip_prefix("../") {
                href = rest;
            } else if let Some(rest) = href.strip_prefix("./") {
                href = rest;
            } else {
                return href.split('#').next().unwrap_or(href);
            }
        }
    }

    /// First path segment of the link, which rustdoc names after the crate
    pub fn link_crate(&self) -> Option<&str> {
        let href = self.root_relative_href();
        let (first, _) = href.split_once('/')?;
        (!first.is_empty()).then_some(first)
    }

    /// Item kind and name encoded in the page name (`enum.Mount.html` -> `("enum", "Mount")`)
    pub fn link_item(&self) -> Option<(&str, &str)> {
        let page = self.root_relative_href().rsplit('/').next()?;
        let page = page.strip_suffix(".html")?;
        page.split_once('.')
    }

    /// Last segment of the `title` path (`enum gw2_mumble::Mount` -> `Mount`)
    pub fn title_name(&self) -> Option<&str> {
        let title = self.title.as_deref()?;
        let path = title.rsplit(' ').next()?;
        path.rsplit("::").next()
    }

    /// Fully qualified path from the `title` attribute
    pub fn title_path(&self) -> Option<&str> {
        self.title.as_deref()?.rsplit(' ').next()
    }
}

fn attributes_of(attributes: &str) -> impl Iterator<Item = (&str, &str)> {
    let mut rest = attributes;
    std::iter::from_fn(move || {
        let (name, after_eq) = rest.split_once("=\"")?;
        let (value, after_value) = after_eq.split_once('"')?;
        rest = after_value;
        Some((name.trim(), value))
    })
}

fn before_where_clause(html: &str) -> &str {
    ["<div class=\"where", "<span class=\"where", " where "]
        .into_iter()
        .filter_map(|marker| html.find(marker))
        .min()
        .map_or(html, |end| &html[..end])
}

fn skip_generics(s: &str) -> &str {
    if !s.starts_with('<') {
        return s;
    }
    let mut depth = 0usize;
    let mut previous = None;
    for (index, c) in s.char_indices() {
        let after_dash = previous == Some('-');
        previous = Some(c);
        match c {
            '<' => depth += 1,
            // the `>` of `->` in `Fn() -> T` bounds
            '>' if after_dash => {}
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &s[index + 1..];
                }
            }
            _ => {}
        }
    }
    ""
}

fn strip_tags(html: &str) -> String {
    let mut plain = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        plain.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                rest = "";
            }
        }
    }
    plain.push_str(rest);
    decode_entities(&plain)
}

fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}

impl Serialize for Implementor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.synthetic { 3 } else { 1 };
        let mut seq = serializer.serialize_seq(Some(len))?;
        seq.serialize_element(&self.text)?;
        if self.synthetic {
            seq.serialize_element(&1)?;
            seq.serialize_element(&self.types)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for Implementor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ImplementorVisitor;

        impl<'de> Visitor<'de> for ImplementorVisitor {
            type Value = Implementor;

            fn expecting(&self, f: &mut Formatter) -> fmt::Result {
                f.write_str("an implementor entry `[text]` or `[text, 1, [types...]]`")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let text: String = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;

                let Some(marker) = seq.next_element::<u8>()? else {
                    return Ok(Implementor::new(text));
                };

                if marker != 1 {
                    return Err(de::Error::invalid_value(
                        de::Unexpected::Unsigned(marker.into()),
                        &"the synthetic marker 1",
                    ));
                }

                let types: Vec<String> = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;

                if seq.next_element::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(4, &self));
                }

                Ok(Implementor::synthetic(text, types))
            }
        }

        deserializer.deserialize_seq(ImplementorVisitor)
    }
}
