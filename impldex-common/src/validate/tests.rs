use super::*;

const TRY_FROM_PRIMITIVE: &str =
    include_str!("../../../tests/fixture-docs/trait.impl/num_enum/trait.TryFromPrimitive.js");

fn table_with(crate_name: &'static str, texts: &[&str]) -> ImplementorsTable {
    let mut table = ImplementorsTable::new();
    table.insert(
        crate_name,
        texts.iter().map(|text| Implementor::new(*text)).collect(),
    );
    table
}

#[test]
fn test_rustdoc_output_is_clean() {
    let diagnostics = Validator::new()
        .with_allowed_crates(["gw2_mumble", "nexus"])
        .with_trait_name("TryFromPrimitive")
        .check_source(TRY_FROM_PRIMITIVE);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_unlisted_crate() {
    let diagnostics = Validator::new()
        .with_allowed_crates(["nexus"])
        .check_source(TRY_FROM_PRIMITIVE);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].crate_name.as_deref(), Some("gw2_mumble"));
    assert!(has_errors(&diagnostics));
}

#[test]
fn test_label_must_match_link() {
    let table = table_with(
        "gw2_mumble",
        &[
            r#"impl TryFromPrimitive for <a class="enum" href="gw2_mumble/enum.Race.html" title="enum gw2_mumble::Mount">Mount</a>"#,
        ],
    );
    let diagnostics = Validator::new().check_table(&table);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "label `Mount` does not match linked item `Race` (gw2_mumble/enum.Race.html)"
    );
}

#[test]
fn test_label_must_match_title() {
    let table = table_with(
        "gw2_mumble",
        &[
            r#"impl TryFromPrimitive for <a class="enum" href="gw2_mumble/enum.Mount.html" title="enum gw2_mumble::Race">Mount</a>"#,
        ],
    );
    let diagnostics = Validator::new().check_table(&table);
    assert_eq!(
        diagnostics
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        ["error: [gw2_mumble] label `Mount` does not match title `Race`"]
    );
}

#[test]
fn test_primitive_links_have_symbolic_labels() {
    let table = table_with(
        "nexus",
        &[
            r#"impl Foo for <a class="primitive" href="https://doc.rust-lang.org/nightly/std/primitive.slice.html">[</a><a class="primitive" href="https://doc.rust-lang.org/nightly/std/primitive.u8.html">u8</a><a class="primitive" href="https://doc.rust-lang.org/nightly/std/primitive.slice.html">]</a>"#,
            r#"impl&lt;T&gt; Foo for <a class="primitive" href="https://doc.rust-lang.org/nightly/std/primitive.reference.html">&amp;T</a>"#,
        ],
    );
    let diagnostics = Validator::new()
        .with_trait_name("Foo")
        .check_table(&table);
    assert!(!has_errors(&diagnostics), "{diagnostics:?}");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_fn_bound_in_generics() {
    let table = table_with(
        "nexus",
        &[
            r#"impl&lt;F: <a class="trait" href="https://doc.rust-lang.org/nightly/core/ops/function/trait.Fn.html" title="trait core::ops::function::Fn">Fn</a>() -&gt; <a class="primitive" href="https://doc.rust-lang.org/nightly/std/primitive.u8.html">u8</a>&gt; Foo for F"#,
        ],
    );
    let diagnostics = Validator::new()
        .with_trait_name("Foo")
        .check_table(&table);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
}

#[test]
fn test_wrong_trait_and_not_impl() {
    let table = table_with(
        "nexus",
        &["impl IntoEnumIterator for Foo", "struct Foo"],
    );
    let diagnostics = Validator::new()
        .with_trait_name("TryFromPrimitive")
        .check_table(&table);
    let messages: Vec<_> = diagnostics.iter().map(|d| d.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "record `impl IntoEnumIterator for Foo` implements `IntoEnumIterator`, expected `TryFromPrimitive`",
            "record `struct Foo` does not start with `impl`",
        ]
    );
}

#[test]
fn test_empty_crate_name_and_duplicates() {
    let table = table_with("", &["impl A for B", "impl A for B"]);
    let diagnostics = Validator::new().check_table(&table);
    assert_eq!(diagnostics[0].message, "empty crate name");
    assert_eq!(diagnostics[1].severity, Severity::Warning);
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn test_stale_fragment_lengths() {
    // pretty-printed JSON parses, but rustdoc would write it compactly
    let source = TRY_FROM_PRIMITIVE.replacen(r#"["gw2_mumble",[["#, r#"["gw2_mumble", [["#, 1);
    let source = source.replace("[548,725]", "[549,725]");
    let diagnostics = Validator::new().check_source(&source);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].message,
        "declared fragment_lengths [549, 725] differ from serialized lengths [548, 725]"
    );
}

#[test]
fn test_unparseable_metadata_still_checks_contents() {
    let source = TRY_FROM_PRIMITIVE.replace("[548,725]", "[1,1]");
    let diagnostics = Validator::new()
        .with_allowed_crates(["nexus"])
        .check_source(&source);
    assert_eq!(diagnostics.len(), 3);
    assert!(diagnostics[0].message.starts_with("fragment 0 is not a valid crate entry"));
    assert_eq!(
        diagnostics[1].message,
        "metadata comment does not describe the table; `rewrite` can repair it"
    );
    assert_eq!(diagnostics[2].crate_name.as_deref(), Some("gw2_mumble"));
}

#[test]
fn test_garbage_reports_single_error() {
    let diagnostics = Validator::new().check_source("console.log(1)");
    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics[0].is_error());
}

#[test]
fn test_linked_pages_exist() {
    let doc_root = tempfile::tempdir().unwrap();
    let page_dir = doc_root.path().join("gw2_mumble");
    std::fs::create_dir_all(&page_dir).unwrap();
    for page in ["enum.Mount.html", "enum.Profession.html", "enum.Race.html"] {
        std::fs::write(page_dir.join(page), "").unwrap();
    }

    let source = TRY_FROM_PRIMITIVE;
    let script = ImplementorsScript::parse(source).unwrap();
    let mut table = ImplementorsTable::new();
    table.insert(
        "gw2_mumble",
        script.table().get("gw2_mumble").unwrap().to_vec(),
    );

    let diagnostics = Validator::new()
        .with_doc_root(doc_root.path())
        .check_table(&table);
    assert_eq!(
        diagnostics
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        ["warning: [gw2_mumble] linked page gw2_mumble/enum.UIScaling.html does not exist"]
    );
}

#[test]
fn test_links_into_undocumented_crates() {
    let diagnostics = Validator::new()
        .with_documented_crates(["nexus"])
        .check_source(TRY_FROM_PRIMITIVE);
    assert_eq!(diagnostics.len(), 4);
    assert!(diagnostics.iter().all(|d| {
        d.severity == Severity::Warning
            && d.message == "link points into undocumented crate `gw2_mumble`"
    }));
}
