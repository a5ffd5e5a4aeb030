use super::*;

const TRY_FROM_PRIMITIVE: &str =
    include_str!("../../../tests/fixture-docs/trait.impl/num_enum/trait.TryFromPrimitive.js");
const INTO_ENUM_ITERATOR: &str =
    include_str!("../../../tests/fixture-docs/trait.impl/strum/trait.IntoEnumIterator.js");

fn crate_names(script: &ImplementorsScript) -> Vec<String> {
    script
        .table()
        .crate_names()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn test_parse_two_crates() {
    let script = ImplementorsScript::parse(TRY_FROM_PRIMITIVE).unwrap();
    assert_eq!(crate_names(&script), ["gw2_mumble", "nexus"]);
    assert_eq!(script.table().get("gw2_mumble").unwrap().len(), 4);
    assert_eq!(script.table().get("nexus").unwrap().len(), 5);

    let labels: Vec<_> = script
        .table()
        .get("gw2_mumble")
        .unwrap()
        .iter()
        .filter_map(|implementor| implementor.target())
        .map(|target| target.label().to_string())
        .collect();
    assert_eq!(labels, ["Mount", "Profession", "Race", "UIScaling"]);

    assert_eq!(
        script.declared_meta(),
        Some(&FragmentMeta {
            start: 57,
            fragment_lengths: vec![548, 725],
        })
    );
}

#[test]
fn test_round_trip_is_byte_exact() {
    for source in [TRY_FROM_PRIMITIVE, INTO_ENUM_ITERATOR] {
        let script = ImplementorsScript::parse(source).unwrap();
        assert_eq!(script.render(), source);
        assert_eq!(
            script.fragment_meta().unwrap(),
            *script.declared_meta().unwrap()
        );
    }
}

#[test]
fn test_single_fragment_length_has_no_separator() {
    let script = ImplementorsScript::parse(INTO_ENUM_ITERATOR).unwrap();
    let fragments = script.fragments().unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].len(), 732);
    assert!(fragments[0].starts_with(r#"["nexus",[["impl IntoEnumIterator for "#));
}

#[test]
fn test_prologue_length_is_start() {
    assert_eq!(PROLOGUE.len(), 57);
}

#[test]
fn test_empty_table() {
    let rendered = ImplementorsScript::default().render();
    assert!(rendered.contains("Object.fromEntries([]);"));
    assert!(rendered.ends_with(r#"//{"start":57,"fragment_lengths":[]}"#));

    let reparsed = ImplementorsScript::parse(&rendered).unwrap();
    assert!(reparsed.table().is_empty());
}

#[test]
fn test_edit_recomputes_lengths() {
    let mut script = ImplementorsScript::parse(TRY_FROM_PRIMITIVE).unwrap();
    script.table_mut().remove("gw2_mumble");
    let rendered = script.render();
    // the surviving fragment moves to the front and loses its separator
    assert!(rendered.ends_with(r#"//{"start":57,"fragment_lengths":[724]}"#));
    let reparsed = ImplementorsScript::parse(&rendered).unwrap();
    assert_eq!(crate_names(&reparsed), ["nexus"]);
}

#[test]
fn test_missing_metadata() {
    let source = TRY_FROM_PRIMITIVE.rsplit_once("\n//").unwrap().0;
    assert!(matches!(
        ImplementorsScript::parse(source),
        Err(ScriptError::MissingMetadata)
    ));
}

#[test]
fn test_invalid_metadata() {
    let source = TRY_FROM_PRIMITIVE.replace(r#""fragment_lengths":[548,725]"#, "oops");
    assert!(matches!(
        ImplementorsScript::parse(&source),
        Err(ScriptError::InvalidMetadata(_))
    ));
}

#[test]
fn test_wrong_lengths() {
    let short = TRY_FROM_PRIMITIVE.replace("[548,725]", "[547,726]");
    assert!(matches!(
        ImplementorsScript::parse(&short),
        Err(ScriptError::InvalidFragment { index: 0, .. })
    ));

    let long = TRY_FROM_PRIMITIVE.replace("[548,725]", "[548,100000]");
    assert!(matches!(
        ImplementorsScript::parse(&long),
        Err(ScriptError::FragmentOutOfBounds { index: 1, .. })
    ));

    let missing = TRY_FROM_PRIMITIVE.replace("[548,725]", "[548]");
    assert!(matches!(
        ImplementorsScript::parse(&missing),
        Err(ScriptError::UnexpectedByte {
            expected: ']',
            found: Some(','),
            ..
        })
    ));
}

#[test]
fn test_wrong_start() {
    let source = TRY_FROM_PRIMITIVE.replace(r#"{"start":57"#, r#"{"start":56"#);
    assert!(matches!(
        ImplementorsScript::parse(&source),
        Err(ScriptError::StartMismatch {
            declared: 56,
            actual: 57
        })
    ));
}

#[test]
fn test_unexpected_prologue() {
    let source = TRY_FROM_PRIMITIVE.replace("var implementors", "var type_impls");
    assert!(matches!(
        ImplementorsScript::parse(&source),
        Err(ScriptError::UnexpectedPrologue { .. })
    ));
}

#[test]
fn test_duplicate_crate() {
    let script = ImplementorsScript::parse(INTO_ENUM_ITERATOR).unwrap();
    let fragment = &script.fragments().unwrap()[0];
    let source = format!(
        "{PROLOGUE}{fragment},{fragment}{EPILOGUE}\n//{{\"start\":57,\"fragment_lengths\":[{},{}]}}",
        fragment.len(),
        fragment.len() + 1
    );
    assert!(matches!(
        ImplementorsScript::parse(&source),
        Err(ScriptError::DuplicateCrate(name)) if name == "nexus"
    ));
}

#[test]
fn test_parse_ignoring_metadata_recovers() {
    let stale = TRY_FROM_PRIMITIVE.replace("[548,725]", "[1,2,3]");
    assert!(ImplementorsScript::parse(&stale).is_err());

    let recovered = ImplementorsScript::parse_ignoring_metadata(&stale).unwrap();
    assert_eq!(crate_names(&recovered), ["gw2_mumble", "nexus"]);
    assert_eq!(recovered.declared_meta(), None);
    assert_eq!(recovered.render(), TRY_FROM_PRIMITIVE);

    let no_comment = TRY_FROM_PRIMITIVE.rsplit_once("\n//").unwrap().0;
    let recovered = ImplementorsScript::parse_ignoring_metadata(no_comment).unwrap();
    assert_eq!(recovered.render(), TRY_FROM_PRIMITIVE);
}

#[test]
fn test_synthetic_entries_round_trip() {
    let mut table = ImplementorsTable::new();
    table.insert(
        "nexus",
        vec![
            Implementor::new("impl Foo for Bar"),
            Implementor::synthetic("impl&lt;T&gt; Foo for T", vec!["nexus::Baz".into()]),
        ],
    );
    let rendered = ImplementorsScript::from(table.clone()).render();
    assert!(rendered.contains(r#"[["impl Foo for Bar"],["impl&lt;T&gt; Foo for T",1,["nexus::Baz"]]]"#));
    assert_eq!(ImplementorsScript::parse(&rendered).unwrap().table(), &table);
}

#[test]
fn test_lengths_count_utf8_bytes() {
    let aether = r#"impl Foo for <a class="enum" href="nexus/enum.Æther.html" title="enum nexus::Æther">Æther</a>"#;
    let mut table = ImplementorsTable::new();
    table.insert("nexus", vec![Implementor::new(aether)]);
    table.insert("gw2_mumble", vec![Implementor::new(aether)]);
    let script = ImplementorsScript::from(table);

    let fragments = script.fragments().unwrap();
    assert!(fragments[0].contains("Æther"));
    assert_ne!(fragments[0].len(), fragments[0].chars().count());

    let meta = script.fragment_meta().unwrap();
    assert_eq!(
        meta.fragment_lengths,
        [fragments[0].len(), fragments[1].len() + 1]
    );

    let rendered = script.render();
    let reparsed = ImplementorsScript::parse(&rendered).unwrap();
    assert_eq!(reparsed.declared_meta(), Some(&meta));
    assert_eq!(reparsed.render(), rendered);
}

#[test]
fn test_length_ending_inside_a_character() {
    let mut table = ImplementorsTable::new();
    table.insert("nexus", vec![Implementor::new("impl Foo for Æther")]);
    let script = ImplementorsScript::from(table);
    let fragment = &script.fragments().unwrap()[0];
    let inside = fragment.find('Æ').unwrap() + 1;

    let source = script.render().replace(
        &format!("[{}]}}", fragment.len()),
        &format!("[{inside}]}}"),
    );
    assert!(matches!(
        ImplementorsScript::parse(&source),
        Err(ScriptError::NotCharBoundary { index: 0, offset }) if offset == PROLOGUE.len() + inside
    ));
}

#[test]
fn test_unexpected_epilogue() {
    let source = TRY_FROM_PRIMITIVE.replace("pending_implementors", "pending_impls");
    assert!(matches!(
        ImplementorsScript::parse(&source),
        Err(ScriptError::UnexpectedEpilogue { .. })
    ));
    assert!(matches!(
        ImplementorsScript::parse_ignoring_metadata(&source),
        Err(ScriptError::UnexpectedEpilogue { .. })
    ));
}
