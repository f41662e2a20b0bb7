use captionkit::formats::vccd::{BLOCK_SIZE, DIRECTORY_ENTRY_SIZE, HEADER_ALIGNMENT, HEADER_SIZE};
use captionkit::prelude::*;
use pretty_assertions::assert_eq;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A language big enough to need several blocks and a multi-sector header.
fn sample_language() -> Language {
    (0..400)
        .map(|i| {
            (
                format!("NPC_Citizen.Line{i:03}"),
                format!("<sfx><clr:255,255,255>Line number {i}: {}", "la ".repeat(i % 50)),
            )
        })
        .collect::<Language>()
        .with_name("english")
}

#[test]
fn test_hello_world_scenario() {
    init_tracing();

    let lang = Language::from_pairs([("Hello", "World")]);
    let data = lang.compile().unwrap();

    assert_eq!(&data[..8], &[0x56, 0x43, 0x43, 0x44, 0x01, 0x00, 0x00, 0x00]);
    let header_length = u32::from_le_bytes(data[20..24].try_into().unwrap()) as usize;
    assert_eq!(u32::from_le_bytes(data[12..16].try_into().unwrap()), 8192);
    assert_eq!(u32::from_le_bytes(data[16..20].try_into().unwrap()), 1);
    assert_eq!(header_length % 512, 0);
    assert!(header_length >= 36);

    let bare = Language::decompile(&data, &[], None).unwrap();
    let keys: Vec<Key> = bare.tokens().keys().cloned().collect();
    assert_eq!(keys, vec![Key::Hashed(fingerprint("hello"))]);
    assert_eq!(bare.get(&keys[0]), Some("World"));

    let hints = [HintMap::from([(fingerprint("hello"), "Hello".to_string())])];
    let named = Language::decompile(&data, &hints, None).unwrap();
    assert_eq!(named.get(&Key::from("Hello")), Some("World"));
}

#[test]
fn test_round_trip_recovers_every_key() {
    init_tracing();

    let lang = sample_language();
    let data = lang.compile().unwrap();
    let names: Vec<String> = lang
        .tokens()
        .keys()
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect();

    let hints = [hints_from_strings(&names)];
    let decoded = Language::decompile(&data, &hints, Some("english".to_string())).unwrap();
    assert_eq!(decoded, lang);
}

#[test]
fn test_layout_invariants() {
    let lang = sample_language();
    let data = lang.compile().unwrap();
    let info = inspect_vccd(&data).unwrap();
    let header = info.header;

    assert_eq!(header.directory_count as usize, lang.len());
    assert_eq!(header.header_length as usize % HEADER_ALIGNMENT, 0);
    assert!(header.header_length as usize >= HEADER_SIZE + lang.len() * DIRECTORY_ENTRY_SIZE);
    assert!(header.block_count > 1);
    assert_eq!(
        data.len(),
        header.header_length as usize + BLOCK_SIZE * header.block_count as usize
    );

    let fingerprints: Vec<u32> = lang.fingerprints().collect();
    for (entry, expected) in info.entries.iter().zip(&fingerprints) {
        assert_eq!(entry.fingerprint, *expected);
        assert!(entry.block_index < header.block_count);
        // No string straddles a block boundary
        assert!(usize::from(entry.offset) + usize::from(entry.length) < BLOCK_SIZE);
    }
}

#[test]
fn test_hint_priority_and_fallback() {
    let lang = Language::from_pairs([("Hello", "World"), ("Unknown.Token", "???")]);
    let data = lang.compile().unwrap();

    let hash = fingerprint("hello");
    let hints = [
        HintMap::from([(hash, "FromScript".to_string())]),
        hints_from_strings(["Hello"]),
    ];
    let decoded = Language::decompile(&data, &hints, None).unwrap();

    let keys: Vec<Key> = decoded.tokens().keys().cloned().collect();
    assert_eq!(
        keys,
        vec![
            Key::from("FromScript"),
            Key::Hashed(fingerprint("unknown.token")),
        ]
    );
}

#[test]
fn test_script_hints_and_wordlist_layered() {
    let tree = KvNode::new().with_section(
        "lang",
        KvNode::new().with_value("Language", "english").with_section(
            "Tokens",
            KvNode::new()
                .with_value("Alyx.Hello", "Hello, Gordon.")
                .with_value("Alyx.Bye", "See you."),
        ),
    );
    let mut lang = Language::parse(&tree).unwrap();
    assert_eq!(lang.name(), Some("english"));

    let mut tokens = lang.clone().into_tokens();
    tokens.insert(Key::from("Extra.Line"), "Not in the script".to_string());
    let extended = Language::new(tokens);
    let data = extended.compile().unwrap();

    let hints = [
        hints_from_script_tree(&tree).unwrap(),
        hints_from_strings(["Extra.Line", "Alyx.Hello"]),
    ];
    let decoded = Language::decompile(&data, &hints, None).unwrap();
    assert_eq!(decoded, extended);

    lang.set_name(None);
    assert_eq!(lang.name(), None);
}

#[test]
fn test_invalid_containers_fail() {
    let data = Language::from_pairs([("Hello", "World")]).compile().unwrap();

    let mut bad_magic = data.clone();
    bad_magic[..4].copy_from_slice(b"LOCA");
    assert!(matches!(
        Language::decompile(&bad_magic, &[], None),
        Err(Error::InvalidVccdMagic(_))
    ));

    let mut bad_version = data;
    bad_version[4..8].copy_from_slice(&2u32.to_le_bytes());
    assert!(matches!(
        Language::decompile(&bad_version, &[], None),
        Err(Error::UnsupportedVccdVersion { version: 2 })
    ));
}

#[test]
fn test_oversized_caption_is_rejected() {
    let lang = Language::from_pairs([("ok", "fine".to_string()), ("huge", "x".repeat(5000))]);
    assert!(matches!(lang.compile(), Err(Error::StringTooLarge { .. })));
}

#[test]
fn test_language_json_round_trip() {
    let data = Language::from_pairs([("Hello", "World"), ("Other", "Thing")])
        .compile()
        .unwrap();
    let hints = [hints_from_strings(["Hello"])];
    let lang = Language::decompile(&data, &hints, Some("english".to_string())).unwrap();

    let json = serde_json::to_string(&lang).unwrap();
    let restored: Language = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, lang);
    assert!(restored.tokens().keys().any(Key::is_hashed));
}

#[test]
fn test_parallel_compiles_are_independent() {
    let lang = &sample_language();
    let expected = lang.compile().unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(move || lang.compile().unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}
