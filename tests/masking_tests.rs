use ulp::masking::{collapse_spaces, remove_punctuation, Normalizer};

fn normalizer() -> Normalizer {
    Normalizer::new("<*>", &[]).unwrap()
}

#[test]
fn removes_low_information_punctuation() {
    assert_eq!(remove_punctuation("hello!world"), "helloworld");
    assert_eq!(remove_punctuation("test@email#hash"), "testemailhash");
    assert_eq!(remove_punctuation("no_punct_here-ok"), "no_punct_here-ok");
    assert_eq!(remove_punctuation("curly{brace}"), "curlybrace");
    assert_eq!(remove_punctuation("normal text"), "normal text");
    assert_eq!(remove_punctuation("$100%"), "100");
}

#[test]
fn collapses_space_and_tab_runs() {
    assert_eq!(collapse_spaces("a  b"), "a b");
    assert_eq!(collapse_spaces("a   b   c"), "a b c");
    assert_eq!(collapse_spaces("no extra spaces"), "no extra spaces");
    assert_eq!(collapse_spaces("tab\there"), "tab here");
    assert_eq!(collapse_spaces("mixed \t \t run"), "mixed run");
}

#[test]
fn rewrites_obviously_dynamic_values() {
    let n = normalizer();
    assert_eq!(n.normalize("block 0xDEADBEEF loaded"), "block <*> loaded");
    assert_eq!(n.normalize("event on 2023-01-15 occurred"), "event on <*> occurred");
    assert_eq!(n.normalize("event on 2023/01/15 occurred"), "event on <*> occurred");
    assert_eq!(n.normalize("at 14:30:45 happened"), "at <*> happened");
    assert_eq!(n.normalize("at 14:30:45.123 happened"), "at <*> happened");
    assert_eq!(n.normalize("device aa:bb:cc:dd:ee:ff connected"), "device <*> connected");
    assert_eq!(n.normalize("request to http://example.com/api/path"), "request to <*>");
    assert_eq!(n.normalize("visit https://secure.example.com:8443/resource"), "visit <*>");
    assert_eq!(n.normalize("connected to node1.cluster.example.com ok"), "connected to <*> ok");
    assert_eq!(n.normalize("from /10.250.10.6"), "from <*>");
    assert_eq!(n.normalize("addr fe80:0:0:0:0:0:0:1: up"), "addr <*> up");
}

#[test]
fn pads_brackets_and_equals() {
    assert_eq!(normalizer().normalize("key=value func(arg)"), "key = value func ( arg )");
    assert_eq!(normalizer().normalize("list[0]"), "list [ 0 ]");
}

#[test]
fn strips_punctuation_before_tokenizing() {
    assert_eq!(normalizer().normalize("error! at {line} <pos>"), "error at line pos");
}

#[test]
fn single_dotted_names_survive() {
    assert_eq!(
        normalizer().normalize("BLOCK* NameSystem.addStoredBlock: done"),
        "BLOCK* NameSystem.addStoredBlock: done"
    );
}

#[test]
fn custom_patterns_run_after_builtins_in_order() {
    let n = Normalizer::new("<*>", &[r"[A-Z]{3}\d{3}".to_string(), r"user_\w+".to_string()]).unwrap();
    assert_eq!(n.normalize("session ABC123 started for user_bob"), "session <*> started for <*>");
}

#[test]
fn invalid_custom_pattern_is_a_config_error() {
    let err = Normalizer::new("<*>", &["(".to_string()]).unwrap_err();
    assert!(matches!(err, ulp::ConfigError::InvalidPattern { ref pattern, .. } if pattern == "("));
}

#[test]
fn wildcard_is_inserted_literally() {
    let n = Normalizer::new("$1", &[]).unwrap();
    assert_eq!(n.normalize("block 0x1F loaded"), "block $1 loaded");
    let n = Normalizer::new("{var}", &[]).unwrap();
    assert_eq!(n.normalize("block 0x1F loaded"), "block {var} loaded");
}

#[test]
fn empty_body_normalizes_to_empty() {
    assert_eq!(normalizer().normalize("   "), "");
}
