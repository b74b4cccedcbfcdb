use crate::encode::{decode, encode};
use crate::error::FatalError;

#[test]
fn test_plain_names_pass_through() {
    assert_eq!(encode("map").unwrap(), "map");
    assert_eq!(encode("foldr").unwrap(), "foldr");
    assert_eq!(encode("_go").unwrap(), "_go");
}

#[test]
fn test_primed_names() {
    assert_eq!(encode("x'").unwrap(), "XP1x");
    assert_eq!(encode("x''").unwrap(), "XP2x");
    assert_eq!(encode("foldl'").unwrap(), "XP1foldl");
}

#[test]
fn test_operator_names() {
    assert_eq!(encode("+").unwrap(), "XOp");
    assert_eq!(encode("==").unwrap(), "XOqq");
    assert_eq!(encode(">>=").unwrap(), "XOggq");
    assert_eq!(encode(":").unwrap(), "XOi");
    assert_eq!(encode("<$>").unwrap(), "XOldg");
    assert_eq!(encode("\\\\").unwrap(), "XOuu");
}

#[test]
fn test_encode_rejects_unknown_symbols() {
    assert!(matches!(
        encode("§"),
        Err(FatalError::UnencodableName(_))
    ));
    assert!(matches!(
        encode("<§>"),
        Err(FatalError::UnencodableName(_))
    ));
}

#[test]
fn test_decode_inverts_encode() {
    let names = [
        "map", "x'", "foldl'", "x''", "+", "-", "*", "!", "#", "$", ".", "=", "%", "|", "~", ":",
        "&", "/", "\\", "<", ">", "@", "?", "^", "==", ">>=", "<$>", "&&", "||",
    ];
    for name in names {
        let encoded = encode(name).unwrap();
        assert_eq!(decode(&encoded).unwrap(), name, "via {encoded}");
    }
}
