//! Canonical-name encoding for operator identifiers.
//!
//! Canonical names must be valid logic-program functors, so operator symbols
//! are rewritten into an alphabetic form: `XO` plus one letter per symbol
//! character, or `XP<count><stripped>` for names ending in apostrophes.
//! Decoding is the exact inverse on everything `encode` accepts.

use crate::error::FatalError;

/// Operator character to encoded letter.
const SYMBOL_TO_NAME: [(char, char); 21] = [
    ('+', 'p'),
    ('-', 'm'),
    ('*', 't'),
    ('!', 'e'),
    ('#', 'h'),
    ('$', 'd'),
    ('.', 'o'),
    ('=', 'q'),
    ('\'', 'a'),
    ('%', 'c'),
    ('|', 'b'),
    ('~', 'r'),
    (':', 'i'),
    ('&', 'f'),
    ('/', 's'),
    ('\\', 'u'),
    ('<', 'l'),
    ('>', 'g'),
    ('@', 'n'),
    ('?', 'k'),
    ('^', 'j'),
];

fn to_name(symbol: char) -> Option<char> {
    SYMBOL_TO_NAME
        .iter()
        .find(|(s, _)| *s == symbol)
        .map(|(_, n)| *n)
}

fn to_symbol(name: char) -> Option<char> {
    SYMBOL_TO_NAME
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(s, _)| *s)
}

/// Encode an identifier for use inside a canonical name.
///
/// Names starting with a letter or underscore pass through unchanged unless
/// they end in apostrophes (`x'` becomes `XP1x`). Operator names map each
/// character through the symbol table (`==` becomes `XOqq`); a symbol outside
/// the table is rejected rather than passed through, since passing it through
/// would produce an ambiguous canonical name.
pub fn encode(text: &str) -> Result<String, FatalError> {
    let Some(first) = text.chars().next() else {
        return Ok(String::new());
    };

    if first.is_ascii_alphabetic() || first == '_' {
        if text.ends_with('\'') {
            let primes = text.chars().filter(|c| *c == '\'').count();
            let stripped: String = text.chars().filter(|c| *c != '\'').collect();
            return Ok(format!("XP{primes}{stripped}"));
        }
        return Ok(text.to_string());
    }

    let mut encoded = String::with_capacity(text.len() + 2);
    encoded.push_str("XO");
    for c in text.chars() {
        match to_name(c) {
            Some(n) => encoded.push(n),
            None => return Err(FatalError::UnencodableName(text.to_string())),
        }
    }
    Ok(encoded)
}

/// Inverse of [`encode`].
pub fn decode(text: &str) -> Result<String, FatalError> {
    if let Some(encoded) = text.strip_prefix("XO") {
        let mut decoded = String::with_capacity(encoded.len());
        for c in encoded.chars() {
            match to_symbol(c) {
                Some(s) => decoded.push(s),
                None => return Err(FatalError::UnencodableName(text.to_string())),
            }
        }
        return Ok(decoded);
    }
    if let Some(rest) = text.strip_prefix("XP") {
        // Primed variables, e.g. `let x' = 2 in x'`.
        let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
        let Ok(primes) = digits.parse::<usize>() else {
            return Err(FatalError::UnencodableName(text.to_string()));
        };
        let stripped = &rest[digits.len()..];
        return Ok(format!("{stripped}{}", "'".repeat(primes)));
    }
    Ok(text.to_string())
}
