//! The `@in`/`$out` command-template mini-language.
//!
//! A template is parsed once into a sequence of RAW and SPECIAL tokens, then evaluated any
//! number of times against different [`Env`] implementations. Evaluation never fails: an
//! unrecognized variable name simply expands to the empty string, which keeps command
//! construction total (see the module-level discussion in the crate's design notes).

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Raw,
    Special,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenType,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("'{sigil}' at offset {offset} is not followed by a variable name")]
    EmptyVariableName { sigil: char, offset: usize },
}

/// The capability an evaluation context must provide. Missing variables resolve to the empty
/// string rather than an error.
pub trait Env {
    fn lookup(&self, var: &str) -> String;
}

/// An environment that can't resolve anything; useful as a baseline in tests.
pub struct EmptyEnv;

impl Env for EmptyEnv {
    fn lookup(&self, _var: &str) -> String {
        String::new()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalString {
    unparsed: String,
    parsed: Vec<Token>,
}

impl EvalString {
    pub fn new() -> Self {
        Default::default()
    }

    /// Parses `input`, overwriting any previously parsed state (re-parsing is idempotent: the
    /// same input always produces the same token sequence).
    pub fn parse(&mut self, input: &str) -> Result<(), ParseError> {
        let mut parsed = Vec::new();
        let bytes = input.as_bytes();
        let mut start = 0usize;

        while start < bytes.len() {
            match bytes[start..].iter().position(|&b| b == b'@' || b == b'$') {
                None => {
                    parsed.push(Token {
                        text: input[start..].to_owned(),
                        kind: TokenType::Raw,
                    });
                    break;
                }
                Some(rel) => {
                    let sigil_pos = start + rel;
                    if sigil_pos > start {
                        parsed.push(Token {
                            text: input[start..sigil_pos].to_owned(),
                            kind: TokenType::Raw,
                        });
                    }
                    let sigil = bytes[sigil_pos] as char;
                    let mut end = sigil_pos + 1;
                    while end < bytes.len() && bytes[end].is_ascii_lowercase() {
                        end += 1;
                    }
                    if end == sigil_pos + 1 {
                        return Err(ParseError::EmptyVariableName {
                            sigil,
                            offset: sigil_pos,
                        });
                    }
                    parsed.push(Token {
                        text: input[sigil_pos..end].to_owned(),
                        kind: TokenType::Special,
                    });
                    start = end;
                }
            }
        }

        self.unparsed = input.to_owned();
        self.parsed = parsed;
        Ok(())
    }

    pub fn evaluate(&self, env: &dyn Env) -> String {
        let mut result = String::new();
        for token in &self.parsed {
            match token.kind {
                TokenType::Raw => result.push_str(&token.text),
                TokenType::Special => result.push_str(&env.lookup(&token.text)),
            }
        }
        result
    }

    /// The original input, for diagnostics.
    pub fn unparsed(&self) -> &str {
        &self.unparsed
    }

    pub fn tokens(&self) -> &[Token] {
        &self.parsed
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct IdentityEnv;
    impl Env for IdentityEnv {
        fn lookup(&self, var: &str) -> String {
            var.to_owned()
        }
    }

    struct MapEnv(std::collections::HashMap<&'static str, &'static str>);
    impl Env for MapEnv {
        fn lookup(&self, var: &str) -> String {
            self.0.get(var).map(|s| s.to_string()).unwrap_or_default()
        }
    }

    #[test]
    fn plain_raw_text() {
        let mut e = EvalString::new();
        e.parse("gcc -o out in.c").unwrap();
        assert_eq!(e.tokens().len(), 1);
        assert_eq!(e.tokens()[0].kind, TokenType::Raw);
        assert_eq!(e.evaluate(&EmptyEnv), "gcc -o out in.c");
    }

    #[test]
    fn special_tokens_include_sigil() {
        let mut e = EvalString::new();
        e.parse("gcc @in -o $out").unwrap();
        let specials: Vec<&str> = e
            .tokens()
            .iter()
            .filter(|t| t.kind == TokenType::Special)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(specials, vec!["@in", "$out"]);
    }

    #[test]
    fn unknown_dollar_var_expands_empty() {
        let mut e = EvalString::new();
        e.parse("prefix-$missing-suffix").unwrap();
        assert_eq!(e.evaluate(&EmptyEnv), "prefix--suffix");
    }

    #[test]
    fn known_var_expands() {
        let mut e = EvalString::new();
        e.parse("gcc $cflags @in -o $out").unwrap();
        let mut map = std::collections::HashMap::new();
        map.insert("$cflags", "-O2");
        map.insert("@in", "m.c n.c");
        map.insert("$out", "m.o");
        assert_eq!(e.evaluate(&MapEnv(map)), "gcc -O2 m.c n.c -o m.o");
    }

    // Scenario 6 from the spec: these must all fail to parse.
    #[test]
    fn trailing_sigil_is_parse_error() {
        let mut e = EvalString::new();
        assert!(e.parse("foo $").is_err());
    }

    #[test]
    fn sigil_followed_by_digit_is_parse_error() {
        let mut e = EvalString::new();
        assert!(e.parse("foo $1").is_err());
    }

    #[test]
    fn at_sigil_with_no_name_is_parse_error() {
        let mut e = EvalString::new();
        assert!(e.parse("foo @").is_err());
    }

    // Scenario 6: two adjacent SPECIAL tokens, no RAW between them.
    #[test]
    fn adjacent_sigils_produce_two_special_tokens() {
        let mut e = EvalString::new();
        e.parse("$a@b").unwrap();
        assert_eq!(
            e.tokens(),
            &[
                Token {
                    text: "$a".to_owned(),
                    kind: TokenType::Special
                },
                Token {
                    text: "@b".to_owned(),
                    kind: TokenType::Special
                },
            ]
        );
    }

    #[test]
    fn reparse_overwrites_previous_state() {
        let mut e = EvalString::new();
        e.parse("gcc @in -o $out").unwrap();
        e.parse("plain").unwrap();
        assert_eq!(e.unparsed(), "plain");
        assert_eq!(e.tokens().len(), 1);
        assert_eq!(e.tokens()[0].kind, TokenType::Raw);
    }

    #[test]
    fn unparsed_returns_original_input() {
        let mut e = EvalString::new();
        e.parse("gcc @in -o $out").unwrap();
        assert_eq!(e.unparsed(), "gcc @in -o $out");
    }

    proptest::proptest! {
        // Any template made only of raw segments and well-formed `@name`/`$name` references
        // round-trips byte-for-byte when evaluated against an environment that echoes the
        // reference back (sigil included).
        #[test]
        fn round_trip_identity_env(
            segments in proptest::collection::vec(
                proptest::prop_oneof![
                    "[^@$]{0,8}".prop_map(|s| s),
                    "[@$][a-z]{1,6}".prop_map(|s| s),
                ],
                0..8,
            )
        ) {
            let input: String = segments.concat();
            let mut e = EvalString::new();
            if e.parse(&input).is_ok() {
                proptest::prop_assert_eq!(e.evaluate(&IdentityEnv), input);
            }
        }
    }
}
