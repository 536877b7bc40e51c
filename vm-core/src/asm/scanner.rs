//! The token scanner. Reproduces the original source's `scanner.c`
//! identifier-classification precedence (registers checked before
//! mnemonics, everything else falls through to a generic identifier) and
//! its fixed `mnemonic_map`/`register_map` tables — see
//! `opcodes::{MNEMONIC_TABLE, REGISTER_TABLE}`, reused here verbatim rather
//! than duplicated.
//!
//! Differs from the C scanner in one respect: hex literals after `$`/`#$`
//! are scanned as a single resolved number token here, rather than falling
//! through to `identifier()` the way the C scanner's `isalpha` check would
//! treat hex digits like `A`-`F`. The distilled spec left the second pass
//! (and by extension, how numbers are tokenized) undesigned; this is the
//! resolution (see `asm::assembler`'s module docs).

use crate::opcodes::{mnemonic_byte, register_byte};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Mnemonic(u8),
    Register(u8),
    /// A label reference or a directive name's text (e.g. `org`).
    Identifier(String),
    /// `.directive`
    Directive(String),
    /// A hex literal following `$`, 1-4 digits.
    HexNumber(u16),
    /// A bare decimal literal (used by `.org`).
    DecNumber(u32),
    Comma,
    Colon,
    Pound,
    Lt,
    Gt,
    LBracket,
    RBracket,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

pub struct Scanner<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Scanner<'a> {
        Scanner {
            chars: source.chars().peekable(),
            line: 1,
        }
    }

    /// Scans the entire source into a token stream, terminated by a single
    /// trailing `Eof` token.
    pub fn scan_all(mut self) -> Result<Vec<Token>, String> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                return Ok(tokens);
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.chars.peek() {
                Some('\n') => {
                    self.line += 1;
                    self.chars.next();
                }
                Some(c) if c.is_whitespace() => {
                    self.chars.next();
                }
                Some(';') => {
                    while !matches!(self.chars.peek(), None | Some('\n')) {
                        self.chars.next();
                    }
                }
                _ => return,
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token, String> {
        self.skip_whitespace_and_comments();
        let line = self.line;

        let Some(&c) = self.chars.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
            });
        };

        if c.is_alphabetic() || c == '_' {
            return Ok(Token {
                kind: self.scan_identifier(),
                line,
            });
        }
        if c.is_ascii_digit() {
            return Ok(Token {
                kind: TokenKind::DecNumber(self.scan_decimal()),
                line,
            });
        }

        self.chars.next();
        let kind = match c {
            '$' => TokenKind::HexNumber(self.scan_hex(line)?),
            '#' => TokenKind::Pound,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '.' => TokenKind::Directive(self.scan_word()),
            other => return Err(format!("line {line}: unexpected character '{other}'")),
        };
        Ok(Token { kind, line })
    }

    fn scan_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_alphanumeric() || c == '_' {
                word.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        word
    }

    fn scan_identifier(&mut self) -> TokenKind {
        let word = self.scan_word();
        // Registers are checked before mnemonics, matching `identifier_type`
        // in the original scanner.
        if let Some(code) = register_byte(&word) {
            return TokenKind::Register(code);
        }
        if let Some(byte) = mnemonic_byte(&word) {
            return TokenKind::Mnemonic(byte);
        }
        TokenKind::Identifier(word)
    }

    fn scan_decimal(&mut self) -> u32 {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        digits.parse().unwrap_or(0)
    }

    fn scan_hex(&mut self, line: usize) -> Result<u16, String> {
        let mut digits = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_hexdigit() && digits.len() < 4 {
                digits.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        if digits.is_empty() {
            return Err(format!("line {line}: expected hex digits after '$'"));
        }
        u16::from_str_radix(&digits, 16).map_err(|_| format!("line {line}: malformed hex literal"))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::opcodes::{class, control, reg};

    fn kinds(source: &str) -> Vec<TokenKind> {
        Scanner::new(source)
            .scan_all()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_register_classified_before_mnemonic() {
        // "as" is a register name and not a mnemonic.
        assert_eq!(kinds("as"), vec![TokenKind::Register(reg::AS), TokenKind::Eof]);
    }

    #[test]
    fn test_mnemonic_and_generic_identifier() {
        assert_eq!(
            kinds("nop loop"),
            vec![
                TokenKind::Mnemonic(control::NOP),
                TokenKind::Identifier("loop".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_hex_literal_and_punctuation() {
        assert_eq!(
            kinds("mov r0,#$1A"),
            vec![
                TokenKind::Mnemonic(class::MOV),
                TokenKind::Register(reg::R0),
                TokenKind::Comma,
                TokenKind::Pound,
                TokenKind::HexNumber(0x1A),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_bracketed_indirect_address() {
        assert_eq!(
            kinds("[$0500]"),
            vec![
                TokenKind::LBracket,
                TokenKind::HexNumber(0x0500),
                TokenKind::RBracket,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_directive_and_decimal() {
        assert_eq!(
            kinds(".org 512"),
            vec![
                TokenKind::Directive("org".to_string()),
                TokenKind::DecNumber(512),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_semicolon_comment_consumes_rest_of_line() {
        assert_eq!(
            kinds("nop ; this is ignored\nend"),
            vec![
                TokenKind::Mnemonic(control::NOP),
                TokenKind::Mnemonic(control::END),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_line_numbers_track_newlines() {
        let tokens = Scanner::new("nop\nend").scan_all().unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_lone_dollar_is_an_error() {
        assert!(Scanner::new("$").scan_all().is_err());
    }
}
