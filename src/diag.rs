//! Rendering of user-facing diagnostic blocks.
//!
//! Diagnostics are human-readable, not machine-parseable: a banner, the
//! message, the offending lexeme when there is one, and the source
//! location. Write failures on the error channel are ignored; there is
//! nowhere left to report them.

use std::io::Write;

use crate::eval::RuntimeError;
use crate::token::{Token, TokenKind};

pub(crate) fn report_syntax_error<W: Write>(out: &mut W, token: &Token<'_>, message: &str) {
    let _ = writeln!(out, "\n========== SÖZDİZİMİ HATASI ==========");

    match token.kind {
        TokenKind::Eof => {
            let _ = writeln!(out, "Dosya sonu: {message}");
        }
        TokenKind::Error => {
            // The lexer already put the message into the token.
            let _ = writeln!(out, "Sözdizimi hatası: {message}");
            let _ = writeln!(out, "Dosya: {}", token.file);
            let _ = writeln!(out, "Satır: {}, Sütun: {}", token.line, token.column);
        }
        _ => {
            let _ = writeln!(out, "Sözdizimi hatası: {message}");
            let _ = writeln!(out, "Token: '{}'", token.lexeme);
            let _ = writeln!(out, "Dosya: {}", token.file);
            let _ = writeln!(out, "Satır: {}, Sütun: {}", token.line, token.column);
        }
    }

    let _ = writeln!(out, "=====================================");
}

pub(crate) fn report_runtime_error<W: Write>(out: &mut W, file: &str, error: &RuntimeError) {
    let _ = writeln!(out, "\n========== ÇALIŞMA ZAMANI HATASI ==========");
    let _ = writeln!(out, "{error}");
    let _ = writeln!(out, "Dosya: {file}");
    let _ = writeln!(out, "===========================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind, lexeme: &'static str) -> Token<'static> {
        Token {
            kind,
            lexeme,
            file: "test.krz",
            line: 3,
            column: 7,
        }
    }

    #[test]
    fn syntax_block_carries_all_fields() {
        let mut out = Vec::new();
        report_syntax_error(&mut out, &token(TokenKind::Identifier, "foo"), "ifade bekleniyor.");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("SÖZDİZİMİ HATASI"));
        assert!(text.contains("Sözdizimi hatası: ifade bekleniyor."));
        assert!(text.contains("Token: 'foo'"));
        assert!(text.contains("Dosya: test.krz"));
        assert!(text.contains("Satır: 3, Sütun: 7"));
    }

    #[test]
    fn eof_block_has_no_location() {
        let mut out = Vec::new();
        report_syntax_error(&mut out, &token(TokenKind::Eof, ""), "ifade bekleniyor.");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Dosya sonu: ifade bekleniyor."));
        assert!(!text.contains("Token:"));
        assert!(!text.contains("Satır:"));
    }

    #[test]
    fn lexer_error_block_omits_the_token_line() {
        let mut out = Vec::new();
        let t = token(TokenKind::Error, "Bilinmeyen karakter");
        report_syntax_error(&mut out, &t, t.lexeme);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Sözdizimi hatası: Bilinmeyen karakter"));
        assert!(!text.contains("Token:"));
        assert!(text.contains("Satır: 3, Sütun: 7"));
    }
}
