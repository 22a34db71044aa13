//! Tokenizer for editor HTML using logos
//!
//! Two lexers share the source: [`ContentLexeme`] runs between tags and
//! [`TagLexeme`] runs inside a start tag. The lexer morphs from one to the
//! other at every `<name` and back at `>` or `/>`.

use crate::error::{ParseError, ParseResult, TokenSpan};
use logos::{Lexer, Logos};

/// Flat token stream consumed by the tree builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    /// `<name`
    TagOpen(&'src str),
    /// `</name>`
    TagClose(&'src str),
    AttrName(&'src str),
    /// Raw attribute value, quotes stripped, entities still encoded
    AttrValue(&'src str),
    /// `>`
    TagEnd,
    /// `/>`
    SelfClose,
    /// Raw text, entities still encoded
    Text(&'src str),
}

#[derive(Logos, Debug, Clone, PartialEq)]
enum ContentLexeme<'src> {
    #[regex(r"<[a-zA-Z][a-zA-Z0-9-]*", |lex| &lex.slice()[1..])]
    TagOpen(&'src str),

    #[regex(r"</[a-zA-Z][a-zA-Z0-9-]*[ \t\r\n]*>", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].trim_end()
    })]
    TagClose(&'src str),

    #[token("<!--", comment)]
    Comment,

    // <!DOCTYPE ..> and <?xml ..?>
    #[regex(r"<![a-zA-Z][^>]*>")]
    #[regex(r"<\?[^>]*>")]
    Declaration,

    #[regex(r"[^<]+", |lex| lex.slice())]
    Text(&'src str),

    // `<` that does not start a tag is literal text
    #[token("<", |lex| lex.slice())]
    Lt(&'src str),
}

fn comment<'src>(lex: &mut Lexer<'src, ContentLexeme<'src>>) -> bool {
    match lex.remainder().find("-->") {
        Some(end) => {
            lex.bump(end + 3);
            true
        }
        None => false,
    }
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum TagLexeme<'src> {
    #[regex(r#"[^ \t\r\n\f"'<>/=]+"#, |lex| lex.slice())]
    Name(&'src str),

    #[token("=")]
    Eq,

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    #[regex(r"'[^']*'", |lex| {
        let s = lex.slice();
        &s[1..s.len() - 1]
    })]
    Quoted(&'src str),

    #[token(">")]
    End,

    #[token("/>")]
    SelfClose,

    #[token("/")]
    Slash,
}

/// Tokenize editor HTML into a flat stream with byte spans.
///
/// Comments and declarations are dropped. Fails only on an unterminated tag
/// or comment.
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, TokenSpan)>> {
    let mut tokens = Vec::new();
    let mut content = ContentLexeme::lexer(source);

    while let Some(result) = content.next() {
        let span = content.span();
        let lexeme = result.map_err(|_| ParseError::invalid_syntax(span.clone(), "unterminated comment"))?;

        match lexeme {
            ContentLexeme::TagOpen(name) => {
                tokens.push((Token::TagOpen(name), span));

                let mut tag = content.morph::<TagLexeme>();
                let mut after_eq = false;
                let mut closed = false;

                while let Some(result) = tag.next() {
                    let span = tag.span();
                    let lexeme = result.map_err(|_| ParseError::LexError { span: span.clone() })?;
                    match lexeme {
                        TagLexeme::Name(text) if after_eq => {
                            tokens.push((Token::AttrValue(text), span));
                            after_eq = false;
                        }
                        TagLexeme::Name(text) => tokens.push((Token::AttrName(text), span)),
                        TagLexeme::Quoted(text) => {
                            tokens.push((Token::AttrValue(text), span));
                            after_eq = false;
                        }
                        TagLexeme::Eq => after_eq = true,
                        TagLexeme::Slash => {}
                        TagLexeme::End => {
                            tokens.push((Token::TagEnd, span));
                            closed = true;
                            break;
                        }
                        TagLexeme::SelfClose => {
                            tokens.push((Token::SelfClose, span));
                            closed = true;
                            break;
                        }
                    }
                }

                if !closed {
                    return Err(ParseError::unexpected_eof("'>' to close tag"));
                }
                content = tag.morph();
            }
            ContentLexeme::TagClose(name) => tokens.push((Token::TagClose(name), span)),
            ContentLexeme::Text(text) | ContentLexeme::Lt(text) => tokens.push((Token::Text(text), span)),
            ContentLexeme::Comment | ContentLexeme::Declaration => {}
        }
    }

    Ok(tokens)
}
