pub mod ast;
pub mod dom;
pub mod error;
pub mod id_generator;
pub mod parser;
pub mod schema;
pub mod serializer;
pub mod style;
pub mod tokenizer;

#[cfg(test)]
mod tests_roundtrip;

pub use ast::{Attrs, Mark, MarkType, Node, NodeType};
pub use error::{ContentError, ParseError, ParseResult};
pub use id_generator::{new_column_id, IDGenerator};
pub use parser::{parse, parse_html, Parser};
pub use schema::{AttrSpec, ContentRule, RenderedAttrs};
pub use serializer::{serialize, serialize_pretty, Serializer};
pub use tokenizer::{tokenize, Token};

#[cfg(feature = "pretty-errors")]
pub use error::format_error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_basic() {
        let tokens = tokenize("<p>Hello</p>").unwrap();
        assert_eq!(tokens.len(), 4);
    }
}
