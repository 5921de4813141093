/// Minimal interface of a lexical unit produced by the front-end.
///
/// The compiler only observes two things about a token: its raw text and
/// a string-form type tag. Identifier tokens carry the tag `"IDENT"`;
/// literal tokens carry a tag containing the substring `"LITERAL"`
/// (for example `"LITERAL_INT"` or `"LITERAL_STRING"`).
pub trait Token {
    fn lexeme(&self) -> &str;
    fn type_tag(&self) -> &str;
}

/// Owned token implementation used by the textual front-end and tests.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedToken {
    lexeme: String,
    type_tag: String,
}

impl OwnedToken {
    pub fn new<L: Into<String>, T: Into<String>>(lexeme: L, type_tag: T) -> OwnedToken {
        OwnedToken {
            lexeme: lexeme.into(),
            type_tag: type_tag.into(),
        }
    }

    pub fn ident<L: Into<String>>(lexeme: L) -> OwnedToken {
        OwnedToken::new(lexeme, "IDENT")
    }
}

impl Token for OwnedToken {
    fn lexeme(&self) -> &str {
        &self.lexeme
    }

    fn type_tag(&self) -> &str {
        &self.type_tag
    }
}
