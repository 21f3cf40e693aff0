use logos::Logos;

/// Token types for the Braid markup
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token<'src> {
    #[token("</")]
    OpenSlash,

    #[token("<")]
    Open,

    #[token("/>")]
    SlashClose,

    #[token(">")]
    Close,

    #[token("=")]
    Equals,

    /// Quoted attribute value, quotes included in the slice
    #[regex(r#""[^"]*""#, |lex| lex.slice())]
    String(&'src str),

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Run of characters that is neither markup punctuation nor whitespace.
    /// Doubles as tag/attribute names inside tags and as word content
    /// inside text runs; the parser decides which by context.
    #[regex(r#"[^<>=" \t\r\n]+"#, |lex| lex.slice())]
    Chunk(&'src str),
}

/// Tokenize source, keeping byte spans so text runs can be sliced verbatim
pub fn tokenize(source: &str) -> Vec<(Token, std::ops::Range<usize>)> {
    let lexer = Token::lexer(source);
    lexer
        .spanned()
        .filter_map(|(result, span)| result.ok().map(|token| (token, span)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let tokens = tokenize("<p>hello</p>");

        assert_eq!(tokens[0].0, Token::Open);
        assert_eq!(tokens[1].0, Token::Chunk("p"));
        assert_eq!(tokens[2].0, Token::Close);
        assert_eq!(tokens[3].0, Token::Chunk("hello"));
        assert_eq!(tokens[4].0, Token::OpenSlash);
        assert_eq!(tokens[5].0, Token::Chunk("p"));
        assert_eq!(tokens[6].0, Token::Close);
    }

    #[test]
    fn test_attribute_tokens() {
        let tokens = tokenize(r#"<img src="a.png" />"#);

        assert_eq!(tokens[0].0, Token::Open);
        assert_eq!(tokens[1].0, Token::Chunk("img"));
        assert_eq!(tokens[2].0, Token::Whitespace);
        assert_eq!(tokens[3].0, Token::Chunk("src"));
        assert_eq!(tokens[4].0, Token::Equals);
        assert_eq!(tokens[5].0, Token::String("\"a.png\""));
        assert_eq!(tokens[6].0, Token::Whitespace);
        assert_eq!(tokens[7].0, Token::SlashClose);
    }

    #[test]
    fn test_spans_cover_text_runs() {
        let source = "<p>hello world</p>";
        let tokens = tokenize(source);

        // "hello", whitespace, "world" with contiguous spans
        assert_eq!(&source[tokens[3].1.clone()], "hello");
        assert_eq!(&source[tokens[5].1.clone()], "world");
        assert_eq!(tokens[3].1.end + 1, tokens[5].1.start);
    }
}
