use model::{Token, TokenKind};
use crate::ScanError;
use crate::keywords::keyword_or_identifier;
use crate::literals::canonical_integer;

pub struct StateMachineLexer<'a> {
    source: &'a str,
    pos: usize,
    token_start: usize,
}

impl<'a> StateMachineLexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            token_start: 0,
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>, ScanError> {
        let mut tokens = Vec::new();

        while self.pos < self.source.len() {
            match self.lex_next_token()? {
                Some(token) => tokens.push(token),
                None => continue, // Whitespace consumed
            }
        }

        Ok(tokens)
    }

    fn lex_next_token(&mut self) -> Result<Option<Token>, ScanError> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };
        self.token_start = self.pos;

        match ch {
            '0'..='9' => self.lex_number().map(Some),
            'a'..='z' | 'A'..='Z' => Ok(Some(self.lex_identifier())),
            _ => self.lex_operator_or_punctuation(ch).map(Some),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.source.as_bytes().get(self.pos + offset).copied()
    }

    fn current_slice(&self) -> &'a str {
        &self.source[self.token_start..self.pos]
    }

    // ASCII space, \t through \r (vertical tab included) and the 0x1C..=0x1F
    // separators. Other Unicode whitespace is an unexpected character.
    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek(0) {
            if matches!(b, b' ' | b'\t'..=b'\r' | 0x1C..=0x1F) {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn consume_while(&mut self, accept: impl Fn(u8) -> bool) {
        while self.peek(0).is_some_and(&accept) {
            self.pos += 1;
        }
    }

    fn lex_number(&mut self) -> Result<Token, ScanError> {
        self.consume_while(|b| b.is_ascii_digit());
        let digits = canonical_integer(self.current_slice())?;
        Ok(Token::num(digits))
    }

    fn lex_identifier(&mut self) -> Token {
        self.consume_while(|b| b.is_ascii_alphanumeric());
        keyword_or_identifier(self.current_slice())
    }

    fn lex_operator_or_punctuation(&mut self, ch: char) -> Result<Token, ScanError> {
        // Operators with a one-character lookahead for a trailing '='
        let with_equal = match ch {
            '=' => Some((TokenKind::Eq, Some(TokenKind::Assign))),
            '<' => Some((TokenKind::Le, Some(TokenKind::Lt))),
            '>' => Some((TokenKind::Ge, Some(TokenKind::Gt))),
            '!' => Some((TokenKind::Ne, None)),
            _ => None,
        };

        if let Some((compound, single)) = with_equal {
            if self.peek(1) == Some(b'=') {
                self.pos += 2;
                return Ok(Token::new(compound));
            }
            return match single {
                Some(kind) => {
                    self.pos += 1;
                    Ok(Token::new(kind))
                }
                None => Err(ScanError::UnexpectedCharacter(ch)),
            };
        }

        let kind = match ch {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Mult,
            '/' => TokenKind::Div,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semi,
            ',' => TokenKind::Comma,
            _ => return Err(ScanError::UnexpectedCharacter(ch)),
        };
        self.pos += 1;
        Ok(Token::new(kind))
    }
}
