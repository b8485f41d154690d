use std::fmt;

/// Closed set of token kinds produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Num,
    Id,
    // Keywords
    If,
    Else,
    While,
    Print,
    Function,
    // Operators
    Plus,
    Minus,
    Mult,
    Div,
    Assign,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semi,
    Comma,
}

impl TokenKind {
    /// Keyword table: maps a reserved spelling to its keyword kind.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "print" => Some(TokenKind::Print),
            "function" => Some(TokenKind::Function),
            _ => None,
        }
    }

    /// Operators that may label a `BIN_OP` node.
    pub fn is_binary_operator(self) -> bool {
        self.is_arithmetic() || self.is_relational()
    }

    pub fn is_arithmetic(self) -> bool {
        matches!(self, TokenKind::Plus | TokenKind::Minus | TokenKind::Mult | TokenKind::Div)
    }

    pub fn is_relational(self) -> bool {
        matches!(
            self,
            TokenKind::Eq | TokenKind::Ne | TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge
        )
    }

    /// Source spelling for operators, punctuation and keywords.
    pub fn symbol(self) -> Option<&'static str> {
        let s = match self {
            TokenKind::Num | TokenKind::Id => return None,
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Print => "print",
            TokenKind::Function => "function",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Mult => "*",
            TokenKind::Div => "/",
            TokenKind::Assign => "=",
            TokenKind::Eq => "==",
            TokenKind::Ne => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Semi => ";",
            TokenKind::Comma => ",",
        };
        Some(s)
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Num => "NUM",
            TokenKind::Id => "ID",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::While => "WHILE",
            TokenKind::Print => "PRINT",
            TokenKind::Function => "FUNCTION",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Mult => "MULT",
            TokenKind::Div => "DIV",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Eq => "EQ",
            TokenKind::Ne => "NE",
            TokenKind::Lt => "LT",
            TokenKind::Le => "LE",
            TokenKind::Gt => "GT",
            TokenKind::Ge => "GE",
            TokenKind::LParen => "LPAREN",
            TokenKind::RParen => "RPAREN",
            TokenKind::LBrace => "LBRACE",
            TokenKind::RBrace => "RBRACE",
            TokenKind::Semi => "SEMI",
            TokenKind::Comma => "COMMA",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A scanned token. `text` carries the lexeme for `ID` and the canonical
/// decimal rendering for `NUM`; every other kind has no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: Option<String>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, text: None }
    }

    pub fn with_text(kind: TokenKind, text: impl Into<String>) -> Self {
        Self { kind, text: Some(text.into()) }
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::with_text(TokenKind::Id, name)
    }

    pub fn num(digits: impl Into<String>) -> Self {
        Self::with_text(TokenKind::Num, digits)
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "{}({:?})", self.kind, text),
            None => write!(f, "{}", self.kind),
        }
    }
}
