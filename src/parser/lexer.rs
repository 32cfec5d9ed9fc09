use super::ast::RawGroup;
use super::PatternError;

#[derive(Debug, Clone, PartialEq)]
pub enum Tok {
    Text(String),
    Group(RawGroup),
    Star,
    Plus,
    QMark,
    Pipe,
    Error(PatternError),
}

#[derive(Debug)]
pub struct Token {
    start: usize,
    end: usize,
    pub data: Tok,
}

impl Token {
    fn new(start: usize, end: usize, data: Tok) -> Self {
        Self { start, end, data }
    }

    pub fn get_error(&self) -> Option<PatternError> {
        if let Tok::Error(err) = &self.data {
            Some(err.clone())
        } else {
            None
        }
    }

    fn reserved(start: usize, c: char) -> Option<Self> {
        let data = match c {
            '*' => Tok::Star,
            '+' => Tok::Plus,
            '?' => Tok::QMark,
            '|' => Tok::Pipe,
            _ => return None,
        };
        Some(Self::new(start, start + 1, data))
    }

    pub fn bounds(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

/// Splits pattern text into literal runs, wildcards, the alternation bar
/// and raw groups.
///
/// `[[`, `]]`, `[*]`, `[+]`, `[?]` and `[|]` fold into the surrounding text.
pub struct Lexer<'a> {
    code: &'a str,
    i: usize,
    text: String,
    text_start: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(code: &'a str) -> Self {
        Self {
            code,
            i: 0,
            text: String::new(),
            text_start: 0,
        }
    }

    fn push_text(&mut self, c: char, width: usize) {
        if self.text.is_empty() {
            self.text_start = self.i;
        }
        self.text.push(c);
        self.i += width;
    }

    fn flush_text(&mut self) -> Option<Token> {
        if self.text.is_empty() {
            None
        } else {
            let text = std::mem::take(&mut self.text);
            Some(Token::new(self.text_start, self.i, Tok::Text(text)))
        }
    }

    fn escape(rest: &str) -> Option<char> {
        let mut chars = rest.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some('['), Some('['), _) => Some('['),
            (Some(']'), Some(']'), _) => Some(']'),
            (Some('['), Some(c @ ('*' | '+' | '?' | '|')), Some(']')) => Some(c),
            _ => None,
        }
    }

    fn group(&mut self) -> Token {
        let start = self.i;
        let body = &self.code[start + 1..];

        match body.find(|c: char| c == '[' || c == ']') {
            Some(len) if body[len..].starts_with(']') => {
                let end = start + 1 + len + 1;
                self.i = end;
                Token::new(start, end, Tok::Group(RawGroup::new(&body[..len], start)))
            }
            stop => {
                let end = stop.map_or(self.code.len(), |len| start + 1 + len);
                self.i = self.code.len();
                Token::new(
                    start,
                    end,
                    Tok::Error(PatternError::UnterminatedGroup {
                        snippet: self.code[start..end].to_owned(),
                        pos: start,
                    }),
                )
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        while self.i < self.code.len() {
            let rest = &self.code[self.i..];

            if let Some(c) = Self::escape(rest) {
                let width = if c == '[' || c == ']' { 2 } else { 3 };
                self.push_text(c, width);
                continue;
            }

            let Some(c) = rest.chars().next() else {
                break;
            };

            if c == '[' {
                return Some(self.flush_text().unwrap_or_else(|| self.group()));
            }

            match Token::reserved(self.i, c) {
                Some(tok) => {
                    if let Some(text) = self.flush_text() {
                        return Some(text);
                    }
                    self.i += 1;
                    return Some(tok);
                }
                None => self.push_text(c, c.len_utf8()),
            }
        }

        self.flush_text()
    }
}
