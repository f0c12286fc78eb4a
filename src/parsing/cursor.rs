// src/parsing/cursor.rs
//! Forward-only line cursor with one line of lookahead.

#[derive(Debug, Clone)]
pub struct LineCursor<'a> {
    lines: Vec<&'a str>,
    position: usize,
}

impl<'a> LineCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().collect(),
            position: 0,
        }
    }

    /// The next line without consuming it.
    pub fn peek(&self) -> Option<&'a str> {
        self.lines.get(self.position).copied()
    }

    /// Consumes and returns the next line.
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.peek()?;
        self.position += 1;
        Some(line)
    }

    /// Consumes lines while `keep` accepts them.
    pub fn take_while<T>(&mut self, mut keep: impl FnMut(&'a str) -> Option<T>) -> Vec<T> {
        let mut taken = Vec::new();
        while let Some(line) = self.peek() {
            match keep(line) {
                Some(item) => {
                    taken.push(item);
                    self.position += 1;
                }
                None => break,
            }
        }
        taken
    }

    /// 1-based number of the line most recently consumed.
    pub fn line_number(&self) -> usize {
        self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.lines.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peek_does_not_consume() {
        let mut cursor = LineCursor::new("a\nb");
        assert_eq!(cursor.peek(), Some("a"));
        assert_eq!(cursor.next_line(), Some("a"));
        assert_eq!(cursor.line_number(), 1);
        assert_eq!(cursor.next_line(), Some("b"));
        assert!(cursor.is_at_end());
        assert_eq!(cursor.next_line(), None);
    }

    #[test]
    fn take_while_stops_before_rejected_line() {
        let mut cursor = LineCursor::new("1\n2\nx\n3");
        let numbers = cursor.take_while(|line| line.parse::<u32>().ok());
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(cursor.peek(), Some("x"));
    }
}
