//! Parsed input lines.

/// One line of input: a verb and the raw remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    verb: String,
    rest: String,
}

impl Command {
    /// Split `line` into a lowercase verb and the trimmed remainder.
    /// Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        Some(Self {
            verb: verb.to_lowercase(),
            rest: rest.trim().to_string(),
        })
    }

    pub fn verb(&self) -> &str {
        &self.verb
    }

    /// Everything after the verb.
    pub fn rest(&self) -> &str {
        &self.rest
    }

    /// The remainder split on `|`, each part trimmed.
    pub fn fields(&self) -> Vec<&str> {
        if self.rest.is_empty() {
            return Vec::new();
        }
        self.rest.split('|').map(str::trim).collect()
    }

    /// The first word of the remainder and what follows it.
    pub fn split_first(&self) -> (&str, &str) {
        match self.rest.split_once(char::is_whitespace) {
            Some((first, tail)) => (first, tail.trim()),
            None => (self.rest.as_str(), ""),
        }
    }

    /// The remainder parsed as a 1-based list position.
    pub fn position(&self) -> Option<usize> {
        parse_position(self.split_first().0)
    }
}

/// Parse a 1-based position into a 0-based index.
pub fn parse_position(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()?.checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let cmd = Command::parse("  WRITE  Title | body text ").unwrap();
        assert_eq!(cmd.verb(), "write");
        assert_eq!(cmd.rest(), "Title | body text");
        assert_eq!(cmd.fields(), vec!["Title", "body text"]);
        assert!(Command::parse("   ").is_none());
    }

    #[test]
    fn test_positions() {
        let cmd = Command::parse("resolve 2").unwrap();
        assert_eq!(cmd.position(), Some(1));
        assert_eq!(Command::parse("resolve 0").unwrap().position(), None);
        assert_eq!(Command::parse("list").unwrap().position(), None);
    }

    #[test]
    fn test_split_first() {
        let cmd = Command::parse("edit 3 title A new title").unwrap();
        assert_eq!(cmd.split_first(), ("3", "title A new title"));
    }
}
