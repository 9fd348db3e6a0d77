/// Text sections written to the operator's terminal

use std::io::{self, IsTerminal, Stdout, Write};

use colored::Colorize;

use crate::utils::{SECTION_RULE_CHAR, SECTION_RULE_MIN_WIDTH};

pub struct Presenter<W: Write> {
    out: W,
    styled: bool,
}

impl Presenter<Stdout> {
    /// Presenter on stdout; titles are bold only when stdout is a terminal
    pub fn stdout() -> Self {
        let out = io::stdout();
        let styled = out.is_terminal();
        Self { out, styled }
    }
}

impl<W: Write> Presenter<W> {
    pub fn new(out: W) -> Self {
        Self { out, styled: false }
    }

    /// Write a blank line, `title`, a rule under it, then `lines` verbatim.
    pub fn render<S: AsRef<str>>(&mut self, title: &str, lines: &[S]) -> io::Result<()> {
        writeln!(self.out)?;
        if self.styled {
            writeln!(self.out, "{}", title.bold())?;
        } else {
            writeln!(self.out, "{}", title)?;
        }
        writeln!(self.out, "{}", rule_for(title))?;
        self.write_lines(lines)
    }

    /// Write `lines` with no title or rule
    pub fn write_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line.as_ref())?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

pub fn rule_for(title: &str) -> String {
    let width = title.chars().count().max(SECTION_RULE_MIN_WIDTH);
    std::iter::repeat(SECTION_RULE_CHAR).take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(title: &str, lines: &[&str]) -> String {
        let mut presenter = Presenter::new(Vec::new());
        presenter.render(title, lines).unwrap();
        String::from_utf8(presenter.into_inner()).unwrap()
    }

    #[test]
    fn test_short_title_gets_minimum_rule() {
        let out = rendered("Done", &["Read-only session completed."]);
        assert_eq!(
            out,
            "\nDone\n————————————\nRead-only session completed.\n"
        );
    }

    #[test]
    fn test_long_title_rule_matches_length() {
        let title = "Optional read-only selector check";
        let out = rendered(title, &[]);
        let rule = out.lines().nth(2).unwrap();
        assert_eq!(rule.chars().count(), title.chars().count());
        assert!(rule.chars().all(|c| c == '—'));
    }

    #[test]
    fn test_lines_are_verbatim() {
        let out = rendered("Wallet context", &["  Address: 0xabc", "Balance: 1 ETH  "]);
        assert!(out.ends_with("  Address: 0xabc\nBalance: 1 ETH  \n"));
    }

    #[test]
    fn test_rule_counts_chars_not_bytes() {
        assert_eq!(rule_for("Ünïcödé tïtlé long").chars().count(), 18);
    }
}
