//! Plain text conversion of markdown for email bodies.
//!
//! Paragraphs are re-wrapped to [`WRAP_WIDTH`] columns, list items get a
//! hanging indent, code blocks are indented by four spaces and links keep
//! their text followed by the target in angle brackets.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Column limit for wrapped text.
pub const WRAP_WIDTH: usize = 72;

/// Convert a markdown body to wrapped plain text.
pub fn to_plaintext(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_MATH);

    let mut writer = Writer::default();
    for event in Parser::new_ext(body, options) {
        writer.event(event);
    }
    writer.finish()
}

#[derive(Default)]
struct Writer {
    out: String,
    /// Inline text of the current block.
    text: String,
    /// Counter per open list, `None` for bullets.
    lists: Vec<Option<u64>>,
    /// Marker waiting for the first block of the current item.
    marker: Option<String>,
    quote_depth: usize,
    code: Option<String>,
    links: Vec<String>,
    /// Byte offset in `text` where each open link's text starts.
    link_starts: Vec<usize>,
}

impl Writer {
    fn event(&mut self, event: Event) {
        if let Some(code) = self.code.as_mut() {
            match event {
                Event::Text(text) => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let code = self.code.take().unwrap_or_default();
                    self.code_block(&code);
                }
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                self.flush();
                self.code = Some(String::new());
            }
            Event::Start(Tag::List(start)) => {
                self.flush();
                self.lists.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "- ".to_owned(),
                };
                self.marker = Some(marker);
            }
            Event::End(TagEnd::Item) => self.flush(),
            Event::Start(Tag::BlockQuote(_)) => {
                self.flush();
                self.quote_depth += 1;
            }
            Event::End(TagEnd::BlockQuote(_)) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Event::End(TagEnd::Paragraph | TagEnd::Heading(_)) => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Event::End(TagEnd::TableRow | TagEnd::TableHead) => self.flush(),
            Event::End(TagEnd::TableCell) => self.text.push_str("  "),
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.links.push(dest_url.to_string());
                self.link_starts.push(self.text.len());
            }
            Event::End(TagEnd::Link) => {
                let dest = self.links.pop().unwrap_or_default();
                let start = self.link_starts.pop().unwrap_or(0);
                let label = self.text.get(start..).unwrap_or("").trim().to_owned();
                if !dest.is_empty() && !dest.starts_with('#') && label != dest {
                    self.text.push_str(&format!(" <{dest}>"));
                }
            }
            Event::Text(text) | Event::Code(text) => self.text.push_str(&text),
            Event::InlineMath(text) | Event::DisplayMath(text) => self.text.push_str(&text),
            Event::SoftBreak | Event::HardBreak => self.text.push(' '),
            Event::FootnoteReference(name) => self.text.push_str(&format!("[{name}]")),
            Event::TaskListMarker(done) => self.text.push_str(if done { "[x] " } else { "[ ] " }),
            Event::Rule => {
                self.flush();
                let rule = "-".repeat(WRAP_WIDTH);
                self.out.push_str(&rule);
                self.out.push('\n');
                self.blank_line();
            }
            _ => {}
        }
    }

    /// Prefix for the first and following lines of the current block.
    fn prefixes(&mut self) -> (String, String) {
        let quote = "> ".repeat(self.quote_depth);
        let depth = self.lists.len().saturating_sub(1);
        let indent = "  ".repeat(depth);
        match self.marker.take() {
            Some(marker) => {
                let hang = " ".repeat(marker.len());
                (
                    format!("{quote}{indent}{marker}"),
                    format!("{quote}{indent}{hang}"),
                )
            }
            None if !self.lists.is_empty() => {
                let rest = format!("{quote}{indent}  ");
                (rest.clone(), rest)
            }
            None => (quote.clone(), quote),
        }
    }

    /// Write the pending inline text as a wrapped block.
    fn flush(&mut self) {
        let text = std::mem::take(&mut self.text);
        if text.trim().is_empty() {
            return;
        }
        let (first, rest) = self.prefixes();
        self.out.push_str(&wrap(&text, WRAP_WIDTH, &first, &rest));
        self.out.push('\n');
    }

    fn code_block(&mut self, code: &str) {
        for line in code.lines() {
            if line.is_empty() {
                self.out.push('\n');
            } else {
                self.out.push_str("    ");
                self.out.push_str(line);
                self.out.push('\n');
            }
        }
        self.blank_line();
    }

    fn blank_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        let trimmed = self.out.trim_end();
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{trimmed}\n")
        }
    }
}

/// Greedy word wrap. Words longer than the width get a line of their own.
fn wrap(text: &str, width: usize, first: &str, rest: &str) -> String {
    let mut out = String::new();
    let mut line = first.to_owned();
    let mut line_has_word = false;

    for word in text.split_whitespace() {
        let needed = if line_has_word { word.len() + 1 } else { word.len() };
        if line_has_word && line.chars().count() + needed > width {
            out.push_str(line.trim_end());
            out.push('\n');
            line = rest.to_owned();
            line_has_word = false;
        }
        if line_has_word {
            line.push(' ');
        }
        line.push_str(word);
        line_has_word = true;
    }

    out.push_str(line.trim_end());
    out
}
