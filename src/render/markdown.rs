//! Default markdown renderer: pulldown-cmark with syntect highlighting.

use super::{Rendered, Renderer, plaintext};
use anyhow::Result;
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::{
    highlighting::{Theme, ThemeSet},
    html::highlighted_html_for_string,
    parsing::SyntaxSet,
};

/// Markdown renderer with syntax highlighting.
///
/// Syntax and theme sets are loaded once and reused for every page.
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Heading being collected until its end tag, so its id can use its text.
struct PendingHeading<'a> {
    level: HeadingLevel,
    id: Option<CowStr<'a>>,
    classes: Vec<CowStr<'a>>,
    attrs: Vec<(CowStr<'a>, Option<CowStr<'a>>)>,
    text: String,
    events: Vec<Event<'a>>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
        options.insert(Options::ENABLE_MATH);

        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            options,
        }
    }

    /// Highlight a code block, falling back to escaped text for an unknown
    /// style or language.
    fn highlight(&self, code: &str, lang: Option<&str>, theme: Option<&Theme>) -> String {
        let syntax = lang.and_then(|l| self.syntax_set.find_syntax_by_token(l));
        if let (Some(syntax), Some(theme)) = (syntax, theme)
            && let Ok(html) = highlighted_html_for_string(code, &self.syntax_set, syntax, theme)
        {
            return html;
        }

        let class = lang
            .map(|l| format!(" class=\"language-{}\"", escape_html(l)))
            .unwrap_or_default();
        format!("<pre><code{class}>{}</code></pre>\n", escape_html(code))
    }

    fn finish_heading<'a>(heading: PendingHeading<'a>, out: &mut Vec<Event<'a>>) {
        let id = heading.id.unwrap_or_else(|| slugify(&heading.text).into());
        let anchor = heading.level != HeadingLevel::H1 && !id.is_empty();

        out.push(Event::Start(Tag::Heading {
            level: heading.level,
            id: (!id.is_empty()).then(|| id.clone()),
            classes: heading.classes,
            attrs: heading.attrs,
        }));
        out.extend(heading.events);
        if anchor {
            out.push(Event::InlineHtml(
                format!(" <a class=\"anchor\" href=\"#{id}\">§</a>").into(),
            ));
        }
        out.push(Event::End(TagEnd::Heading(heading.level)));
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, body: &str, style: &str) -> Result<Rendered> {
        let theme = self.theme_set.themes.get(style);

        let mut title: Option<String> = None;
        let mut events = Vec::new();
        let mut heading: Option<PendingHeading> = None;
        let mut code: Option<(Option<String>, String)> = None;

        for event in Parser::new_ext(body, self.options) {
            if let Some((lang, buf)) = code.as_mut() {
                match event {
                    Event::Text(text) => buf.push_str(&text),
                    Event::End(TagEnd::CodeBlock) => {
                        let html = self.highlight(buf, lang.as_deref(), theme);
                        events.push(Event::Html(html.into()));
                        code = None;
                    }
                    _ => {}
                }
                continue;
            }

            if let Some(pending) = heading.as_mut() {
                match event {
                    Event::End(TagEnd::Heading(_)) => {
                        if let Some(pending) = heading.take() {
                            if pending.level == HeadingLevel::H1 && title.is_none() {
                                title = Some(pending.text.trim().to_owned());
                            }
                            Self::finish_heading(pending, &mut events);
                        }
                    }
                    event => {
                        if let Event::Text(t) | Event::Code(t) = &event {
                            pending.text.push_str(t);
                        }
                        pending.events.push(event);
                    }
                }
                continue;
            }

            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c.is_whitespace() || c == ',')
                            .next()
                            .filter(|l| !l.is_empty())
                            .map(str::to_owned),
                        CodeBlockKind::Indented => None,
                    };
                    code = Some((lang, String::new()));
                }
                Event::Start(Tag::Heading {
                    level,
                    id,
                    classes,
                    attrs,
                }) => {
                    heading = Some(PendingHeading {
                        level,
                        id,
                        classes,
                        attrs,
                        text: String::new(),
                        events: Vec::new(),
                    });
                }
                event => events.push(event),
            }
        }

        let mut html = String::with_capacity(body.len() * 3 / 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());

        Ok(Rendered {
            title: title.unwrap_or_default(),
            html,
        })
    }

    fn to_plaintext(&self, body: &str) -> Result<String> {
        Ok(plaintext::to_plaintext(body))
    }
}

/// Lowercase ASCII slug for heading anchors.
fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_owned()
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(body: &str) -> Rendered {
        MarkdownRenderer::new().render(body, "base16-ocean.dark").unwrap()
    }

    #[test]
    fn test_title_from_first_h1() {
        let out = render("intro\n\n# Hello *World*\n\n# Second\n");
        assert_eq!(out.title, "Hello World");
        assert!(out.html.contains("<h1"));
    }

    #[test]
    fn test_no_h1_means_empty_title() {
        assert_eq!(render("## Only h2\n\ntext").title, "");
    }

    #[test]
    fn test_h2_gets_id_and_anchor() {
        let out = render("## Getting Started\n");
        assert!(out.html.contains("id=\"getting-started\""));
        assert!(out.html.contains("href=\"#getting-started\""));
        assert!(out.html.contains('§'));
    }

    #[test]
    fn test_explicit_heading_id_is_kept() {
        let out = render("## Intro {#custom}\n");
        assert!(out.html.contains("id=\"custom\""));
    }

    #[test]
    fn test_code_block_highlighted() {
        let out = render("```rust\nfn main() {}\n```\n");
        assert!(out.html.contains("<pre"));
        assert!(out.html.contains("style="));
        assert!(out.html.contains("main"));
    }

    #[test]
    fn test_unknown_style_falls_back_to_plain_code() {
        let out = MarkdownRenderer::new()
            .render("```rust\nlet a = 1 < 2;\n```\n", "no-such-style")
            .unwrap();
        assert!(out.html.contains("<pre><code class=\"language-rust\">"));
        assert!(out.html.contains("1 &lt; 2"));
    }

    #[test]
    fn test_tables_and_footnotes() {
        let out = render("| a | b |\n|---|---|\n| 1 | 2 |\n\nnote[^1]\n\n[^1]: here\n");
        assert!(out.html.contains("<table>"));
        assert!(out.html.contains("footnote"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  spaced  out "), "spaced-out");
        assert_eq!(slugify("!!!"), "");
    }
}
