//! Markdown rendering with syntax highlighting
//!
//! Markdown is turned into a [`Document`] tree; the markup string of a post
//! is always produced from that tree.

use lazy_static::lazy_static;
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::escape_html;
use crate::model::{Document, Element, Node};

lazy_static! {
    static ref MORE_RE: Regex = Regex::new(r"<!--\s*more\s*-->").unwrap();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    highlight: HighlightConfig,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options(HighlightConfig::default())
    }

    /// Create with custom highlight settings
    pub fn with_options(highlight: HighlightConfig) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            highlight,
        }
    }

    /// Render markdown to a document tree
    pub fn render(&self, markdown: &str) -> Document {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST;
        let parser = Parser::new_ext(markdown, options);

        let mut builder = TreeBuilder::new(self);
        for event in parser {
            builder.event(event);
        }
        builder.finish()
    }

    /// Render markdown to HTML
    pub fn render_html(&self, markdown: &str) -> String {
        self.render(markdown).to_html()
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        if !self.highlight.enable {
            return plain_code_block(code, lang);
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.highlight.theme)
            .or_else(|| self.theme_set.themes.values().next());

        let Some(theme) = theme else {
            return plain_code_block(code, lang);
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) if self.highlight.line_number => {
                add_line_numbers(code, &highlighted, lang)
            }
            Ok(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                escape_html(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain_code_block(code, lang)
            }
        }
    }

    /// Split markdown at the `<!-- more -->` marker.
    ///
    /// Returns the excerpt (if there is a marker) and the full body with the
    /// marker removed.
    pub fn split_excerpt(content: &str) -> (Option<&str>, String) {
        match MORE_RE.find(content) {
            Some(m) => {
                let excerpt = content[..m.start()].trim();
                let remaining = content[m.end()..].trim();
                (Some(excerpt), format!("{}\n\n{}", excerpt, remaining))
            }
            None => (None, content.to_string()),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn plain_code_block(code: &str, lang: &str) -> String {
    format!(
        r#"<pre><code class="language-{}">{}</code></pre>"#,
        escape_html(lang),
        escape_html(code)
    )
}

/// Put a line-number gutter next to highlighted code
fn add_line_numbers(code: &str, highlighted: &str, lang: &str) -> String {
    let line_count = code.lines().count().max(1);
    let gutter: Vec<String> = (1..=line_count)
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect();

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        escape_html(lang),
        gutter.join("\n"),
        highlighted
    )
}

struct CodeBlock {
    lang: Option<String>,
    text: String,
}

struct Image {
    src: String,
    title: String,
    alt: String,
}

/// Folds pulldown-cmark events into a tree of open elements
struct TreeBuilder<'r> {
    renderer: &'r MarkdownRenderer,
    root: Vec<Node>,
    open: Vec<Element>,
    code: Option<CodeBlock>,
    image: Option<Image>,
    alignments: Vec<Alignment>,
    cell: usize,
    in_table_head: bool,
    in_table_body: bool,
}

impl<'r> TreeBuilder<'r> {
    fn new(renderer: &'r MarkdownRenderer) -> Self {
        Self {
            renderer,
            root: Vec::new(),
            open: Vec::new(),
            code: None,
            image: None,
            alignments: Vec::new(),
            cell: 0,
            in_table_head: false,
            in_table_body: false,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(image) = self.image.as_mut() {
                    image.alt.push_str(&code);
                } else {
                    self.push(Element::new("code").child(Node::text(code.to_string())));
                }
            }
            Event::InlineMath(math) => self.push(
                Element::new("span")
                    .attr("class", "math math-inline")
                    .child(Node::text(math.to_string())),
            ),
            Event::DisplayMath(math) => self.push(
                Element::new("span")
                    .attr("class", "math math-display")
                    .child(Node::text(math.to_string())),
            ),
            Event::Html(html) | Event::InlineHtml(html) => self.push(Node::raw(html.to_string())),
            Event::FootnoteReference(name) => self.push(
                Element::new("sup").attr("class", "footnote-reference").child(
                    Element::new("a")
                        .attr("href", format!("#{}", name))
                        .child(Node::text(name.to_string())),
                ),
            ),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.push(Element::new("br")),
            Event::Rule => self.push(Element::new("hr")),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .attr("type", "checkbox")
                    .attr("disabled", "");
                if checked {
                    input = input.attr("checked", "");
                }
                self.push(input);
            }
            #[allow(unreachable_patterns)]
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        // Markup inside an image only contributes to its alt text
        if self.image.is_some() {
            return;
        }

        match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                let mut heading = Element::new(format!("h{}", level as usize));
                if let Some(id) = id {
                    heading = heading.attr("id", id.to_string());
                }
                if !classes.is_empty() {
                    let classes: Vec<&str> = classes.iter().map(|c| c.as_ref()).collect();
                    heading = heading.attr("class", classes.join(" "));
                }
                for (key, value) in attrs {
                    heading = heading.attr(key.to_string(), value.as_deref().unwrap_or(""));
                }
                self.open(heading);
            }
            Tag::BlockQuote(_) => self.open(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|l| !l.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeBlock {
                    lang,
                    text: String::new(),
                });
            }
            Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::List(Some(start)) => {
                let mut list = Element::new("ol");
                if start != 1 {
                    list = list.attr("start", start.to_string());
                }
                self.open(list);
            }
            Tag::List(None) => self.open(Element::new("ul")),
            Tag::Item => self.open(Element::new("li")),
            Tag::FootnoteDefinition(name) => self.open(
                Element::new("div")
                    .attr("class", "footnote-definition")
                    .attr("id", name.to_string())
                    .child(
                        Element::new("sup")
                            .attr("class", "footnote-definition-label")
                            .child(Node::text(name.to_string())),
                    ),
            ),
            Tag::DefinitionList => self.open(Element::new("dl")),
            Tag::DefinitionListTitle => self.open(Element::new("dt")),
            Tag::DefinitionListDefinition => self.open(Element::new("dd")),
            Tag::Table(alignments) => {
                self.alignments = alignments;
                self.in_table_body = false;
                self.open(Element::new("table"));
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell = 0;
                self.open(Element::new("thead"));
                self.open(Element::new("tr"));
            }
            Tag::TableRow => {
                if !self.in_table_body {
                    self.in_table_body = true;
                    self.open(Element::new("tbody"));
                }
                self.cell = 0;
                self.open(Element::new("tr"));
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.in_table_head { "th" } else { "td" });
                let align = match self.alignments.get(self.cell) {
                    Some(Alignment::Left) => Some("left"),
                    Some(Alignment::Center) => Some("center"),
                    Some(Alignment::Right) => Some("right"),
                    _ => None,
                };
                if let Some(align) = align {
                    cell = cell.attr("style", format!("text-align: {}", align));
                }
                self.cell += 1;
                self.open(cell);
            }
            Tag::Emphasis => self.open(Element::new("em")),
            Tag::Strong => self.open(Element::new("strong")),
            Tag::Strikethrough => self.open(Element::new("del")),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut link = Element::new("a").attr("href", dest_url.to_string());
                if !title.is_empty() {
                    link = link.attr("title", title.to_string());
                }
                self.open(link);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                self.image = Some(Image {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                });
            }
            #[allow(unreachable_patterns)]
            _ => self.open(Element::new("div")),
        }
    }

    fn end(&mut self, tag: TagEnd) {
        if self.image.is_some() && !matches!(tag, TagEnd::Image) {
            return;
        }

        match tag {
            TagEnd::CodeBlock => {
                if let Some(code) = self.code.take() {
                    let html = self
                        .renderer
                        .highlight_code(&code.text, code.lang.as_deref());
                    self.push(Node::raw(html));
                }
            }
            TagEnd::Image => {
                if let Some(image) = self.image.take() {
                    let mut img = Element::new("img")
                        .attr("src", image.src)
                        .attr("alt", image.alt);
                    if !image.title.is_empty() {
                        img = img.attr("title", image.title);
                    }
                    self.push(img);
                }
            }
            TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::TableHead => {
                self.close(); // tr
                self.close(); // thead
                self.in_table_head = false;
            }
            TagEnd::Table => {
                if self.in_table_body {
                    self.close(); // tbody
                    self.in_table_body = false;
                }
                self.close();
            }
            _ => self.close(),
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(text);
        } else if let Some(image) = self.image.as_mut() {
            image.alt.push_str(text);
        } else {
            self.push(Node::text(text));
        }
    }

    fn open(&mut self, element: Element) {
        self.open.push(element);
    }

    fn close(&mut self) {
        if let Some(element) = self.open.pop() {
            self.push(element);
        }
    }

    fn push(&mut self, node: impl Into<Node>) {
        let node = node.into();

        // Adjacent text runs are merged so the tree stays compact
        let children = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let (Node::Text { text }, Some(Node::Text { text: last })) = (&node, children.last_mut())
        {
            last.push_str(text);
            return;
        }
        children.push(node);
    }

    fn finish(mut self) -> Document {
        while !self.open.is_empty() {
            self.close();
        }
        Document::new(self.root)
    }
}
