use colored::{ColoredString, Colorize};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::theme::CodeTheme;

/// Parse markdown text and return it as ANSI-styled terminal text.
pub fn render_markdown(text: &str, theme: CodeTheme) -> String {
    let mut renderer = MdRenderer::new(theme);
    let parser = Parser::new_ext(text, Options::ENABLE_STRIKETHROUGH);
    for event in parser {
        renderer.process(event);
    }
    renderer.flush_line();
    while renderer.lines.last().is_some_and(|line| line.is_empty()) {
        renderer.lines.pop();
    }
    renderer.lines.join("\n")
}

#[derive(Clone, Copy, Default)]
struct Inline {
    bold: bool,
    italic: bool,
    strike: bool,
    heading: bool,
}

struct MdRenderer {
    theme: CodeTheme,
    lines: Vec<String>,
    current: String,
    style_stack: Vec<Inline>,
    in_code_block: bool,
    list_stack: Vec<Option<u64>>,
    link_target: Option<String>,
}

impl MdRenderer {
    fn new(theme: CodeTheme) -> Self {
        Self {
            theme,
            lines: Vec::new(),
            current: String::new(),
            style_stack: vec![Inline::default()],
            in_code_block: false,
            list_stack: Vec::new(),
            link_target: None,
        }
    }

    fn current_style(&self) -> Inline {
        self.style_stack.last().copied().unwrap_or_default()
    }

    fn push_style(&mut self, update: impl FnOnce(&mut Inline)) {
        let mut style = self.current_style();
        update(&mut style);
        self.style_stack.push(style);
    }

    fn pop_style(&mut self) {
        if self.style_stack.len() > 1 {
            self.style_stack.pop();
        }
    }

    fn styled(&self, text: &str) -> ColoredString {
        let style = self.current_style();
        let color = if style.heading {
            self.theme.heading()
        } else {
            self.theme.text()
        };
        let mut out = text.color(color);
        if style.bold || style.heading {
            out = out.bold();
        }
        if style.italic {
            out = out.italic();
        }
        if style.strike {
            out = out.strikethrough();
        }
        out
    }

    fn flush_line(&mut self) {
        if !self.current.is_empty() {
            let line = std::mem::take(&mut self.current);
            self.lines.push(line);
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn process(&mut self, event: Event<'_>) {
        match event {
            // ── Heading ──
            Event::Start(Tag::Heading { .. }) => {
                self.flush_line();
                self.push_style(|s| s.heading = true);
            }
            Event::End(TagEnd::Heading(_)) => {
                self.flush_line();
                self.pop_style();
                self.blank_line();
            }

            // ── Paragraph ──
            Event::Start(Tag::Paragraph) => {}
            Event::End(TagEnd::Paragraph) => {
                self.flush_line();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }

            // ── Inline formatting ──
            Event::Start(Tag::Strong) => self.push_style(|s| s.bold = true),
            Event::Start(Tag::Emphasis) => self.push_style(|s| s.italic = true),
            Event::Start(Tag::Strikethrough) => self.push_style(|s| s.strike = true),
            Event::End(TagEnd::Strong | TagEnd::Emphasis | TagEnd::Strikethrough) => {
                self.pop_style();
            }
            Event::Code(code) => {
                let span = code.color(self.theme.code()).to_string();
                self.current.push_str(&span);
            }
            Event::Start(Tag::Link { dest_url, .. }) => {
                self.link_target = Some(dest_url.to_string());
            }
            Event::End(TagEnd::Link) => {
                if let Some(url) = self.link_target.take() {
                    let target = format!(" ({url})").color(self.theme.link()).to_string();
                    self.current.push_str(&target);
                }
            }

            // ── Code blocks ──
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_line();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        let label = format!("\u{250c} {lang}").color(self.theme.chrome());
                        self.lines.push(label.to_string());
                    }
                }
            }
            Event::End(TagEnd::CodeBlock) => {
                self.in_code_block = false;
                self.blank_line();
            }

            // ── Lists ──
            Event::Start(Tag::List(start)) => {
                self.flush_line();
                self.list_stack.push(start);
            }
            Event::End(TagEnd::List(_)) => {
                self.flush_line();
                self.list_stack.pop();
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_line();
                let depth = self.list_stack.len().saturating_sub(1);
                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "\u{2022} ".to_string(),
                };
                self.current.push_str(&"  ".repeat(depth + 1));
                self.current.push_str(&marker);
            }
            Event::End(TagEnd::Item) => self.flush_line(),

            // ── Text ──
            Event::Text(text) => {
                if self.in_code_block {
                    for line in text.lines() {
                        let gutter = "\u{2502} ".color(self.theme.chrome());
                        let content = line.color(self.theme.code());
                        self.lines.push(format!("{gutter}{content}"));
                    }
                } else {
                    let span = self.styled(&text).to_string();
                    self.current.push_str(&span);
                }
            }
            Event::SoftBreak => self.current.push(' '),
            Event::HardBreak => self.flush_line(),

            // ── Horizontal rule (---) ──
            Event::Rule => {
                self.flush_line();
                let rule = "\u{2500}".repeat(40).color(self.theme.chrome()).to_string();
                self.lines.push(rule);
                self.blank_line();
            }

            Event::Html(html) | Event::InlineHtml(html) => self.current.push_str(&html),
            _ => {}
        }
    }
}
