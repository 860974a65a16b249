//! Renderable output tree.
//!
//! Widgets produce [`Markup`] values which the host page receives as escaped
//! HTML. CSS class names are the contract with the host stylesheet, see
//! [`HIDDEN_CLASS`].

pub mod components;

use std::fmt::Write;

/// Visually suppresses content while keeping it rendered.
pub const HIDDEN_CLASS: &str = "googlesitekit-hidden";

const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta", "link"];

#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element(Element),
    Text(String),
    Fragment(Vec<Markup>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Markup>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Adds one or more whitespace separated classes.
    pub fn class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            if !self.classes.iter().any(|existing| existing == class) {
                self.classes.push(class.to_string());
            }
        }
        self
    }

    pub fn class_if(self, condition: bool, classes: &str) -> Self {
        if condition {
            self.class(classes)
        } else {
            self
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Markup>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Markup>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(Markup::Text(text.into()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|existing| existing == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl From<Element> for Markup {
    fn from(element: Element) -> Self {
        Markup::Element(element)
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Markup::Text(text)
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Markup::Text(text.to_string())
    }
}

impl Markup {
    pub fn text(text: impl Into<String>) -> Self {
        Markup::Text(text.into())
    }

    pub fn fragment(children: Vec<Markup>) -> Self {
        Markup::Fragment(children)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Markup::Text(text) => out.push_str(&escape_html(text)),
            Markup::Fragment(children) => {
                for child in children {
                    child.write_html(out);
                }
            }
            Markup::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                if !element.classes.is_empty() {
                    let _ = write!(out, " class=\"{}\"", escape_html(&element.classes.join(" ")));
                }
                for (name, value) in &element.attributes {
                    let _ = write!(out, " {}=\"{}\"", name, escape_html(value));
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }

                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            }
        }
    }

    /// Depth-first search for elements carrying `class`.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a Element>) {
        match self {
            Markup::Text(_) => {}
            Markup::Fragment(children) => {
                for child in children {
                    child.collect_by_class(class, found);
                }
            }
            Markup::Element(element) => {
                if element.has_class(class) {
                    found.push(element);
                }
                for child in &element.children {
                    child.collect_by_class(class, found);
                }
            }
        }
    }

    pub fn contains_class(&self, class: &str) -> bool {
        !self.find_by_class(class).is_empty()
    }

    /// Concatenated text of every text node, unescaped.
    pub fn text_content(&self) -> String {
        match self {
            Markup::Text(text) => text.clone(),
            Markup::Fragment(children) => children.iter().map(Markup::text_content).collect(),
            Markup::Element(element) => element
                .children
                .iter()
                .map(Markup::text_content)
                .collect(),
        }
    }
}

pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Decodes the handful of HTML entities WordPress emits in post titles.
pub fn decode_html_entity(input: &str) -> String {
    let mut decoded = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('&') {
        decoded.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let Some(end) = candidate.find(';') else {
            decoded.push_str(candidate);
            return decoded;
        };

        let entity = &candidate[1..end];
        let replacement = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            "nbsp" => Some('\u{a0}'),
            _ => entity
                .strip_prefix("#x")
                .or_else(|| entity.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match replacement {
            Some(c) => {
                decoded.push(c);
                rest = &candidate[end + 1..];
            }
            None => {
                decoded.push('&');
                rest = &candidate[1..];
            }
        }
    }

    decoded.push_str(rest);
    decoded
}
