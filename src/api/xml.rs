// src/api/xml.rs
//! A small owned element tree built from quick-xml events.
//!
//! The API's XML responses are shallow and small, so parsing them into a
//! tree and navigating by slash-separated paths keeps the per-attribute
//! extractors short.

use crate::error::AppError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One element: its name, attributes, concatenated text and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Parses a document and returns its root element.
    pub fn parse(xml: &str) -> Result<Self, AppError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or_else(|| {
                        AppError::MalformedResponse("unbalanced closing tag".to_string())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&data));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(AppError::MalformedResponse(format!(
                "document ended inside <{}>",
                stack[stack.len() - 1].name
            )));
        }

        root.ok_or_else(|| AppError::MalformedResponse("empty document".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, AppError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Default::default()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Text content, entity references resolved.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attr(key).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First element matching a slash-separated path below this one.
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        match segments.next() {
            None => Some(self),
            Some(first) => {
                let rest: Vec<&str> = segments.collect();
                let rest = rest.join("/");
                self.children
                    .iter()
                    .filter(|child| child.name == first)
                    .find_map(|child| child.find(&rest))
            }
        }
    }

    /// Every element matching a slash-separated path below this one.
    pub fn find_all<'a>(&'a self, path: &str) -> Vec<&'a XmlElement> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let mut found = Vec::new();
        self.collect_path(&segments, &mut found);
        found
    }

    fn collect_path<'a>(&'a self, segments: &[&str], found: &mut Vec<&'a XmlElement>) {
        match segments.split_first() {
            None => found.push(self),
            Some((first, rest)) => {
                for child in self.children.iter().filter(|child| child.name == *first) {
                    child.collect_path(rest, found);
                }
            }
        }
    }
}

/// Attaches a completed element to its parent, or makes it the root.
fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<(), AppError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(AppError::MalformedResponse(format!(
            "second root element <{}>",
            element.name
        ))),
    }
}
