//! Reading and writing `<Resources><page><Resource>` localization documents.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use thiserror::Error;

use crate::encoding::{decode_document, DecodeError};
use crate::model::{deduplicate, Translation};

pub const ROOT_ELEMENT: &str = "Resources";
const PAGE_ELEMENT: &str = "page";
const RESOURCE_ELEMENT: &str = "Resource";
const CODE_ATTRIBUTE: &str = "code";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDocument {
    pub root_name: String,
    /// Namespace declarations on the root, `(prefix, uri)`; the default namespace has an empty prefix.
    pub namespaces: Vec<(String, String)>,
    /// Every other root attribute, in document order.
    pub attributes: Vec<(String, String)>,
    pub pages: Vec<Page>,
}

impl ResourceDocument {
    pub fn code(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == CODE_ATTRIBUTE)
            .map(|(_, value)| value.as_str())
    }

    pub fn resource_count(&self) -> usize {
        self.pages.iter().map(|page| page.resources.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub name: String,
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub tag: String,
    pub value: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },
    #[error("document has no root element")]
    MissingRoot,
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse { path: PathBuf, source: ParseError },
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot encode resource document: {0}")]
    Encode(String),
    #[error("no destination file is open")]
    NoDestination,
}

pub fn read_document(path: &Path) -> Result<ResourceDocument, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let document = decode_document(&bytes)
        .map_err(ParseError::from)
        .and_then(|content| parse_document(&content))
        .map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(
        path = %path.display(),
        pages = document.pages.len(),
        resources = document.resource_count(),
        "read resource document"
    );
    Ok(document)
}

pub fn parse_document(xml: &str) -> Result<ResourceDocument, ParseError> {
    let mut reader = Reader::from_str(strip_bom(xml));
    let mut tree = TreeBuilder::default();

    loop {
        let event = reader
            .read_event()
            .map_err(|err| malformed(reader.buffer_position() as u64, err))?;
        let step = match event {
            Event::Start(ref e) => tree.open(e),
            Event::Empty(ref e) => tree.open(e).and_then(|()| tree.close()),
            Event::End(_) => tree.close(),
            Event::Text(ref e) => match e.unescape() {
                Ok(text) => tree.text(&text),
                Err(err) => Err(err.to_string()),
            },
            Event::CData(e) => {
                let raw = e.into_inner();
                tree.text(&String::from_utf8_lossy(&raw))
            }
            Event::Eof => {
                if tree.stack.is_empty() {
                    break;
                }
                Err("unexpected end of document".to_string())
            }
            _ => Ok(()),
        };
        step.map_err(|message| malformed(reader.buffer_position() as u64, message))?;
    }

    tree.document.ok_or(ParseError::MissingRoot)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Root,
    Page,
    Resource,
    Skipped,
}

#[derive(Default)]
struct TreeBuilder {
    document: Option<ResourceDocument>,
    stack: Vec<Frame>,
    page: Option<Page>,
    resource: Option<Resource>,
}

impl TreeBuilder {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), String> {
        let frame = match self.stack.last().copied() {
            None => {
                if self.document.is_some() {
                    return Err("more than one root element".to_string());
                }
                self.document = Some(read_root(e)?);
                Frame::Root
            }
            Some(Frame::Root) if e.name().as_ref() == PAGE_ELEMENT.as_bytes() => {
                self.page = Some(Page {
                    name: attribute_value(e, "name")?.unwrap_or_default(),
                    resources: Vec::new(),
                });
                Frame::Page
            }
            Some(Frame::Page) if e.name().as_ref() == RESOURCE_ELEMENT.as_bytes() => {
                self.resource = Some(Resource {
                    tag: attribute_value(e, "tag")?.unwrap_or_default(),
                    value: String::new(),
                });
                Frame::Resource
            }
            Some(_) => Frame::Skipped,
        };
        self.stack.push(frame);
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        match self.stack.pop() {
            None => Err("closing tag without an open element".to_string()),
            Some(Frame::Page) => {
                if let (Some(page), Some(document)) = (self.page.take(), self.document.as_mut()) {
                    document.pages.push(page);
                }
                Ok(())
            }
            Some(Frame::Resource) => {
                if let (Some(resource), Some(page)) = (self.resource.take(), self.page.as_mut()) {
                    page.resources.push(resource);
                }
                Ok(())
            }
            Some(Frame::Root) | Some(Frame::Skipped) => Ok(()),
        }
    }

    fn text(&mut self, text: &str) -> Result<(), String> {
        if let Some(resource) = self.resource.as_mut() {
            resource.value.push_str(text);
            return Ok(());
        }
        if self.stack.is_empty() && !text.trim().is_empty() {
            return Err("text outside the root element".to_string());
        }
        Ok(())
    }
}

fn read_root(e: &BytesStart<'_>) -> Result<ResourceDocument, String> {
    let mut document = ResourceDocument {
        root_name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        ..ResourceDocument::default()
    };
    for (name, value) in attributes_of(e)? {
        if name == "xmlns" {
            document.namespaces.push((String::new(), value));
        } else if let Some(prefix) = name.strip_prefix("xmlns:") {
            document.namespaces.push((prefix.to_string(), value));
        } else {
            document.attributes.push((name, value));
        }
    }
    Ok(document)
}

fn attributes_of(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, String> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let name = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| err.to_string())?
            .to_string();
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        out.push((name, value.into_owned()));
    }
    Ok(out)
}

fn attribute_value(e: &BytesStart<'_>, name: &str) -> Result<Option<String>, String> {
    Ok(attributes_of(e)?
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value))
}

fn malformed(position: u64, message: impl std::fmt::Display) -> ParseError {
    ParseError::Malformed {
        position,
        message: message.to_string(),
    }
}

fn strip_bom(input: &str) -> &str {
    input.strip_prefix('\u{feff}').unwrap_or(input)
}

/// Serializes `records` as a destination document.
///
/// Records are grouped by exact page name in first-seen order, so a page that
/// shows up in two separate runs of the list is still written once.
pub fn render_translations(
    records: &[Translation],
    namespaces: &[(String, String)],
    attributes: &[(String, String)],
) -> Result<Vec<u8>, SaveError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(encode_error)?;

    let mut root = BytesStart::new(ROOT_ELEMENT);
    for (prefix, uri) in namespaces {
        let name = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{prefix}")
        };
        root.push_attribute((name.as_str(), uri.as_str()));
    }
    for (name, value) in attributes {
        root.push_attribute((name.as_str(), value.as_str()));
    }
    writer.write_event(Event::Start(root)).map_err(encode_error)?;

    for (page_name, page_records) in group_by_page(records) {
        let page = BytesStart::new(PAGE_ELEMENT).with_attributes([("name", page_name)]);
        writer.write_event(Event::Start(page)).map_err(encode_error)?;
        for record in page_records {
            writer
                .create_element(RESOURCE_ELEMENT)
                .with_attribute(("tag", record.resource_name.as_str()))
                .write_text_content(BytesText::new(&record.localized_value))
                .map_err(encode_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(PAGE_ELEMENT)))
            .map_err(encode_error)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))
        .map_err(encode_error)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

/// Deduplicates, renders and writes `records` to `path`.
///
/// The document is fully rendered, then written to a temporary file next to
/// `path` and renamed over it, so a failed write leaves the old file intact.
/// Returns the records as written.
pub fn write_translations(
    path: &Path,
    records: &[Translation],
    namespaces: &[(String, String)],
    attributes: &[(String, String)],
) -> Result<Vec<Translation>, SaveError> {
    let unique = deduplicate(records);
    let bytes = render_translations(&unique, namespaces, attributes)?;
    replace_file(path, &bytes).map_err(|source| SaveError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        records = unique.len(),
        dropped = records.len() - unique.len(),
        "saved destination translation"
    );
    Ok(unique)
}

fn replace_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn group_by_page(records: &[Translation]) -> Vec<(&str, Vec<&Translation>)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&Translation>)> = Vec::new();
    for record in records {
        let name = record.page_name.as_str();
        let slot = *slots.entry(name).or_insert_with(|| {
            groups.push((name, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }
    groups
}

fn encode_error(err: impl std::fmt::Display) -> SaveError {
    SaveError::Encode(err.to_string())
}
