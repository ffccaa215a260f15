//! Render changes and changesets in the OSM API XML formats.
//!
//! Two documents are produced:
//! - `osmChange > create > (node*, way*, relation*)` for diff uploads;
//! - `osm > changeset > tag{created_by, comment}` for opening a changeset.
//!
//! Both start with an XML declaration and are not pretty-printed.

use std::borrow::Cow;

use log::debug;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use thiserror::Error;

use crate::change::{Multipolygon, Node, OsmChange, Tags, Way};
use crate::changeset::ChangesetMetadata;

/// Errors raised while rendering XML.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The XML writer failed.
    #[error("failed to write XML: {0}")]
    Write(#[from] quick_xml::Error),
    /// The rendered bytes were not UTF-8.
    #[error("rendered XML is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

type XmlWriter = Writer<Vec<u8>>;

impl OsmChange<'_> {
    /// Render the change as an `osmChange` document.
    ///
    /// Every element carries the changeset's id. A changeset without an id
    /// renders as `changeset=""`; create the changeset before serialising.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the writer fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use geo::Coord;
    /// use osmchange_core::{ChangesetMetadata, OsmChange, Tags};
    ///
    /// let changeset = ChangesetMetadata::new("docs", "example").with_id(42);
    /// let mut change = OsmChange::new(&changeset);
    /// change.create_node(Coord { x: 13.4, y: 52.5 }, Tags::new())?;
    ///
    /// let xml = change.to_xml()?;
    /// assert!(xml.contains(r#"<node id="-1" lat="52.5" lon="13.4" changeset="42"/>"#));
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_xml(&self) -> Result<String, XmlError> {
        let changeset = self
            .changeset()
            .id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        debug!(
            "rendering osmChange with {} nodes, {} ways and {} relations",
            self.nodes().len(),
            self.ways().len(),
            self.relations().len()
        );
        render(|writer| {
            writer.write_event(Event::Start(BytesStart::new("osmChange")))?;
            writer.write_event(Event::Start(BytesStart::new("create")))?;
            for node in self.nodes() {
                write_node(writer, node, &changeset)?;
            }
            for way in self.ways() {
                write_way(writer, way, &changeset)?;
            }
            for relation in self.relations() {
                write_relation(writer, relation, &changeset)?;
            }
            writer.write_event(Event::End(BytesEnd::new("create")))?;
            writer.write_event(Event::End(BytesEnd::new("osmChange")))
        })
    }
}

impl ChangesetMetadata {
    /// Render the body of a create-changeset request.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the writer fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use osmchange_core::ChangesetMetadata;
    ///
    /// let xml = ChangesetMetadata::new("bot", "Add benches").to_xml()?;
    /// assert!(xml.ends_with(
    ///     r#"<osm><changeset><tag k="created_by" v="bot"/><tag k="comment" v="Add benches"/></changeset></osm>"#
    /// ));
    /// # Ok::<(), osmchange_core::XmlError>(())
    /// ```
    pub fn to_xml(&self) -> Result<String, XmlError> {
        render(|writer| {
            writer.write_event(Event::Start(BytesStart::new("osm")))?;
            writer.write_event(Event::Start(BytesStart::new("changeset")))?;
            write_tag(writer, "created_by", self.created_by())?;
            write_tag(writer, "comment", self.comment())?;
            writer.write_event(Event::End(BytesEnd::new("changeset")))?;
            writer.write_event(Event::End(BytesEnd::new("osm")))
        })
    }
}

fn render<F>(body: F) -> Result<String, XmlError>
where
    F: FnOnce(&mut XmlWriter) -> Result<(), quick_xml::Error>,
{
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    body(&mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Write `start` as an empty element, or wrap `children` when there are any.
fn write_element<F>(
    writer: &mut XmlWriter,
    start: BytesStart<'_>,
    has_children: bool,
    children: F,
) -> Result<(), quick_xml::Error>
where
    F: FnOnce(&mut XmlWriter) -> Result<(), quick_xml::Error>,
{
    if !has_children {
        return writer.write_event(Event::Empty(start));
    }
    let end = BytesEnd::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    writer.write_event(Event::Start(start))?;
    children(writer)?;
    writer.write_event(Event::End(end))
}

fn write_node(writer: &mut XmlWriter, node: &Node, changeset: &str) -> Result<(), quick_xml::Error> {
    let id = node.id.to_string();
    let lat = node.lat().to_string();
    let lon = node.lon().to_string();
    let start = element(
        "node",
        &[
            ("id", id.as_str()),
            ("lat", lat.as_str()),
            ("lon", lon.as_str()),
            ("changeset", changeset),
        ],
    );
    write_element(writer, start, !node.tags.is_empty(), |writer| {
        write_tags(writer, &node.tags)
    })
}

fn write_way(writer: &mut XmlWriter, way: &Way, changeset: &str) -> Result<(), quick_xml::Error> {
    let id = way.id.to_string();
    let start = element("way", &[("id", id.as_str()), ("changeset", changeset)]);
    let has_children = !way.node_refs.is_empty() || !way.tags.is_empty();
    write_element(writer, start, has_children, |writer| {
        for node_ref in &way.node_refs {
            let node_ref = node_ref.to_string();
            writer.write_event(Event::Empty(element("nd", &[("ref", node_ref.as_str())])))?;
        }
        write_tags(writer, &way.tags)
    })
}

fn write_relation(
    writer: &mut XmlWriter,
    relation: &Multipolygon,
    changeset: &str,
) -> Result<(), quick_xml::Error> {
    let id = relation.id.to_string();
    let start = element("relation", &[("id", id.as_str()), ("changeset", changeset)]);
    write_element(writer, start, true, |writer| {
        for member in &relation.members {
            let way_ref = member.way.to_string();
            writer.write_event(Event::Empty(element(
                "member",
                &[
                    ("type", "way"),
                    ("role", member.role.as_str()),
                    ("ref", way_ref.as_str()),
                ],
            )))?;
        }
        write_tag(writer, "type", "multipolygon")?;
        write_tags(writer, &relation.tags)
    })
}

/// Start tag for `name` with escaped attribute values.
fn element<'a>(name: &'a str, attributes: &[(&'a str, &str)]) -> BytesStart<'a> {
    BytesStart::new(name).with_attributes(
        attributes
            .iter()
            .map(|&(key, value)| attribute(key, value)),
    )
}

/// Escape markup and the whitespace characters that attribute value
/// normalisation would otherwise turn into spaces.
fn attribute<'a>(key: &'a str, value: &str) -> Attribute<'a> {
    let escaped = escape(value)
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#09;");
    Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Owned(escaped.into_bytes()),
    }
}

fn write_tags(writer: &mut XmlWriter, tags: &Tags) -> Result<(), quick_xml::Error> {
    for (key, value) in tags {
        write_tag(writer, key, value)?;
    }
    Ok(())
}

fn write_tag(writer: &mut XmlWriter, key: &str, value: &str) -> Result<(), quick_xml::Error> {
    writer.write_event(Event::Empty(element("tag", &[("k", key), ("v", value)])))
}
