//! Conversion between a [`MindMap`] and its transport text payload.
//!
//! The payload is compact JSON. Every detail item travels as a single
//! string: plain texts are written as-is, image items as an inline marker
//!
//! ```text
//! <img src="…" alt="…" class="…" />
//! ```
//!
//! A text that could be confused with a marker (it starts with `<img` or
//! with the escape character `\`) is prefixed with one `\` on the way out
//! and has it stripped on the way in.

use crate::error::{CodecError, CodecResult};
use crate::model::{DetailItem, ImageRef, MindMap};

const MARKER_PREFIX: &str = "<img";
const TEXT_ESCAPE: char = '\\';

/// Serialize a mind map to its transport payload.
pub fn encode(map: &MindMap) -> CodecResult<String> {
    serde_json::to_string(map).map_err(CodecError::Encode)
}

/// Parse a transport payload back into a mind map.
///
/// Fails on anything that is not well-formed JSON of the expected shape,
/// and on trees where two nodes share an id.
pub fn decode(payload: &str) -> CodecResult<MindMap> {
    let map: MindMap = serde_json::from_str(payload).map_err(CodecError::Decode)?;
    map.validate()?;
    Ok(map)
}

// =============================================================================
// Detail item <-> string
// =============================================================================

impl From<DetailItem> for String {
    fn from(item: DetailItem) -> Self {
        match item {
            DetailItem::Text(text) => {
                // parse_image_marker ignores surrounding whitespace
                if text.starts_with(TEXT_ESCAPE) || text.trim_start().starts_with(MARKER_PREFIX) {
                    format!("{TEXT_ESCAPE}{text}")
                } else {
                    text
                }
            }
            DetailItem::Image(image) => image_to_marker(&image),
        }
    }
}

impl From<String> for DetailItem {
    fn from(raw: String) -> Self {
        if let Some(escaped) = raw.strip_prefix(TEXT_ESCAPE) {
            return DetailItem::Text(escaped.to_string());
        }
        match parse_image_marker(&raw) {
            Some(image) => DetailItem::Image(image),
            None => DetailItem::Text(raw),
        }
    }
}

/// Render an image reference as its single-line inline marker.
pub fn image_to_marker(image: &ImageRef) -> String {
    format!(
        r#"<img src="{}" alt="{}" class="{}" />"#,
        escape_attr(&image.src),
        escape_attr(&image.alt_text),
        escape_attr(&image.style_class)
    )
}

/// Recognise an inline image marker.
///
/// Accepts double- or single-quoted attribute values, the legacy
/// `className` spelling, and a closing `/>` or `>`. `src` is required;
/// a missing `alt` or `class` reads as empty. Attributes other than these
/// are ignored. Anything else yields `None`.
pub fn parse_image_marker(raw: &str) -> Option<ImageRef> {
    let body = raw.trim().strip_prefix(MARKER_PREFIX)?;
    let body = body
        .strip_suffix("/>")
        .or_else(|| body.strip_suffix('>'))?;
    // `<imgfoo ...>` is a different tag.
    if !body.is_empty() && !body.starts_with(char::is_whitespace) {
        return None;
    }

    let mut src = None;
    let mut alt = None;
    let mut class = None;

    let mut rest = body.trim_start();
    while !rest.is_empty() {
        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        if name_len == 0 {
            return None;
        }
        let (name, after_name) = rest.split_at(name_len);
        let after_eq = after_name.trim_start().strip_prefix('=')?.trim_start();

        let quote = after_eq.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value_and_rest = &after_eq[quote.len_utf8()..];
        let end = value_and_rest.find(quote)?;
        let value = unescape_attr(&value_and_rest[..end]);

        match name {
            "src" => src = Some(value),
            "alt" => alt = Some(value),
            "class" | "className" => class = Some(value),
            _ => {}
        }

        let after_value = &value_and_rest[end + quote.len_utf8()..];
        // Attributes must be separated by whitespace.
        if !after_value.is_empty() && !after_value.starts_with(char::is_whitespace) {
            return None;
        }
        rest = after_value.trim_start();
    }

    Some(ImageRef {
        src: src?,
        alt_text: alt.unwrap_or_default(),
        style_class: class.unwrap_or_default(),
    })
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

const ENTITIES: [(&str, char); 6] = [
    ("&amp;", '&'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&apos;", '\''),
    ("&lt;", '<'),
    ("&gt;", '>'),
];

fn unescape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match ENTITIES
            .iter()
            .find(|(entity, _)| rest.starts_with(entity))
        {
            Some((entity, c)) => {
                out.push(*c);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Node;
    use crate::sample::initial_mind_map;

    fn drawing() -> MindMap {
        MindMap::new(
            "Drawings",
            [Node::new("dessin1", "Dessin 1").with_details([
                DetailItem::text("A"),
                DetailItem::image("http://x/i.png", "y", "z"),
                DetailItem::text("B"),
            ])],
        )
    }

    #[test]
    fn image_between_texts_survives_round_trip() {
        let map = drawing();
        let payload = encode(&map).unwrap();
        assert!(payload.contains(r#"<img src=\"http://x/i.png\" alt=\"y\" class=\"z\" />"#));

        let decoded = decode(&payload).unwrap();
        assert_eq!(decoded, map);
        match &decoded.nodes[0].details[1] {
            DetailItem::Image(image) => {
                assert_eq!(image.src, "http://x/i.png");
                assert_eq!(image.alt_text, "y");
                assert_eq!(image.style_class, "z");
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn sample_map_round_trips() {
        let map = initial_mind_map();
        let decoded = decode(&encode(&map).unwrap()).unwrap();
        assert_eq!(decoded, map);
    }

    #[test]
    fn empty_collections_are_omitted_from_payload() {
        let map = MindMap::new("t", [Node::new("leaf", "Leaf")]);
        let payload = encode(&map).unwrap();
        assert_eq!(payload, r#"{"title":"t","nodes":[{"id":"leaf","label":"Leaf"}]}"#);
    }

    #[test]
    fn node_with_details_and_children_round_trips() {
        let map = MindMap::new(
            "mixed",
            [Node::new("parent", "Parent")
                .with_icon("📜")
                .with_details([DetailItem::text("note")])
                .with_children([Node::new("child", "Child")])],
        );
        assert_eq!(decode(&encode(&map).unwrap()).unwrap(), map);
    }

    #[test]
    fn malformed_payloads_are_decode_errors() {
        for payload in [
            "",
            "not json",
            "{\"title\": 3}",
            "{\"title\":\"t\",\"nodes\":[{\"label\":\"no id\"}]}",
            "[1,2,3]",
        ] {
            assert!(
                matches!(decode(payload), Err(CodecError::Decode(_))),
                "payload {payload:?} should fail"
            );
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let payload = r#"{"title":"t","nodes":[
            {"id":"a","label":"A","children":[{"id":"b","label":"B"}]},
            {"id":"b","label":"B again"}
        ]}"#;
        match decode(payload) {
            Err(CodecError::DuplicateNodeId { id }) => assert_eq!(id.as_str(), "b"),
            other => panic!("expected duplicate id, got {other:?}"),
        }
    }

    #[test]
    fn attribute_values_are_escaped() {
        let image = ImageRef::new(
            "http://x/i.png?a=1&b=\"2\"",
            "it's <bold>",
            "c1 c2",
        );
        let marker = image_to_marker(&image);
        assert_eq!(
            marker,
            r#"<img src="http://x/i.png?a=1&amp;b=&quot;2&quot;" alt="it&#39;s &lt;bold&gt;" class="c1 c2" />"#
        );
        assert_eq!(parse_image_marker(&marker), Some(image));
    }

    #[test]
    fn legacy_class_name_attribute_is_accepted() {
        let raw = r#"<img src="https://i.imgur.com/jl9vlhp.jpeg" alt="Dates" className="max-w-full h-auto" />"#;
        let item = DetailItem::from(raw.to_string());
        assert_eq!(
            item,
            DetailItem::image("https://i.imgur.com/jl9vlhp.jpeg", "Dates", "max-w-full h-auto")
        );
    }

    #[test]
    fn single_quotes_and_missing_optional_attributes() {
        assert_eq!(
            parse_image_marker("<img src='a.png'>"),
            Some(ImageRef::new("a.png", "", ""))
        );
        assert_eq!(
            parse_image_marker(r#"<img alt="x" src="a.png" width="10" />"#),
            Some(ImageRef::new("a.png", "x", ""))
        );
    }

    #[test]
    fn non_markers_are_rejected() {
        for raw in [
            "plain text",
            r#"<img alt="no src" />"#,
            r#"<imgx src="a" />"#,
            r#"<img src="a" /> trailing"#,
            r#"<img src="unterminated />"#,
            r#"<img src=a />"#,
            r#"<img src="a"alt="b" />"#,
        ] {
            assert_eq!(parse_image_marker(raw), None, "{raw:?}");
        }
    }

    #[test]
    fn texts_that_look_like_markers_stay_texts() {
        let tricky = [
            r#"<img src="a.png" />"#,
            r#"  <img src="a.png" alt="x" class="y" />"#,
            "\n\t<img src='b.png'>",
            "<img is how you embed images",
            r"\already escaped",
            r"\",
            "plain **bold** text",
        ];
        let map = MindMap::new(
            "t",
            [Node::new("n", "N").with_details(tricky.iter().map(|t| DetailItem::text(*t)))],
        );
        let decoded = decode(&encode(&map).unwrap()).unwrap();
        assert_eq!(decoded, map);
        assert!(decoded.nodes[0].details.iter().all(|d| !d.is_image()));
    }

    #[test]
    fn unparseable_marker_text_from_older_writers_stays_text() {
        let item = DetailItem::from("<img broken".to_string());
        assert_eq!(item, DetailItem::text("<img broken"));
    }

    #[test]
    fn unknown_entities_are_left_alone() {
        assert_eq!(unescape_attr("a &nbsp; b & c"), "a &nbsp; b & c");
        assert_eq!(unescape_attr("&amp;lt;"), "&lt;");
    }
}
