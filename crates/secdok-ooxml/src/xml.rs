//! Small helpers shared by the WordprocessingML readers and writers

use quick_xml::events::BytesStart;

/// Get an attribute value by local name, ignoring the namespace prefix
/// (`w:val`, `val` and `x:val` all match `b"val"`).
pub(crate) fn attr(e: &BytesStart, local: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.local_name().as_ref() == local)
        .and_then(|a| {
            a.unescape_value()
                .ok()
                .map(|v| v.into_owned())
                .or_else(|| String::from_utf8(a.value.to_vec()).ok())
        })
}

/// Read an OOXML on/off property such as `<w:b/>` or `<w:i w:val="0"/>`.
///
/// A missing `w:val` means on.
pub(crate) fn toggle(e: &BytesStart) -> bool {
    !matches!(
        attr(e, b"val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

/// Escape special XML characters
pub(crate) fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn first_element(xml: &str) -> BytesStart<'static> {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => return e.into_owned(),
                Event::Eof => panic!("no element in {xml}"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_attr_ignores_prefix() {
        let e = first_element(r#"<w:pStyle w:val="Heading1"/>"#);
        assert_eq!(attr(&e, b"val").as_deref(), Some("Heading1"));
        assert_eq!(attr(&e, b"missing"), None);
    }

    #[test]
    fn test_attr_unescapes() {
        let e = first_element(r#"<w:fldSimple w:instr="TOC \o &quot;1-3&quot;"/>"#);
        assert_eq!(attr(&e, b"instr").as_deref(), Some(r#"TOC \o "1-3""#));
    }

    #[test]
    fn test_toggle_values() {
        assert!(toggle(&first_element("<w:b/>")));
        assert!(toggle(&first_element(r#"<w:b w:val="1"/>"#)));
        assert!(toggle(&first_element(r#"<w:b w:val="true"/>"#)));
        assert!(!toggle(&first_element(r#"<w:b w:val="0"/>"#)));
        assert!(!toggle(&first_element(r#"<w:i w:val="false"/>"#)));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("Hello & World"), "Hello &amp; World");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }
}
