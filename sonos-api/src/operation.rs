use std::borrow::Cow;

use xmltree::Element;

use crate::error::ApiError;
use crate::service::Service;

/// Base trait for all Sonos API operations
///
/// An operation is a zero-sized marker type naming one UPnP action. The
/// associated types give the request and response their own structs so a
/// call site cannot mix up arguments between actions.
pub trait SonosOperation {
    /// The request type for this operation
    type Request;

    /// The response type for this operation
    type Response;

    /// The UPnP service this operation belongs to
    const SERVICE: Service;

    /// The SOAP action name for this operation
    const ACTION: &'static str;

    /// Reject requests the device would refuse anyway
    fn validate(_request: &Self::Request) -> Result<(), ApiError> {
        Ok(())
    }

    /// Build the argument XML that goes inside the action element
    ///
    /// String arguments must be passed through [`escape`].
    fn build_payload(request: &Self::Request) -> String;

    /// Parse the `<ActionResponse>` element into the typed response
    fn parse_response(xml: &Element) -> Result<Self::Response, ApiError>;
}

/// XML-escape a string argument for inclusion in a SOAP payload
pub fn escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}

/// Text content of a direct child element, if present and non-empty
pub(crate) fn child_text(xml: &Element, name: &str) -> Option<String> {
    xml.get_child(name)
        .and_then(|e| e.get_text())
        .map(|t| t.into_owned())
}

/// Text content of a required child element
pub(crate) fn required_text(xml: &Element, name: &str) -> Result<String, ApiError> {
    child_text(xml, name)
        .ok_or_else(|| ApiError::ParseError(format!("Missing {} element", name)))
}

/// Numeric content of a child element; absent elements read as zero
pub(crate) fn child_number(xml: &Element, name: &str) -> Result<u32, ApiError> {
    match child_text(xml, name) {
        None => Ok(0),
        Some(text) => text
            .trim()
            .parse::<u32>()
            .map_err(|_| ApiError::ParseError(format!("Invalid {} value: {}", name, text))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_didl_metadata() {
        let didl = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/"><item id="1">&</item></DIDL-Lite>"#;
        let escaped = escape(didl);
        assert!(escaped.starts_with("&lt;DIDL-Lite"));
        assert!(escaped.contains("&quot;http://purl.org/dc/elements/1.1/&quot;"));
        assert!(escaped.contains("&amp;"));
    }

    #[test]
    fn test_child_helpers() {
        let xml = Element::parse(
            "<R><Track>3</Track><Empty/><Bad>x</Bad></R>".as_bytes(),
        )
        .unwrap();

        assert_eq!(child_text(&xml, "Track").as_deref(), Some("3"));
        assert_eq!(child_text(&xml, "Empty"), None);
        assert_eq!(child_number(&xml, "Track").unwrap(), 3);
        assert_eq!(child_number(&xml, "Missing").unwrap(), 0);
        assert!(child_number(&xml, "Bad").is_err());
        assert!(required_text(&xml, "Missing").is_err());
    }
}
