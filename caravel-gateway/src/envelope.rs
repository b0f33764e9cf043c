use caravel_core::model::BasketOutcome;
use roxmltree::{Document, Node};

/// Namespace the basket service answers under. Some deployments omit it on
/// the `<return>` element, so lookup falls back to the bare local name.
pub const BASKET_NAMESPACE: &str = "urn:LegacyBasketService";

/// Interpret a raw basket response.
///
/// The service wraps its actual answer twice: the transport envelope carries
/// a `<return>` element whose text content is an escaped, serialized
/// document of its own. Interpretation is therefore a two-stage decode:
/// parse the envelope, unescape the return content, parse that as a second
/// document, and read its `<MESSAGE>`. A message equal to "success"
/// (case-insensitively) is the only success signal.
///
/// Pure function over the raw text; the same input always yields the same
/// classification.
pub fn classify_response(raw: &str) -> BasketOutcome {
    let outer = match Document::parse(raw) {
        Ok(doc) => doc,
        Err(err) => return BasketOutcome::Unreadable(format!("envelope not parseable: {err}")),
    };

    let return_node = outer
        .descendants()
        .find(|n| n.has_tag_name((BASKET_NAMESPACE, "return")))
        .or_else(|| outer.descendants().find(|n| n.has_tag_name("return")));

    let Some(return_node) = return_node else {
        return BasketOutcome::Unreadable("no <return> element in envelope".into());
    };

    let content = text_content(&return_node);
    if content.trim().is_empty() {
        return BasketOutcome::Unreadable("<return> element is empty".into());
    }

    let unescaped = html_escape::decode_html_entities(content.trim());
    let inner = match Document::parse(&unescaped) {
        Ok(doc) => doc,
        Err(err) => {
            return BasketOutcome::Unreadable(format!("nested document not parseable: {err}"))
        }
    };

    let message = inner
        .descendants()
        .find(|n| n.has_tag_name("MESSAGE"))
        .map(|n| text_content(&n));

    match message {
        None => BasketOutcome::Unreadable("no <MESSAGE> in nested document".into()),
        Some(message) if message.trim().is_empty() => {
            BasketOutcome::Unreadable("<MESSAGE> is empty".into())
        }
        Some(message) if message.trim().eq_ignore_ascii_case("success") => BasketOutcome::Success,
        Some(message) => BasketOutcome::Rejected(message.trim().to_string()),
    }
}

/// Concatenated text children of an element. Entity references can split the
/// character data into several nodes, so a single `text()` read is not
/// enough.
fn text_content(node: &Node<'_, '_>) -> String {
    node.children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn soap_envelope(return_content: &str) -> String {
        format!(
            r#"<SOAP:Envelope xmlns:SOAP="http://schemas.xmlsoap.org/soap/envelope/" xmlns:tns="urn:LegacyBasketService">
    <SOAP:Body>
        <tns:AddItemResponse>
            <tns:return>{return_content}</tns:return>
        </tns:AddItemResponse>
    </SOAP:Body>
</SOAP:Envelope>"#
        )
    }

    #[test]
    fn test_success_message_classifies_success() {
        let raw = soap_envelope("&lt;response&gt;&lt;MESSAGE&gt;Success&lt;/MESSAGE&gt;&lt;/response&gt;");
        assert_eq!(classify_response(&raw), BasketOutcome::Success);
    }

    #[test]
    fn test_bare_return_fragment_classifies_success() {
        // The distilled fragment form, without the transport envelope.
        let raw = "<return>&lt;response&gt;&lt;MESSAGE&gt;Success&lt;/MESSAGE&gt;&lt;/response&gt;</return>";
        assert_eq!(classify_response(raw), BasketOutcome::Success);
    }

    #[test]
    fn test_success_match_is_case_insensitive() {
        let raw = soap_envelope("&lt;response&gt;&lt;MESSAGE&gt;SUCCESS&lt;/MESSAGE&gt;&lt;/response&gt;");
        assert_eq!(classify_response(&raw), BasketOutcome::Success);
    }

    #[test]
    fn test_non_success_message_is_rejected_with_text() {
        let raw = soap_envelope(
            "&lt;response&gt;&lt;MESSAGE&gt;Item not available in market&lt;/MESSAGE&gt;&lt;/response&gt;",
        );
        assert_eq!(
            classify_response(&raw),
            BasketOutcome::Rejected("Item not available in market".into())
        );
    }

    #[test]
    fn test_missing_return_is_unreadable() {
        let raw = r#"<SOAP:Envelope xmlns:SOAP="http://schemas.xmlsoap.org/soap/envelope/">
            <SOAP:Body><status>ok</status></SOAP:Body>
        </SOAP:Envelope>"#;
        assert!(matches!(
            classify_response(raw),
            BasketOutcome::Unreadable(_)
        ));
    }

    #[test]
    fn test_empty_return_is_unreadable() {
        let raw = soap_envelope("");
        assert!(matches!(
            classify_response(&raw),
            BasketOutcome::Unreadable(_)
        ));
    }

    #[test]
    fn test_missing_message_is_unreadable() {
        let raw = soap_envelope("&lt;response&gt;&lt;STATUS&gt;1&lt;/STATUS&gt;&lt;/response&gt;");
        assert!(matches!(
            classify_response(&raw),
            BasketOutcome::Unreadable(_)
        ));
    }

    #[test]
    fn test_garbled_nested_document_is_unreadable() {
        let raw = soap_envelope("&lt;response&gt;&lt;MESSAGE&gt;Success");
        assert!(matches!(
            classify_response(&raw),
            BasketOutcome::Unreadable(_)
        ));
    }

    #[test]
    fn test_non_xml_body_is_unreadable() {
        assert!(matches!(
            classify_response("502 Bad Gateway"),
            BasketOutcome::Unreadable(_)
        ));
    }

    #[test]
    fn test_doubly_escaped_content_still_decodes() {
        // Some deployments escape the nested document twice; the explicit
        // unescape step between the two parses absorbs the extra layer.
        let raw = soap_envelope(
            "&amp;lt;response&amp;gt;&amp;lt;MESSAGE&amp;gt;Success&amp;lt;/MESSAGE&amp;gt;&amp;lt;/response&amp;gt;",
        );
        assert_eq!(classify_response(&raw), BasketOutcome::Success);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let cases = [
            soap_envelope("&lt;response&gt;&lt;MESSAGE&gt;Success&lt;/MESSAGE&gt;&lt;/response&gt;"),
            soap_envelope("&lt;response&gt;&lt;MESSAGE&gt;declined&lt;/MESSAGE&gt;&lt;/response&gt;"),
            soap_envelope(""),
            "not xml at all".to_string(),
        ];

        for raw in cases {
            assert_eq!(classify_response(&raw), classify_response(&raw));
        }
    }
}
