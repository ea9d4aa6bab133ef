//! Outbound rendering.
//!
//! A reply is checked, its application id resolved, and the result written
//! as a `<ussdresp>` document with a fixed child order:
//!
//! ```text
//! <ussdresp>
//!   <msisdn/> <sessionid/> <appid/> <type/> <msg/>
//! </ussdresp>
//! ```
//!
//! An absent or empty value is written as a self-closing element with no
//! space before the slash, e.g. `<appid/>`. No XML declaration precedes the
//! root element.

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use relay_core::{OutboundMessage, SessionEvent};

use crate::config::AppIdFallback;
use crate::error::OutboundError;

/// Root element of the reply document.
const ROOT: &str = "ussdresp";

/// Session continues.
pub const TYPE_CONTINUE: &str = "2";
/// Session ends.
pub const TYPE_END: &str = "3";

/// Returns the wire type code for a session event.
pub fn session_type_code(event: SessionEvent) -> &'static str {
    match event {
        SessionEvent::Close => TYPE_END,
        SessionEvent::New | SessionEvent::Resume => TYPE_CONTINUE,
    }
}

/// How the `<appid>` element is filled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppIdPolicy {
    /// Used when the reply carries no application id.
    pub default_appid: Option<String>,
    /// Used when neither the reply nor the configuration has one.
    pub fallback: AppIdFallback,
}

impl AppIdPolicy {
    /// Resolves the application id: metadata, then configured default,
    /// then the fallback.
    pub fn resolve(&self, metadata_appid: Option<&str>, in_reply_to: &str) -> Option<String> {
        metadata_appid
            .filter(|id| !id.is_empty())
            .or(self.default_appid.as_deref())
            .map(str::to_string)
            .or_else(|| match self.fallback {
                AppIdFallback::InReplyTo => Some(in_reply_to.to_string()),
                AppIdFallback::Empty => None,
            })
    }
}

/// A reply that passed the pre-render checks.
#[derive(Debug, Clone, Copy)]
pub struct CheckedReply<'a> {
    /// The message being delivered.
    pub message: &'a OutboundMessage,
    /// Correlation token of the parked request.
    pub in_reply_to: &'a str,
    /// Reply text, never empty.
    pub content: &'a str,
}

/// Rejects replies that cannot be rendered.
pub fn check(message: &OutboundMessage) -> Result<CheckedReply<'_>, OutboundError> {
    let content = message
        .content
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or(OutboundError::NoContent)?;
    let in_reply_to = message
        .in_reply_to
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(OutboundError::NotAReply)?;

    Ok(CheckedReply {
        message,
        in_reply_to,
        content,
    })
}

/// Renders a checked reply.
pub fn render(reply: &CheckedReply<'_>, policy: &AppIdPolicy) -> Result<String, OutboundError> {
    let metadata = &reply.message.transport_metadata;
    let appid = policy.resolve(metadata.appid.as_deref(), reply.in_reply_to);

    render_document(&[
        ("msisdn", Some(reply.message.to_addr.as_str())),
        ("sessionid", metadata.sessionid.as_deref()),
        ("appid", appid.as_deref()),
        ("type", Some(session_type_code(reply.message.session_event))),
        ("msg", Some(reply.content)),
    ])
}

fn render_document(children: &[(&str, Option<&str>)]) -> Result<String, OutboundError> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Start(BytesStart::new(ROOT)))
        .map_err(render_err)?;
    for (name, text) in children {
        match text.filter(|t| !t.is_empty()) {
            Some(text) => {
                writer
                    .write_event(Event::Start(BytesStart::new(*name)))
                    .map_err(render_err)?;
                writer
                    .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
                    .map_err(render_err)?;
                writer
                    .write_event(Event::End(BytesEnd::new(*name)))
                    .map_err(render_err)?;
            }
            None => {
                writer
                    .write_event(Event::Empty(BytesStart::new(*name)))
                    .map_err(render_err)?;
            }
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(ROOT)))
        .map_err(render_err)?;

    String::from_utf8(writer.into_inner()).map_err(render_err)
}

fn render_err(e: impl std::fmt::Display) -> OutboundError {
    OutboundError::Render(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_core::TransportMetadata;

    fn reply(content: &str) -> OutboundMessage {
        OutboundMessage::new("blastsms", "+41791234567", content)
            .with_in_reply_to("in-1")
            .with_metadata(TransportMetadata::new("sess1234").with_appid("1234"))
    }

    fn render_message(message: &OutboundMessage, policy: &AppIdPolicy) -> String {
        render(&check(message).unwrap(), policy).unwrap()
    }

    #[test]
    fn test_render_continue() {
        let body = render_message(&reply("We are the Knights Who Say ... Ni!"), &AppIdPolicy::default());
        assert_eq!(
            body,
            "<ussdresp><msisdn>+41791234567</msisdn><sessionid>sess1234</sessionid>\
             <appid>1234</appid><type>2</type><msg>We are the Knights Who Say ... Ni!</msg></ussdresp>"
        );
    }

    #[test]
    fn test_render_close() {
        let message = reply("Bye").with_session_event(SessionEvent::Close);
        let body = render_message(&message, &AppIdPolicy::default());
        assert!(body.contains("<type>3</type>"));
    }

    #[test]
    fn test_type_code() {
        assert_eq!(session_type_code(SessionEvent::New), "2");
        assert_eq!(session_type_code(SessionEvent::Resume), "2");
        assert_eq!(session_type_code(SessionEvent::Close), "3");
    }

    #[test]
    fn test_render_unicode_and_escaping() {
        let body = render_message(&reply("Thrëë, my lord. <1> & \"2\""), &AppIdPolicy::default());
        assert!(body.contains("<msg>Thrëë, my lord. &lt;1&gt; &amp; \"2\"</msg>"));

        let parsed = crate::extract::parse_xml(body.as_bytes()).unwrap();
        assert_eq!(parsed.get("msg"), Some("Thrëë, my lord. <1> & \"2\""));
    }

    #[test]
    fn test_appid_precedence() {
        let policy = AppIdPolicy {
            default_appid: Some("default".to_string()),
            fallback: AppIdFallback::InReplyTo,
        };
        assert_eq!(policy.resolve(Some("meta"), "in-1").as_deref(), Some("meta"));
        assert_eq!(policy.resolve(None, "in-1").as_deref(), Some("default"));

        let in_reply_to = AppIdPolicy::default();
        assert_eq!(in_reply_to.resolve(None, "in-1").as_deref(), Some("in-1"));

        let empty = AppIdPolicy {
            default_appid: None,
            fallback: AppIdFallback::Empty,
        };
        assert_eq!(empty.resolve(None, "in-1"), None);
    }

    #[test]
    fn test_render_empty_appid_element() {
        let message = reply("Hi").with_metadata(TransportMetadata::new("var_sessionid"));
        let policy = AppIdPolicy {
            default_appid: None,
            fallback: AppIdFallback::Empty,
        };
        let body = render_message(&message, &policy);
        assert_eq!(
            body,
            "<ussdresp><msisdn>+41791234567</msisdn><sessionid>var_sessionid</sessionid>\
             <appid/><type>2</type><msg>Hi</msg></ussdresp>"
        );
    }

    #[test]
    fn test_check_no_content() {
        let mut message = reply("x");
        message.content = Some(String::new());
        assert_eq!(check(&message).unwrap_err(), OutboundError::NoContent);

        message.content = None;
        assert_eq!(check(&message).unwrap_err(), OutboundError::NoContent);
    }

    #[test]
    fn test_check_not_a_reply() {
        let message = OutboundMessage::new("blastsms", "+41791234567", "Hi");
        assert_eq!(check(&message).unwrap_err(), OutboundError::NotAReply);
    }
}
