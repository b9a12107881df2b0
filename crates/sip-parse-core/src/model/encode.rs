//! Renders built values back to text, resolving spans through their arena.

use std::borrow::Cow;
use std::fmt::Write;

use crate::arena::{Pool, Span};
use crate::types::{Address, FieldValue, LrParam, StoredValue, UriValue};

/// Span text; bytes that are not UTF-8 are replaced, not dropped
fn text(arena: &Pool, span: Span) -> Cow<'_, str> {
    String::from_utf8_lossy(arena.bytes(span).unwrap_or_default())
}

fn token_text<'a>(arena: &'a Pool, value: &FieldValue) -> Cow<'a, str> {
    match value {
        FieldValue::Enumerated(token) => Cow::Borrowed(token.as_str()),
        FieldValue::Other(span) => text(arena, *span),
    }
}

/// Text form of a stored field value. Flags render as an empty string
pub fn stored_value(value: &StoredValue, arena: &Pool) -> String {
    match value {
        StoredValue::Text(span) => text(arena, *span).to_string(),
        StoredValue::Token(token) => token_text(arena, token).to_string(),
        StoredValue::Number(n) => n.to_string(),
        StoredValue::Flag => String::new(),
    }
}

/// `"display" <uri>` or the bare URI
pub fn address(address: &Address, arena: &Pool) -> String {
    let uri = uri(&address.uri, arena);
    match (address.display_name, address.angle_brackets) {
        (Some(name), _) => format!("{} <{}>", text(arena, name), uri),
        (None, true) => format!("<{}>", uri),
        (None, false) => uri,
    }
}

pub fn uri(uri: &UriValue, arena: &Pool) -> String {
    let mut out = String::new();
    match uri {
        UriValue::Sip(url) => {
            out.push_str(if url.secure { "sips:" } else { "sip:" });
            if let Some(user) = url.user {
                out.push_str(&text(arena, user));
                if let Some(password) = url.password {
                    out.push(':');
                    out.push_str(&text(arena, password));
                }
                out.push('@');
            }
            if let Some(host) = url.host {
                out.push_str(&text(arena, host));
            }
            if let Some(port) = url.port {
                let _ = write!(out, ":{}", port);
            }
            if let Some(transport) = &url.transport {
                let _ = write!(out, ";transport={}", token_text(arena, transport));
            }
            if let Some(user_param) = &url.user_param {
                let _ = write!(out, ";user={}", token_text(arena, user_param));
            }
            if let Some(method) = &url.method {
                let _ = write!(out, ";method={}", token_text(arena, method));
            }
            if let Some(ttl) = url.ttl {
                let _ = write!(out, ";ttl={}", ttl);
            }
            if let Some(maddr) = url.maddr {
                let _ = write!(out, ";maddr={}", text(arena, maddr));
            }
            match url.lr {
                Some(LrParam::Empty) => out.push_str(";lr"),
                Some(LrParam::On) => out.push_str(";lr=on"),
                Some(LrParam::True) => out.push_str(";lr=true"),
                Some(LrParam::One) => out.push_str(";lr=1"),
                None => {}
            }
            if let Some(comp) = &url.comp {
                let _ = write!(out, ";comp={}", token_text(arena, comp));
            }
            if let Some(id) = url.sigcomp_id {
                let _ = write!(out, ";sigcomp-id={}", text(arena, id));
            }
            if let Some(cpc) = &url.cpc {
                let _ = write!(out, ";cpc={}", token_text(arena, cpc));
            }
            match url.gr {
                Some(Some(gr)) => {
                    let _ = write!(out, ";gr={}", text(arena, gr));
                }
                Some(None) => out.push_str(";gr"),
                None => {}
            }
            if let Some(other) = url.other_params {
                let _ = write!(out, ";{}", text(arena, other));
            }
            if let Some(headers) = url.headers {
                let _ = write!(out, "?{}", text(arena, headers));
            }
        }
        UriValue::Absolute(abs) => {
            let _ = write!(out, "{}:{}", text(arena, abs.scheme), text(arena, abs.identifier));
        }
        UriValue::Tel(tel) => {
            let _ = write!(out, "tel:{}", text(arena, tel.number));
            for (name, span) in [
                ("ext", tel.extension),
                ("isub", tel.isdn_subaddress),
                ("postd", tel.post_dial),
                ("phone-context", tel.context),
            ] {
                if let Some(span) = span {
                    let _ = write!(out, ";{}={}", name, text(arena, span));
                }
            }
            if tel.enumdi {
                out.push_str(";enumdi");
            }
            if let Some(other) = tel.other_params {
                let _ = write!(out, ";{}", text(arena, other));
            }
        }
        UriValue::Diameter(aaa) => {
            out.push_str(if aaa.secure { "aaas://" } else { "aaa://" });
            out.push_str(&text(arena, aaa.host));
            if let Some(port) = aaa.port {
                let _ = write!(out, ":{}", port);
            }
            if let Some(transport) = &aaa.transport {
                let _ = write!(out, ";transport={}", token_text(arena, transport));
            }
            if let Some(protocol) = &aaa.protocol {
                let _ = write!(out, ";protocol={}", token_text(arena, protocol));
            }
            if let Some(other) = aaa.other_params {
                let _ = write!(out, ";{}", text(arena, other));
            }
        }
    }
    out
}
