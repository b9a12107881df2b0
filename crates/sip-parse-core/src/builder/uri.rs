//! URI variant dispatcher and the four URI builders.

use tracing::trace;

use super::materialize::{classify, materialize_text, materialize_token, parse_number};
use crate::arena::{ExtensionAccumulator, PageId, Pool, Span};
use crate::error::{Error, Result};
use crate::parsed::{InputSpan, ParsedAddress, UriParam, UriPayload};
use crate::types::tokens::{Compression, Cpc, DiameterProtocol, Method, Transport, UserParam};
use crate::types::{
    AbsoluteUri, Address, DiameterUri, FieldValue, LrParam, SipUrl, TelUri, TokenTable, UriKind, UriValue,
};

/// Where a dispatched URI goes
#[derive(Debug)]
pub enum UriTarget<'a> {
    /// Build the URI on `page` of `arena`
    Build { arena: &'a mut Pool, page: PageId },
    /// Only record which variant the URI is
    Probe(&'a mut Option<UriKind>),
}

/// Unrecognised URI parameters collected on the scratch pool
#[derive(Debug, Clone, Copy)]
pub struct UrlExtensions<'a> {
    pub scratch: &'a Pool,
    pub accumulator: &'a ExtensionAccumulator,
}

impl UrlExtensions<'_> {
    fn copy_to(&self, arena: &mut Pool, page: PageId) -> Result<Option<Span>> {
        self.accumulator.copy_to(self.scratch, arena, page)
    }
}

/// Selects the builder for `kind` and runs it.
///
/// In probe mode the variant is recorded and nothing is allocated.
pub fn dispatch(
    kind: UriKind,
    payload: &UriPayload,
    input: &[u8],
    line: u32,
    extensions: Option<UrlExtensions<'_>>,
    target: UriTarget<'_>,
) -> Result<Option<UriValue>> {
    if kind != payload.kind() {
        return Err(Error::unknown(format!(
            "uri variant {} does not match a {} payload",
            kind,
            payload.kind()
        )));
    }

    let (arena, page) = match target {
        UriTarget::Probe(slot) => {
            trace!(%kind, "uri probe");
            *slot = Some(kind);
            return Ok(None);
        }
        UriTarget::Build { arena, page } => (arena, page),
    };

    let mut b = UriBuilder {
        arena,
        page,
        input,
        line,
    };
    let value = match payload {
        UriPayload::Sip {
            secure,
            user,
            password,
            host,
            port,
            params,
            headers,
        } => {
            let mut url = b.sip_url(*secure, *user, *password, *host, *port, params, *headers)?;
            url.other_params = b.extensions(extensions)?;
            UriValue::Sip(url)
        }
        UriPayload::Absolute { scheme, identifier } => UriValue::Absolute(b.absolute(*scheme, *identifier)?),
        UriPayload::Tel { number, params } => {
            let mut tel = b.tel(*number, params)?;
            tel.other_params = b.extensions(extensions)?;
            UriValue::Tel(tel)
        }
        UriPayload::Diameter {
            secure,
            host,
            port,
            params,
        } => {
            let mut aaa = b.diameter(*secure, *host, *port, params)?;
            aaa.other_params = b.extensions(extensions)?;
            UriValue::Diameter(aaa)
        }
    };
    Ok(Some(value))
}

/// Builds a name-addr / addr-spec on `page` of `arena`
pub fn build_address(
    arena: &mut Pool,
    page: PageId,
    parsed: &ParsedAddress,
    input: &[u8],
    line: u32,
    extensions: Option<UrlExtensions<'_>>,
) -> Result<Address> {
    let display_name = match parsed.display_name {
        Some(span) => materialize_text(arena, page, span.slice(input))?,
        None => None,
    };
    let uri = dispatch(
        parsed.uri.kind(),
        &parsed.uri,
        input,
        line,
        extensions,
        UriTarget::Build { arena, page },
    )?
    .ok_or_else(|| Error::unknown("uri builder produced no value"))?;

    Ok(Address {
        display_name,
        uri,
        angle_brackets: parsed.angle_brackets,
    })
}

struct UriBuilder<'a, 'i> {
    arena: &'a mut Pool,
    page: PageId,
    input: &'i [u8],
    line: u32,
}

impl UriBuilder<'_, '_> {
    fn text(&mut self, span: InputSpan) -> Result<Option<Span>> {
        materialize_text(self.arena, self.page, span.slice(self.input))
    }

    fn opt_text(&mut self, span: Option<InputSpan>) -> Result<Option<Span>> {
        match span {
            Some(span) => self.text(span),
            None => Ok(None),
        }
    }

    /// Copies a mandatory part; an empty part still gets a (zero-length) span
    fn required(&mut self, span: InputSpan) -> Result<Span> {
        self.arena.append(self.page, span.slice(self.input))
    }

    fn token(&mut self, table: &TokenTable, span: InputSpan) -> Result<FieldValue> {
        let source = span.slice(self.input);
        let discriminant = classify(table, source);
        materialize_token(self.arena, self.page, discriminant, source)
    }

    fn number(&self, span: InputSpan, max: u32) -> Result<u32> {
        parse_number(span.slice(self.input), max, self.line, span.offset)
    }

    fn port(&self, span: Option<InputSpan>) -> Result<Option<u16>> {
        match span {
            Some(span) => Ok(Some(self.number(span, u32::from(u16::MAX))? as u16)),
            None => Ok(None),
        }
    }

    /// Value of a parameter that requires one
    fn value(&self, param: &UriParam) -> Result<InputSpan> {
        param
            .value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::syntax(self.line, param.name.end()))
    }

    fn extensions(&mut self, extensions: Option<UrlExtensions<'_>>) -> Result<Option<Span>> {
        match extensions {
            Some(ext) => ext.copy_to(self.arena, self.page),
            None => Ok(None),
        }
    }

    fn unhandled(&self, kind: UriKind, param: &UriParam) -> Error {
        let name = String::from_utf8_lossy(param.name.slice(self.input));
        Error::unknown(format!("{} parameter '{}' has no builder slot", kind, name))
    }

    fn sip_url(
        &mut self,
        secure: bool,
        user: Option<InputSpan>,
        password: Option<InputSpan>,
        host: InputSpan,
        port: Option<InputSpan>,
        params: &[UriParam],
        headers: Option<InputSpan>,
    ) -> Result<SipUrl> {
        let mut url = SipUrl {
            secure,
            ..Default::default()
        };
        url.user = self.opt_text(user)?;
        url.password = self.opt_text(password)?;
        url.host = self.text(host)?;
        url.port = self.port(port)?;

        let input = self.input;
        for param in params {
            let name = param.name.slice(input).to_ascii_lowercase();
            match name.as_slice() {
                b"transport" => url.transport = Some(self.token(&Transport::TABLE, self.value(param)?)?),
                b"user" => url.user_param = Some(self.token(&UserParam::TABLE, self.value(param)?)?),
                b"method" => url.method = Some(self.token(&Method::TABLE, self.value(param)?)?),
                b"maddr" => url.maddr = self.text(self.value(param)?)?,
                b"ttl" => url.ttl = Some(self.number(self.value(param)?, u32::from(u8::MAX))? as u8),
                b"lr" => {
                    let value = param.value.map(|v| v.slice(input));
                    url.lr = Some(
                        LrParam::from_value(value)
                            .ok_or_else(|| Error::syntax(self.line, param.name.end()))?,
                    );
                }
                b"comp" => url.comp = Some(self.token(&Compression::TABLE, self.value(param)?)?),
                b"sigcomp-id" => url.sigcomp_id = self.text(self.value(param)?)?,
                b"cpc" => url.cpc = Some(self.token(&Cpc::TABLE, self.value(param)?)?),
                b"gr" => {
                    url.gr = Some(match param.value {
                        Some(value) => self.text(value)?,
                        None => None,
                    })
                }
                _ => return Err(self.unhandled(UriKind::SipUrl, param)),
            }
        }

        url.headers = self.opt_text(headers)?;
        Ok(url)
    }

    fn absolute(&mut self, scheme: InputSpan, identifier: InputSpan) -> Result<AbsoluteUri> {
        Ok(AbsoluteUri {
            scheme: self.required(scheme)?,
            identifier: self.required(identifier)?,
        })
    }

    fn tel(&mut self, number: InputSpan, params: &[UriParam]) -> Result<TelUri> {
        let input = self.input;
        let mut tel = TelUri {
            global: number.slice(input).first() == Some(&b'+'),
            number: self.required(number)?,
            extension: None,
            isdn_subaddress: None,
            post_dial: None,
            context: None,
            enumdi: false,
            other_params: None,
        };

        for param in params {
            let name = param.name.slice(input).to_ascii_lowercase();
            match name.as_slice() {
                b"ext" => tel.extension = self.text(self.value(param)?)?,
                b"isub" => tel.isdn_subaddress = self.text(self.value(param)?)?,
                b"postd" => tel.post_dial = self.text(self.value(param)?)?,
                b"phone-context" => tel.context = self.text(self.value(param)?)?,
                b"enumdi" => tel.enumdi = true,
                _ => return Err(self.unhandled(UriKind::TelUri, param)),
            }
        }
        Ok(tel)
    }

    fn diameter(
        &mut self,
        secure: bool,
        host: InputSpan,
        port: Option<InputSpan>,
        params: &[UriParam],
    ) -> Result<DiameterUri> {
        let mut aaa = DiameterUri {
            secure,
            host: self.required(host)?,
            port: self.port(port)?,
            transport: None,
            protocol: None,
            other_params: None,
        };

        let input = self.input;
        for param in params {
            let name = param.name.slice(input).to_ascii_lowercase();
            match name.as_slice() {
                b"transport" => aaa.transport = Some(self.token(&Transport::TABLE, self.value(param)?)?),
                b"protocol" => aaa.protocol = Some(self.token(&DiameterProtocol::TABLE, self.value(param)?)?),
                _ => return Err(self.unhandled(UriKind::DiameterUri, param)),
            }
        }
        Ok(aaa)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaLimits;
    use crate::types::tokens::KnownToken;

    fn sip_payload(input: &[u8]) -> UriPayload {
        // sip:alice@example.com:5070;transport=tcp;lr
        UriPayload::Sip {
            secure: false,
            user: Some(InputSpan::of(input, &input[4..9])),
            password: None,
            host: InputSpan::of(input, &input[10..21]),
            port: Some(InputSpan::of(input, &input[22..26])),
            params: vec![
                UriParam {
                    name: InputSpan::of(input, &input[27..36]),
                    value: Some(InputSpan::of(input, &input[37..40])),
                },
                UriParam {
                    name: InputSpan::of(input, &input[41..43]),
                    value: None,
                },
            ],
            headers: None,
        }
    }

    #[test]
    fn test_probe_allocates_nothing() {
        let input = b"sip:alice@example.com:5070;transport=tcp;lr";
        let payload = sip_payload(input);
        let mut slot = None;

        let built = dispatch(UriKind::SipUrl, &payload, input, 1, None, UriTarget::Probe(&mut slot)).unwrap();
        assert!(built.is_none());
        assert_eq!(slot, Some(UriKind::SipUrl));
    }

    #[test]
    fn test_build_sip_url() {
        let input = b"sip:alice@example.com:5070;transport=tcp;lr";
        let payload = sip_payload(input);
        let mut arena = Pool::new("dst", ArenaLimits::default());
        let page = arena.get_page().unwrap();

        let value = dispatch(
            UriKind::SipUrl,
            &payload,
            input,
            1,
            None,
            UriTarget::Build {
                arena: &mut arena,
                page,
            },
        )
        .unwrap()
        .unwrap();

        let url = value.as_sip().unwrap();
        assert_eq!(arena.str(url.user.unwrap()), Some("alice"));
        assert_eq!(arena.str(url.host.unwrap()), Some("example.com"));
        assert_eq!(url.port, Some(5070));
        assert_eq!(url.transport, Some(FieldValue::Enumerated(KnownToken::Transport(Transport::Tcp))));
        assert_eq!(url.lr, Some(LrParam::Empty));
    }

    #[test]
    fn test_mismatched_tag_is_unknown() {
        let input = b"sip:alice@example.com:5070;transport=tcp;lr";
        let payload = sip_payload(input);
        let mut slot = None;
        let err = dispatch(UriKind::TelUri, &payload, input, 1, None, UriTarget::Probe(&mut slot)).unwrap_err();
        assert!(matches!(err, Error::Unknown(_)));
        assert_eq!(slot, None);
    }
}
