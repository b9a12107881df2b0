//! End-to-end parses through the orchestrator.

use rvoip_sip_parse_core::prelude::*;
use rvoip_sip_parse_core::types::tokens::{Method, Transport};
use rvoip_sip_parse_core::{ExtensionSlot, GrammarEngine, ParseContext, StartLine};

fn message_from(input: &[u8]) -> (Message, Result<()>) {
    let mut parser = SipParser::default();
    let mut message = Message::new(ArenaLimits::default()).unwrap();
    let result = parser.parse_message(input, &mut message);
    (message, result)
}

#[test]
fn via_header_in_message() {
    let (message, result) = message_from(b"Via: SIP/2.0/UDP host.example.com:5060;branch=z9hG4bK1;ttl=16");
    result.unwrap();

    let via = message.first(HeaderType::Via).unwrap();
    assert_eq!(
        via.token(FieldKey::Transport),
        Some(FieldValue::Enumerated(KnownToken::Transport(Transport::Udp)))
    );
    assert_eq!(via.text(FieldKey::Host), Some("host.example.com"));
    assert_eq!(via.number(FieldKey::Port), Some(5060));
    assert_eq!(via.text(FieldKey::Branch), Some("z9hG4bK1"));
    assert_eq!(via.number(FieldKey::Ttl), Some(16));
    assert!(!via.has(FieldKey::OtherParams));
}

#[test]
fn contact_star_builds_no_address() {
    let (message, result) = message_from(b"Contact: *");
    result.unwrap();

    let contact = message.first(HeaderType::Contact).unwrap();
    assert!(contact.is_star());
    assert!(contact.address().is_none());
    assert_eq!(contact.field_count(), 0);
}

#[test]
fn leftover_bytes_in_message_are_syntax_errors() {
    let mut parser = SipParser::default();
    let mut message = Message::new(ArenaLimits::default()).unwrap();
    let err = parser
        .start_parsing(
            ParseRequest::new(ParseType::Message)
                .buffer(b"Max-Forwards: 70 abc")
                .line(7)
                .destination(Destination::Message(&mut message)),
        )
        .unwrap_err();

    assert_eq!(err, Error::IllegalSyntax { line: 7, column: 17 });
    assert!(message.is_empty());

    let (_, result) = message_from(b"Via: SIP/2.0/UDP h.example.com;branch=1 x");
    assert!(result.unwrap_err().is_syntax());
}

#[test]
fn compact_bare_name_gives_empty_header() {
    let mut parser = SipParser::default();
    let mut header = StandaloneHeader::new(HeaderType::Supported, ArenaLimits::default()).unwrap();
    parser
        .start_parsing(
            ParseRequest::new(ParseType::Header(HeaderType::Supported))
                .buffer(b"k")
                .specific_header(HeaderType::Supported)
                .compact_form(true)
                .destination(Destination::Header(&mut header)),
        )
        .unwrap();

    let view = header.view();
    assert_eq!(view.header_type(), HeaderType::Supported);
    assert!(view.is_compact());
    assert_eq!(view.wire_name(), "k");
    assert_eq!(view.field_count(), 0);
}

/// Fills both accumulators, then reports an exhausted arena
struct ExhaustingEngine;

impl GrammarEngine for ExhaustingEngine {
    fn run(&self, ctx: &mut ParseContext<'_>) {
        if let Err(err) = ctx.append_extension(ExtensionSlot::Header, b"foo=bar") {
            ctx.fail_reduction(err);
            return;
        }
        if let Err(err) = ctx.append_extension(ExtensionSlot::Url, b"baz") {
            ctx.fail_reduction(err);
            return;
        }
        assert_eq!(ctx.scratch().pages_in_use(), 2);
        ctx.fail_reduction(Error::OutOfResources("destination arena exhausted".to_string()));
    }
}

#[test]
fn out_of_resources_passes_through_and_releases_accumulators() {
    let mut parser = SipParser::with_engine(ParserConfig::default(), ExhaustingEngine);
    let mut message = Message::new(ArenaLimits::default()).unwrap();

    let err = parser.parse_message(b"Via: anything", &mut message).unwrap_err();
    assert_eq!(err, Error::OutOfResources("destination arena exhausted".to_string()));
    assert_eq!(parser.scratch_pool().pages_in_use(), 0);
}

#[test]
fn exhausted_destination_arena_releases_accumulators() {
    let mut parser = SipParser::default();
    let mut message = Message::new(ArenaLimits::new(16, 1)).unwrap();

    let err = parser
        .parse_message(
            b"Contact: <sip:alice@example.com;foo=bar>;x=y;expires=60",
            &mut message,
        )
        .unwrap_err();
    assert!(matches!(err, Error::OutOfResources(_)));
    assert_eq!(parser.scratch_pool().pages_in_use(), 0);
}

#[test]
fn missing_buffer_or_destination() {
    let mut parser = SipParser::default();
    let mut address = StandaloneAddress::new(ArenaLimits::default()).unwrap();

    let err = parser
        .start_parsing(ParseRequest::new(ParseType::Address).destination(Destination::Address(&mut address)))
        .unwrap_err();
    assert!(matches!(err, Error::NullPointer(_)));

    let err = parser
        .start_parsing(ParseRequest::new(ParseType::Address).buffer(b"sip:a@b"))
        .unwrap_err();
    assert!(matches!(err, Error::NullPointer(_)));
    assert!(address.address().is_none());
}

#[test]
fn request_line_and_headers() {
    let input = b"INVITE sip:bob@biloxi.example.com;transport=tcp SIP/2.0\r\n\
                  Via: SIP/2.0/TCP client.atlanta.example.com:5060;branch=z9hG4bK74b43\r\n\
                  Max-Forwards: 70\r\n\
                  From: \"Alice\" <sip:alice@atlanta.example.com>;tag=9fxced76sl\r\n\
                  To: Bob <sip:bob@biloxi.example.com>\r\n\
                  Call-ID: 3848276298220188511@atlanta.example.com\r\n\
                  CSeq: 1 INVITE\r\n\
                  Content-Length: 0\r\n\
                  \r\n";
    let (message, result) = message_from(input);
    result.unwrap();

    match message.start_line() {
        Some(StartLine::Request { method, uri, version }) => {
            assert_eq!(method.token(), Some(KnownToken::Method(Method::Invite)));
            let url = uri.as_sip().unwrap();
            assert_eq!(message.resolve(url.host.unwrap()), Some("biloxi.example.com"));
            assert_eq!(
                url.transport,
                Some(FieldValue::Enumerated(KnownToken::Transport(Transport::Tcp)))
            );
            assert_eq!(message.resolve(*version), Some("SIP/2.0"));
        }
        other => panic!("expected a request line, got {:?}", other),
    }

    assert_eq!(message.len(), 7);
    let from = message.first(HeaderType::From).unwrap();
    assert_eq!(from.text(FieldKey::Tag), Some("9fxced76sl"));
    let display = from.address().unwrap().display_name.unwrap();
    assert_eq!(from.resolve(display), Some("\"Alice\""));

    let cseq = message.first(HeaderType::CSeq).unwrap();
    assert_eq!(cseq.number(FieldKey::Sequence), Some(1));
    assert_eq!(cseq.text(FieldKey::Method), Some("INVITE"));
    assert_eq!(
        message.first(HeaderType::CallId).unwrap().text(FieldKey::Value),
        Some("3848276298220188511@atlanta.example.com")
    );
    assert_eq!(message.first(HeaderType::ContentLength).unwrap().number(FieldKey::Value), Some(0));
}

#[test]
fn status_line() {
    let (message, result) = message_from(b"SIP/2.0 486 Busy Here\r\nContent-Length: 0\r\n");
    result.unwrap();
    match message.start_line() {
        Some(StartLine::Status { code, reason, .. }) => {
            assert_eq!(*code, 486);
            assert_eq!(message.resolve(*reason), Some("Busy Here"));
        }
        other => panic!("expected a status line, got {:?}", other),
    }
}

#[test]
fn extension_parameters_are_joined() {
    let (message, result) = message_from(
        b"Via: SIP/2.0/UDP h.example.com;branch=z9hG4bK1;foo=bar;baz\r\n\
          Contact: <sip:carol@chicago.example.com;x=1;y>;expires=3600;+sip.instance=\"<urn:1>\"\r\n",
    );
    result.unwrap();

    let via = message.first(HeaderType::Via).unwrap();
    assert_eq!(via.text(FieldKey::OtherParams), Some("foo=bar;baz"));

    let contact = message.first(HeaderType::Contact).unwrap();
    assert_eq!(contact.number(FieldKey::Expires), Some(3600));
    assert_eq!(contact.text(FieldKey::OtherParams), Some("+sip.instance=\"<urn:1>\""));
    let url = contact.address().unwrap().uri.as_sip().unwrap();
    assert_eq!(contact.resolve(url.other_params.unwrap()), Some("x=1;y"));
}

#[test]
fn unknown_methods_and_headers_keep_their_bytes() {
    let (message, result) = message_from(b"CSeq: 2 FOOBAR\r\nX-Custom-Header: some value ; with stuff\r\n");
    result.unwrap();

    let cseq = message.first(HeaderType::CSeq).unwrap();
    let method = cseq.token(FieldKey::Method).unwrap();
    assert!(method.token().is_none());
    assert_eq!(cseq.resolve(method.other().unwrap()), Some("FOOBAR"));

    let other = message.first(HeaderType::Other).unwrap();
    assert_eq!(other.name(), "X-Custom-Header");
    assert_eq!(other.text(FieldKey::Value), Some("some value ; with stuff"));
}

#[test]
fn number_overflow_is_syntax() {
    let (_, result) = message_from(b"Max-Forwards: 99999999999999999999");
    assert!(result.unwrap_err().is_syntax());

    let (_, result) = message_from(b"Via: SIP/2.0/UDP h.example.com;ttl=256");
    assert!(result.unwrap_err().is_syntax());
}

#[test]
fn folded_header_value() {
    let (message, result) = message_from(b"Subject: lunch\r\n  tomorrow\r\nMax-Forwards: 10\r\n");
    result.unwrap();
    assert_eq!(
        message.first(HeaderType::Subject).unwrap().text(FieldKey::Value),
        Some("lunch\r\n  tomorrow")
    );
    assert_eq!(message.len(), 2);
}

#[test]
fn standalone_address_and_probe() {
    let mut parser = SipParser::default();
    let mut address = StandaloneAddress::new(ArenaLimits::default()).unwrap();
    parser
        .parse_address(b"\"Bob\" <tel:+1-201-555-0123;ext=42;foo>", &mut address)
        .unwrap();

    assert_eq!(address.uri_kind(), Some(UriKind::TelUri));
    let tel = address.address().unwrap().uri.as_tel().unwrap();
    assert!(tel.global);
    assert_eq!(address.arena().str(tel.extension.unwrap()), Some("42"));
    assert_eq!(address.arena().str(tel.other_params.unwrap()), Some("foo"));
    assert_eq!(address.encode().as_deref(), Some("\"Bob\" <tel:+1-201-555-0123;ext=42;foo>"));

    assert_eq!(parser.probe_uri_type(b"pres:alice@example.com").unwrap(), UriKind::AbsoluteUri);
    assert_eq!(parser.scratch_pool().pages_in_use(), 0);
}

#[test]
fn authorization_with_aka_algorithm() {
    let mut parser = SipParser::default();
    let mut header = StandaloneHeader::new(HeaderType::Authorization, ArenaLimits::default()).unwrap();
    parser
        .parse_header_value(
            b"Digest username=\"alice@ims.example.com\", realm=\"ims.example.com\", \
              nonce=\"abc\", uri=\"sip:ims.example.com\", response=\"\", algorithm=AKAv1-MD5",
            &mut header,
            false,
        )
        .unwrap();

    let view = header.view();
    assert_eq!(view.text(FieldKey::AuthScheme), Some("Digest"));
    assert_eq!(view.number(FieldKey::AkaVersion), Some(1));
    assert_eq!(view.text(FieldKey::Algorithm), Some("MD5"));
    assert_eq!(view.text(FieldKey::Username), Some("\"alice@ims.example.com\""));
}

#[test]
fn message_text_larger_than_one_page() {
    let mut input = Vec::new();
    for n in 0..60 {
        input.extend_from_slice(format!("X-Header-{}: {}\r\n", n, "v".repeat(80)).as_bytes());
    }
    let limits = ArenaLimits::default();
    assert!(input.len() > limits.page_capacity);

    let mut parser = SipParser::default();
    let mut message = Message::new(limits).unwrap();
    parser.parse_message(&input, &mut message).unwrap();

    assert_eq!(message.len(), 60);
    assert!(message.arena().pages_in_use() > 1);
    let last = message.header(59).unwrap();
    assert_eq!(last.name(), "X-Header-59");
    assert_eq!(last.text(FieldKey::Value), Some("v".repeat(80).as_str()));
}

#[test]
fn valueless_token_params_become_extensions() {
    let (message, result) = message_from(
        b"Via: SIP/2.0/UDP h.example.com;branch=z9hG4bK1;comp\r\n\
          Security-Client: ipsec-3gpp;alg;spi-c=1111\r\n\
          Subscription-State: terminated;reason\r\n",
    );
    result.unwrap();

    let via = message.first(HeaderType::Via).unwrap();
    assert!(!via.has(FieldKey::Comp));
    assert_eq!(via.text(FieldKey::OtherParams), Some("comp"));

    let security = message.first(HeaderType::SecurityClient).unwrap();
    assert_eq!(security.text(FieldKey::OtherParams), Some("alg"));

    let state = message.first(HeaderType::SubscriptionState).unwrap();
    assert_eq!(state.text(FieldKey::OtherParams), Some("reason"));
}

#[test]
fn standalone_targets_can_be_parsed_into_repeatedly() {
    let mut parser = SipParser::default();
    let mut header = StandaloneHeader::new(HeaderType::Subject, ArenaLimits::default()).unwrap();
    for n in 0..500 {
        let text = format!("Subject: message number {:04} with some padding text", n);
        parser.parse_header(text.as_bytes(), &mut header).unwrap();
    }
    let view = header.view();
    assert_eq!(view.text(FieldKey::Value), Some("message number 0499 with some padding text"));
    assert_eq!(view.field_count(), 1);
    assert_eq!(view.arena().pages_in_use(), 1);

    let mut address = StandaloneAddress::new(ArenaLimits::default()).unwrap();
    for n in 0..500 {
        let text = format!("<sip:user{}@host.example.com;x=1>", n);
        parser.parse_address(text.as_bytes(), &mut address).unwrap();
    }
    assert_eq!(address.encode().as_deref(), Some("<sip:user499@host.example.com;x=1>"));
    assert_eq!(address.arena().pages_in_use(), 1);
}
