//! The same header text yields the same object whatever the destination.

use rvoip_sip_parse_core::prelude::*;
use rvoip_sip_parse_core::HeaderSnapshot;

fn via_message(text: &[u8]) -> HeaderSnapshot {
    let mut parser = SipParser::default();
    let mut message = Message::new(ArenaLimits::default()).unwrap();
    parser.parse_message(text, &mut message).unwrap();
    assert_eq!(message.len(), 1);
    message.header(0).unwrap().snapshot()
}

fn via_list(text: &[u8]) -> HeaderSnapshot {
    let mut parser = SipParser::default();
    let mut list = HeaderList::new(ArenaLimits::default(), 8).unwrap();
    parser.parse_into_list(text, &mut list).unwrap();
    assert_eq!(list.len(), 1);
    list.get(0).unwrap().snapshot()
}

fn via_standalone(header_type: HeaderType, text: &[u8]) -> HeaderSnapshot {
    let mut parser = SipParser::default();
    let mut header = StandaloneHeader::new(header_type, ArenaLimits::default()).unwrap();
    parser.parse_header(text, &mut header).unwrap();
    header.view().snapshot()
}

#[test]
fn snapshots_agree_across_targets() {
    let cases: &[(HeaderType, &[u8])] = &[
        (HeaderType::Route, b"Route: <sip:p1.example.com;lr;x=1>;foo=bar"),
        (
            HeaderType::Via,
            b"Via: SIP/2.0/TLS edge.example.com:5061;branch=z9hG4bK77;received=192.0.2.1;rport",
        ),
        (HeaderType::To, b"t: \"Bob Smith\" <sip:bob@example.com>;tag=a6c85cf"),
        (HeaderType::ContentType, b"Content-Type: application/sdp"),
        (HeaderType::CSeq, b"CSeq: 4711 REGISTER"),
        (HeaderType::SessionExpires, b"Session-Expires: 1800;refresher=uac"),
    ];

    for (header_type, text) in cases {
        let from_message = via_message(text);
        assert_eq!(from_message.header_type, *header_type);
        assert_eq!(from_message, via_list(text), "list differs for {:?}", header_type);
        assert_eq!(
            from_message,
            via_standalone(*header_type, text),
            "standalone differs for {:?}",
            header_type
        );
    }
}

#[test]
fn compact_names_are_remembered() {
    let snapshot = via_message(b"t: <sip:bob@example.com>");
    assert!(snapshot.compact);
    assert_eq!(snapshot.address.as_deref(), Some("<sip:bob@example.com>"));
}

#[test]
fn value_only_parse_matches_full_header() {
    let mut parser = SipParser::default();
    let mut header = StandaloneHeader::new(HeaderType::Via, ArenaLimits::default()).unwrap();
    parser
        .parse_header_value(b"SIP/2.0/UDP pc33.example.com;branch=z9hG4bK776asdhds", &mut header, false)
        .unwrap();

    assert_eq!(
        header.view().snapshot(),
        via_message(b"Via: SIP/2.0/UDP pc33.example.com;branch=z9hG4bK776asdhds")
    );
}

#[test]
fn list_capacity_is_an_internal_error() {
    let mut parser = SipParser::default();
    let mut list = HeaderList::new(ArenaLimits::default(), 1).unwrap();

    let err = parser
        .parse_into_list(b"Route: <sip:p1.example.com;lr>, <sip:p2.example.com;lr>", &mut list)
        .unwrap_err();
    assert!(matches!(err, Error::Unknown(_)));
    assert_eq!(list.len(), 1);
    assert_eq!(parser.scratch_pool().pages_in_use(), 0);
}

#[test]
fn list_keeps_every_value() {
    let mut parser = SipParser::default();
    let mut list = HeaderList::new(ArenaLimits::default(), 8).unwrap();
    parser
        .parse_into_list(
            b"Record-Route: <sip:p1.example.com;lr>, <sip:p2.example.com;lr>\r\nAllow: INVITE, ACK, BYE\r\n",
            &mut list,
        )
        .unwrap();

    let types: Vec<_> = list.iter().map(|h| h.header_type()).collect();
    assert_eq!(
        types,
        vec![
            HeaderType::RecordRoute,
            HeaderType::RecordRoute,
            HeaderType::Allow,
            HeaderType::Allow,
            HeaderType::Allow,
        ]
    );
    assert_eq!(list.get(4).unwrap().text(FieldKey::Method), Some("BYE"));
}

#[test]
fn standalone_type_mismatch_is_syntax() {
    let mut parser = SipParser::default();
    let mut header = StandaloneHeader::new(HeaderType::Via, ArenaLimits::default()).unwrap();

    let err = parser
        .parse_header(b"Contact: <sip:alice@example.com>", &mut header)
        .unwrap_err();
    assert!(err.is_syntax());
    assert_eq!(header.view().field_count(), 0);
}

#[test]
fn wrong_destination_for_parse_type() {
    let mut parser = SipParser::default();
    let mut message = Message::new(ArenaLimits::default()).unwrap();

    let err = parser
        .start_parsing(
            ParseRequest::new(ParseType::HeaderList)
                .buffer(b"Max-Forwards: 70")
                .destination(Destination::Message(&mut message)),
        )
        .unwrap_err();
    assert!(matches!(err, Error::Unknown(_)));
    assert!(message.is_empty());
}
