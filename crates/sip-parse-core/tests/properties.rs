use proptest::prelude::*;
use rvoip_sip_parse_core::prelude::*;
use rvoip_sip_parse_core::{ExtensionAccumulator, Pool};

fn cseq(text: &str) -> (Message, Result<()>) {
    let mut parser = SipParser::default();
    let mut message = Message::new(ArenaLimits::default()).unwrap();
    let result = parser.parse_message(text.as_bytes(), &mut message);
    (message, result)
}

proptest! {
    /// Recognised methods are stored as enumerations, nothing is copied
    #[test]
    fn known_methods_are_enumerated(
        seq in 1u32..100_000,
        method in prop::sample::select(vec![
            "INVITE", "ACK", "BYE", "CANCEL", "REGISTER", "OPTIONS", "PRACK",
            "SUBSCRIBE", "NOTIFY", "PUBLISH", "INFO", "REFER", "MESSAGE", "UPDATE",
        ]),
    ) {
        let (message, result) = cseq(&format!("CSeq: {} {}", seq, method));
        prop_assert!(result.is_ok());

        let header = message.first(HeaderType::CSeq).unwrap();
        prop_assert_eq!(header.number(FieldKey::Sequence), Some(seq));
        let value = header.token(FieldKey::Method).unwrap();
        prop_assert!(value.token().is_some());
        prop_assert_eq!(value.token().map(|t| t.as_str()), Some(method));
    }

    /// Anything else keeps its exact bytes
    #[test]
    fn unknown_methods_are_copied(method in "XQ[A-Za-z]{1,10}") {
        let (message, result) = cseq(&format!("CSeq: 7 {}", method));
        prop_assert!(result.is_ok());

        let header = message.first(HeaderType::CSeq).unwrap();
        let value = header.token(FieldKey::Method).unwrap();
        prop_assert!(value.token().is_none());
        prop_assert_eq!(header.resolve(value.other().unwrap()), Some(method.as_str()));
    }

    #[test]
    fn numbers_in_range_are_stored(n in any::<u32>()) {
        let (message, result) = cseq(&format!("Max-Forwards: {}", n));
        prop_assert!(result.is_ok());
        prop_assert_eq!(message.first(HeaderType::MaxForwards).unwrap().number(FieldKey::Value), Some(n));
    }

    #[test]
    fn numbers_out_of_range_are_syntax_errors(n in (u64::from(u32::MAX) + 1)..u64::MAX) {
        let (_, result) = cseq(&format!("Max-Forwards: {}", n));
        prop_assert!(result.unwrap_err().is_syntax());
    }

    /// Extension parameters come back joined with `;`, in order
    #[test]
    fn extension_params_are_joined(names in prop::collection::vec("x[a-z]{1,6}", 1..6)) {
        let params: String = names.iter().map(|n| format!(";{}=1", n)).collect();
        let (message, result) = cseq(&format!("Via: SIP/2.0/UDP h.example.com{}", params));
        prop_assert!(result.is_ok());

        let expected = names.iter().map(|n| format!("{}=1", n)).collect::<Vec<_>>().join(";");
        let via = message.first(HeaderType::Via).unwrap();
        prop_assert_eq!(via.text(FieldKey::OtherParams), Some(expected.as_str()));
    }

    /// Releasing an accumulator is idempotent and always returns its page
    #[test]
    fn accumulator_release_is_idempotent(params in prop::collection::vec("[a-z]{1,8}=[a-z0-9]{0,8}", 0..10)) {
        let mut pool = Pool::new("scratch", ArenaLimits::default());
        let mut acc = ExtensionAccumulator::new();
        for param in &params {
            acc.append(&mut pool, param.as_bytes()).unwrap();
        }
        prop_assert_eq!(acc.len(), params.len());
        prop_assert_eq!(pool.pages_in_use(), usize::from(!params.is_empty()));

        acc.release(&mut pool);
        acc.release(&mut pool);
        prop_assert!(acc.is_empty());
        prop_assert_eq!(pool.pages_in_use(), 0);
        prop_assert!(!acc.holds_page());
    }
}
