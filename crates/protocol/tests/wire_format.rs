//! Byte-level properties of the SLF4Fx wire format.
//!
//! These tests pin the framing guarantees that connection drivers rely on:
//! decoding consumes exactly one message's bytes, every strictly shorter
//! prefix of a valid message reads as "wait for more", and arbitrary
//! well-formed field values survive an encode/decode round trip.

use proptest::prelude::*;
use protocol::{
    DecodeOutcome, InboundMessage, LogLevel, MessageTag, POLICY_FILE_REQUEST, decode_message,
    encode_access_request, encode_log_record,
};

fn expect_message(buf: &[u8]) -> (InboundMessage, usize) {
    match decode_message(buf) {
        DecodeOutcome::Message { message, consumed } => (message, consumed),
        other => panic!("expected a message, got {other:?}"),
    }
}

fn level_strategy() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Error),
        Just(LogLevel::Warn),
        Just(LogLevel::Info),
        Just(LogLevel::Debug),
    ]
}

proptest! {
    #[test]
    fn access_request_round_trips(
        application_id in ".{0,48}",
        secret in ".{0,48}",
    ) {
        let mut bytes = Vec::new();
        encode_access_request(&mut bytes, &application_id, &secret).expect("short fields encode");

        let (message, consumed) = expect_message(&bytes);
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(
            message,
            InboundMessage::AccessRequest {
                application_id,
                secret,
            }
        );
    }

    #[test]
    fn log_record_round_trips(
        category in "[a-zA-Z0-9._-]{0,32}",
        level in level_strategy(),
        text in ".{0,128}",
    ) {
        let mut bytes = Vec::new();
        encode_log_record(&mut bytes, &category, level, &text).expect("short fields encode");

        let (message, consumed) = expect_message(&bytes);
        prop_assert_eq!(consumed, bytes.len());
        prop_assert_eq!(
            message,
            InboundMessage::LogRecord {
                category,
                level,
                message: text,
            }
        );
    }

    #[test]
    fn every_split_point_of_a_log_record_is_incomplete(
        category in "[a-z]{1,8}",
        level in level_strategy(),
        text in ".{0,32}",
    ) {
        let mut bytes = Vec::new();
        encode_log_record(&mut bytes, &category, level, &text).expect("short fields encode");

        let (full, consumed) = expect_message(&bytes);
        prop_assert_eq!(consumed, bytes.len());

        for split in 0..bytes.len() {
            prop_assert_eq!(
                decode_message(&bytes[..split]),
                DecodeOutcome::Incomplete,
                "prefix of {} bytes must not decode",
                split
            );
        }

        // Appending unrelated bytes must not change the decoded message or
        // the consumed count.
        bytes.extend_from_slice(&[0xDE, 0xAD]);
        let (redecoded, reconsumed) = expect_message(&bytes);
        prop_assert_eq!(redecoded, full);
        prop_assert_eq!(reconsumed, consumed);
    }

    #[test]
    fn unknown_leading_bytes_fail_independently_of_the_remainder(
        lead in any::<u8>(),
        tail in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        prop_assume!(MessageTag::from_u8(lead).is_none_or(|tag| !tag.is_inbound()));

        let mut buf = vec![lead];
        buf.extend_from_slice(&tail);
        prop_assert_eq!(decode_message(&buf), DecodeOutcome::UnrecognizedTag(lead));
    }
}

#[test]
fn canonical_access_request_byte_layout() {
    let bytes = [
        0x01, 0x00, 0x03, b'a', b'p', b'p', 0x00, 0x03, b's', b'e', b'c',
    ];
    let (message, consumed) = expect_message(&bytes);
    assert_eq!(consumed, bytes.len());
    assert_eq!(
        message,
        InboundMessage::AccessRequest {
            application_id: "app".to_owned(),
            secret: "sec".to_owned(),
        }
    );
}

#[test]
fn policy_request_decodes_from_the_exact_literal_only() {
    let (message, consumed) = expect_message(POLICY_FILE_REQUEST);
    assert_eq!(message, InboundMessage::PolicyFileRequest);
    assert_eq!(consumed, POLICY_FILE_REQUEST.len());

    let mut corrupted = POLICY_FILE_REQUEST.to_vec();
    corrupted[22] = b'!';
    assert!(matches!(
        decode_message(&corrupted),
        DecodeOutcome::Malformed(_)
    ));
}
