//! Session tests against a scripted in-memory dock.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

use as111_dock::{Capability, DockError, DockSession, SessionOptions};
use as111_transport::protocol::{build_request, cmd};
use as111_transport::{BdAddr, MemoryTransport, ParseError, TransportError};

type SentLog = Arc<Mutex<Vec<Vec<u8>>>>;

fn address() -> BdAddr {
    "00:1A:7D:DA:71:13".parse().unwrap()
}

/// Attach a scripted transport and return the session plus its send log
fn session_with(
    options: SessionOptions,
    script: impl FnOnce(MemoryTransport) -> MemoryTransport,
) -> (DockSession, SentLog) {
    let transport = script(MemoryTransport::new(address()));
    let sent = transport.sent_log();
    let mut session = DockSession::new(address(), options);
    session.attach(Box::new(transport));
    (session, sent)
}

fn afternoon() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(14, 5, 9)
        .unwrap()
}

#[test]
fn refresh_reads_all_fields_in_order() {
    let (mut session, sent) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(1, cmd::QUERY_NAME, b"AS111\0\0"))
            .reply(build_request(2, cmd::QUERY_VERSION, b"V1.02"))
            .reply(build_request(3, cmd::QUERY_VOLUME, &[0, 12]))
            .reply(build_request(
                4,
                cmd::QUERY_CAPABILITIES,
                &[0, 0, 0, 0, 0x01, 0x00, 0x00, 0x05],
            ))
    });

    session.refresh_device_info().unwrap();

    assert_eq!(
        *sent.lock(),
        vec![
            vec![153, 3, 1, 8, 248],
            vec![153, 3, 2, 19, 237],
            vec![153, 4, 3, 15, 0, 241],
            vec![153, 3, 4, 6, 250],
        ]
    );

    let device = session.device();
    assert_eq!(device.mac(), "00:1A:7D:DA:71:13");
    assert_eq!(device.name, "AS111");
    assert_eq!(device.version, "V1.02");
    assert_eq!(device.volume, 12);
    assert_eq!(
        device.capabilities.labels(),
        vec!["0-VOLUME", "2-DBB", "24-DOCK_ALARM_LED"]
    );
    assert_eq!(session.sequence(), 4);
}

#[test]
fn refresh_keeps_going_after_a_timeout() {
    let (mut session, sent) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(1, cmd::QUERY_NAME, b"AS111"))
            .timeout()
            .reply(build_request(3, cmd::QUERY_VOLUME, &[0, 20]))
            .timeout()
    });

    session.refresh_device_info().unwrap();

    let device = session.device();
    assert_eq!(device.name, "AS111");
    assert_eq!(device.version, "");
    assert_eq!(device.volume, 20);
    assert!(device.capabilities.is_empty());
    // A failed exchange still consumes its sequence number
    assert_eq!(sent.lock().len(), 4);
    assert_eq!(session.sequence(), 4);
}

#[test]
fn short_capability_response_leaves_set_empty() {
    let (mut session, _) = session_with(SessionOptions::default(), |t| {
        t.reply(vec![153, 5, 1, 6, 0, 0, 0])
    });

    let err = session.query_capabilities().unwrap_err();
    assert!(matches!(
        err,
        DockError::Decode(ParseError::TooShort { .. })
    ));
    assert!(session.device().capabilities.is_empty());
}

#[test]
fn set_volume_sends_frame_and_updates_state() {
    let (mut session, sent) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(1, cmd::SET, &[0]))
    });

    session.set_volume(8).unwrap();

    assert_eq!(*sent.lock(), vec![vec![153, 5, 1, 17, 0, 8, 231]]);
    assert_eq!(session.device().volume, 8);
}

#[test]
fn set_volume_rejects_out_of_range() {
    let (mut session, sent) = session_with(SessionOptions::default(), |t| t);

    let err = session.set_volume(33).unwrap_err();
    assert!(matches!(err, DockError::InvalidParameter(_)));
    assert!(sent.lock().is_empty());
    assert_eq!(session.sequence(), 0);
}

#[test]
fn set_volume_failure_keeps_previous_value() {
    let (mut session, _) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(1, cmd::QUERY_VOLUME, &[0, 12])).timeout()
    });

    session.query_volume().unwrap();
    let err = session.set_volume(30).unwrap_err();
    assert!(matches!(err, DockError::Transport(TransportError::Timeout)));
    assert_eq!(session.device().volume, 12);
}

#[test]
fn alarm_led_payloads() {
    let (mut session, sent) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(1, cmd::SET, &[0]))
            .reply(build_request(2, cmd::SET, &[0]))
    });

    session.set_alarm_led(true).unwrap();
    session.set_alarm_led(false).unwrap();

    assert_eq!(
        *sent.lock(),
        vec![
            vec![153, 5, 1, 17, 24, 1, 214],
            vec![153, 5, 2, 17, 24, 0, 215],
        ]
    );
}

#[test]
fn sync_time_records_display_string() {
    let (mut session, sent) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(1, cmd::SET, &[0]))
    });

    let shown = session.sync_time(afternoon()).unwrap().to_string();

    assert_eq!(shown, "2024-03-05 14:05:09");
    assert_eq!(session.device().datetime, "2024-03-05 14:05:09");
    assert_eq!(
        *sent.lock(),
        vec![vec![153, 11, 1, 17, 8, 20, 24, 2, 5, 14, 5, 9, 152]]
    );
}

#[test]
fn sync_time_without_reply_leaves_datetime_unset() {
    let (mut session, _) = session_with(SessionOptions::default(), |t| t.timeout());

    assert!(session.sync_time(afternoon()).is_err());
    assert_eq!(session.device().datetime, "");
}

#[test]
fn checksum_validation_is_opt_in() {
    let mut corrupt = build_request(1, cmd::QUERY_VOLUME, &[0, 12]);
    *corrupt.last_mut().unwrap() ^= 0xFF;

    let (mut lenient, _) =
        session_with(SessionOptions::default(), |t| t.reply(corrupt.clone()));
    assert_eq!(lenient.query_volume().unwrap(), 12);

    let strict = SessionOptions {
        validate_checksum: true,
        ..SessionOptions::default()
    };
    let (mut session, _) = session_with(strict, |t| t.reply(corrupt));
    let err = session.query_volume().unwrap_err();
    assert!(matches!(
        err,
        DockError::Decode(ParseError::ChecksumMismatch { command: 15, .. })
    ));
    assert_eq!(session.device().volume, 0);
}

#[test]
fn operations_before_connect_fail() {
    let mut session = DockSession::new(address(), SessionOptions::default());

    assert!(!session.is_connected());
    assert!(matches!(session.query_identity(), Err(DockError::NotConnected)));
    assert!(matches!(session.set_alarm_led(true), Err(DockError::NotConnected)));
    assert!(matches!(
        session.refresh_device_info(),
        Err(DockError::NotConnected)
    ));
    assert_eq!(session.sequence(), 0);
}

#[test]
fn disconnect_is_idempotent() {
    let (mut session, _) = session_with(SessionOptions::default(), |t| t);

    assert!(session.is_connected());
    session.disconnect();
    session.disconnect();
    assert!(!session.is_connected());
    assert!(matches!(session.query_volume(), Err(DockError::NotConnected)));
}

#[test]
fn capability_lookup_after_query() {
    let (mut session, _) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(
            1,
            cmd::QUERY_CAPABILITIES,
            &[0, 0, 0, 0, 0x01, 0x00, 0x01, 0x00],
        ))
    });

    let caps = session.query_capabilities().unwrap();
    assert!(caps.contains(Capability::DockAlarmLed));
    assert!(caps.contains(Capability::DateTime));
    assert_eq!(caps.len(), 2);
}

#[test]
fn refresh_stops_when_the_link_drops() {
    let (mut session, sent) = session_with(SessionOptions::default(), |t| {
        t.reply(build_request(1, cmd::QUERY_NAME, b"AS111")).disconnect()
    });

    let err = session.refresh_device_info().unwrap_err();

    assert!(matches!(
        err,
        DockError::Transport(TransportError::Disconnected)
    ));
    assert_eq!(session.device().name, "AS111");
    // Volume and capability queries were never sent
    assert_eq!(
        *sent.lock(),
        vec![vec![153, 3, 1, 8, 248], vec![153, 3, 2, 19, 237]]
    );
}

#[test]
fn mac_label_keeps_the_typed_form() {
    let session = DockSession::new(address(), SessionOptions::default());
    assert_eq!(session.device().mac(), "00:1A:7D:DA:71:13");

    let session = DockSession::new(address(), SessionOptions::default())
        .with_mac_label("00:1a:7d:da:71:13");
    assert_eq!(session.device().mac(), "00:1a:7d:da:71:13");
    assert_eq!(session.address(), address());
}
