use std::io::{Cursor, Write};

use adapters::{FeedSource, ReplaySource, SourceError};
use corelib::models::{EventId, EventKind, FeedKind};

const LOG: &str = r#"{"id":1,"subject":"SOL","actor":"A","kind":"buy","payload":{"type":"transaction","wallet_address":"a","emoji":"🐋","amount":5,"value_usd":1.5},"observed_at_ms":10}

{"id":2,"subject":"SOL","actor":"B","kind":"sell","payload":{"type":"transaction","wallet_address":"b","emoji":"🦈","amount":7,"value_usd":2.0},"observed_at_ms":20}
"#;

#[tokio::test]
async fn replays_lines_in_order_and_skips_blanks() {
    let mut src = ReplaySource::new(FeedKind::Transactions, Cursor::new(LOG));

    let first = src.next_batch().await.unwrap().unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].id, EventId(1));
    assert_eq!(first[0].kind, EventKind::Buy);

    let second = src.next_batch().await.unwrap().unwrap();
    assert_eq!(second[0].actor, "B");

    assert!(src.next_batch().await.unwrap().is_none());
}

#[tokio::test]
async fn bad_line_reports_line_number_then_continues() {
    let log = format!("not json\n{}", LOG);
    let mut src = ReplaySource::new(FeedKind::Transactions, Cursor::new(log));

    match src.next_batch().await {
        Err(SourceError::Decode { line, .. }) => assert_eq!(line, 1),
        other => panic!("expected decode error, got {other:?}"),
    }

    let next = src.next_batch().await.unwrap().unwrap();
    assert_eq!(next[0].id, EventId(1));
}

#[tokio::test]
async fn invalid_utf8_is_a_numbered_decode_error() {
    let mut log = b"\xff\xfe bad\nnot json\n".to_vec();
    log.extend_from_slice(LOG.as_bytes());
    let mut src = ReplaySource::new(FeedKind::Transactions, Cursor::new(log));

    for expected in [1, 2] {
        match src.next_batch().await {
            Err(SourceError::Decode { line, .. }) => assert_eq!(line, expected),
            other => panic!("expected decode error on line {expected}, got {other:?}"),
        }
    }

    let next = src.next_batch().await.unwrap().unwrap();
    assert_eq!(next[0].id, EventId(1));
}

#[tokio::test]
async fn opens_log_from_disk() {
    let path = std::env::temp_dir().join(format!("hotfeed-replay-{}.jsonl", std::process::id()));
    {
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(LOG.as_bytes()).unwrap();
    }

    let mut src = ReplaySource::open(FeedKind::Transactions, &path).unwrap();
    assert_eq!(src.feed(), FeedKind::Transactions);
    assert!(src.next_batch().await.unwrap().is_some());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let err = ReplaySource::open(FeedKind::Posts, "/definitely/not/here.jsonl")
        .err()
        .expect("open must fail");
    assert!(matches!(err, SourceError::Io(_)));
}
