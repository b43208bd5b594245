//! Partial-match accounting: count every partially matched record, emit only the first

use delimrow::{LogOnce, PartialMatchSink, RowDecoder, SchemaDescriptor};
use delimrow_decode::report::PartialMatch;

fn recording_decoder() -> RowDecoder<LogOnce<Vec<String>>> {
    let schema =
        SchemaDescriptor::build(&["id", "name", "score"], &["int", "string", "double"]).unwrap();
    RowDecoder::with_sink(schema, "||", LogOnce::with_emitter(Vec::<String>::new())).unwrap()
}

#[test]
fn test_two_failures_log_once_count_twice() {
    let mut decoder = recording_decoder();
    assert!(decoder.decode("7||alice||bad").row().is_some());
    assert!(decoder.decode("x||bob||1.0").row().is_some());

    assert_eq!(decoder.partial_match_count(), 2);
    assert_eq!(decoder.sink().emitter().len(), 1);
}

#[test]
fn test_first_event_message() {
    let mut decoder = recording_decoder();
    decoder.decode("7||alice||bad");
    assert_eq!(
        decoder.sink().emitter()[0],
        "1 partially unmatched rows are found, cannot find group 2: 7||alice||bad"
    );
}

#[test]
fn test_many_bad_fields_count_once_per_record() {
    let mut decoder = recording_decoder();
    let row = decoder.decode("a||b||c").row().unwrap();
    assert!(row[0].is_null());
    assert!(!row[1].is_null());
    assert!(row[2].is_null());

    assert_eq!(decoder.partial_match_count(), 1);
    // The first failing column is the one reported.
    assert!(decoder.sink().emitter()[0].contains("cannot find group 0"));
}

#[test]
fn test_clean_and_skipped_records_do_not_count() {
    let mut decoder = recording_decoder();
    decoder.decode("1||a||1.0");
    decoder.decode("1||a");
    decoder.decode("2||b||2.0||extra");

    assert_eq!(decoder.partial_match_count(), 0);
    assert!(decoder.sink().emitter().is_empty());
    assert!(!decoder.sink().has_logged());
}

#[test]
fn test_counter_is_per_instance() {
    let mut first = recording_decoder();
    let mut second = recording_decoder();

    first.decode("bad||a||1.0");
    first.decode("bad||a||1.0");
    second.decode("bad||a||1.0");

    assert_eq!(first.partial_match_count(), 2);
    assert_eq!(second.partial_match_count(), 1);
    assert_eq!(first.sink().emitter().len(), 1);
    assert_eq!(second.sink().emitter().len(), 1);
}

#[test]
fn test_later_events_are_silent_after_first() {
    let mut decoder = recording_decoder();
    for i in 0..100 {
        decoder.decode(&format!("{}||name||not-a-number", i));
    }
    assert_eq!(decoder.partial_match_count(), 100);
    assert_eq!(decoder.sink().emitter().len(), 1);
    assert!(decoder.sink().emitter()[0].starts_with("1 partially unmatched rows"));
}

/// A sink that keeps every event, to check what the decoder reports.
#[derive(Default)]
struct KeepAll {
    events: Vec<(usize, String)>,
}

impl PartialMatchSink for KeepAll {
    fn record(&mut self, column: usize, record: &str) {
        self.events.push((column, record.to_string()));
    }

    fn count(&self) -> u64 {
        self.events.len() as u64
    }
}

#[test]
fn test_custom_sink_receives_each_partial_match() {
    let schema = SchemaDescriptor::build(&["a", "b"], &["int", "int"]).unwrap();
    let mut decoder = RowDecoder::with_sink(schema, "::", KeepAll::default()).unwrap();

    decoder.decode("1::x");
    decoder.decode("1::2");
    decoder.decode("y::z");

    assert_eq!(
        decoder.sink().events,
        vec![(1, "1::x".to_string()), (0, "y::z".to_string())]
    );
    assert_eq!(decoder.partial_match_count(), 2);
}

#[test]
fn test_partial_match_display() {
    let event = PartialMatch {
        count: 12,
        column: 3,
        record: "a|b",
    };
    assert_eq!(
        event.to_string(),
        "12 partially unmatched rows are found, cannot find group 3: a|b"
    );
}
