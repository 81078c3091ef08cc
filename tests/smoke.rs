use meshpick_interact::{InteractionEvent, InteractionEventKind};
use meshpick_testkit::{InteractionRecord, JsonlSink};

#[test]
fn interaction_event_stream_can_be_written() {
    let mut sink = JsonlSink::create(std::env::temp_dir().join("meshpick-eventlog.jsonl"))
        .expect("can create temp log");
    let event = InteractionEvent {
        kind: InteractionEventKind::Click,
        target: 1u32,
        is_selected: None,
    };
    sink.write(&InteractionRecord::new(1, &event))
        .expect("can write event");
    assert_eq!(sink.written(), 1);
}
