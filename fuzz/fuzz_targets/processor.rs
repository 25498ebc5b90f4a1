#![no_main]

use libfuzzer_sys::fuzz_target;
use tlview_core::types::Selection;
use tlview_pipeline::filter::{FilterSpec, apply_filter};
use tlview_pipeline::{DecodePolicy, EventSchema, RecordProcessor};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut processor = RecordProcessor::new(EventSchema::default(), DecodePolicy::Lenient);
    let Ok(dataset) = processor.process_text(text) else {
        return;
    };

    // 모든 이벤트 키 필터의 결과를 합치면 이벤트 키가 있는 레코드 전체
    let with_key = dataset
        .records()
        .iter()
        .filter(|r| r.event_key().is_some())
        .count();
    let mut total = 0;
    for key in dataset.event_keys() {
        let spec = FilterSpec::new(Selection::only(key.as_str()), Selection::All);
        total += apply_filter(dataset.records(), &spec).indices.len();
    }
    assert_eq!(total, with_key);
});
