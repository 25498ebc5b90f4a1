#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serde_json::{Value, json};

use tlview_core::types::Selection;
use tlview_pipeline::{Action, RecordProcessor, TableModel, ViewState};

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    /// 레코드 목록 (최대 32개로 제한)
    records: Vec<FuzzRecord>,
    actions: Vec<FuzzAction>,
}

#[derive(Arbitrary, Debug)]
struct FuzzRecord {
    frame_id: Option<u8>,
    compile_id: Option<u8>,
    attempt: Option<u8>,
    event: FuzzEvent,
    describer_id: u8,
    extra: String,
}

#[derive(Arbitrary, Debug)]
enum FuzzEvent {
    Descriptor,
    Reference,
    Plain,
}

#[derive(Arbitrary, Debug)]
enum FuzzAction {
    SelectEvent(Option<u8>),
    SelectFrame(Option<u8>),
    Toggle(u8),
    AllVisible(bool),
    ShowAll(bool),
    Clear,
}

impl FuzzRecord {
    fn to_line(&self) -> String {
        let payload = json!({ "describer_id": self.describer_id, "extra": self.extra });
        let event = match self.event {
            FuzzEvent::Descriptor => "describe_tensor",
            FuzzEvent::Reference => "describe_source",
            FuzzEvent::Plain => "artifact",
        };
        let mut record = serde_json::Map::new();
        if let Some(id) = self.frame_id {
            record.insert("frame_id".to_owned(), json!(id));
        }
        if let Some(id) = self.compile_id {
            record.insert("frame_compile_id".to_owned(), json!(id));
        }
        if let Some(attempt) = self.attempt {
            record.insert("attempt".to_owned(), json!(attempt));
        }
        record.insert(event.to_owned(), payload);
        Value::Object(record).to_string()
    }
}

fn pick(options: &[String], index: Option<u8>) -> Selection {
    match index {
        Some(i) if !options.is_empty() => {
            Selection::only(options[i as usize % options.len()].as_str())
        }
        _ => Selection::All,
    }
}

fuzz_target!(|input: FuzzInput| {
    let text = input
        .records
        .iter()
        .take(32)
        .map(FuzzRecord::to_line)
        .collect::<Vec<_>>()
        .join("\n");
    let Ok(dataset) = RecordProcessor::default().process_text(&text) else {
        return;
    };

    let mut state = ViewState::with_dataset(Arc::new(dataset));
    for action in input.actions.iter().take(64) {
        let action = match action {
            FuzzAction::SelectEvent(i) => Action::SelectEvent(pick(state.available_event_keys(), *i)),
            FuzzAction::SelectFrame(i) => Action::SelectFrame(pick(state.available_frames(), *i)),
            FuzzAction::Toggle(i) => {
                let columns = state.dynamic_columns();
                if columns.is_empty() {
                    continue;
                }
                Action::ToggleColumn(columns[*i as usize % columns.len()].clone())
            }
            FuzzAction::AllVisible(visible) => Action::SetAllColumnsVisible(*visible),
            FuzzAction::ShowAll(show) => Action::ShowAllColumns(*show),
            FuzzAction::Clear => Action::Clear,
        };
        state = state.apply(action);

        assert!(state.filtered_len() <= state.records().len());
        let table = TableModel::from_view(&state, Some(8));
        assert!(table.rows.iter().all(|row| row.len() == table.columns.len()));
    }
});
