//! 처리 파이프라인 벤치마크
//!
//! 디코딩, 인터닝 해제, 조인을 포함한 처리 패스와 필터 재계산의 처리량을 측정합니다.

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use tlview_core::types::Selection;
use tlview_pipeline::{Action, RecordProcessor, ViewState};

/// 문자열 테이블 + dynamo_start/describe_tensor/describe_source 반복 트레이스
fn synthetic_trace(frames: usize) -> String {
    let mut lines = vec![r#"{"string_table":["torch/_dynamo/eval_frame.py","model.py","torch/nn/modules/module.py"]}"#.to_owned()];
    for frame in 0..frames {
        lines.push(format!(
            r#"{{"frame_id":{frame},"frame_compile_id":0,"rank":0,"timestamp":"2024-01-15T12:00:00Z","dynamo_start":{{"stack":[{{"line":10,"name":"forward","filename":1}},{{"line":1500,"name":"_call_impl","filename":2}}]}}}}"#
        ));
        for t in 0..4 {
            let id = frame * 4 + t;
            lines.push(format!(
                r#"{{"frame_id":{frame},"frame_compile_id":0,"describe_tensor":{{"id":{id},"describer_id":{id},"ndim":2,"dtype":"torch.float32","device":"device(type='cuda', index=0)","size":[32,128],"requires_grad":true}}}}"#
            ));
            lines.push(format!(
                r#"{{"frame_id":{frame},"frame_compile_id":0,"describe_source":{{"describer_id":{id},"id":{id},"source":"L['x'][{t}]"}}}}"#
            ));
        }
        lines.push(format!(
            r#"{{"frame_id":{frame},"frame_compile_id":0,"attempt":1,"compilation_metrics":{{"entire_frame_compile_time_s":0.5,"graph_op_count":12}}}}"#
        ));
    }
    lines.join("\n")
}

fn bench_process_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_text");

    for frames in [10usize, 100, 1000] {
        let trace = synthetic_trace(frames);
        let records = trace.lines().count() as u64;
        group.throughput(Throughput::Elements(records));
        group.bench_with_input(BenchmarkId::from_parameter(frames), &trace, |b, trace| {
            let mut processor = RecordProcessor::default();
            b.iter(|| processor.process_text(black_box(trace)).unwrap())
        });
    }

    group.finish();
}

fn bench_filter(c: &mut Criterion) {
    let trace = synthetic_trace(1000);
    let dataset = Arc::new(RecordProcessor::default().process_text(&trace).unwrap());
    let state = ViewState::with_dataset(dataset);

    let mut group = c.benchmark_group("filter");
    group.bench_function("select_event", |b| {
        b.iter(|| state.apply(Action::SelectEvent(black_box(Selection::only("describe_source")))))
    });
    group.bench_function("select_frame", |b| {
        b.iter(|| state.apply(Action::SelectFrame(black_box(Selection::only("500/0")))))
    });
    group.finish();
}

criterion_group!(benches, bench_process_text, bench_filter);
criterion_main!(benches);
