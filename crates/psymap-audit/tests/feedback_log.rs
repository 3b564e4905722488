use psymap_audit::{AuditError, FeedbackSink, JsonlFeedbackLog, MemoryFeedbackLog, summarize};
use psymap_core::models::analysis::CompositeIndices;
use psymap_core::models::clinical::{ClinicalSnapshot, PredictedDistress, Subscale};
use psymap_core::models::feedback::{DistressDelta, PredictionFeedbackRecord};
use uuid::Uuid;

fn record(user: &str, delta: (f64, f64, f64), segment: &str, model_version: u32) -> PredictionFeedbackRecord {
    let predicted = PredictedDistress::new(10.0, 8.0, 12.0);
    let mae = (delta.0.abs() + delta.1.abs() + delta.2.abs()) / 3.0;
    PredictionFeedbackRecord {
        id: Uuid::new_v4(),
        user_ref: user.to_string(),
        predicted,
        actual: ClinicalSnapshot::new(
            (10.0 + delta.0) as i32,
            (8.0 + delta.1) as i32,
            (12.0 + delta.2) as i32,
        ),
        delta: DistressDelta {
            depression: delta.0,
            anxiety: delta.1,
            stress: delta.2,
        },
        mae,
        composites_at_prediction: CompositeIndices {
            vulnerability: 70.0,
            resilience: 30.0,
        },
        segment_tag: segment.to_string(),
        model_version,
        predicted_at: "2026-03-01T09:00:00Z".parse().unwrap(),
        recorded_at: "2026-04-01T09:00:00Z".parse().unwrap(),
    }
}

#[test]
fn jsonl_log_appends_and_reads_back_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let mut log = JsonlFeedbackLog::new(dir.path().join("logs").join("feedback.jsonl"));

    let first = record("client-1", (4.0, -2.0, 0.0), "high_vulnerability/low_resilience", 1);
    let second = record("client-2", (-1.0, 1.0, 2.0), "mid_vulnerability/mid_resilience", 1);
    log.append(&first).unwrap();
    log.append(&second).unwrap();

    let contents = std::fs::read_to_string(log.path()).unwrap();
    assert_eq!(contents.lines().count(), 2);

    let records = log.read_all().unwrap();
    assert_eq!(records, vec![first, second]);
}

#[test]
fn missing_log_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let log = JsonlFeedbackLog::new(dir.path().join("absent.jsonl"));
    assert!(log.read_all().unwrap().is_empty());
}

#[test]
fn corrupt_line_is_reported_with_its_number() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("feedback.jsonl");
    let mut log = JsonlFeedbackLog::new(&path);
    log.append(&record("client-1", (1.0, 1.0, 1.0), "mid_vulnerability/mid_resilience", 1))
        .unwrap();

    let mut contents = std::fs::read_to_string(&path).unwrap();
    contents.push_str("\n{ truncated\n");
    std::fs::write(&path, contents).unwrap();

    match log.read_all() {
        Err(AuditError::Corrupt { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected a corrupt-line error, got {other:?}"),
    }
}

#[test]
fn memory_log_keeps_records() {
    let mut log = MemoryFeedbackLog::new();
    assert!(log.is_empty());
    let r = record("client-1", (2.0, 0.0, -2.0), "low_vulnerability/high_resilience", 1);
    log.append(&r).unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log.records()[0], r);
    assert_eq!(log.into_records(), vec![r]);
}

#[test]
fn summary_reports_bias_mae_and_segments() {
    let records = vec![
        record("a", (4.0, -2.0, 0.0), "high_vulnerability/low_resilience", 1),
        record("b", (2.0, 2.0, -3.0), "high_vulnerability/low_resilience", 1),
        record("c", (-3.0, 0.0, 3.0), "mid_vulnerability/mid_resilience", 2),
    ];
    let summary = summarize(&records);

    assert_eq!(summary.count, 3);
    assert_eq!(summary.model_versions, vec![1, 2]);

    let depression = summary.subscales[&Subscale::Depression];
    assert!((depression.bias - 1.0).abs() < 1e-12);
    assert!((depression.mae - 3.0).abs() < 1e-12);
    let anxiety = summary.subscales[&Subscale::Anxiety];
    assert!(anxiety.bias.abs() < 1e-12);
    assert!((anxiety.mae - 4.0 / 3.0).abs() < 1e-12);

    // Record MAEs: 2.0, 7/3, 2.0.
    assert!((summary.mae - (2.0 + 7.0 / 3.0 + 2.0) / 3.0).abs() < 1e-12);

    let high = summary.segments["high_vulnerability/low_resilience"];
    assert_eq!(high.count, 2);
    assert!((high.mae - (2.0 + 7.0 / 3.0) / 2.0).abs() < 1e-12);
    assert_eq!(summary.segments["mid_vulnerability/mid_resilience"].count, 1);
}

#[test]
fn empty_summary_is_zeroed() {
    let summary = summarize(&[]);
    assert_eq!(summary.count, 0);
    assert_eq!(summary.mae, 0.0);
    assert!(summary.subscales.is_empty());
    assert!(summary.segments.is_empty());
}
