use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use cohort_timeline::algorithm::{
    CohortStatistics, NumberedColumns, aggregate_dates, build_longitudinal_table,
    calculate_deltas_and_rates, generate_intervals, thin_events,
};
use cohort_timeline::filter::retain_single_measurement_subjects;
use cohort_timeline::models::{Event, IntervalRecord, remove_empty_measurement_rows};
use cohort_timeline::{ColumnSourcePolicy, CountSelection, TimelineConfig};

use crate::utils::{float64_values, string_values};

const CONFIG: &str = r#"{
    "columns": {
        "subject_id": "pt_id",
        "date": "ct_date",
        "measurement": "mid_asc",
        "date_stem": "ct_date",
        "measurement_stem": "mid_asc"
    },
    "intervals": { "include_longest": true, "decimal_places": 3 },
    "longitudinal": {
        "column_count": 2,
        "selection": "at_least",
        "column_source": "last_date_override"
    },
    "thinning": { "threshold_days": 60 }
}"#;

fn scan_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("pt_id", DataType::Utf8, false),
        Field::new("ct_date", DataType::Utf8, false),
        Field::new("mid_asc", DataType::Float64, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(StringArray::from(vec![
                "p1", "p1", "p1", "p2", "p2", "p2", "p3",
            ])),
            Arc::new(StringArray::from(vec![
                "2019-01-01",
                "2019-02-01",
                "2020-01-01",
                "2019-06-01",
                "2019-06-01",
                "2020-06-01",
                "2019-01-01",
            ])),
            Arc::new(Float64Array::from(vec![
                Some(40.0),
                None,
                Some(42.0),
                Some(45.0),
                Some(45.5),
                Some(47.0),
                Some(38.0),
            ])),
        ],
    )
    .unwrap()
}

#[test]
fn test_config_from_json() {
    let config = TimelineConfig::from_json(CONFIG).unwrap();
    assert_eq!(config.columns.subject_id, "pt_id");
    assert_eq!(config.longitudinal.selection, CountSelection::AtLeast);
    assert_eq!(
        config.longitudinal.column_source,
        ColumnSourcePolicy::LastDateOverride
    );
    assert_eq!(config.thinning.map(|t| t.threshold_days), Some(60));
    assert!(config.to_string().contains("Thinning Threshold"));

    let round_trip = TimelineConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(round_trip, config);

    assert!(TimelineConfig::from_json(r#"{"longitudinal": {"column_count": 0}}"#).is_err());
    assert!(TimelineConfig::from_json("not json").is_err());
}

#[test]
fn test_full_pipeline() {
    let config = TimelineConfig::from_json(CONFIG).unwrap();
    let events = Event::from_batch(&scan_batch(), &config.columns, &config.date_formats).unwrap();
    assert_eq!(events.len(), 7);

    let groups = aggregate_dates(&events);
    let stats = CohortStatistics::calculate(&events, &groups);
    assert_eq!(stats.subject_count, 3);
    assert_eq!(stats.measured_event_count, 6);

    // p1: 3 dates -> 2 consecutive + longest; p2: 2 dates -> 1; p3: none
    let intervals = generate_intervals(&groups, &config.intervals);
    assert_eq!(intervals.len(), 4);
    let interval_batch = IntervalRecord::to_record_batch(&intervals, &config.columns.subject_id).unwrap();
    assert_eq!(
        string_values(&interval_batch, "interval")[2],
        "p1_20190101_20200101"
    );

    // p1 skips its unmeasured second date via the last-date override, p2
    // fans out over its two same-day values
    let table = build_longitudinal_table(&groups, &events, &config.longitudinal).unwrap();
    let wide = table.to_record_batch(&config.columns).unwrap();
    assert_eq!(string_values(&wide, "pt_id"), vec!["p1", "p2", "p2"]);

    let numbered =
        NumberedColumns::from_schema(&wide.schema(), &config.columns.date_stem, &config.columns.measurement_stem)
            .unwrap();
    let derived = calculate_deltas_and_rates(&wide, &numbered, &config.date_formats).unwrap();
    assert_eq!(
        float64_values(&derived, "delta_1"),
        vec![Some(2.0), Some(2.0), Some(1.5)]
    );

    // Removing p2 for its repeated date leaves p1 and p3
    let measured = remove_empty_measurement_rows(events.clone());
    assert_eq!(measured.len(), 6);
    let single = retain_single_measurement_subjects(measured);
    assert!(single.iter().all(|e| e.subject_id.to_string() != "p2"));
    assert_eq!(single.len(), 3);

    let thinning = config.thinning.unwrap();
    let thinned = thin_events(&events, &thinning);
    assert_eq!(thinned[0].dates.len(), 2);
}
