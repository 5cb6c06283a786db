use chrono::{Duration, NaiveDate};
use cohort_timeline::algorithm::{
    CohortStatistics, aggregate_dates, build_longitudinal_table, derive_deltas_and_rates,
    generate_intervals, thin_events,
};
use cohort_timeline::filter::{BatchFilter, MultiplicityFilter};
use cohort_timeline::models::{DerivedRecord, Event, retain_finite_rates};
use cohort_timeline::utils::arrow::memory_profile;
use cohort_timeline::{
    DateGroup, IntervalConfig, IntervalRecord, LongitudinalConfig, TableColumns, ThinningConfig,
};
use log::info;
use rand::Rng;
use std::time::Instant;

const SUBJECTS: i64 = 500;
const MAX_SCANS: usize = 12;

/// Synthetic surveillance cohort: each subject gets a run of scans with a
/// slowly growing diameter and occasional same-day repeats.
fn synthetic_cohort() -> Vec<Event> {
    let mut rng = rand::rng();
    let origin = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or_default();
    let mut events = Vec::new();

    for subject in 1..=SUBJECTS {
        let mut date = origin + Duration::days(rng.random_range(0..3650));
        let mut diameter: f64 = rng.random_range(30.0..45.0);

        for _ in 0..rng.random_range(1..=MAX_SCANS) {
            events.push(Event::with_measurement(subject, date, diameter));
            if rng.random_bool(0.05) {
                events.push(Event::with_measurement(subject, date, diameter + 0.5));
            }
            date += Duration::days(rng.random_range(1..400));
            diameter += rng.random_range(0.0..2.0);
        }
    }
    events
}

fn main() -> anyhow::Result<()> {
    // Setup logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let columns = TableColumns::default();
    let events = synthetic_cohort();
    let batch = Event::to_record_batch(&events, &columns, true)?;
    let (megabytes, bytes) = memory_profile(&batch, &[columns.subject_id.as_str(), columns.date.as_str()])?;
    info!(
        "Generated {} events ({bytes} bytes, {megabytes:.3} MB in key columns)",
        batch.num_rows()
    );

    let start = Instant::now();
    let groups = aggregate_dates(&events);
    let stats = CohortStatistics::calculate(&events, &groups);
    info!("\n{}", CohortStatistics::generate_summary(&stats));

    let intervals = generate_intervals(&groups, &IntervalConfig::default().with_decimal_places(2));
    let interval_batch = IntervalRecord::to_record_batch(&intervals, &columns.subject_id)?;
    info!("Interval table has {} rows", interval_batch.num_rows());

    let group_batch = DateGroup::to_record_batch(&groups, &columns.subject_id)?;
    info!("Date group table has {} rows", group_batch.num_rows());

    let filtered = MultiplicityFilter::new(&columns.subject_id, &columns.date, &columns.measurement)
        .filter(&batch)?;
    info!(
        "{} of {} rows belong to subjects with single measurements per date",
        filtered.num_rows(),
        batch.num_rows()
    );

    let config = LongitudinalConfig::new(3);
    let table = build_longitudinal_table(&groups, &events, &config)?;
    let derived = retain_finite_rates(derive_deltas_and_rates(&table)?);
    let wide = DerivedRecord::to_record_batch(&derived, config.column_count, &columns)?;
    info!(
        "Longitudinal table with rates: {} rows, {} columns",
        wide.num_rows(),
        wide.num_columns()
    );

    let thinned = thin_events(&events, &ThinningConfig::new(180));
    info!(
        "Thinned series keep {} of {} dates",
        thinned.iter().map(|s| s.dates.len()).sum::<usize>(),
        events.len()
    );

    info!("Pipeline finished in {:?}", start.elapsed());
    Ok(())
}
