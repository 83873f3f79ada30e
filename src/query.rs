//! Read-only queries and aggregations over the current model snapshot.
//!
//! Everything here is a pure function over slices; the presentation layer
//! calls these to build task tables, the weekly report view and the
//! statistics page. No function mutates the store.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};

use crate::fields::{Priority, RatingField, SortKey};
use crate::model::{Report, Task};

/// How to combine per-day values in a time series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Mean,
}

/// Filter tasks on category, priority and tag. A task must match every
/// non-empty dimension; within the tag dimension, any shared tag matches.
pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    categories: &[String],
    priorities: &[Priority],
    tags: &[String],
) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| {
            if !categories.is_empty() && !categories.contains(&t.category) {
                return false;
            }
            if !priorities.is_empty() && !priorities.contains(&t.priority) {
                return false;
            }
            if !tags.is_empty() && !t.tags.iter().any(|tag| tags.contains(tag)) {
                return false;
            }
            true
        })
        .collect()
}

/// Sort tasks in place. The sort is stable: ties keep their input order.
pub fn sort_tasks(tasks: &mut [&Task], key: SortKey) {
    match key {
        SortKey::Due => tasks.sort_by_key(|t| t.due_date),
        SortKey::Priority => tasks.sort_by_key(|t| t.priority),
        SortKey::Estimated => tasks.sort_by(|a, b| {
            b.estimated_time
                .partial_cmp(&a.estimated_time)
                .unwrap_or(Ordering::Equal)
        }),
    }
}

/// The Monday of the ISO week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// Bucket reports by the Monday of their week. Reports are pre-sorted
/// newest-first, so each bucket holds its reports in reverse-chronological
/// encounter order.
pub fn group_reports_by_week(reports: &[Report]) -> BTreeMap<NaiveDate, Vec<&Report>> {
    let mut sorted: Vec<&Report> = reports.iter().collect();
    sorted.sort_by_key(|r| std::cmp::Reverse(r.date));
    let mut buckets: BTreeMap<NaiveDate, Vec<&Report>> = BTreeMap::new();
    for r in sorted {
        buckets.entry(week_start(r.date.date())).or_default().push(r);
    }
    buckets
}

/// Aggregate one value per calendar date, ascending by date.
pub fn aggregate_time_series<F>(reports: &[Report], value: F, agg: Aggregate) -> Vec<(NaiveDate, f64)>
where
    F: Fn(&Report) -> f64,
{
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    for r in reports {
        let entry = buckets.entry(r.date.date()).or_insert((0.0, 0));
        entry.0 += value(r);
        entry.1 += 1;
    }
    buckets
        .into_iter()
        .map(|(date, (sum, n))| {
            let v = match agg {
                Aggregate::Sum => sum,
                Aggregate::Mean => sum / n as f64,
            };
            (date, v)
        })
        .collect()
}

/// Total hours across all reports.
pub fn total_time(reports: &[Report]) -> f64 {
    reports.iter().map(|r| r.time_spent).sum()
}

/// Mean of one rating field. Returns 0.0 for no reports so the statistics
/// page always has something to render.
pub fn average_rating(reports: &[Report], field: RatingField) -> f64 {
    if reports.is_empty() {
        return 0.0;
    }
    let sum: f64 = reports.iter().map(|r| rating_of(r, field)).sum();
    sum / reports.len() as f64
}

fn rating_of(r: &Report, field: RatingField) -> f64 {
    match field {
        RatingField::Result => r.result_rating as f64,
        RatingField::Focus => r.focus_rating as f64,
    }
}

/// Combined productivity score of one report: the mean of its two ratings.
pub fn productivity_score(r: &Report) -> f64 {
    (r.result_rating as f64 + r.focus_rating as f64) / 2.0
}

/// Hours summed per category, unordered.
pub fn time_by_category(reports: &[Report]) -> HashMap<String, f64> {
    let mut totals: HashMap<String, f64> = HashMap::new();
    for r in reports {
        *totals.entry(r.category.clone()).or_insert(0.0) += r.time_spent;
    }
    totals
}

/// The planned work window for a task: one working day per eight estimated
/// hours, ending on the due date.
pub fn schedule_window(task: &Task) -> (NaiveDate, NaiveDate) {
    let days = (task.estimated_time / 8.0) as i64;
    (task.due_date - Duration::days(days), task.due_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(name: &str, category: &str, priority: Priority, due: &str, est: f64) -> Task {
        Task {
            name: name.into(),
            category: category.into(),
            priority,
            due_date: due.parse().unwrap(),
            estimated_time: est,
            actual_time: 0.0,
            steps: Vec::new(),
            tags: Vec::new(),
            completed: false,
            notes: String::new(),
        }
    }

    fn report(date: &str, category: &str, hours: f64, result: u8, focus: u8) -> Report {
        Report {
            date: date.parse().unwrap(),
            category: category.into(),
            task: "t".into(),
            time_spent: hours,
            result_rating: result,
            focus_rating: focus,
            note: String::new(),
        }
    }

    #[test]
    fn no_filters_is_identity() {
        let tasks = vec![
            task("a", "Writing", Priority::High, "2024-03-01", 1.0),
            task("b", "Research", Priority::Low, "2024-03-02", 2.0),
        ];
        let out = filter_tasks(&tasks, &[], &[], &[]);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "a");
        assert_eq!(out[1].name, "b");
    }

    #[test]
    fn filters_combine_with_and_tags_with_or() {
        let mut a = task("a", "Writing", Priority::High, "2024-03-01", 1.0);
        a.tags = vec!["Urgent".into()];
        let mut b = task("b", "Writing", Priority::High, "2024-03-02", 2.0);
        b.tags = vec!["Long-term".into()];
        let c = task("c", "Research", Priority::High, "2024-03-03", 3.0);
        let tasks = vec![a, b, c];

        let out = filter_tasks(
            &tasks,
            &["Writing".to_string()],
            &[Priority::High],
            &["Urgent".to_string(), "Long-term".to_string()],
        );
        let names: Vec<_> = out.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn due_sort_is_stable() {
        let tasks = vec![
            task("second", "Writing", Priority::Low, "2024-03-01", 1.0),
            task("third", "Writing", Priority::Low, "2024-03-01", 1.0),
            task("first", "Writing", Priority::Low, "2024-02-01", 1.0),
        ];
        let mut refs: Vec<&Task> = tasks.iter().collect();
        sort_tasks(&mut refs, SortKey::Due);
        let names: Vec<_> = refs.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn priority_sorts_high_first_and_estimated_largest_first() {
        let tasks = vec![
            task("low", "Writing", Priority::Low, "2024-03-01", 1.0),
            task("high", "Writing", Priority::High, "2024-03-01", 8.0),
            task("medium", "Writing", Priority::Medium, "2024-03-01", 4.0),
        ];
        let mut refs: Vec<&Task> = tasks.iter().collect();
        sort_tasks(&mut refs, SortKey::Priority);
        assert_eq!(refs[0].name, "high");
        assert_eq!(refs[2].name, "low");

        let mut refs: Vec<&Task> = tasks.iter().collect();
        sort_tasks(&mut refs, SortKey::Estimated);
        assert_eq!(refs[0].name, "high");
        assert_eq!(refs[2].name, "low");
    }

    #[test]
    fn week_grouping_partitions_reports() {
        let reports = vec![
            report("2024-01-01T09:00:00", "Writing", 1.0, 3, 3), // Monday
            report("2024-01-07T22:00:00", "Writing", 2.0, 3, 3), // Sunday, same week
            report("2024-01-08T08:00:00", "Writing", 3.0, 3, 3), // next Monday
        ];
        let buckets = group_reports_by_week(&reports);
        assert_eq!(buckets.len(), 2);
        let week1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let week2 = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(buckets[&week1].len(), 2);
        assert_eq!(buckets[&week2].len(), 1);
        let total: usize = buckets.values().map(|v| v.len()).sum();
        assert_eq!(total, reports.len());
        // Newest first within a bucket.
        assert_eq!(buckets[&week1][0].time_spent, 2.0);
    }

    #[test]
    fn time_series_sums_and_averages_per_day() {
        let reports = vec![
            report("2024-01-02T09:00:00", "Writing", 2.0, 4, 2),
            report("2024-01-02T15:00:00", "Writing", 1.0, 2, 4),
            report("2024-01-01T09:00:00", "Writing", 5.0, 5, 5),
        ];
        let sums = aggregate_time_series(&reports, |r| r.time_spent, Aggregate::Sum);
        assert_eq!(
            sums,
            vec![
                (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), 5.0),
                (NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(), 3.0),
            ]
        );
        let scores = aggregate_time_series(&reports, productivity_score, Aggregate::Mean);
        assert_eq!(scores[0].1, 5.0);
        assert_eq!(scores[1].1, 3.0);
    }

    #[test]
    fn empty_reports_average_to_zero() {
        assert_eq!(average_rating(&[], RatingField::Result), 0.0);
        assert_eq!(average_rating(&[], RatingField::Focus), 0.0);
        assert_eq!(total_time(&[]), 0.0);
    }

    #[test]
    fn reductions_over_reports() {
        let reports = vec![
            report("2024-01-01T09:00:00", "Writing", 2.0, 4, 2),
            report("2024-01-02T09:00:00", "Research", 3.0, 2, 4),
        ];
        assert_eq!(total_time(&reports), 5.0);
        assert_eq!(average_rating(&reports, RatingField::Result), 3.0);
        assert_eq!(average_rating(&reports, RatingField::Focus), 3.0);
        let by_cat = time_by_category(&reports);
        assert_eq!(by_cat["Writing"], 2.0);
        assert_eq!(by_cat["Research"], 3.0);
    }

    #[test]
    fn schedule_window_scales_with_estimate() {
        let t = task("a", "Writing", Priority::High, "2024-03-10", 16.0);
        let (start, end) = schedule_window(&t);
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 8).unwrap());
    }
}
