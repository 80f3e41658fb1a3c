//! crates/study_planner_core/src/schedule.rs
//!
//! Schedule operations: creation, partial update, block mutation, conflict
//! detection and occurrence projection.
//!
//! Every operation is a pure transformation from (current schedule, proposed
//! change) to (new schedule or error). Nothing here mutates in place, so a
//! rejected operation can never leave a schedule half-updated.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

use crate::domain::{
    ExceptionAction, Frequency, Occurrence, RecurrenceRule, Schedule, ScheduleException,
    ScheduleUpdate, TimeBlock,
};

/// Errors produced by schedule operations.
///
/// All failures are synchronous and atomic: when an operation returns an
/// error, the input schedule is untouched and no partial state exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    /// A field is malformed (out-of-range day, empty subject, inverted times).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Two time blocks on the same weekday overlap. Carries both blocks and
    /// the day so the caller can render a precise message.
    #[error("time blocks overlap on day {day}: {} and {}", block_span(.first), block_span(.second))]
    Conflict {
        day: u8,
        first: Box<TimeBlock>,
        second: Box<TimeBlock>,
    },
}

fn block_span(block: &TimeBlock) -> String {
    format!(
        "'{}' {}-{}",
        block.subject,
        block.start_time.format("%H:%M"),
        block.end_time.format("%H:%M")
    )
}

impl Schedule {
    /// Builds a new schedule after validating every block and the recurrence
    /// rule, and checking the block list for same-day overlaps.
    pub fn create(
        owner_id: Uuid,
        name: impl Into<String>,
        description: Option<String>,
        time_blocks: Vec<TimeBlock>,
        recurring: RecurrenceRule,
    ) -> Result<Self, ScheduleError> {
        let name = name.into();
        validate_name(&name)?;
        if time_blocks.is_empty() {
            return Err(ScheduleError::Validation(
                "a schedule needs at least one time block".to_string(),
            ));
        }
        for block in &time_blocks {
            validate_block(block)?;
        }
        validate_recurrence(&recurring)?;
        check_overlaps(&time_blocks)?;

        Ok(Schedule {
            id: Uuid::new_v4(),
            owner_id,
            name,
            description,
            is_active: true,
            time_blocks,
            recurring,
            exceptions: Vec::new(),
        })
    }

    /// Applies a partial update, leaving unspecified fields unchanged.
    ///
    /// When `time_blocks` is supplied the complete new list is re-validated
    /// for overlaps; the update is rejected as a whole on the first conflict.
    pub fn apply_update(&self, update: ScheduleUpdate) -> Result<Self, ScheduleError> {
        let mut next = self.clone();

        if let Some(name) = update.name {
            validate_name(&name)?;
            next.name = name;
        }
        if let Some(description) = update.description {
            next.description = Some(description);
        }
        if let Some(is_active) = update.is_active {
            next.is_active = is_active;
        }
        if let Some(recurring) = update.recurring {
            validate_recurrence(&recurring)?;
            next.recurring = recurring;
        }
        if let Some(blocks) = update.time_blocks {
            for block in &blocks {
                validate_block(block)?;
            }
            check_overlaps(&blocks)?;
            next.time_blocks = blocks;
        }
        if let Some(exceptions) = update.exceptions {
            validate_exceptions(&exceptions)?;
            next.exceptions = exceptions;
        }

        Ok(next)
    }

    /// Appends one block, checking it only against the existing blocks that
    /// share its weekday.
    pub fn with_block(&self, block: TimeBlock) -> Result<Self, ScheduleError> {
        validate_block(&block)?;
        for existing in &self.time_blocks {
            if existing.day_of_week == block.day_of_week && intervals_overlap(existing, &block) {
                return Err(ScheduleError::Conflict {
                    day: block.day_of_week,
                    first: Box::new(existing.clone()),
                    second: Box::new(block),
                });
            }
        }

        let mut next = self.clone();
        next.time_blocks.push(block);
        Ok(next)
    }

    /// Removes the block with the given id. Removing an unknown id is an
    /// idempotent no-op, never an error.
    pub fn without_block(&self, block_id: Uuid) -> Self {
        let mut next = self.clone();
        next.time_blocks.retain(|block| block.id != block_id);
        next
    }

    /// Flips `is_active`; no other field is touched.
    pub fn toggled(&self) -> Self {
        let mut next = self.clone();
        next.is_active = !self.is_active;
        next
    }

    /// Recomputes overlap status across all stored blocks. This is a derived,
    /// stateless query; it short-circuits on the first conflict found.
    pub fn has_conflicts(&self) -> bool {
        find_conflict(&self.time_blocks).is_some()
    }

    /// Projects the recurrence onto concrete calendar dates in
    /// `[from, to]`, clipped to `[start_date, end_date]`, with exceptions
    /// applied per date. The returned iterator is lazy; calling this method
    /// again restarts the projection.
    pub fn project_occurrences(&self, from: NaiveDate, to: NaiveDate) -> Occurrences<'_> {
        Occurrences {
            schedule: self,
            cursor: from,
            until: to,
        }
    }

    /// Resolves what happens on one calendar date: nothing, the normal
    /// weekday blocks, or an exception's replacement blocks.
    fn occurrence_on(&self, date: NaiveDate) -> Option<Occurrence> {
        let rule = &self.recurring;
        if date < rule.start_date {
            return None;
        }
        if let Some(end) = rule.end_date {
            if date > end {
                return None;
            }
        }
        if !self.is_candidate(date) {
            return None;
        }

        if let Some(exception) = self.exceptions.iter().find(|e| e.date == date) {
            return match &exception.action {
                ExceptionAction::Skip => None,
                ExceptionAction::Modify { blocks } => Some(Occurrence {
                    date,
                    blocks: blocks.clone(),
                }),
            };
        }

        let weekday = weekday_index(date);
        let blocks: Vec<TimeBlock> = self
            .time_blocks
            .iter()
            .filter(|block| block.day_of_week == weekday)
            .cloned()
            .collect();
        if blocks.is_empty() {
            return None;
        }
        Some(Occurrence { date, blocks })
    }

    /// Whether the recurrence rule admits this date at all, before
    /// exceptions and block filtering.
    fn is_candidate(&self, date: NaiveDate) -> bool {
        let rule = &self.recurring;
        if !rule.is_recurring {
            return date == rule.start_date;
        }
        match rule.frequency {
            Frequency::Daily => true,
            Frequency::Weekly => match &rule.days_of_week {
                Some(days) => days.contains(&weekday_index(date)),
                // Without an explicit restriction, the weekdays that carry
                // blocks define the weekly pattern.
                None => {
                    let weekday = weekday_index(date);
                    self.time_blocks.iter().any(|b| b.day_of_week == weekday)
                }
            },
            Frequency::Monthly => date.day() == rule.start_date.day(),
        }
    }
}

/// Lazy projection of a schedule onto calendar dates. Dates whose effective
/// block list ends up empty are not emitted.
pub struct Occurrences<'a> {
    schedule: &'a Schedule,
    cursor: NaiveDate,
    until: NaiveDate,
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        while self.cursor <= self.until {
            let date = self.cursor;
            self.cursor = date.checked_add_days(Days::new(1))?;
            if let Some(occurrence) = self.schedule.occurrence_on(date) {
                return Some(occurrence);
            }
        }
        None
    }
}

/// Weekday as 0-6 with 0 = Sunday.
fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

fn validate_name(name: &str) -> Result<(), ScheduleError> {
    if name.trim().is_empty() {
        return Err(ScheduleError::Validation(
            "schedule name must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_block(block: &TimeBlock) -> Result<(), ScheduleError> {
    if block.day_of_week > 6 {
        return Err(ScheduleError::Validation(format!(
            "day_of_week must be 0-6, got {}",
            block.day_of_week
        )));
    }
    if block.subject.trim().is_empty() {
        return Err(ScheduleError::Validation(
            "time block subject must not be empty".to_string(),
        ));
    }
    if block.start_time >= block.end_time {
        return Err(ScheduleError::Validation(format!(
            "time block '{}' must start before it ends ({} >= {})",
            block.subject,
            block.start_time.format("%H:%M"),
            block.end_time.format("%H:%M")
        )));
    }
    Ok(())
}

fn validate_recurrence(rule: &RecurrenceRule) -> Result<(), ScheduleError> {
    if let Some(days) = &rule.days_of_week {
        if let Some(bad) = days.iter().find(|d| **d > 6) {
            return Err(ScheduleError::Validation(format!(
                "recurrence days_of_week must be 0-6, got {bad}"
            )));
        }
    }
    Ok(())
}

/// At most one exception per calendar date; replacement blocks are held to
/// the same field rules as normal blocks.
fn validate_exceptions(exceptions: &[ScheduleException]) -> Result<(), ScheduleError> {
    for (i, exception) in exceptions.iter().enumerate() {
        if exceptions[..i].iter().any(|e| e.date == exception.date) {
            return Err(ScheduleError::Validation(format!(
                "more than one exception targets {}",
                exception.date
            )));
        }
        if let ExceptionAction::Modify { blocks } = &exception.action {
            for block in blocks {
                validate_block(block)?;
            }
        }
    }
    Ok(())
}

fn check_overlaps(blocks: &[TimeBlock]) -> Result<(), ScheduleError> {
    match find_conflict(blocks) {
        Some((day, first, second)) => Err(ScheduleError::Conflict {
            day,
            first: Box::new(first.clone()),
            second: Box::new(second.clone()),
        }),
        None => Ok(()),
    }
}

/// Open intervals: `end == start` on adjacent blocks is back-to-back, not a
/// conflict.
fn intervals_overlap(a: &TimeBlock, b: &TimeBlock) -> bool {
    a.start_time < b.end_time && b.start_time < a.end_time
}

/// Finds the first conflicting pair, grouped by weekday. Within a day the
/// blocks are sorted by (start, end), stable over insertion order, and
/// swept pairwise; the comparison is independent of input order.
fn find_conflict(blocks: &[TimeBlock]) -> Option<(u8, &TimeBlock, &TimeBlock)> {
    let mut by_day: BTreeMap<u8, Vec<&TimeBlock>> = BTreeMap::new();
    for block in blocks {
        by_day.entry(block.day_of_week).or_default().push(block);
    }
    for (day, mut group) in by_day {
        group.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then(a.end_time.cmp(&b.end_time))
        });
        for pair in group.windows(2) {
            if pair[0].end_time > pair[1].start_time {
                return Some((day, pair[0], pair[1]));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BlockKind, Priority};
    use chrono::NaiveTime;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn block(day: u8, start: NaiveTime, end: NaiveTime, subject: &str) -> TimeBlock {
        TimeBlock {
            id: Uuid::new_v4(),
            day_of_week: day,
            start_time: start,
            end_time: end,
            subject: subject.to_string(),
            task_id: None,
            kind: BlockKind::Study,
            priority: Priority::Medium,
            notes: None,
        }
    }

    fn weekly(start: NaiveDate) -> RecurrenceRule {
        RecurrenceRule {
            is_recurring: true,
            frequency: Frequency::Weekly,
            start_date: start,
            end_date: None,
            days_of_week: None,
        }
    }

    fn owner() -> Uuid {
        Uuid::new_v4()
    }

    fn schedule_with(blocks: Vec<TimeBlock>) -> Schedule {
        Schedule::create(owner(), "Semester plan", None, blocks, weekly(d(2024, 1, 1))).unwrap()
    }

    #[test]
    fn back_to_back_blocks_are_not_a_conflict() {
        let result = Schedule::create(
            owner(),
            "Mondays",
            None,
            vec![
                block(1, t(9, 0), t(10, 0), "Math"),
                block(1, t(10, 0), t(11, 0), "Physics"),
            ],
            weekly(d(2024, 1, 1)),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn one_minute_overlap_is_a_conflict() {
        let result = Schedule::create(
            owner(),
            "Mondays",
            None,
            vec![
                block(1, t(9, 0), t(10, 0), "Math"),
                block(1, t(9, 59), t(11, 0), "Physics"),
            ],
            weekly(d(2024, 1, 1)),
        );
        assert!(matches!(result, Err(ScheduleError::Conflict { .. })));
    }

    #[test]
    fn create_reports_day_and_both_blocks() {
        let result = Schedule::create(
            owner(),
            "Mondays",
            None,
            vec![
                block(1, t(9, 0), t(10, 0), "Math"),
                block(1, t(9, 30), t(10, 30), "Physics"),
            ],
            weekly(d(2024, 1, 1)),
        );
        match result {
            Err(ScheduleError::Conflict { day, first, second }) => {
                assert_eq!(day, 1);
                assert_eq!(first.subject, "Math");
                assert_eq!(second.subject, "Physics");
            }
            other => panic!("expected conflict, got {other:?}"),
        }
    }

    #[test]
    fn identical_day_and_times_on_different_days_never_conflict() {
        let schedule = schedule_with(vec![
            block(1, t(9, 0), t(10, 0), "Math"),
            block(2, t(9, 0), t(10, 0), "Math"),
        ]);
        assert!(!schedule.has_conflicts());
    }

    #[test]
    fn equal_start_times_are_handled_stably() {
        let mut schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        schedule
            .time_blocks
            .push(block(1, t(9, 0), t(9, 30), "Physics"));
        assert!(schedule.has_conflicts());
    }

    #[test]
    fn has_conflicts_is_independent_of_block_order() {
        let a = block(1, t(9, 0), t(10, 0), "Math");
        let b = block(1, t(9, 30), t(10, 30), "Physics");
        let c = block(3, t(14, 0), t(15, 0), "Chemistry");

        let mut forward = schedule_with(vec![c.clone()]);
        forward.time_blocks = vec![a.clone(), b.clone(), c.clone()];
        let mut reversed = schedule_with(vec![c.clone()]);
        reversed.time_blocks = vec![c, b, a];

        assert!(forward.has_conflicts());
        assert!(reversed.has_conflicts());
    }

    #[test]
    fn removing_an_unknown_block_is_a_noop() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let after = schedule.without_block(Uuid::new_v4());
        assert_eq!(after, schedule);
    }

    #[test]
    fn removing_a_block_keeps_the_others() {
        let keep = block(1, t(9, 0), t(10, 0), "Math");
        let gone = block(2, t(9, 0), t(10, 0), "Physics");
        let schedule = schedule_with(vec![keep.clone(), gone.clone()]);
        let after = schedule.without_block(gone.id);
        assert_eq!(after.time_blocks, vec![keep]);
    }

    #[test]
    fn rejected_update_leaves_the_schedule_untouched() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let before = schedule.clone();
        let update = ScheduleUpdate {
            time_blocks: Some(vec![
                block(1, t(9, 0), t(10, 0), "Math"),
                block(1, t(9, 30), t(10, 30), "Physics"),
            ]),
            ..Default::default()
        };
        assert!(schedule.apply_update(update).is_err());
        assert_eq!(schedule, before);
    }

    #[test]
    fn update_replaces_blocks_rather_than_merging() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        // Overlaps the old Monday block; must still be accepted because the
        // new list replaces the old one outright.
        let update = ScheduleUpdate {
            time_blocks: Some(vec![block(1, t(9, 30), t(10, 30), "Physics")]),
            ..Default::default()
        };
        let after = schedule.apply_update(update).unwrap();
        assert_eq!(after.time_blocks.len(), 1);
        assert_eq!(after.time_blocks[0].subject, "Physics");
    }

    #[test]
    fn partial_update_preserves_unspecified_fields() {
        let schedule = Schedule::create(
            owner(),
            "Semester plan",
            Some("spring term".to_string()),
            vec![block(1, t(9, 0), t(10, 0), "Math")],
            weekly(d(2024, 1, 1)),
        )
        .unwrap();
        let update = ScheduleUpdate {
            name: Some("Exam plan".to_string()),
            ..Default::default()
        };
        let after = schedule.apply_update(update).unwrap();
        assert_eq!(after.name, "Exam plan");
        assert_eq!(after.description.as_deref(), Some("spring term"));
        assert_eq!(after.time_blocks, schedule.time_blocks);
        assert_eq!(after.recurring, schedule.recurring);
        assert_eq!(after.is_active, schedule.is_active);
    }

    #[test]
    fn empty_name_update_is_rejected() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let update = ScheduleUpdate {
            name: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            schedule.apply_update(update),
            Err(ScheduleError::Validation(_))
        ));
    }

    #[test]
    fn toggled_flips_only_the_active_flag() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let toggled = schedule.toggled();
        assert!(!toggled.is_active);
        assert_eq!(toggled.time_blocks, schedule.time_blocks);
        assert_eq!(toggled.name, schedule.name);
        assert_eq!(toggled.toggled(), schedule);
    }

    #[test]
    fn adding_a_block_checks_only_its_own_day() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        // Same interval on another weekday is fine.
        assert!(schedule
            .with_block(block(2, t(9, 0), t(10, 0), "Physics"))
            .is_ok());
        // Overlap on the same weekday is not.
        let err = schedule
            .with_block(block(1, t(9, 30), t(10, 30), "Physics"))
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Conflict { day: 1, .. }));
    }

    #[test]
    fn adding_an_inverted_block_is_rejected() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let result = schedule.with_block(block(2, t(11, 0), t(10, 0), "Physics"));
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    #[test]
    fn create_requires_at_least_one_block() {
        let result = Schedule::create(owner(), "Empty", None, vec![], weekly(d(2024, 1, 1)));
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    // 2024-01-01 is a Monday (weekday index 1).

    #[test]
    fn weekly_projection_emits_the_block_weekdays() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let dates: Vec<NaiveDate> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 1, 15))
            .map(|o| o.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 8), d(2024, 1, 15)]);
    }

    #[test]
    fn skip_exception_suppresses_the_occurrence() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let schedule = schedule
            .apply_update(ScheduleUpdate {
                exceptions: Some(vec![ScheduleException {
                    date: d(2024, 1, 8),
                    reason: "public holiday".to_string(),
                    action: ExceptionAction::Skip,
                }]),
                ..Default::default()
            })
            .unwrap();
        let dates: Vec<NaiveDate> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 1, 15))
            .map(|o| o.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 15)]);
    }

    #[test]
    fn modify_exception_substitutes_its_blocks() {
        let makeup = block(1, t(9, 30), t(11, 0), "Makeup");
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let schedule = schedule
            .apply_update(ScheduleUpdate {
                exceptions: Some(vec![ScheduleException {
                    date: d(2024, 1, 8),
                    reason: "rescheduled".to_string(),
                    action: ExceptionAction::Modify {
                        blocks: vec![makeup.clone()],
                    },
                }]),
                ..Default::default()
            })
            .unwrap();
        let occurrences: Vec<Occurrence> = schedule
            .project_occurrences(d(2024, 1, 8), d(2024, 1, 8))
            .collect();
        assert_eq!(occurrences.len(), 1);
        assert_eq!(occurrences[0].date, d(2024, 1, 8));
        assert_eq!(occurrences[0].blocks, vec![makeup]);
    }

    #[test]
    fn duplicate_exception_dates_are_rejected() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let exception = ScheduleException {
            date: d(2024, 1, 8),
            reason: "holiday".to_string(),
            action: ExceptionAction::Skip,
        };
        let result = schedule.apply_update(ScheduleUpdate {
            exceptions: Some(vec![exception.clone(), exception]),
            ..Default::default()
        });
        assert!(matches!(result, Err(ScheduleError::Validation(_))));
    }

    #[test]
    fn projection_clips_to_the_recurrence_window() {
        let mut rule = weekly(d(2024, 1, 1));
        rule.end_date = Some(d(2024, 1, 8));
        let schedule = Schedule::create(
            owner(),
            "Short run",
            None,
            vec![block(1, t(9, 0), t(10, 0), "Math")],
            rule,
        )
        .unwrap();
        let dates: Vec<NaiveDate> = schedule
            .project_occurrences(d(2023, 12, 1), d(2024, 2, 1))
            .map(|o| o.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 8)]);
    }

    #[test]
    fn weekly_days_of_week_overrides_block_weekdays() {
        let mut rule = weekly(d(2024, 1, 1));
        // Restrict to Tuesdays even though the only block sits on Monday:
        // the mismatch is allowed and simply projects nothing.
        rule.days_of_week = Some(vec![2]);
        let schedule = Schedule::create(
            owner(),
            "Mismatch",
            None,
            vec![block(1, t(9, 0), t(10, 0), "Math")],
            rule,
        )
        .unwrap();
        let occurrences: Vec<Occurrence> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 1, 15))
            .collect();
        assert!(occurrences.is_empty());
    }

    #[test]
    fn daily_projection_emits_only_dates_with_blocks() {
        let mut rule = weekly(d(2024, 1, 1));
        rule.frequency = Frequency::Daily;
        let schedule = Schedule::create(
            owner(),
            "Daily",
            None,
            vec![
                block(1, t(9, 0), t(10, 0), "Math"),
                block(3, t(9, 0), t(10, 0), "Physics"),
            ],
            rule,
        )
        .unwrap();
        let dates: Vec<NaiveDate> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 1, 7))
            .map(|o| o.date)
            .collect();
        // Monday the 1st and Wednesday the 3rd.
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 3)]);
    }

    #[test]
    fn monthly_projection_repeats_on_the_start_day_of_month() {
        let mut rule = weekly(d(2024, 1, 1));
        rule.frequency = Frequency::Monthly;
        let schedule = Schedule::create(
            owner(),
            "Monthly",
            None,
            vec![
                block(1, t(9, 0), t(10, 0), "Math"),     // 2024-01-01 is a Monday
                block(4, t(9, 0), t(10, 0), "Physics"), // 2024-02-01 is a Thursday
            ],
            rule,
        )
        .unwrap();
        let dates: Vec<NaiveDate> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 2, 28))
            .map(|o| o.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 2, 1)]);
    }

    #[test]
    fn non_recurring_schedule_projects_only_its_start_date() {
        let mut rule = weekly(d(2024, 1, 1));
        rule.is_recurring = false;
        let schedule = Schedule::create(
            owner(),
            "One-off",
            None,
            vec![block(1, t(9, 0), t(10, 0), "Math")],
            rule,
        )
        .unwrap();
        let dates: Vec<NaiveDate> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 1, 31))
            .map(|o| o.date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1)]);
    }

    #[test]
    fn projection_is_restartable() {
        let schedule = schedule_with(vec![block(1, t(9, 0), t(10, 0), "Math")]);
        let first: Vec<Occurrence> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 1, 15))
            .collect();
        let second: Vec<Occurrence> = schedule
            .project_occurrences(d(2024, 1, 1), d(2024, 1, 15))
            .collect();
        assert_eq!(first, second);
    }
}
