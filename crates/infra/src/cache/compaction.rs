//! Lossy size reduction for conversation contexts
//!
//! Two transforms, both idempotent:
//! - **Compaction** (every context write and every optimization pass): keep
//!   the newest turns of the history and summarize a long emotional
//!   trajectory down to its significant changes plus the newest points.
//! - **Trimming** (lazily, on the first read of an entry flagged as
//!   oversized): cap each text field at a character budget.

use convointel_domain::{CompactionSettings, ConversationContext, EmotionalPoint};

/// Applies [`CompactionSettings`] to contexts in place
#[derive(Debug, Clone, Default)]
pub struct ContextCompactor {
    settings: CompactionSettings,
}

impl ContextCompactor {
    /// Compactor applying `settings`
    pub fn new(settings: CompactionSettings) -> Self {
        Self { settings }
    }

    /// Limits this compactor applies
    pub fn settings(&self) -> &CompactionSettings {
        &self.settings
    }

    /// Whether [`compact`](Self::compact) would change `context`
    pub fn needs_compaction(&self, context: &ConversationContext) -> bool {
        context.history.len() > self.settings.history_window
            || context.emotional_trajectory.len() > self.settings.trajectory_cap
    }

    /// Truncate history and summarize the trajectory, returning bytes saved
    ///
    /// A context already within bounds is left untouched, so compacting twice
    /// loses nothing beyond the first pass.
    pub fn compact(&self, context: &mut ConversationContext) -> usize {
        if !self.needs_compaction(context) {
            return 0;
        }

        let before = context.estimated_bytes();

        let window = self.settings.history_window;
        if context.history.len() > window {
            let excess = context.history.len() - window;
            context.history.drain(..excess);
        }

        if context.emotional_trajectory.len() > self.settings.trajectory_cap {
            context.emotional_trajectory = self.summarize(&context.emotional_trajectory);
        }

        before.saturating_sub(context.estimated_bytes())
    }

    fn summarize(&self, trajectory: &[EmotionalPoint]) -> Vec<EmotionalPoint> {
        let CompactionSettings { trajectory_cap, trajectory_recent, significance_threshold, .. } =
            self.settings;

        let split = trajectory.len().saturating_sub(trajectory_recent);
        let (older, recent) = trajectory.split_at(split);

        // An older point survives when it moved far enough from its predecessor.
        let mut kept: Vec<EmotionalPoint> = older
            .windows(2)
            .filter(|pair| pair[0].distance(&pair[1]) > significance_threshold)
            .map(|pair| pair[1])
            .collect();
        kept.extend_from_slice(recent);

        if kept.len() > trajectory_cap {
            kept.drain(..kept.len() - trajectory_cap);
        }
        kept
    }

    /// Whether the estimated payload exceeds the per-entry budget
    pub fn is_oversized(&self, context: &ConversationContext) -> bool {
        context.estimated_bytes() > self.settings.oversized_context_bytes
    }

    /// Cap every turn text and the summary at `max_turn_chars` characters
    ///
    /// Returns bytes saved. Truncation respects character boundaries.
    pub fn trim_oversized(&self, context: &mut ConversationContext) -> usize {
        let before = context.estimated_bytes();
        let limit = self.settings.max_turn_chars;

        for turn in &mut context.history {
            truncate_chars(&mut turn.original_text, limit);
            truncate_chars(&mut turn.translated_text, limit);
        }
        if let Some(summary) = context.summary.as_mut() {
            truncate_chars(summary, limit);
        }

        before.saturating_sub(context.estimated_bytes())
    }
}

fn truncate_chars(text: &mut String, max_chars: usize) {
    if let Some((byte_index, _)) = text.char_indices().nth(max_chars) {
        text.truncate(byte_index);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, Utc};
    use convointel_domain::{ConversationTurn, Speaker};

    use super::*;

    fn context_with(turns: usize, points: &[(f64, f64)]) -> ConversationContext {
        let start = Utc::now();
        let mut context = ConversationContext::new("conv", "en", "ja");
        context.history = (0..turns)
            .map(|i| {
                ConversationTurn::new(
                    format!("t{i}"),
                    Speaker::User,
                    format!("original {i}"),
                    format!("translated {i}"),
                    start + ChronoDuration::seconds(i as i64),
                )
            })
            .collect();
        context.emotional_trajectory = points
            .iter()
            .enumerate()
            .map(|(i, (v, a))| EmotionalPoint::new(*v, *a, start + ChronoDuration::seconds(i as i64)))
            .collect();
        context
    }

    fn valences(context: &ConversationContext) -> Vec<f64> {
        context.emotional_trajectory.iter().map(|p| p.valence).collect()
    }

    /// Validates history truncation idempotence.
    ///
    /// Assertions:
    /// - Confirms 25 turns are cut to the newest 20.
    /// - Confirms a second pass changes nothing and saves no bytes.
    #[test]
    fn test_history_truncation_is_idempotent() {
        let compactor = ContextCompactor::default();
        let mut context = context_with(25, &[]);

        assert!(compactor.compact(&mut context) > 0);
        assert_eq!(context.history.len(), 20);
        assert_eq!(context.history[0].id, "t5");
        assert_eq!(context.history[19].id, "t24");

        let once = context.clone();
        assert_eq!(compactor.compact(&mut context), 0);
        assert_eq!(context, once);
    }

    #[test]
    fn test_short_trajectory_untouched() {
        let compactor = ContextCompactor::default();
        let points: Vec<(f64, f64)> = (0..10).map(|i| (i as f64 / 100.0, 0.0)).collect();
        let mut context = context_with(3, &points);

        assert!(!compactor.needs_compaction(&context));
        assert_eq!(compactor.compact(&mut context), 0);
        assert_eq!(context.emotional_trajectory.len(), 10);
    }

    /// Validates the significant-change filter.
    ///
    /// 12 points: 7 older, 5 recent. Among the older points, only the jumps
    /// 0.0 → 0.5 (index 2) and 0.5 → -0.3 (index 5) exceed 0.3.
    ///
    /// Assertions:
    /// - Confirms the result is the two significant points plus the 5 recent.
    #[test]
    fn test_trajectory_keeps_significant_and_recent() {
        let compactor = ContextCompactor::default();
        let points = [
            (0.0, 0.0),
            (0.1, 0.0),
            (0.5, 0.0),
            (0.6, 0.0),
            (0.55, 0.0),
            (-0.3, 0.0),
            (-0.25, 0.0),
            (0.9, 0.0),
            (0.91, 0.0),
            (0.92, 0.0),
            (0.93, 0.0),
            (0.94, 0.0),
        ];
        let mut context = context_with(1, &points);

        compactor.compact(&mut context);

        assert_eq!(valences(&context), vec![0.5, -0.3, 0.9, 0.91, 0.92, 0.93, 0.94]);
    }

    /// Validates the final cap when too many older points are significant.
    ///
    /// Assertions:
    /// - Confirms only the newest 10 survive.
    /// - Confirms the 5 recent points are the tail.
    #[test]
    fn test_trajectory_capped_to_newest() {
        let compactor = ContextCompactor::default();
        // Alternating jumps of 1.0 make every older point significant.
        let points: Vec<(f64, f64)> =
            (0..20).map(|i| (if i % 2 == 0 { -0.5 } else { 0.5 }, i as f64 / 100.0)).collect();
        let mut context = context_with(1, &points);

        compactor.compact(&mut context);

        assert_eq!(context.emotional_trajectory.len(), 10);
        let arousal: Vec<f64> = context.emotional_trajectory.iter().map(|p| p.arousal).collect();
        let expected: Vec<f64> = (10..20).map(|i| i as f64 / 100.0).collect();
        assert_eq!(arousal, expected);

        let once = context.clone();
        compactor.compact(&mut context);
        assert_eq!(context, once);
    }

    #[test]
    fn test_trim_oversized_respects_char_boundaries() {
        let settings = CompactionSettings { max_turn_chars: 3, ..CompactionSettings::default() };
        let compactor = ContextCompactor::new(settings);
        let mut context = context_with(0, &[]);
        context.history.push(ConversationTurn::new(
            "t0",
            Speaker::Counterpart,
            "こんにちは",
            "hello",
            Utc::now(),
        ));
        context.summary = Some("ab".into());

        let saved = compactor.trim_oversized(&mut context);

        assert_eq!(context.history[0].original_text, "こんに");
        assert_eq!(context.history[0].translated_text, "hel");
        assert_eq!(context.summary.as_deref(), Some("ab"));
        assert_eq!(saved, "ちは".len() + "lo".len());
        assert_eq!(compactor.trim_oversized(&mut context), 0);
    }

    #[test]
    fn test_is_oversized() {
        let settings =
            CompactionSettings { oversized_context_bytes: 1_000, ..CompactionSettings::default() };
        let compactor = ContextCompactor::new(settings);
        let mut context = context_with(1, &[]);
        assert!(!compactor.is_oversized(&context));

        context.history[0].original_text = "x".repeat(2_000);
        assert!(compactor.is_oversized(&context));
    }
}
