//! Four-step check-in wizard.
//!
//! Steps only move forward. The first three end with "Continue"; the last one
//! ends with "Submit", which hands the collected fields to a callback. The
//! wizard is not reset by submitting: whoever owns it drops it.

use crate::models::MoodSubmission;
use crate::mood::{DomainError, Mood, SleepRange, validate_feeling};
use serde::Serialize;
use tracing::debug;

/// Soft cap on selected feeling tags.
pub const MAX_FEELINGS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("the last step is reached, submit instead")]
    AlreadyAtLastStep,
    #[error("submit is only available on the sleep step")]
    NotAtLastStep,
    #[error("pick how your mood was today")]
    MissingMood,
    #[error("pick how many hours you slept")]
    MissingSleep,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    OverallMood,
    Feelings,
    Journal,
    SleepHours,
}

impl Step {
    pub fn number(self) -> u8 {
        match self {
            Step::OverallMood => 1,
            Step::Feelings => 2,
            Step::Journal => 3,
            Step::SleepHours => 4,
        }
    }

    fn next(self) -> Option<Step> {
        match self {
            Step::OverallMood => Some(Step::Feelings),
            Step::Feelings => Some(Step::Journal),
            Step::Journal => Some(Step::SleepHours),
            Step::SleepHours => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodForm {
    step: Step,
    overall_mood: Option<Mood>,
    feelings: Vec<String>,
    journal_entry: String,
    sleep_hours: Option<SleepRange>,
}

impl Default for MoodForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MoodForm {
    pub fn new() -> Self {
        Self {
            step: Step::OverallMood,
            overall_mood: None,
            feelings: Vec::new(),
            journal_entry: String::new(),
            sleep_hours: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn overall_mood(&self) -> Option<Mood> {
        self.overall_mood
    }

    pub fn feelings(&self) -> &[String] {
        &self.feelings
    }

    pub fn is_last_step(&self) -> bool {
        self.step == Step::SleepHours
    }

    pub fn select_mood(&mut self, mood: Mood) {
        self.overall_mood = Some(mood);
    }

    /// Checkbox semantics: checking a selected tag or going past the cap
    /// changes nothing, unchecking removes the tag.
    pub fn toggle_feeling(&mut self, tag: &str, checked: bool) -> Result<(), FormError> {
        let tag = validate_feeling(tag)?;
        if checked {
            if self.feelings.iter().any(|feeling| feeling == tag) {
                return Ok(());
            }
            if self.feelings.len() >= MAX_FEELINGS {
                debug!(tag, "feeling ignored, cap reached");
                return Ok(());
            }
            self.feelings.push(tag.to_string());
        } else {
            self.feelings.retain(|feeling| feeling != tag);
        }
        Ok(())
    }

    /// Replaces the whole selection. Every tag is checked before anything
    /// changes; tags past the cap are ignored as with [`Self::toggle_feeling`].
    pub fn set_feelings<S: AsRef<str>>(&mut self, tags: &[S]) -> Result<(), FormError> {
        let mut selected: Vec<String> = Vec::with_capacity(MAX_FEELINGS);
        for tag in tags {
            let tag = validate_feeling(tag.as_ref())?;
            if selected.iter().any(|feeling| feeling == tag) {
                continue;
            }
            if selected.len() >= MAX_FEELINGS {
                debug!(tag, "feeling ignored, cap reached");
                continue;
            }
            selected.push(tag.to_string());
        }
        self.feelings = selected;
        Ok(())
    }

    pub fn set_journal_entry(&mut self, text: impl Into<String>) {
        self.journal_entry = text.into();
    }

    pub fn select_sleep(&mut self, range: SleepRange) {
        self.sleep_hours = Some(range);
    }

    /// "Continue".
    pub fn advance(&mut self) -> Result<Step, FormError> {
        let next = self.step.next().ok_or(FormError::AlreadyAtLastStep)?;
        self.step = next;
        Ok(next)
    }

    /// Packages the four fields. Only mood and sleep have to be filled in.
    pub fn submission(&self) -> Result<MoodSubmission, FormError> {
        if !self.is_last_step() {
            return Err(FormError::NotAtLastStep);
        }
        let overall_mood = self.overall_mood.ok_or(FormError::MissingMood)?;
        let sleep_hours = self.sleep_hours.ok_or(FormError::MissingSleep)?;
        Ok(MoodSubmission {
            overall_mood,
            feelings: self.feelings.clone(),
            journal_entry: self.journal_entry.clone(),
            sleep_hours,
        })
    }

    /// "Submit": calls `on_submit` once with the packaged fields.
    pub fn submit<R>(&self, on_submit: impl FnOnce(MoodSubmission) -> R) -> Result<R, FormError> {
        let submission = self.submission()?;
        Ok(on_submit(submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_form() -> MoodForm {
        let mut form = MoodForm::new();
        form.select_mood(Mood::Happy);
        form.advance().unwrap();
        form.toggle_feeling("joyful", true).unwrap();
        form.toggle_feeling("calm", true).unwrap();
        form.advance().unwrap();
        form.set_journal_entry("Went for a long walk.");
        form.advance().unwrap();
        form.select_sleep(SleepRange::SevenToEight);
        form
    }

    #[test]
    fn steps_move_forward_to_sleep() {
        let mut form = MoodForm::new();
        assert_eq!(form.step().number(), 1);
        assert_eq!(form.advance().unwrap(), Step::Feelings);
        assert_eq!(form.advance().unwrap(), Step::Journal);
        assert_eq!(form.advance().unwrap(), Step::SleepHours);
        assert_eq!(form.advance(), Err(FormError::AlreadyAtLastStep));
        assert_eq!(form.step().number(), 4);
    }

    #[test]
    fn submit_calls_back_once_with_every_field() {
        let form = filled_form();
        let mut calls = Vec::new();
        form.submit(|submission| calls.push(submission)).unwrap();

        assert_eq!(calls.len(), 1);
        let submission = &calls[0];
        assert_eq!(submission.overall_mood, Mood::Happy);
        assert_eq!(submission.feelings, vec!["joyful", "calm"]);
        assert_eq!(submission.journal_entry, "Went for a long walk.");
        assert_eq!(submission.sleep_hours, SleepRange::SevenToEight);
    }

    #[test]
    fn submit_before_last_step_is_refused() {
        let mut form = MoodForm::new();
        form.select_mood(Mood::Sad);
        let mut called = false;
        let result = form.submit(|_| called = true);
        assert_eq!(result, Err(FormError::NotAtLastStep));
        assert!(!called);
    }

    #[test]
    fn submit_requires_mood_and_sleep() {
        let mut form = MoodForm::new();
        for _ in 0..3 {
            form.advance().unwrap();
        }
        assert_eq!(form.submission(), Err(FormError::MissingMood));
        form.select_mood(Mood::Neutral);
        assert_eq!(form.submission(), Err(FormError::MissingSleep));
        form.select_sleep(SleepRange::NinePlus);
        assert!(form.submission().is_ok());
    }

    #[test]
    fn submitting_does_not_reset_the_form() {
        let form = filled_form();
        form.submit(|_| ()).unwrap();
        assert_eq!(form.step(), Step::SleepHours);
        assert_eq!(form.overall_mood(), Some(Mood::Happy));
    }

    #[test]
    fn feelings_toggle_like_checkboxes() {
        let mut form = MoodForm::new();
        form.toggle_feeling("joyful", true).unwrap();
        form.toggle_feeling("joyful", true).unwrap();
        assert_eq!(form.feelings(), ["joyful"]);
        form.toggle_feeling("joyful", false).unwrap();
        assert!(form.feelings().is_empty());
        assert!(form.toggle_feeling("sleepy", true).is_err());
    }

    #[test]
    fn fourth_feeling_is_ignored() {
        let mut form = MoodForm::new();
        for tag in ["joyful", "calm", "hopeful", "relaxed"] {
            form.toggle_feeling(tag, true).unwrap();
        }
        assert_eq!(form.feelings(), ["joyful", "calm", "hopeful"]);
    }

    #[test]
    fn replacing_feelings_with_an_unknown_tag_keeps_the_old_selection() {
        let mut form = MoodForm::new();
        form.set_feelings(&["joyful", "hopeful"]).unwrap();

        let err = form.set_feelings(&["calm", "sleepy"]).unwrap_err();

        assert_eq!(err, FormError::Domain(DomainError::UnknownFeeling("sleepy".into())));
        assert_eq!(form.feelings(), ["joyful", "hopeful"]);
    }

    #[test]
    fn replacing_feelings_applies_cap_and_drops_duplicates() {
        let mut form = MoodForm::new();
        form.toggle_feeling("down", true).unwrap();

        form.set_feelings(&["calm", "calm", "relaxed", "hopeful", "joyful"])
            .unwrap();

        assert_eq!(form.feelings(), ["calm", "relaxed", "hopeful"]);
    }
}
