//! Quality checking implementation

use crate::lint::config::LintConfig;
use crate::lint::{LintIssue, LintLevel, LintResult};
use crate::types::{Event, MultiChoiceSet, TimelineRegistry};

/// Check gate sanity, unknown events and long dialog lines
pub fn check(registry: &TimelineRegistry, result: &mut LintResult, config: &LintConfig) {
    for (name, timeline) in &registry.timelines {
        for (index, event) in timeline.iter().enumerate() {
            match event {
                Event::Choice(set) => {
                    if set.choices.is_empty() {
                        result.add_issue(empty_gate(name, index, event));
                    }
                    if set.choices.iter().any(|choice| choice.key.is_empty()) {
                        result.add_issue(LintIssue::at(
                            LintLevel::Warning,
                            "quality",
                            name,
                            index,
                            "choice with an empty key re-enables the hit area instead of navigating",
                        ));
                    }
                }
                Event::MultiChoice(set) => {
                    if set.choices.is_empty() {
                        result.add_issue(empty_gate(name, index, event));
                    } else {
                        check_selection_bounds(set, name, index, result);
                    }
                    if set.correct_key.is_empty() || set.incorrect_key.is_empty() {
                        result.add_issue(LintIssue::at(
                            LintLevel::Warning,
                            "quality",
                            name,
                            index,
                            "multi_choice has an empty destination key",
                        ));
                    }
                }
                Event::SetDialog(line) => {
                    let length = line.text.chars().count();
                    if length > config.quality.max_text_length {
                        result.add_issue(LintIssue::at(
                            LintLevel::Info,
                            "quality",
                            name,
                            index,
                            format!(
                                "Text length {} exceeds recommended maximum of {}",
                                length, config.quality.max_text_length
                            ),
                        ));
                    }
                }
                Event::Unknown => {
                    result.add_issue(LintIssue::at(
                        LintLevel::Warning,
                        "quality",
                        name,
                        index,
                        "unknown event kind; playback stalls here until the next pointer down",
                    ));
                }
                _ => {}
            }
        }
    }
}

fn empty_gate(name: &str, index: usize, event: &Event) -> LintIssue {
    LintIssue::at(
        LintLevel::Warning,
        "quality",
        name,
        index,
        format!("{} has no options; no gate will open", event.tag()),
    )
}

fn check_selection_bounds(set: &MultiChoiceSet, name: &str, index: usize, result: &mut LintResult) {
    let options = set.choices.len();

    if let Some(max) = set.max_select
        && set.min_select > max
    {
        result.add_issue(LintIssue::at(
            LintLevel::Error,
            "quality",
            name,
            index,
            format!("minSelect {} exceeds maxSelect {}", set.min_select, max),
        ));
    }

    if set.min_select > options {
        result.add_issue(LintIssue::at(
            LintLevel::Error,
            "quality",
            name,
            index,
            format!(
                "minSelect {} exceeds the {} available options; confirm can never resolve",
                set.min_select, options
            ),
        ));
    }

    if !set.choices.iter().any(|choice| choice.correct) {
        result.add_issue(LintIssue::at(
            LintLevel::Warning,
            "quality",
            name,
            index,
            "no option is marked correct; only an empty selection is graded correct",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChoiceSet, DialogLine, MultiChoice, Timeline};

    fn multi(choices: Vec<MultiChoice>, min: usize, max: Option<usize>) -> Event {
        Event::MultiChoice(MultiChoiceSet {
            choices,
            correct_key: "ok".to_string(),
            incorrect_key: "ng".to_string(),
            min_select: min,
            max_select: max,
            shuffle: false,
        })
    }

    fn run(events: Vec<Event>) -> LintResult {
        let mut registry = TimelineRegistry::new();
        registry.insert("start", Timeline::new(events));
        let mut result = LintResult::new();
        check(&registry, &mut result, &LintConfig::default());
        result
    }

    #[test]
    fn quality_check_empty_choices() {
        let result = run(vec![Event::Choice(ChoiceSet { choices: vec![] })]);

        assert_eq!(result.warning_count, 1);
        assert!(result.issues[0].message.contains("no options"));
    }

    #[test]
    fn quality_check_selection_bounds() {
        let result = run(vec![multi(
            vec![MultiChoice::new("A", true), MultiChoice::new("B", false)],
            3,
            Some(1),
        )]);

        assert_eq!(result.error_count, 2);
        assert!(result.issues[0].message.contains("exceeds maxSelect"));
        assert!(result.issues[1].message.contains("available options"));
    }

    #[test]
    fn quality_check_no_correct_option() {
        let result = run(vec![multi(vec![MultiChoice::new("A", false)], 0, None)]);

        assert_eq!(result.warning_count, 1);
        assert!(result.issues[0].message.contains("marked correct"));
    }

    #[test]
    fn quality_check_unknown_event_and_long_text() {
        let result = run(vec![
            Event::Unknown,
            Event::SetDialog(DialogLine::new("あ".repeat(201))),
        ]);

        assert_eq!(result.warning_count, 1);
        assert_eq!(result.info_count, 1);
        assert_eq!(result.issues[1].index, Some(1));
    }
}
