//! Flow analysis implementation

use crate::lint::checks::references::destinations;
use crate::lint::config::LintConfig;
use crate::lint::{LintIssue, LintLevel, LintResult};
use crate::types::{Event, Timeline, TimelineRegistry};
use std::collections::{HashSet, VecDeque};

/// Check flow issues (unreachable events, orphaned timelines)
pub fn check(registry: &TimelineRegistry, result: &mut LintResult, config: &LintConfig) {
    for (name, timeline) in &registry.timelines {
        check_unreachable_events(name, timeline, result);
    }

    if config.flow.check_orphans {
        check_orphaned_timelines(registry, result, config);
    }
}

/// Whether playback can never continue past this event
fn ends_activation(event: &Event) -> bool {
    match event {
        Event::TimelineTransition(_) | Event::SceneTransition(_) => true,
        // A gate with only real destinations always navigates away
        Event::Choice(set) => {
            !set.choices.is_empty() && set.choices.iter().all(|c| !c.key.is_empty())
        }
        Event::MultiChoice(set) => {
            !set.choices.is_empty() && !set.correct_key.is_empty() && !set.incorrect_key.is_empty()
        }
        _ => false,
    }
}

fn check_unreachable_events(name: &str, timeline: &Timeline, result: &mut LintResult) {
    let Some(exit) = timeline.iter().position(ends_activation) else {
        return;
    };
    let first_dead = exit + 1;
    if first_dead >= timeline.len() {
        return;
    }
    let count = timeline.len() - first_dead;
    result.add_issue(LintIssue::at(
        LintLevel::Warning,
        "flow",
        name,
        first_dead,
        format!(
            "{} event(s) after {} at index {} are unreachable",
            count,
            timeline.get(exit).map(Event::tag).unwrap_or("transition"),
            exit
        ),
    ));
}

/// Keys an event leads to, including a scene payload `id` the player host restarts with
fn successors(event: &Event) -> Vec<String> {
    let mut keys: Vec<String> = destinations(event)
        .into_iter()
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect();
    if let Event::SceneTransition(jump) = event
        && let Some(id) = jump
            .data
            .as_ref()
            .and_then(|data| data.get("id"))
            .and_then(|id| id.as_str())
    {
        keys.push(id.to_string());
    }
    keys
}

fn check_orphaned_timelines(registry: &TimelineRegistry, result: &mut LintResult, config: &LintConfig) {
    let entry = config.flow.entry.as_str();
    if registry.timelines.is_empty() {
        return;
    }
    if !registry.contains(entry) {
        result.add_issue(LintIssue::timeline(
            LintLevel::Warning,
            "flow",
            entry,
            "entry timeline is not registered",
        ));
        return;
    }

    let mut reachable = HashSet::new();
    let mut queue = VecDeque::new();
    reachable.insert(entry.to_string());
    queue.push_back(entry.to_string());

    while let Some(key) = queue.pop_front() {
        let Ok(timeline) = registry.get(&key) else {
            continue;
        };
        for event in timeline.iter() {
            for next in successors(event) {
                if reachable.insert(next.clone()) {
                    queue.push_back(next);
                }
            }
        }
    }

    for name in registry.keys() {
        if !reachable.contains(name) {
            result.add_issue(LintIssue::timeline(
                LintLevel::Info,
                "flow",
                name,
                format!("timeline is not reachable from '{}'", entry),
            ));
        }
    }
}
