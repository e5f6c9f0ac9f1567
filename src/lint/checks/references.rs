//! Reference integrity checking implementation

use crate::lint::config::LintConfig;
use crate::lint::{LintIssue, LintLevel, LintResult};
use crate::types::{Event, PreloadFileDict, TimelineRegistry};

/// Check that every key an event names resolves to something
pub fn check(registry: &TimelineRegistry, result: &mut LintResult, config: &LintConfig) {
    if config.references.check_timelines {
        check_timelines(registry, result);
    }

    if config.references.check_assets {
        check_assets(registry, result);
    }
}

/// Timeline keys a single event can navigate to
pub(crate) fn destinations(event: &Event) -> Vec<&str> {
    match event {
        Event::TimelineTransition(jump) => vec![jump.key.as_str()],
        Event::Choice(set) => set.choices.iter().map(|c| c.key.as_str()).collect(),
        Event::MultiChoice(set) => vec![set.correct_key.as_str(), set.incorrect_key.as_str()],
        _ => Vec::new(),
    }
}

fn check_timelines(registry: &TimelineRegistry, result: &mut LintResult) {
    for (name, timeline) in &registry.timelines {
        for (index, event) in timeline.iter().enumerate() {
            for key in destinations(event) {
                // Empty keys are a gate fallback, reported by the quality pass
                if !key.is_empty() && !registry.contains(key) {
                    result.add_issue(LintIssue::at(
                        LintLevel::Error,
                        "references",
                        name,
                        index,
                        format!("{} targets unknown timeline '{}'", event.tag(), key),
                    ));
                }
            }
        }
    }
}

fn check_assets(registry: &TimelineRegistry, result: &mut LintResult) {
    for (name, timeline) in &registry.timelines {
        for (index, event) in timeline.iter().enumerate() {
            let (key, dict, kind) = match event {
                Event::SetBackground(image) => (&image.key, &registry.images, "image"),
                Event::SetFrame(image) => (&image.key, &registry.images, "image"),
                Event::AddForeground(image) => (&image.key, &registry.images, "image"),
                Event::PlaySound(cue) => (&cue.key, &registry.audio, "audio"),
                Event::ClearSound(sound) => (&sound.key, &registry.audio, "audio"),
                _ => continue,
            };
            if is_missing(dict, key) {
                result.add_issue(LintIssue::at(
                    LintLevel::Warning,
                    "references",
                    name,
                    index,
                    format!("{} key '{}' is not in the preload list", kind, key),
                ));
            }
        }
    }
}

// An empty dictionary means assets are resolved elsewhere
fn is_missing(dict: &PreloadFileDict, key: &str) -> bool {
    !dict.is_empty() && !dict.contains_key(key)
}
