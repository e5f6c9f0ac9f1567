//! Tests for the runtime module

use super::*;
use crate::recording::{RecordingSurface, SurfaceCommand};
use crate::surface::{ButtonState, Position};
use crate::types::{
    BackgroundImage, Choice, ChoiceSet, DialogLine, ForegroundImage, FrameImage, MultiChoice,
    MultiChoiceSet, SceneJump, SoundCue, SoundKey, TimelineJump, WebLink,
};

fn config() -> PlayerConfig {
    PlayerConfig {
        seed: Some(42),
        ..PlayerConfig::default()
    }
}

fn dialog(text: &str) -> Event {
    Event::SetDialog(DialogLine::new(text))
}

fn background(key: &str, effect: Option<&str>) -> Event {
    Event::SetBackground(BackgroundImage {
        key: key.to_string(),
        x: None,
        y: None,
        effect: effect.map(str::to_string),
    })
}

fn foreground(key: &str) -> Event {
    Event::AddForeground(ForegroundImage {
        key: key.to_string(),
        x: None,
        y: None,
    })
}

fn quiz(shuffle: bool, min_select: usize, max_select: Option<usize>) -> Event {
    Event::MultiChoice(MultiChoiceSet {
        choices: vec![
            MultiChoice::new("A", true),
            MultiChoice::new("B", false),
            MultiChoice::new("C", true),
        ],
        correct_key: "test_correct".to_string(),
        incorrect_key: "test_incorrect".to_string(),
        min_select,
        max_select,
        shuffle,
    })
}

fn multi_gate<'p>(player: &'p TimelinePlayer<'_, RecordingSurface>) -> &'p MultiChoiceGate {
    match player.gate() {
        Some(Gate::Multi(gate)) => gate,
        other => panic!("Expected multi-choice gate, got {other:?}"),
    }
}

#[test]
fn immediate_events_run_until_dialog() {
    let timeline = Timeline::new(vec![
        Event::ClearForeground,
        Event::ClearBackground,
        background("sample01", None),
        Event::PlaySound(SoundCue {
            key: "bgm".to_string(),
            looping: true,
        }),
        dialog("Hello"),
        dialog("World"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    let progress = player.start(&timeline);

    assert_eq!(progress, Progress::Typing);
    assert_eq!(player.index(), 5);
    assert_eq!(player.surface().background.as_ref().unwrap().key, "sample01");
    assert!(player.surface().sounds.contains_key("bgm"));
}

#[test]
fn advance_during_typing_only_completes_the_line() {
    let timeline = Timeline::new(vec![dialog("Hello"), dialog("World")]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    player.tick(Duration::from_millis(100));
    assert_eq!(player.surface().dialog_text, "He");

    // First trigger fast-forwards
    assert_eq!(player.advance(), Progress::WaitInput);
    assert_eq!(player.surface().dialog_text, "Hello");
    assert_eq!(player.index(), 1);
    assert!(!player.is_typing());

    // Second trigger moves on
    assert_eq!(player.advance(), Progress::Typing);
    assert_eq!(player.index(), 2);
    assert_eq!(player.surface().dialog_text, "");
}

#[test]
fn finished_reveal_still_waits_for_input() {
    let timeline = Timeline::new(vec![dialog("Hi"), Event::ClearDialog]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    assert_eq!(player.tick(Duration::from_millis(50)), Progress::Typing);
    assert_eq!(player.tick(Duration::from_millis(50)), Progress::WaitInput);
    assert_eq!(player.surface().dialog_text, "Hi");
    assert_eq!(player.index(), 1);

    // Nothing left to reveal, more time changes nothing
    assert_eq!(player.tick(Duration::from_secs(3)), Progress::WaitInput);
    assert_eq!(player.index(), 1);

    assert_eq!(player.advance(), Progress::Ended);
    assert_eq!(player.surface().dialog_text, "");
}

#[test]
fn dialog_actor_label_set_and_cleared() {
    let timeline = Timeline::new(vec![
        Event::SetDialog(DialogLine::new("Hi").spoken_by("Aki")),
        dialog("Narration"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    assert_eq!(player.surface().actor_name.as_deref(), Some("Aki"));
    player.advance();
    player.advance();
    assert_eq!(player.surface().actor_name, None);
}

#[test]
fn end_of_timeline_is_terminal() {
    let timeline = Timeline::new(vec![Event::ClearBackground]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(player.start(&timeline), Progress::Ended);
    assert_eq!(player.advance(), Progress::Ended);
    assert_eq!(player.index(), 1);
}

#[test]
fn background_fades() {
    let timeline = Timeline::new(vec![
        background("a", Some("fadein")),
        dialog("x"),
        background("b", Some("fadeout")),
        dialog("y"),
        background("c", Some("dissolve")),
        dialog("z"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());
    let second = Duration::from_millis(1000);

    player.start(&timeline);
    let fade = player.surface().background.as_ref().unwrap().fade;
    assert_eq!(fade, Fade::In(second));
    assert_eq!(fade.initial_alpha(), 0.0);

    player.advance();
    player.advance();
    let fade = player.surface().background.as_ref().unwrap().fade;
    assert_eq!(fade, Fade::Out(second));
    assert_eq!(fade.initial_alpha(), 1.0);
    assert_eq!(fade.target_alpha(), 0.0);

    player.advance();
    player.advance();
    let placed = player.surface().background.as_ref().unwrap();
    assert_eq!(placed.key, "c");
    assert_eq!(placed.fade, Fade::None);
    assert_eq!(placed.at, Position::new(480.0, 400.0));
}

#[test]
fn foreground_is_additive_and_frame_is_centered() {
    let timeline = Timeline::new(vec![
        foreground("left"),
        Event::AddForeground(ForegroundImage {
            key: "right".to_string(),
            x: Some(700.0),
            y: None,
        }),
        Event::SetFrame(FrameImage {
            key: "frame".to_string(),
            x: Some(1.0),
            y: Some(1.0),
        }),
        dialog("two actors"),
        Event::ClearForeground,
        dialog("nobody"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    assert_eq!(player.surface().foreground.len(), 2);
    assert_eq!(player.surface().foreground[1].at, Position::new(700.0, 400.0));
    assert_eq!(
        player.surface().frame.as_ref().unwrap().at,
        Position::new(480.0, 400.0)
    );

    player.advance();
    player.advance();
    assert!(player.surface().foreground.is_empty());
}

#[test]
fn play_sound_twice_keeps_one_instance() {
    let cue = Event::PlaySound(SoundCue {
        key: "bgm".to_string(),
        looping: false,
    });
    let timeline = Timeline::new(vec![
        cue.clone(),
        cue,
        Event::ClearSound(SoundKey {
            key: "se".to_string(),
        }),
        dialog("x"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    let plays = player
        .surface()
        .commands()
        .iter()
        .filter(|c| matches!(c, SurfaceCommand::PlaySound { .. }))
        .count();
    assert_eq!(plays, 1);
    // Clearing a sound that is not playing is a no-op
    assert!(
        !player
            .surface()
            .commands()
            .iter()
            .any(|c| matches!(c, SurfaceCommand::StopSound { .. }))
    );
}

#[test]
fn clear_sound_stops_playing_sound() {
    let timeline = Timeline::new(vec![
        Event::PlaySound(SoundCue {
            key: "bgm".to_string(),
            looping: true,
        }),
        dialog("x"),
        Event::ClearSound(SoundKey {
            key: "bgm".to_string(),
        }),
        dialog("y"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    player.advance();
    player.advance();
    assert!(player.surface().sounds.is_empty());
}

#[test]
fn timeline_transition_ends_the_player() {
    let timeline = Timeline::new(vec![
        background("sample01", None),
        Event::ClearDialog,
        Event::TimelineTransition(TimelineJump {
            key: "unit02".to_string(),
        }),
        dialog("never"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    let progress = player.start(&timeline);
    assert_eq!(
        progress,
        Progress::Navigate(Navigation::Restart {
            timeline: "unit02".to_string()
        })
    );
    assert!(progress.is_terminal());
    assert_eq!(player.advance(), Progress::Finished);
    assert_eq!(player.tick(Duration::from_secs(1)), Progress::Finished);
    assert_eq!(player.index(), 3);
}

#[test]
fn scene_transition_carries_payload() {
    let data = serde_json::json!({ "id": "start" });
    let timeline = Timeline::new(vec![Event::SceneTransition(SceneJump {
        key: "ending".to_string(),
        data: Some(data.clone()),
    })]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(
        player.start(&timeline),
        Progress::Navigate(Navigation::Scene {
            scene: "ending".to_string(),
            data: Some(data)
        })
    );
}

#[test]
fn single_choice_disables_advance_and_resolves() {
    let timeline = Timeline::new(vec![
        Event::Choice(ChoiceSet {
            choices: vec![Choice::new("unit01", "unit01"), Choice::new("test", "test")],
        }),
        dialog("unreachable"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(player.start(&timeline), Progress::WaitChoice);
    assert!(!player.surface().advance_enabled);
    assert_eq!(player.surface().buttons.len(), 2);

    // Pointer downs do nothing while the gate is open
    assert_eq!(player.advance(), Progress::WaitChoice);
    assert_eq!(player.index(), 1);

    assert_eq!(player.press(ButtonId(9)), Progress::WaitChoice);
    assert_eq!(
        player.press(ButtonId(1)),
        Progress::Navigate(Navigation::Restart {
            timeline: "test".to_string()
        })
    );
    assert_eq!(player.press(ButtonId(0)), Progress::Finished);
}

#[test]
fn empty_choice_list_waits_for_input() {
    let timeline = Timeline::new(vec![
        Event::Choice(ChoiceSet { choices: vec![] }),
        dialog("after"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(player.start(&timeline), Progress::WaitInput);
    assert!(player.gate().is_none());
    assert!(player.surface().advance_enabled);
    assert_eq!(player.advance(), Progress::Typing);
}

#[test]
fn multi_choice_correct_selection() {
    let timeline = Timeline::new(vec![quiz(false, 0, None)]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(player.start(&timeline), Progress::WaitChoice);
    assert_eq!(player.surface().buttons.len(), 4);

    player.press(ButtonId(0));
    player.press(ButtonId(2));
    assert_eq!(player.surface().button_state(ButtonId(0)), Some(ButtonState::Selected));
    assert_eq!(player.surface().button_state(ButtonId(1)), Some(ButtonState::Idle));

    assert_eq!(
        player.press(ButtonId(3)),
        Progress::Navigate(Navigation::Restart {
            timeline: "test_correct".to_string()
        })
    );
}

#[test]
fn multi_choice_partial_selection_is_incorrect() {
    let timeline = Timeline::new(vec![quiz(false, 0, None)]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    player.press(ButtonId(0));
    assert_eq!(
        player.press(ButtonId(3)),
        Progress::Navigate(Navigation::Restart {
            timeline: "test_incorrect".to_string()
        })
    );
}

#[test]
fn multi_choice_min_select_blocks_confirm() {
    let timeline = Timeline::new(vec![quiz(false, 1, None)]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    assert_eq!(player.press(ButtonId(3)), Progress::WaitChoice);
    assert!(player.navigation().is_none());
    assert!(!player.is_advance_enabled());
}

#[test]
fn multi_choice_max_select_caps_selection() {
    let timeline = Timeline::new(vec![quiz(false, 0, Some(2))]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    player.press(ButtonId(0));
    player.press(ButtonId(1));
    player.press(ButtonId(2));
    assert_eq!(multi_gate(&player).selected().len(), 2);
    assert_eq!(player.surface().button_state(ButtonId(2)), Some(ButtonState::Idle));
}

#[test]
fn shuffled_multi_choice_grades_by_identity() {
    for seed in 0..8 {
        let timeline = Timeline::new(vec![quiz(true, 0, None)]);
        let mut surface = RecordingSurface::default();
        let mut player = TimelinePlayer::new(
            &mut surface,
            PlayerConfig {
                seed: Some(seed),
                ..PlayerConfig::default()
            },
        );

        player.start(&timeline);
        let a = multi_gate(&player).button_for(0).unwrap();
        let c = multi_gate(&player).button_for(2).unwrap();
        let confirm = multi_gate(&player).confirm_button();

        // Labels follow the display order
        let labels: Vec<&str> = player
            .surface()
            .buttons
            .iter()
            .map(|(spec, _)| spec.label.as_str())
            .collect();
        assert_eq!(labels[a.0], "A");
        assert_eq!(labels[c.0], "C");

        player.press(a);
        player.press(c);
        assert_eq!(
            player.press(confirm),
            Progress::Navigate(Navigation::Restart {
                timeline: "test_correct".to_string()
            }),
            "seed {seed}"
        );
    }
}

#[test]
fn empty_destination_rearms_advance() {
    let timeline = Timeline::new(vec![
        Event::MultiChoice(MultiChoiceSet {
            choices: vec![MultiChoice::new("A", true)],
            correct_key: String::new(),
            incorrect_key: "wrong".to_string(),
            min_select: 0,
            max_select: None,
            shuffle: false,
        }),
        Event::TimelineTransition(TimelineJump {
            key: "ending".to_string(),
        }),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    player.press(ButtonId(0));
    assert_eq!(player.press(ButtonId(1)), Progress::WaitInput);
    assert!(player.is_advance_enabled());
    assert!(player.surface().advance_enabled);
    assert!(player.navigation().is_none());

    assert_eq!(
        player.advance(),
        Progress::Navigate(Navigation::Restart {
            timeline: "ending".to_string()
        })
    );
}

#[test]
fn gate_after_fallback_replaces_stale_buttons() {
    let gate = |label: &str, key: &str| {
        Event::MultiChoice(MultiChoiceSet {
            choices: vec![MultiChoice::new(label, true)],
            correct_key: key.to_string(),
            incorrect_key: key.to_string(),
            min_select: 0,
            max_select: None,
            shuffle: false,
        })
    };
    let timeline = Timeline::new(vec![gate("A", ""), gate("X", "next")]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    player.start(&timeline);
    player.press(ButtonId(0));
    assert_eq!(player.press(ButtonId(1)), Progress::WaitInput);
    assert_eq!(player.advance(), Progress::WaitChoice);

    player.press(ButtonId(0));
    let buttons: Vec<(&str, ButtonState)> = player
        .surface()
        .buttons
        .iter()
        .map(|(spec, state)| (spec.label.as_str(), *state))
        .collect();
    assert_eq!(
        buttons,
        vec![("X", ButtonState::Selected), ("Confirm", ButtonState::Idle)]
    );
    assert!(
        player
            .surface()
            .commands()
            .contains(&SurfaceCommand::ClearButtons)
    );
}

#[test]
fn pacing_decides_where_the_player_stops() {
    let events = vec![
        dialog("line"),
        Event::ClearDialog,
        background("bg", Some("fadein")),
        Event::ClearBackground,
        Event::SetFrame(FrameImage {
            key: "frame".to_string(),
            x: None,
            y: None,
        }),
        foreground("fg"),
        Event::ClearForeground,
        Event::TimelineTransition(TimelineJump {
            key: "next".to_string(),
        }),
        Event::SceneTransition(SceneJump {
            key: "main".to_string(),
            data: None,
        }),
        Event::Choice(ChoiceSet {
            choices: vec![Choice::new("Go", "next")],
        }),
        quiz(false, 1, None),
        Event::ShowWebLink(WebLink {
            url: "https://example.com".to_string(),
            text: None,
            target: None,
        }),
        Event::HideWebLink,
        Event::PlaySound(SoundCue {
            key: "se".to_string(),
            looping: false,
        }),
        Event::ClearSound(SoundKey {
            key: "se".to_string(),
        }),
        Event::Unknown,
    ];

    for event in events {
        let timeline = Timeline::new(vec![event.clone(), dialog("after")]);
        let mut surface = RecordingSurface::default();
        let mut player = TimelinePlayer::new(&mut surface, config());
        let progress = player.start(&timeline);

        match event.pacing() {
            Pacing::Blocking => assert_eq!(player.index(), 1, "{} should block", event.tag()),
            Pacing::Immediate => {
                assert_eq!(player.index(), 2, "{} should not block", event.tag());
                assert_eq!(progress, Progress::Typing);
            }
        }
    }
}

#[test]
fn web_link_blocks_and_hide_is_immediate() {
    let timeline = Timeline::new(vec![
        Event::ShowWebLink(WebLink {
            url: "https://example.com".to_string(),
            text: None,
            target: None,
        }),
        Event::HideWebLink,
        dialog("back"),
    ]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(player.start(&timeline), Progress::WaitInput);
    let link = player.surface().web_link.clone().unwrap();
    assert_eq!(link.text, "https://example.com");
    assert_eq!(link.target, "_blank");

    assert_eq!(player.advance(), Progress::Typing);
    assert!(player.surface().web_link.is_none());
}

#[test]
fn unknown_event_stalls_then_continues() {
    let timeline = Timeline::new(vec![Event::Unknown, dialog("after")]);
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(player.start(&timeline), Progress::Stalled);
    assert_eq!(player.index(), 1);
    assert_eq!(player.advance(), Progress::Typing);
}

#[test]
fn start_at_resumes_mid_timeline() {
    let mut registry = TimelineRegistry::new();
    registry.insert(
        "start",
        Timeline::new(vec![dialog("one"), background("bg", None), dialog("two")]),
    );
    let mut surface = RecordingSurface::default();
    let snapshot = {
        let mut player = TimelinePlayer::new(&mut surface, config());
        player.start_key(&registry, "start").unwrap();
        player.snapshot()
    };
    assert_eq!(
        snapshot,
        CursorSnapshot {
            timeline_key: Some("start".to_string()),
            index: 1
        }
    );

    surface.reset_scene();
    let mut player = TimelinePlayer::new(&mut surface, config());
    assert_eq!(player.resume(&registry, &snapshot).unwrap(), Progress::Typing);
    assert_eq!(player.index(), 3);
    assert_eq!(player.surface().background.as_ref().unwrap().key, "bg");
}

#[test]
fn start_key_rejects_unknown_timeline() {
    let registry = TimelineRegistry::new();
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());
    assert!(matches!(
        player.start_key(&registry, "nope"),
        Err(PlayerError::UnknownTimeline { .. })
    ));
}

#[test]
fn resume_point_replays_the_waiting_event() {
    let mut registry = TimelineRegistry::new();
    registry.insert(
        "start",
        Timeline::new(vec![
            background("bg", None),
            dialog("one"),
            Event::Choice(ChoiceSet {
                choices: vec![Choice::new("Go", "next")],
            }),
        ]),
    );
    let mut surface = RecordingSurface::default();
    let mut player = TimelinePlayer::new(&mut surface, config());

    assert_eq!(player.start_key(&registry, "start").unwrap(), Progress::Typing);
    assert_eq!(player.resume_point().index, 1);

    player.advance();
    assert_eq!(player.advance(), Progress::WaitChoice);
    assert_eq!(player.snapshot().index, 3);
    assert_eq!(player.resume_point().index, 2);

    let snapshot = player.resume_point();
    drop(player);
    surface.reset_scene();
    let mut player = TimelinePlayer::new(&mut surface, config());
    assert_eq!(
        player.resume(&registry, &snapshot).unwrap(),
        Progress::WaitChoice
    );
}
