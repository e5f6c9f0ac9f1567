//! Choice gates
//!
//! A gate is opened by a `choice` or `multi_choice` event. It lays out its
//! buttons on the selection layer, collects presses and resolves to a
//! destination timeline key. Buttons are numbered in display order; a
//! multi-choice confirm button always comes last.

use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::BTreeSet;

use crate::config::GateLayout;
use crate::surface::{ButtonId, ButtonRole, ButtonSpec, ButtonState, CanvasSize, PresentationSurface, Position};
use crate::types::{Choice, MultiChoice, MultiChoiceSet};

/// Outcome of pressing a gate button
#[derive(Debug, Clone, PartialEq)]
pub enum GateResponse {
    /// No such button
    Ignored,
    /// A multi-choice option changed state
    Toggled { index: usize, state: ButtonState },
    /// Selecting one more option would exceed `maxSelect`
    Rejected,
    /// Confirm pressed with fewer than `minSelect` options selected
    BelowMinimum,
    /// The gate picked a destination
    Resolved {
        destination: String,
        verdict: Option<Verdict>,
    },
    /// The destination key was empty; the advance area should be re-armed
    Fallback { verdict: Option<Verdict> },
}

/// Grading of a confirmed multi-choice selection
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub correct: bool,
    /// Sum of the `point` weights of the selected options
    pub score: f64,
    /// At least one contraindicated option was selected
    pub contraindicated: bool,
    /// Selected original indices, ascending
    pub selected: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    Single(SingleChoiceGate),
    Multi(MultiChoiceGate),
}

impl Gate {
    pub fn press<S: PresentationSurface + ?Sized>(&mut self, id: ButtonId, surface: &mut S) -> GateResponse {
        match self {
            Gate::Single(gate) => gate.press(id),
            Gate::Multi(gate) => gate.press(id, surface),
        }
    }

    pub fn button_count(&self) -> usize {
        match self {
            Gate::Single(gate) => gate.choices.len(),
            Gate::Multi(gate) => gate.choices.len() + 1,
        }
    }
}

fn resolve(destination: &str, verdict: Option<Verdict>) -> GateResponse {
    if destination.is_empty() {
        GateResponse::Fallback { verdict }
    } else {
        GateResponse::Resolved {
            destination: destination.to_string(),
            verdict,
        }
    }
}

/// Single-select gate: pressing any option resolves it
#[derive(Debug, Clone, PartialEq)]
pub struct SingleChoiceGate {
    choices: Vec<Choice>,
}

impl SingleChoiceGate {
    pub fn new(choices: Vec<Choice>) -> Self {
        Self { choices }
    }

    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// Buttons stacked vertically around the canvas center
    pub fn layout(&self, layout: &GateLayout, canvas: CanvasSize) -> Vec<ButtonSpec> {
        let height = layout.choice_button_height;
        let margin = layout.choice_button_margin;
        let count = self.choices.len() as f32;
        let group_height = height * count + margin * (count - 1.0);
        let origin_y = canvas.height / 2.0 - group_height / 2.0;

        self.choices
            .iter()
            .enumerate()
            .map(|(index, choice)| {
                let i = index as f32;
                ButtonSpec {
                    id: ButtonId(index),
                    role: ButtonRole::Choice,
                    label: choice.text.clone(),
                    center: Position::new(canvas.width / 2.0, origin_y + height * (i + 0.5) + margin * i),
                    width: canvas.width - margin * 2.0,
                    height,
                }
            })
            .collect()
    }

    pub fn press(&self, id: ButtonId) -> GateResponse {
        match self.choices.get(id.0) {
            Some(choice) => resolve(&choice.key, None),
            None => GateResponse::Ignored,
        }
    }
}

/// Multi-select graded gate
#[derive(Debug, Clone, PartialEq)]
pub struct MultiChoiceGate {
    choices: Vec<MultiChoice>,
    /// Display position to original index
    order: Vec<usize>,
    selected: BTreeSet<usize>,
    correct_key: String,
    incorrect_key: String,
    min_select: usize,
    max_select: Option<usize>,
}

impl MultiChoiceGate {
    /// Gate in authored order
    pub fn new(set: &MultiChoiceSet) -> Self {
        Self::with_order(set, (0..set.choices.len()).collect())
    }

    /// Gate in authored order, or a uniform permutation when `shuffle` is set
    pub fn open<R: Rng + ?Sized>(set: &MultiChoiceSet, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..set.choices.len()).collect();
        if set.shuffle {
            order.shuffle(rng);
        }
        Self::with_order(set, order)
    }

    fn with_order(set: &MultiChoiceSet, order: Vec<usize>) -> Self {
        Self {
            choices: set.choices.clone(),
            order,
            selected: BTreeSet::new(),
            correct_key: set.correct_key.clone(),
            incorrect_key: set.incorrect_key.clone(),
            min_select: set.min_select,
            max_select: set.max_select,
        }
    }

    /// Original option index shown at each display position
    pub fn display_order(&self) -> &[usize] {
        &self.order
    }

    /// Display position (and button id) of an original option
    pub fn button_for(&self, original: usize) -> Option<ButtonId> {
        self.order.iter().position(|&i| i == original).map(ButtonId)
    }

    pub fn confirm_button(&self) -> ButtonId {
        ButtonId(self.order.len())
    }

    pub fn selected(&self) -> &BTreeSet<usize> {
        &self.selected
    }

    pub fn layout(&self, layout: &GateLayout, canvas: CanvasSize) -> Vec<ButtonSpec> {
        let height = layout.multi_button_height;
        let margin = layout.multi_button_margin;
        let count = self.order.len() as f32;
        let group_height = height * count + margin * (count - 1.0);
        let origin_y = (canvas.height / 2.0 - group_height / 2.0 - layout.dialog_reserve).max(20.0);

        let mut buttons: Vec<ButtonSpec> = self
            .order
            .iter()
            .enumerate()
            .map(|(display, &original)| {
                let i = display as f32;
                ButtonSpec {
                    id: ButtonId(display),
                    role: ButtonRole::Toggle,
                    label: self.choices[original].text.clone(),
                    center: Position::new(canvas.width / 2.0, origin_y + height * (i + 0.5) + margin * i),
                    width: canvas.width - margin * 2.0,
                    height,
                }
            })
            .collect();

        let confirm_y = (canvas.height - layout.dialog_reserve - layout.confirm_height).max(60.0);
        buttons.push(ButtonSpec {
            id: self.confirm_button(),
            role: ButtonRole::Confirm,
            label: layout.confirm_label.clone(),
            center: Position::new(canvas.width / 2.0, confirm_y),
            width: layout.confirm_width,
            height: layout.confirm_height,
        });
        buttons
    }

    pub fn press<S: PresentationSurface + ?Sized>(&mut self, id: ButtonId, surface: &mut S) -> GateResponse {
        if id == self.confirm_button() {
            return self.confirm();
        }
        match self.toggle(id) {
            GateResponse::Toggled { index, state } => {
                surface.set_button_state(id, state);
                GateResponse::Toggled { index, state }
            }
            other => other,
        }
    }

    /// Flip the option shown at `id`. Adding is refused at `maxSelect`.
    pub fn toggle(&mut self, id: ButtonId) -> GateResponse {
        let Some(&original) = self.order.get(id.0) else {
            return GateResponse::Ignored;
        };
        if self.selected.remove(&original) {
            return GateResponse::Toggled {
                index: original,
                state: ButtonState::Idle,
            };
        }
        if self.max_select.is_some_and(|max| self.selected.len() >= max) {
            return GateResponse::Rejected;
        }
        self.selected.insert(original);
        GateResponse::Toggled {
            index: original,
            state: ButtonState::Selected,
        }
    }

    /// The selection is correct iff it equals the set of options flagged correct
    pub fn grade(&self) -> Verdict {
        let correct_set: BTreeSet<usize> = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, choice)| choice.correct)
            .map(|(index, _)| index)
            .collect();

        Verdict {
            correct: self.selected == correct_set,
            score: self
                .selected
                .iter()
                .filter_map(|&i| self.choices[i].point)
                .sum(),
            contraindicated: self.selected.iter().any(|&i| self.choices[i].contraindication),
            selected: self.selected.iter().copied().collect(),
        }
    }

    pub fn confirm(&self) -> GateResponse {
        if self.selected.len() < self.min_select {
            return GateResponse::BelowMinimum;
        }
        let verdict = self.grade();
        let destination = if verdict.correct {
            &self.correct_key
        } else {
            &self.incorrect_key
        };
        resolve(destination, Some(verdict))
    }
}
