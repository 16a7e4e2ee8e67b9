//! Logical input façade
//!
//! The simulation only ever asks "is this held?" and "was this pressed this
//! frame?". Platform code maps keys/gamepads onto [`Button`]s and feeds the
//! held set in once per frame.

use serde::{Deserialize, Serialize};

/// Logical buttons the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Button {
    Up = 0,
    Down,
    Left,
    Right,
    /// Primary button: shoot, menu select
    Fire,
    /// Secondary button: pause, menu select
    Secondary,
    /// Debug: toggle forced invincibility
    InvincibilityToggle,
    /// Toggle telemetry/data collection
    DataCollectToggle,
}

impl Button {
    pub const ALL: [Button; 8] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Fire,
        Button::Secondary,
        Button::InvincibilityToggle,
        Button::DataCollectToggle,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// A set of buttons packed into a bitmask
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    pub fn from_slice(buttons: &[Button]) -> Self {
        buttons.iter().fold(Self::NONE, |set, &b| set.with(b))
    }

    #[must_use]
    pub fn with(self, button: Button) -> Self {
        Buttons(self.0 | button.bit())
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Buttons in `self` that are not in `other`
    #[must_use]
    pub fn difference(self, other: Buttons) -> Self {
        Buttons(self.0 & !other.0)
    }
}

/// Per-frame input snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pressing: Buttons,
    tapped: Buttons,
}

impl InputState {
    pub fn new(pressing: Buttons, tapped: Buttons) -> Self {
        Self { pressing, tapped }
    }

    /// Only taps, nothing held (handy for one-shot menu/pause presses)
    pub fn tap(button: Button) -> Self {
        let set = Buttons::NONE.with(button);
        Self {
            pressing: set,
            tapped: set,
        }
    }

    /// Advance to the next frame given the buttons currently held.
    /// A tap is a button held now that was not held last frame.
    pub fn next(&self, held: Buttons) -> Self {
        Self {
            pressing: held,
            tapped: held.difference(self.pressing),
        }
    }

    pub fn is_pressing(&self, button: Button) -> bool {
        self.pressing.contains(button)
    }

    pub fn has_tapped(&self, button: Button) -> bool {
        self.tapped.contains(button)
    }

    pub fn pressing(&self) -> Buttons {
        self.pressing
    }

    /// The same snapshot with `button` neither held nor tapped
    #[must_use]
    pub fn without(&self, button: Button) -> Self {
        let mask = Buttons::NONE.with(button);
        Self {
            pressing: self.pressing.difference(mask),
            tapped: self.tapped.difference(mask),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_is_edge_triggered() {
        let held = Buttons::from_slice(&[Button::Fire, Button::Up]);
        let frame1 = InputState::default().next(held);
        assert!(frame1.has_tapped(Button::Fire));
        assert!(frame1.is_pressing(Button::Up));

        // Still held: pressing but no longer tapped
        let frame2 = frame1.next(held);
        assert!(frame2.is_pressing(Button::Fire));
        assert!(!frame2.has_tapped(Button::Fire));

        // Released then pressed again re-triggers
        let frame3 = frame2.next(Buttons::NONE);
        assert!(!frame3.is_pressing(Button::Fire));
        let frame4 = frame3.next(Buttons::NONE.with(Button::Fire));
        assert!(frame4.has_tapped(Button::Fire));
    }

    #[test]
    fn test_all_buttons_have_distinct_bits() {
        let all = Buttons::from_slice(&Button::ALL);
        for b in Button::ALL {
            assert!(all.contains(b));
            assert!(!Buttons::NONE.contains(b));
        }
        assert_eq!(all.difference(all), Buttons::NONE);
    }

    #[test]
    fn test_without_masks_one_button() {
        let held = Buttons::from_slice(&[Button::Fire, Button::InvincibilityToggle]);
        let input = InputState::default().next(held).without(Button::InvincibilityToggle);
        assert!(input.has_tapped(Button::Fire));
        assert!(!input.has_tapped(Button::InvincibilityToggle));
        assert!(!input.is_pressing(Button::InvincibilityToggle));
    }
}
