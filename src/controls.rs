//! Control state: on/off switches and selector knobs.
//!
//! These hold only the selected value. Drawing and mouse handling live in the
//! front-end, which reads the selection and pushes it into the bench.

/// A two-position switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnOffSwitch {
    pub name: String,
    on: bool,
}

impl OnOffSwitch {
    /// Create a new switch.
    pub fn new(name: impl Into<String>, on: bool) -> Self {
        Self {
            name: name.into(),
            on,
        }
    }

    /// Whether the switch is on.
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Whether the switch is off.
    pub fn is_off(&self) -> bool {
        !self.on
    }

    /// Set the switch state. Returns true if the state changed.
    pub fn set(&mut self, on: bool) -> bool {
        let changed = self.on != on;
        self.on = on;
        changed
    }

    /// Toggle the switch state.
    pub fn toggle(&mut self) {
        self.on = !self.on;
    }
}

/// A rotary selector over a fixed list of settings.
///
/// The position is always a valid index while the knob has items.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorKnob<T> {
    pub name: String,
    items: Vec<T>,
    position: usize,
}

impl<T> SelectorKnob<T> {
    /// Create a knob at position 0.
    pub fn new(name: impl Into<String>, items: Vec<T>) -> Self {
        Self {
            name: name.into(),
            items,
            position: 0,
        }
    }

    /// Append a setting.
    pub fn add(mut self, item: T) -> Self {
        self.items.push(item);
        self
    }

    /// All settings in knob order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Current position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The selected setting, or `None` if the knob has no items.
    pub fn selected(&self) -> Option<&T> {
        self.items.get(self.position)
    }

    /// Move to `position`, clamped to the item range. Returns true if the selection changed.
    pub fn set(&mut self, position: usize) -> bool {
        let clamped = position.min(self.items.len().saturating_sub(1));
        let changed = clamped != self.position;
        self.position = clamped;
        changed
    }

    /// Step one setting forward. Returns true if the selection changed.
    pub fn down(&mut self) -> bool {
        if self.position + 1 < self.items.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Step one setting back. Returns true if the selection changed.
    pub fn up(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }
}

impl<T: PartialEq> SelectorKnob<T> {
    /// Select the first setting equal to `item`. Returns true if the selection changed.
    pub fn select(&mut self, item: &T) -> bool {
        match self.items.iter().position(|i| i == item) {
            Some(position) => self.set(position),
            None => false,
        }
    }
}
