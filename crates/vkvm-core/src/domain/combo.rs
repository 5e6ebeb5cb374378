//! Combo tracker: decides what to transmit for each raw key/button transition.
//!
//! One tracker exists per active profile.  It is fed one transition at a time
//! through [`ComboTracker::handle`] and asked for the outgoing sequence with
//! [`ComboTracker::resolve`].
//!
//! # Resolution steps
//!
//! ```text
//! scroll button?  ──yes──►  repeat it scroll_speed times, done
//!       │no
//!       ▼
//! press of a modifier already held?  ──yes──►  emit nothing
//!       │no
//!       ▼
//! release whose (remapped) name is in skip_on_release?  ──yes──►  consume it, emit nothing
//!       │no
//!       ▼
//! combination = held modifiers ∪ current name
//!       │
//!       ├── no rule with from == combination ──►  pass the combination through
//!       │
//!       └── rule matched
//!             ├── chord with modifiers, on press ──►  release the (remapped) modifiers
//!             │                                      first, remember them in
//!             │                                      skip_on_release, then `to`
//!             └── otherwise ──►  `to`
//!       ▼
//! drop modifiers the remote already has in this state
//!       ▼
//! order: modifiers first on press, last on release
//!       ▼
//! Caps_Lock in the output?  press toggles the lock; release is dropped while locked
//! ```
//!
//! # Why release modifiers before a chord?
//!
//! When `Alt_L` goes down it is transmitted on its own (possibly remapped,
//! e.g. to `Meta_L`).  If `Alt_L+Tab` is then remapped to `Super_L+Tab`, the
//! remote still has `Meta_L` down.  Releasing it first keeps the remote
//! modifier state equal to what the rule describes.  The physical `Alt_L`
//! release that arrives later has nothing left to release and is swallowed
//! once through `skip_on_release`.
//!
//! # Caps_Lock
//!
//! The remote toggles its lock on every `Caps_Lock` press.  The release that
//! follows the locking press is withheld, so one full tap cycle
//! (press, release, press, release) reaches the remote as press, press,
//! release.

use tracing::trace;

use crate::registry::EventDefinition;

const CAPS_LOCK: &str = "Caps_Lock";

use super::profile::{Profile, RemapRule};

/// Per-profile combo/modifier state machine.
#[derive(Debug, Clone)]
pub struct ComboTracker {
    rules: Vec<RemapRule>,
    scroll_speed: u8,
    /// Modifiers currently held, in press order, stamped as pressed.
    held: Vec<EventDefinition>,
    current: Option<EventDefinition>,
    /// `current` is a modifier press that was already held (autorepeat).
    was_held: bool,
    caps_locked: bool,
    /// Names whose release was already synthesized at chord press time.
    skip_on_release: Vec<String>,
}

impl ComboTracker {
    /// Creates a tracker for `rules`, matched in order.
    pub fn new(rules: Vec<RemapRule>, scroll_speed: u8) -> Self {
        Self {
            rules,
            scroll_speed,
            held: Vec::new(),
            current: None,
            was_held: false,
            caps_locked: false,
            skip_on_release: Vec::new(),
        }
    }

    /// Creates a fresh tracker seeded from `profile`.
    pub fn for_profile(profile: &Profile) -> Self {
        Self::new(profile.rules.clone(), profile.scroll_speed)
    }

    /// A tracker with no rules, used while no profile is active.
    pub fn idle() -> Self {
        Self::new(Vec::new(), 1)
    }

    /// Records a transition, updating the held-modifier set.
    pub fn handle(&mut self, def: EventDefinition) {
        self.was_held = false;
        if def.is_modifier() {
            if def.is_press {
                self.was_held = self.held.iter().any(|h| h.name == def.name);
                if !self.was_held {
                    self.held.push(def.with_press(true));
                }
            } else {
                self.held.retain(|h| h.name != def.name);
            }
        }
        self.current = Some(def);
    }

    /// Modifiers currently held, in press order.
    pub fn held_modifiers(&self) -> &[EventDefinition] {
        &self.held
    }

    /// `true` while the remote's Caps_Lock is toggled on.
    pub fn caps_locked(&self) -> bool {
        self.caps_locked
    }

    /// Names whose next release will be swallowed.
    pub fn pending_skips(&self) -> &[String] {
        &self.skip_on_release
    }

    /// Computes the events to transmit for the current transition.
    ///
    /// Returns an empty sequence before the first [`handle`](Self::handle).
    pub fn resolve(&mut self) -> Vec<EventDefinition> {
        let Some(current) = self.current.clone() else {
            return Vec::new();
        };

        if current.is_scroll() {
            return vec![current; usize::from(self.scroll_speed.max(1))];
        }

        if self.was_held {
            trace!(name = %current.name, "modifier already held, nothing to send");
            return Vec::new();
        }

        if !current.is_press {
            let name = self.resolve_single(&current.name);
            if let Some(pos) = self.skip_on_release.iter().position(|s| s == name) {
                self.skip_on_release.remove(pos);
                trace!(name = %current.name, "release already synthesized, skipping");
                return Vec::new();
            }
        }

        let combination = self.combination(&current);
        let names: Vec<&str> = combination.iter().map(|d| d.name.as_str()).collect();
        let mut resolved = match self.rules.iter().find(|rule| rule.matches(&names)) {
            None => combination.clone(),
            Some(rule) => {
                let (defs, skip) = self.apply_rule(rule, &combination, current.is_press);
                if let Some(skip) = skip {
                    self.skip_on_release = skip;
                }
                defs
            }
        };

        resolved.retain(|def| !self.remote_already_has(def, &current));
        let resolved = self.apply_caps_lock(order_by_press(resolved, current.is_press));

        trace!(
            name = %current.name,
            pressed = current.is_press,
            count = resolved.len(),
            "resolved transition"
        );
        resolved
    }

    /// Held modifiers (other than the current name) followed by the current
    /// definition, all at the current press state.
    fn combination(&self, current: &EventDefinition) -> Vec<EventDefinition> {
        self.held
            .iter()
            .filter(|h| h.name != current.name)
            .map(|h| h.with_press(current.is_press))
            .chain(std::iter::once(current.clone()))
            .collect()
    }

    /// Output for a matched rule, plus the new skip set when one is primed.
    fn apply_rule(
        &self,
        rule: &RemapRule,
        combination: &[EventDefinition],
        is_press: bool,
    ) -> (Vec<EventDefinition>, Option<Vec<String>>) {
        let to_defs: Vec<EventDefinition> =
            rule.to.iter().map(|def| def.with_press(is_press)).collect();

        let chord_modifiers: Vec<&str> = rule.modifiers_in_from().collect();
        if chord_modifiers.is_empty() || combination.len() < 2 || !is_press {
            return (to_defs, None);
        }

        let released: Vec<EventDefinition> = chord_modifiers
            .iter()
            .filter_map(|name| combination.iter().find(|def| def.name == *name))
            .map(|def| self.resolve_single_def(def).with_press(false))
            .collect();
        let skip = released.iter().map(|def| def.name.clone()).collect();

        let mut out = released;
        out.extend(to_defs);
        (out, Some(skip))
    }

    /// Maps `name` through the first one-to-one rule, or returns it unchanged.
    fn resolve_single<'a>(&'a self, name: &'a str) -> &'a str {
        self.rules
            .iter()
            .find(|rule| rule.is_simple() && rule.from[0].name == name)
            .map_or(name, |rule| rule.to[0].name.as_str())
    }

    fn resolve_single_def(&self, def: &EventDefinition) -> EventDefinition {
        self.rules
            .iter()
            .find(|rule| rule.is_simple() && rule.from[0].name == def.name)
            .map_or_else(|| def.clone(), |rule| rule.to[0].clone())
    }

    /// `true` if `def` names a modifier that was already held before this
    /// transition and is being sent in the state the remote already has.
    fn remote_already_has(&self, def: &EventDefinition, current: &EventDefinition) -> bool {
        def.is_press == current.is_press
            && def.name != current.name
            && self.held.iter().any(|h| h.name == def.name)
    }

    fn apply_caps_lock(&mut self, defs: Vec<EventDefinition>) -> Vec<EventDefinition> {
        let mut out = Vec::with_capacity(defs.len());
        for def in defs {
            if def.name == CAPS_LOCK {
                if def.is_press {
                    self.caps_locked = !self.caps_locked;
                } else if self.caps_locked {
                    trace!("caps lock engaged, withholding release");
                    continue;
                }
            }
            out.push(def);
        }
        out
    }
}

/// Stable partition: modifiers first on press, last on release.
fn order_by_press(defs: Vec<EventDefinition>, is_press: bool) -> Vec<EventDefinition> {
    let (modifiers, others): (Vec<_>, Vec<_>) =
        defs.into_iter().partition(EventDefinition::is_modifier);
    if is_press {
        modifiers.into_iter().chain(others).collect()
    } else {
        others.into_iter().chain(modifiers).collect()
    }
}
