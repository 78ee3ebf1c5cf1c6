//! Global shortcut handling for the focused terminal.
//!
//! A [`KeyBus`] sits in front of the overlay: every key press is offered to
//! the bus first, and a press that matches a registered [`Shortcut`] runs its
//! callback and is not forwarded to the overlay.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use speedy_core::{Error, Result};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::debug;

/// Modifiers that take part in matching. Others (super, hyper, meta) are ignored.
const MATCHED_MODIFIERS: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::SHIFT)
    .union(KeyModifiers::ALT);

/// A key plus the exact set of Ctrl/Shift/Alt modifiers that must be held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    code: KeyCode,
    modifiers: KeyModifiers,
}

impl Shortcut {
    #[must_use]
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self {
            code: normalize(code),
            modifiers: modifiers & MATCHED_MODIFIERS,
        }
    }

    /// Parse the config form, e.g. `Ctrl+Space` or `Alt+Shift+P`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Shortcut`] when the key is missing or unknown, or
    /// when more than one non-modifier key is given.
    pub fn parse(text: &str) -> Result<Self> {
        let invalid = || Error::Shortcut(text.to_string());

        let mut modifiers = KeyModifiers::NONE;
        let mut key = None;

        for part in text.split('+').map(str::trim) {
            match part.to_lowercase().as_str() {
                "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                "alt" | "option" => modifiers |= KeyModifiers::ALT,
                _ if key.is_none() => key = Some(parse_key(part).ok_or_else(invalid)?),
                _ => return Err(invalid()),
            }
        }

        let code = key.ok_or_else(invalid)?;
        Ok(Self::new(code, modifiers))
    }

    /// Exact match on key identity and the Ctrl/Shift/Alt set. Only presses
    /// match; repeats and releases do not.
    #[must_use]
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.kind == KeyEventKind::Press
            && event.modifiers & MATCHED_MODIFIERS == self.modifiers
            && normalize(event.code) == self.code
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("Ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("Alt+")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            f.write_str("Shift+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("Space"),
            KeyCode::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Esc => f.write_str("Esc"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Letters are compared case-insensitively; Shift is carried by the modifiers.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn parse_key(key: &str) -> Option<KeyCode> {
    Some(match key.to_lowercase().as_str() {
        "space" => KeyCode::Char(' '),
        "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "delete" | "del" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        lower => {
            if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u8>().ok()) {
                return (1..=24).contains(&n).then_some(KeyCode::F(n));
            }
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if !c.is_control() => KeyCode::Char(c),
                _ => return None,
            }
        }
    })
}

type Callback = Box<dyn FnMut() + Send>;

struct Registration {
    id: u64,
    shortcut: Shortcut,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    entries: Vec<Registration>,
}

/// Shared key-down bus. Cloning yields another handle to the same bus.
#[derive(Clone, Default)]
pub struct KeyBus {
    registry: Arc<Mutex<Registry>>,
}

impl KeyBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for `shortcut`. The registration lives as long as
    /// the returned [`Subscription`].
    ///
    /// Callbacks run while the bus is locked and must not subscribe or drop
    /// subscriptions themselves.
    #[must_use = "dropping the subscription unregisters the shortcut"]
    pub fn subscribe(
        &self,
        shortcut: Shortcut,
        callback: impl FnMut() + Send + 'static,
    ) -> Subscription {
        let mut registry = lock(&self.registry);

        let id = registry.next_id;
        registry.next_id += 1;
        registry.entries.push(Registration {
            id,
            shortcut,
            callback: Box::new(callback),
        });
        debug!("Registered shortcut {} (id {})", shortcut, id);

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Offer a key event to the bus. Every matching callback runs.
    ///
    /// Returns `true` when at least one registration matched; the caller
    /// must then skip its default handling of the event.
    pub fn dispatch(&self, event: &KeyEvent) -> bool {
        let mut registry = lock(&self.registry);

        let mut matched = false;
        for entry in &mut registry.entries {
            if entry.shortcut.matches(event) {
                debug!("Shortcut {} fired", entry.shortcut);
                (entry.callback)();
                matched = true;
            }
        }
        matched
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.registry).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a shortcut registered until dropped.
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        lock(&registry).entries.retain(|e| e.id != self.id);
    }
}

/// A panicking callback poisons the registry; registration state stays valid.
fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = count.clone();
        (count, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_parse_ctrl_space() {
        let shortcut = Shortcut::parse("Ctrl+Space").unwrap();
        assert!(shortcut.matches(&press(KeyCode::Char(' '), KeyModifiers::CONTROL)));
        assert_eq!(shortcut.to_string(), "Ctrl+Space");
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims() {
        let shortcut = Shortcut::parse(" alt + shift + p ").unwrap();
        assert_eq!(
            shortcut,
            Shortcut::new(KeyCode::Char('p'), KeyModifiers::ALT | KeyModifiers::SHIFT)
        );
    }

    #[test]
    fn test_parse_named_and_function_keys() {
        assert_eq!(
            Shortcut::parse("Esc").unwrap(),
            Shortcut::new(KeyCode::Esc, KeyModifiers::NONE)
        );
        assert_eq!(
            Shortcut::parse("Ctrl+F5").unwrap(),
            Shortcut::new(KeyCode::F(5), KeyModifiers::CONTROL)
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "Ctrl+", "Ctrl+Shift", "Ctrl+A+B", "Ctrl+Hyper", "F99"] {
            let err = Shortcut::parse(bad).unwrap_err();
            assert!(matches!(err, Error::Shortcut(_)), "{bad:?} should fail");
        }
    }

    #[test]
    fn test_modifier_set_must_match_exactly() {
        let shortcut = Shortcut::parse("Ctrl+C").unwrap();
        assert!(shortcut.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!shortcut.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(!shortcut.matches(&press(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL | KeyModifiers::ALT
        )));
    }

    #[test]
    fn test_shifted_letter_matches() {
        let shortcut = Shortcut::parse("Shift+A").unwrap();
        assert!(shortcut.matches(&press(KeyCode::Char('A'), KeyModifiers::SHIFT)));
    }

    #[test]
    fn test_release_does_not_match() {
        let shortcut = Shortcut::parse("Ctrl+Space").unwrap();
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert!(!shortcut.matches(&release));
    }

    #[test]
    fn test_dispatch_invokes_matching_callback() {
        let bus = KeyBus::new();
        let (toggles, on_toggle) = counter();
        let _sub = bus.subscribe(Shortcut::parse("Ctrl+Space").unwrap(), on_toggle);

        assert!(bus.dispatch(&press(KeyCode::Char(' '), KeyModifiers::CONTROL)));
        assert!(!bus.dispatch(&press(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert_eq!(toggles.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registrations_are_independent() {
        let bus = KeyBus::new();
        let (toggles, on_toggle) = counter();
        let (quits, on_quit) = counter();
        let _toggle = bus.subscribe(Shortcut::parse("Ctrl+Space").unwrap(), on_toggle);
        let _quit = bus.subscribe(Shortcut::parse("Ctrl+C").unwrap(), on_quit);

        bus.dispatch(&press(KeyCode::Char('c'), KeyModifiers::CONTROL));

        assert_eq!(toggles.load(Ordering::SeqCst), 0);
        assert_eq!(quits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_same_shortcut_twice_runs_both() {
        let bus = KeyBus::new();
        let (first, on_first) = counter();
        let (second, on_second) = counter();
        let shortcut = Shortcut::parse("Alt+K").unwrap();
        let _a = bus.subscribe(shortcut, on_first);
        let _b = bus.subscribe(shortcut, on_second);

        assert!(bus.dispatch(&press(KeyCode::Char('k'), KeyModifiers::ALT)));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_unregisters() {
        let bus = KeyBus::new();
        let (toggles, on_toggle) = counter();
        let sub = bus.subscribe(Shortcut::parse("Ctrl+Space").unwrap(), on_toggle);
        assert_eq!(bus.len(), 1);

        drop(sub);

        assert!(bus.is_empty());
        assert!(!bus.dispatch(&press(KeyCode::Char(' '), KeyModifiers::CONTROL)));
        assert_eq!(toggles.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_drop_unregisters_after_panicking_callback() {
        let bus = KeyBus::new();
        let sub = bus.subscribe(Shortcut::parse("Ctrl+Q").unwrap(), || panic!("callback failed"));
        let event = press(KeyCode::Char('q'), KeyModifiers::CONTROL);

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| bus.dispatch(&event)));
        assert!(outcome.is_err());
        assert_eq!(bus.len(), 1);

        drop(sub);

        assert!(bus.is_empty());
        assert!(!bus.dispatch(&event));
    }

    #[test]
    fn test_subscription_outliving_bus() {
        let bus = KeyBus::new();
        let (_, on_toggle) = counter();
        let sub = bus.subscribe(Shortcut::parse("Ctrl+Space").unwrap(), on_toggle);
        drop(bus);
        drop(sub);
    }
}
