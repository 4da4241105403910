//! Per-tick input aggregation
//!
//! Converts the raw text typed during one tick (plus any programmatically
//! injected input) into an ordered list of single-character tokens. Tokens
//! are derived at most once per tick; every reader in the same tick sees
//! the same list.

use serde::{Deserialize, Serialize};

use crate::app::InputConfig;

/// Keys whose held state is reported separately from typed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlKey {
    /// Tab never shows up in typed text on most platforms
    Tab,
}

impl ControlKey {
    /// The character appended to the raw text while this key is held
    pub fn as_char(self) -> char {
        match self {
            ControlKey::Tab => '\t',
        }
    }
}

/// Platform input collaborator
///
/// Implemented by whatever owns the real keyboard. All values describe the
/// current discrete tick.
pub trait InputBackend {
    /// Identifier of the current tick. Must change between ticks.
    fn tick(&self) -> u64;
    /// Text produced by the platform input layer during this tick
    fn typed_text(&self) -> &str;
    /// Whether a control key is currently held down
    fn is_key_held(&self, key: ControlKey) -> bool;
    /// Whether any key is currently held down
    fn any_key_held(&self) -> bool;
    /// Whether any key went down during this tick
    fn any_key_pressed(&self) -> bool;
}

/// A plain snapshot of the platform input for one tick
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFrame {
    pub tick: u64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tab_held: bool,
    #[serde(default)]
    pub any_key_held: bool,
    #[serde(default)]
    pub any_key_pressed: bool,
}

impl RawFrame {
    /// A frame where `text` was freshly typed (keys pressed and held)
    pub fn typed(tick: u64, text: impl Into<String>) -> Self {
        let text = text.into();
        let active = !text.is_empty();
        Self {
            tick,
            text,
            tab_held: false,
            any_key_held: active,
            any_key_pressed: active,
        }
    }

    /// A frame with no keyboard activity
    pub fn idle(tick: u64) -> Self {
        Self {
            tick,
            ..Self::default()
        }
    }
}

impl InputBackend for RawFrame {
    fn tick(&self) -> u64 {
        self.tick
    }

    fn typed_text(&self) -> &str {
        &self.text
    }

    fn is_key_held(&self, key: ControlKey) -> bool {
        match key {
            ControlKey::Tab => self.tab_held,
        }
    }

    fn any_key_held(&self) -> bool {
        self.any_key_held
    }

    fn any_key_pressed(&self) -> bool {
        self.any_key_pressed
    }
}

/// Tick-scoped token source
#[derive(Debug)]
pub struct FrameSource {
    config: InputConfig,
    /// Tick the current token list was derived for
    last_tick: Option<u64>,
    /// Tokens for `last_tick`
    tokens: Vec<char>,
    /// Injected input awaiting the next derivation
    pending_virtual: String,
    /// Last character yielded on a previous derivation
    last_raw: Option<char>,
}

impl Default for FrameSource {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

impl FrameSource {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            last_tick: None,
            tokens: Vec::new(),
            pending_virtual: String::new(),
            last_raw: None,
        }
    }

    /// Tokens received during the backend's current tick
    ///
    /// Derived on the first call of a tick and cached until the tick changes.
    pub fn received_inputs<B: InputBackend + ?Sized>(&mut self, backend: &B) -> &[char] {
        self.refresh(backend);
        &self.tokens
    }

    /// Returns true if `token` was received during the current tick
    pub fn contains_input<B: InputBackend + ?Sized>(
        &mut self,
        backend: &B,
        token: char,
        case_sensitive: bool,
    ) -> bool {
        self.received_inputs(backend)
            .iter()
            .any(|&t| super::inputs_equal(t, token, case_sensitive))
    }

    /// Inject input as if it had been typed
    ///
    /// Visible in the current tick if the tick's tokens have not been
    /// derived yet, otherwise delivered on the next tick.
    pub fn add_input<B: InputBackend + ?Sized>(&mut self, backend: &B, text: &str) {
        self.pending_virtual.push_str(text);
        self.refresh(backend);
    }

    /// Injected input not yet delivered
    pub fn pending_input(&self) -> &str {
        &self.pending_virtual
    }

    fn refresh<B: InputBackend + ?Sized>(&mut self, backend: &B) {
        let tick = backend.tick();
        if self.last_tick == Some(tick) {
            return;
        }
        self.last_tick = Some(tick);
        self.tokens.clear();
        self.derive(backend);
    }

    fn derive<B: InputBackend + ?Sized>(&mut self, backend: &B) {
        let mut raw = String::with_capacity(backend.typed_text().len() + self.pending_virtual.len());
        raw.push_str(backend.typed_text());
        raw.push_str(&self.pending_virtual);
        self.pending_virtual.clear();

        if self.config.tab_as_input && backend.is_key_held(ControlKey::Tab) {
            raw.push(ControlKey::Tab.as_char());
        }

        let Some(first) = raw.chars().next() else {
            return;
        };

        if self.config.suppress_key_repeat
            && backend.any_key_held()
            && !backend.any_key_pressed()
            && self.last_raw == Some(first)
        {
            tracing::debug!(tick = backend.tick(), repeated = ?first, "ignoring key-repeat input");
            return;
        }

        self.last_raw = raw.chars().last();
        self.tokens.extend(raw.chars());
        tracing::trace!(tick = backend.tick(), tokens = self.tokens.len(), "derived input tokens");
    }
}
