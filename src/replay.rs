//! Deterministic scripted replay
//!
//! A replay script lists the sequences to spawn and the raw input of each
//! tick. Running it through a fresh `MatchingContext` yields a transcript of
//! the tokens and events of every tick plus the final state of the live
//! sequences. Given the same script, the transcript is always identical.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app::{ConfigError, MatchingConfig};
use crate::context::MatchingContext;
use crate::input::RawFrame;
use crate::registry::{Event, SequenceId};
use crate::sequence::{Sequence, SequenceOptions};
use crate::stats::InputStatistics;

/// A complete replay script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub config: MatchingConfig,
    /// Sequences spawned before the first tick
    pub sequences: Vec<ScriptedSequence>,
    pub ticks: Vec<ScriptedTick>,
}

/// A sequence to spawn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptedSequence {
    pub text: String,
    /// Overrides the configured sequence options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<SequenceOptions>,
    /// Target the sequence right after spawning it
    #[serde(default, skip_serializing_if = "is_false")]
    pub target: bool,
}

/// Raw input for one tick
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedTick {
    /// Sequences spawned at the start of the tick
    pub spawn: Vec<ScriptedSequence>,
    /// Text typed on the keyboard
    pub text: String,
    /// Text injected programmatically before processing
    pub virtual_input: String,
    pub tab_held: bool,
    /// Any key held; defaults to whether `text` is non-empty
    pub held: Option<bool>,
    /// Any key newly pressed; defaults to whether `text` is non-empty
    pub pressed: Option<bool>,
    /// How many times `process_input` is called during the tick
    pub calls: u32,
    /// Remove every sequence at the end of the tick
    pub remove_all: bool,
}

impl Default for ScriptedTick {
    fn default() -> Self {
        Self {
            spawn: Vec::new(),
            text: String::new(),
            virtual_input: String::new(),
            tab_held: false,
            held: None,
            pressed: None,
            calls: 1,
            remove_all: false,
        }
    }
}

impl ScriptedTick {
    fn frame(&self, tick: u64) -> RawFrame {
        let active = !self.text.is_empty();
        RawFrame {
            tick,
            text: self.text.clone(),
            tab_held: self.tab_held,
            any_key_held: self.held.unwrap_or(active || self.tab_held),
            any_key_pressed: self.pressed.unwrap_or(active),
        }
    }
}

/// Replay error
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Replace the script's config with one loaded from `path`
    pub fn load_config(&mut self, path: &Path) -> Result<(), ReplayError> {
        self.config = MatchingConfig::load(path)?;
        Ok(())
    }

    /// Run the script through a fresh context
    pub fn run(&self) -> Transcript {
        let mut context = MatchingContext::new(self.config.clone());
        let mut statistics = InputStatistics::new();
        let mut ticks = Vec::with_capacity(self.ticks.len());

        for scripted in &self.sequences {
            spawn(&mut context, scripted);
        }
        // Creation events belong to no tick
        let setup = context.drain_events();
        statistics.record_all(&setup);

        for (index, scripted) in self.ticks.iter().enumerate() {
            let tick = index as u64 + 1;
            let frame = scripted.frame(tick);

            for sequence in &scripted.spawn {
                spawn(&mut context, sequence);
            }
            if !scripted.virtual_input.is_empty() {
                context.add_input(&frame, &scripted.virtual_input);
            }

            let mut dispatches = 0;
            for _ in 0..scripted.calls {
                if context.process_input(&frame) {
                    dispatches += 1;
                }
            }
            let tokens: String = context.received_inputs(&frame).iter().collect();

            if scripted.remove_all {
                context.remove_all();
            }

            let events = context.drain_events();
            statistics.record_all(&events);
            tracing::debug!(tick, tokens = %tokens, events = events.len(), "replayed tick");
            ticks.push(TickRecord {
                tick,
                tokens,
                dispatches,
                events,
            });
        }

        Transcript {
            ticks,
            remaining: context
                .registry()
                .sequences()
                .map(|(id, s)| SequenceSnapshot::new(id, s))
                .collect(),
            accepted: statistics.accepted(),
            rejected: statistics.rejected(),
            accuracy: statistics.accuracy(),
        }
    }
}

fn spawn(context: &mut MatchingContext, scripted: &ScriptedSequence) {
    let options = scripted.options.unwrap_or(context.config().sequence);
    let id = context.spawn_with(scripted.text.clone(), options);
    if scripted.target {
        context.target(id);
    }
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickRecord {
    pub tick: u64,
    /// Tokens derived for the tick, concatenated
    pub tokens: String,
    /// Number of dispatch passes that actually ran
    pub dispatches: u32,
    pub events: Vec<Event>,
}

/// Final state of a live sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSnapshot {
    pub id: SequenceId,
    pub text: String,
    pub progress: usize,
    pub targeted: bool,
}

impl SequenceSnapshot {
    fn new(id: SequenceId, sequence: &Sequence) -> Self {
        Self {
            id,
            text: sequence.text().to_string(),
            progress: sequence.progress(),
            targeted: sequence.is_targeted(),
        }
    }
}

/// The result of a replay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub ticks: Vec<TickRecord>,
    pub remaining: Vec<SequenceSnapshot>,
    pub accepted: u32,
    pub rejected: u32,
    pub accuracy: f32,
}

impl Transcript {
    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Human-readable rendering, one line per event
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for record in &self.ticks {
            let _ = writeln!(out, "tick {} {:?}", record.tick, record.tokens);
            for event in &record.events {
                let _ = writeln!(out, "  {}", event);
            }
        }
        let _ = writeln!(out, "---");
        for sequence in &self.remaining {
            let marker = if sequence.targeted { "*" } else { " " };
            let _ = writeln!(
                out,
                "{}{} {:?} {}/{}",
                marker,
                sequence.id,
                sequence.text,
                sequence.progress,
                sequence.text.chars().count()
            );
        }
        let _ = writeln!(
            out,
            "accepted {} rejected {} accuracy {:.2}",
            self.accepted, self.rejected, self.accuracy
        );
        out
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"{
        "sequences": [{"text": "cat"}, {"text": "car"}],
        "ticks": [
            {"text": "c"},
            {"text": "a", "calls": 3},
            {"text": "x"},
            {"text": "t"}
        ]
    }"#;

    #[test]
    fn test_run_script() {
        let transcript = ReplayScript::from_json(SCRIPT).unwrap().run();

        assert_eq!(transcript.ticks.len(), 4);
        assert_eq!(transcript.ticks[1].dispatches, 1);
        assert_eq!(transcript.ticks[3].tokens, "t");
        assert!(transcript.ticks[3]
            .events
            .iter()
            .any(|e| matches!(e, Event::SequenceCompleted { text, .. } if text == "cat")));

        assert_eq!(transcript.remaining.len(), 1);
        assert_eq!(transcript.remaining[0].text, "car");
        assert_eq!(transcript.remaining[0].progress, 0);
        assert_eq!(transcript.accepted, 3);
        assert_eq!(transcript.rejected, 1);
    }

    #[test]
    fn test_deterministic() {
        let script = ReplayScript::from_json(SCRIPT).unwrap();
        assert_eq!(script.run(), script.run());
    }

    #[test]
    fn test_held_key_defaults() {
        let tick = ScriptedTick {
            text: "a".to_string(),
            ..ScriptedTick::default()
        };
        let frame = tick.frame(4);
        assert!(frame.any_key_held);
        assert!(frame.any_key_pressed);

        let repeat = ScriptedTick {
            text: "a".to_string(),
            pressed: Some(false),
            ..ScriptedTick::default()
        };
        assert!(!repeat.frame(5).any_key_pressed);
    }

    #[test]
    fn test_transcript_json_roundtrip() {
        let transcript = ReplayScript::from_json(SCRIPT).unwrap().run();
        let json = transcript.to_json().unwrap();
        assert_eq!(Transcript::from_json(&json).unwrap(), transcript);
    }

    #[test]
    fn test_transcript_text() {
        let transcript = ReplayScript::from_json(SCRIPT).unwrap().run();
        let text = transcript.to_text();
        assert!(text.contains("tick 1 \"c\""));
        assert!(text.contains("completed #1 \"cat\""));
        assert!(text.contains("accepted 3 rejected 1"));
    }

    #[test]
    fn test_config_file_overrides_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"multi_target": true}"#).unwrap();

        let mut script = ReplayScript::from_json(SCRIPT).unwrap();
        script.load_config(&path).unwrap();
        assert!(script.config.multi_target);

        // Both sequences share "ca", then 't' completes "cat" only
        let transcript = script.run();
        assert_eq!(transcript.remaining[0].text, "car");
        assert_eq!(transcript.remaining[0].progress, 2);
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut script = ReplayScript::default();
        let result = script.load_config(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(ReplayError::Config(ConfigError::Io(_)))));
    }

    #[test]
    fn test_invalid_script() {
        assert!(matches!(
            ReplayScript::from_json("{\"ticks\": 3}"),
            Err(ReplayError::Json(_))
        ));
    }
}
