use anyhow::Result;
use blockstack_core::Millis;
use serde::Deserialize;
use std::{collections::VecDeque, fs, path::Path};

#[derive(Debug, Deserialize)]
struct CommandScriptFile {
    steps: Vec<CommandScriptStepDef>,
}

#[derive(Debug, Clone, Deserialize)]
struct CommandScriptStepDef {
    at_ms: u64,
    command: String,
}

#[derive(Debug, Clone)]
struct CommandScriptStep {
    at: Millis,
    command: String,
}

/// Deterministic command script runner.
///
/// Scripts are a list of `{at_ms, command}` steps on the session clock,
/// executed in file order.
#[derive(Debug)]
pub struct CommandScriptPlayer {
    pending: VecDeque<CommandScriptStep>,
}

impl CommandScriptPlayer {
    /// Load a command script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load a command script from an in-memory JSON string.
    pub fn parse(contents: &str) -> Result<Self> {
        let file: CommandScriptFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            anyhow::bail!("command script contains no steps");
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_at: Option<u64> = None;
        for step in file.steps {
            let command = step.command.trim().to_string();
            if command.is_empty() {
                anyhow::bail!("command script contains an empty command");
            }

            if let Some(prev) = last_at {
                if step.at_ms < prev {
                    anyhow::bail!("command script steps must be sorted by at_ms");
                }
            }
            last_at = Some(step.at_ms);

            pending.push_back(CommandScriptStep {
                at: Millis(step.at_ms),
                command,
            });
        }

        Ok(Self { pending })
    }

    /// Time of the next pending step.
    pub fn next_due(&self) -> Option<Millis> {
        self.pending.front().map(|step| step.at)
    }

    /// Next time the driver has to wake up.
    ///
    /// That is the next step, or an earlier `write_due` deadline so a pending
    /// write lands at its own time rather than at the following step.
    pub fn next_wake(&self, write_due: Option<Millis>) -> Option<Millis> {
        let step = self.next_due()?;
        Some(write_due.filter(|due| *due < step).unwrap_or(step))
    }

    /// Drain and return all commands scheduled at or before `now`.
    pub fn drain_ready_commands(&mut self, now: Millis) -> Vec<String> {
        let mut commands = Vec::new();
        while self.pending.front().is_some_and(|step| step.at <= now) {
            if let Some(step) = self.pending.pop_front() {
                commands.push(step.command);
            }
        }
        commands
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_script_rejects_unsorted_steps() {
        let json = r#"{
            "steps": [
                {"at_ms": 200, "command": "add"},
                {"at_ms": 100, "command": "clear"}
            ]
        }"#;
        let err = CommandScriptPlayer::parse(json).unwrap_err();
        assert!(
            err.to_string().contains("sorted by at_ms"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn command_script_rejects_empty_commands() {
        let json = r#"{"steps": [{"at_ms": 0, "command": "   "}]}"#;
        assert!(CommandScriptPlayer::parse(json).is_err());
        assert!(CommandScriptPlayer::parse(r#"{"steps": []}"#).is_err());
    }

    #[test]
    fn command_script_drains_in_order_and_is_deterministic() {
        let json = r#"{
            "steps": [
                {"at_ms": 0, "command": "select 2x2 Block - Part 1"},
                {"at_ms": 0, "command": "add"},
                {"at_ms": 450, "command": "list"}
            ]
        }"#;
        let mut script = CommandScriptPlayer::parse(json).expect("script should parse");

        assert_eq!(script.next_due(), Some(Millis(0)));
        assert_eq!(
            script.drain_ready_commands(Millis(0)),
            vec!["select 2x2 Block - Part 1".to_string(), "add".to_string()]
        );
        assert_eq!(script.next_due(), Some(Millis(450)));
        assert_eq!(
            script.drain_ready_commands(Millis(449)),
            Vec::<String>::new()
        );
        assert_eq!(
            script.drain_ready_commands(Millis(450)),
            vec!["list".to_string()]
        );
        assert!(script.is_finished());
        assert_eq!(script.next_due(), None);
    }

    #[test]
    fn next_wake_interleaves_write_deadlines() {
        let json = r#"{
            "steps": [
                {"at_ms": 0, "command": "add"},
                {"at_ms": 1000, "command": "list"}
            ]
        }"#;
        let mut script = CommandScriptPlayer::parse(json).expect("script should parse");

        assert_eq!(script.next_wake(None), Some(Millis(0)));
        script.drain_ready_commands(Millis(0));

        assert_eq!(script.next_wake(Some(Millis(300))), Some(Millis(300)));
        assert!(script.drain_ready_commands(Millis(300)).is_empty());
        assert_eq!(script.next_wake(Some(Millis(1000))), Some(Millis(1000)));
        assert_eq!(script.next_wake(Some(Millis(1300))), Some(Millis(1000)));

        script.drain_ready_commands(Millis(1000));
        assert!(script.is_finished());
        assert_eq!(script.next_wake(Some(Millis(1300))), None);
    }
}
