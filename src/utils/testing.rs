//! Scripted command runner for unit tests

use crate::utils::process::{CommandResult, CommandRunner};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Capture,
    Execute,
    Pause,
}

#[derive(Debug)]
struct Rule {
    pattern: String,
    responses: VecDeque<CommandResult>,
}

/// Answers command lines by substring match and records every call,
/// pauses included. Pauses are recorded, never slept.
///
/// A rule with several responses hands them out in order and keeps repeating
/// the last one. Unmatched command lines succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: RefCell<Vec<Rule>>,
    calls: RefCell<Vec<(CallKind, String)>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer command lines containing `pattern` with `responses`, in order
    pub fn on(self, pattern: &str, responses: Vec<CommandResult>) -> Self {
        self.rules.borrow_mut().push(Rule {
            pattern: pattern.to_string(),
            responses: responses.into(),
        });
        self
    }

    /// Answer command lines containing `pattern` with a single output line
    pub fn prints(self, pattern: &str, line: &str) -> Self {
        self.on(pattern, vec![CommandResult::exited(0, line)])
    }

    pub fn calls(&self) -> Vec<(CallKind, String)> {
        self.calls.borrow().clone()
    }

    pub fn executed(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind == CallKind::Execute)
            .map(|(_, cmdline)| cmdline.clone())
            .collect()
    }

    /// Executed commands and pauses, in the order they happened
    pub fn timeline(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|(kind, _)| *kind != CallKind::Capture)
            .map(|(_, entry)| entry.clone())
            .collect()
    }

    fn answer(&self, kind: CallKind, cmdline: &str) -> CommandResult {
        self.calls.borrow_mut().push((kind, cmdline.to_string()));

        let mut rules = self.rules.borrow_mut();
        let Some(rule) = rules.iter_mut().find(|r| cmdline.contains(&r.pattern)) else {
            return CommandResult::exited(0, "");
        };
        if rule.responses.len() > 1 {
            rule.responses.pop_front().unwrap_or_default()
        } else {
            rule.responses.front().cloned().unwrap_or_default()
        }
    }
}

impl CommandRunner for ScriptedRunner {
    fn capture(&self, cmdline: &str) -> CommandResult {
        self.answer(CallKind::Capture, cmdline)
    }

    fn execute(&self, cmdline: &str) -> CommandResult {
        let mut result = self.answer(CallKind::Execute, cmdline);
        result.first_line.clear();
        result
    }

    fn pause(&self, delay: Duration) {
        self.calls
            .borrow_mut()
            .push((CallKind::Pause, format!("pause {}ms", delay.as_millis())));
    }
}
