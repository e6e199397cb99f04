//! Live progress output for a generation run.

use std::collections::HashMap;

use anyhow::Result;
use jiff::Timestamp;
use keystone_core::{
    models::{ProgressStep, StepId, StepStatus, ThinkingLine},
    LocalTime,
};

use crate::renderer::TerminalRenderer;

/// Prints step transitions and new thinking lines as they are published.
///
/// Watch channels only carry the latest snapshot, so the printer remembers
/// what it already showed and prints the difference.
pub struct ProgressPrinter<'a> {
    renderer: &'a TerminalRenderer,
    seen: HashMap<StepId, StepStatus>,
    last_line: Option<u64>,
}

impl<'a> ProgressPrinter<'a> {
    pub fn new(renderer: &'a TerminalRenderer) -> Self {
        Self {
            renderer,
            seen: HashMap::new(),
            last_line: None,
        }
    }

    pub fn steps(&mut self, steps: &[ProgressStep]) -> Result<()> {
        for step in steps {
            if self.seen.insert(step.id, step.status) == Some(step.status) {
                continue;
            }
            // Pending steps are announced once the run starts them.
            if step.status == StepStatus::Pending {
                continue;
            }
            self.renderer.render(&format!(
                "`{}` {} ({})\n",
                LocalTime(&Timestamp::now()),
                step.label,
                step.status.with_icon()
            ))?;
        }
        Ok(())
    }

    pub fn lines(&mut self, lines: &[ThinkingLine]) -> Result<()> {
        for line in lines {
            if self.last_line.is_some_and(|last| line.id <= last) {
                continue;
            }
            self.last_line = Some(line.id);
            let text = if self.renderer.is_rich() {
                format!("  _{}_\n", line.text)
            } else {
                format!("  {}\n", line.text)
            };
            self.renderer.render(&text)?;
        }
        Ok(())
    }

    #[cfg(test)]
    fn status_of(&self, id: StepId) -> Option<StepStatus> {
        self.seen.get(&id).copied()
    }
}
