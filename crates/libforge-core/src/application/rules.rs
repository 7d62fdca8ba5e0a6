//! Ordered, all-or-nothing transform chains over a [`VirtualTree`].
//!
//! Each step is registered with a name and an enablement flag. Disabled
//! steps are recorded as skipped, not run. Steps run on a branch of the
//! tree; the branch is merged back only when every enabled step succeeded.

use tracing::{debug, info_span};

use crate::{
    application::tree::VirtualTree,
    domain::Task,
    error::ForgeResult,
};

type Step<'a> = Box<dyn FnOnce(&mut VirtualTree, &mut Vec<Task>) -> ForgeResult<()> + 'a>;

struct Rule<'a> {
    name: &'static str,
    enabled: bool,
    step: Step<'a>,
}

/// Which steps ran, which were switched off, and the tasks they queued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainReport {
    pub applied: Vec<&'static str>,
    pub skipped: Vec<&'static str>,
    pub tasks: Vec<Task>,
}

#[derive(Default)]
pub struct RuleChain<'a> {
    rules: Vec<Rule<'a>>,
}

impl<'a> RuleChain<'a> {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append an unconditional step.
    pub fn then<F>(self, name: &'static str, step: F) -> Self
    where
        F: FnOnce(&mut VirtualTree, &mut Vec<Task>) -> ForgeResult<()> + 'a,
    {
        self.then_if(true, name, step)
    }

    /// Append a step that only runs when `enabled` holds.
    pub fn then_if<F>(mut self, enabled: bool, name: &'static str, step: F) -> Self
    where
        F: FnOnce(&mut VirtualTree, &mut Vec<Task>) -> ForgeResult<()> + 'a,
    {
        self.rules.push(Rule {
            name,
            enabled,
            step: Box::new(step),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every enabled step in order against a branch of `tree`.
    ///
    /// On the first error the branch and any queued tasks are dropped and
    /// `tree` is left exactly as it was.
    pub fn run(self, tree: &mut VirtualTree) -> ForgeResult<ChainReport> {
        let mut branch = tree.branch();
        let mut report = ChainReport::default();

        for rule in self.rules {
            if !rule.enabled {
                debug!(step = rule.name, "Skipped");
                report.skipped.push(rule.name);
                continue;
            }

            let _span = info_span!("step", name = rule.name).entered();
            (rule.step)(&mut branch, &mut report.tasks)?;
            debug!("Applied");
            report.applied.push(rule.name);
        }

        tree.merge_branch(branch);
        Ok(report)
    }
}
