//! Break/continue target tracking during block construction (§4.1).

use crate::ir::BlockId;

struct LoopContext {
    break_target: BlockId,
    continue_target: Option<BlockId>,
    label: Option<String>,
}

/// Parallel stack of `{ break_target, continue_target, label? }` pushed by
/// loop/switch construction and popped once the construct's body has been
/// recursed into. `switch` pushes only a break target — it has no
/// continue target of its own (§4.1).
#[derive(Default)]
pub struct LoopStack {
    frames: Vec<LoopContext>,
}

impl LoopStack {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn push_loop(&mut self, break_target: BlockId, continue_target: BlockId, label: Option<String>) {
        self.frames.push(LoopContext {
            break_target,
            continue_target: Some(continue_target),
            label,
        });
    }

    pub fn push_switch(&mut self, break_target: BlockId, label: Option<String>) {
        self.frames.push(LoopContext {
            break_target,
            continue_target: None,
            label,
        });
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    /// Resolves the target of an unlabeled or labeled `break`. Labeled
    /// breaks may target a `switch` frame; unlabeled ones resolve to the
    /// innermost frame regardless of kind.
    pub fn break_target(&self, label: Option<&str>) -> Option<BlockId> {
        match label {
            None => self.frames.last().map(|f| f.break_target),
            Some(label) => self
                .frames
                .iter()
                .rev()
                .find(|f| f.label.as_deref() == Some(label))
                .map(|f| f.break_target),
        }
    }

    /// Resolves the target of a `continue`. Unlike `break`, this skips
    /// `switch` frames (which carry no continue target) unless explicitly
    /// labeled to one — an unlabeled `continue` inside a `switch` nested in
    /// a loop must reach the enclosing loop, not the switch.
    pub fn continue_target(&self, label: Option<&str>) -> Option<BlockId> {
        match label {
            None => self
                .frames
                .iter()
                .rev()
                .find_map(|f| f.continue_target),
            Some(label) => self
                .frames
                .iter()
                .rev()
                .find(|f| f.label.as_deref() == Some(label))
                .and_then(|f| f.continue_target),
        }
    }

    pub fn is_in_loop(&self) -> bool {
        self.frames.iter().any(|f| f.continue_target.is_some())
    }
}
