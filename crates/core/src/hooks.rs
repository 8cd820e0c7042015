//! Parameter emission hooks
//!
//! Hosts register callbacks that see every synthesized parameter before it
//! is attached to an operation. A callback returning `ControlFlow::Break`
//! vetoes the parameter and stops the remaining callbacks from running.

use crate::feature::Feature;
use crate::openapi::{Operation, Parameter};
use std::fmt;
use std::ops::ControlFlow;

/// A registered emission hook
pub type Hook = Box<dyn Fn(&Operation, &Parameter, &Feature) -> ControlFlow<()> + Send + Sync>;

/// Append-only list of hooks, owned by the host pipeline
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<Hook>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook; hooks run in registration order
    pub fn register<F>(&mut self, hook: F)
    where
        F: Fn(&Operation, &Parameter, &Feature) -> ControlFlow<()> + Send + Sync + 'static,
    {
        self.hooks.push(Box::new(hook));
    }

    /// Run hooks until one halts
    pub fn run(
        &self,
        operation: &Operation,
        parameter: &Parameter,
        feature: &Feature,
    ) -> ControlFlow<()> {
        for hook in &self.hooks {
            if hook(operation, parameter, feature).is_break() {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
