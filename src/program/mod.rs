//! Program identity and the lazily created parameter binding.
//!
//! An effect owns a [`ProgramSlot`]: an optional program identity plus a
//! binding that moves from `Unbound` to `Bound` the first time the executor
//! accepts the program. While the identity is unset, or while the executor
//! refuses to create a binding, [`ProgramSlot::try_get_binding`] yields
//! `None` and the effect passes its source through.

pub mod binding;
pub mod passes;

pub use binding::{Binding, Keyword, KeywordGroup, Param, ParamValue};
pub use passes::{
    DepthOutlinePass, MangaPass, NormalDepthOutlinePass, OutlinePass, SharpnessPass,
    SobelAnglePass,
};

use crate::backend::PassExecutor;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Name of a multi-pass program, e.g. `"Hidden/Manga"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgramId(Cow<'static, str>);

impl ProgramId {
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered pass enumeration of one program. The discriminant is the pass
/// index the executor receives.
pub trait ProgramPass: Copy {
    fn index(self) -> usize;
    fn label(self) -> &'static str;
}

enum SlotState {
    Unbound,
    Bound(Binding),
}

pub struct ProgramSlot {
    program: Option<ProgramId>,
    state: SlotState,
}

impl ProgramSlot {
    pub fn new(program: Option<ProgramId>) -> Self {
        Self {
            program,
            state: SlotState::Unbound,
        }
    }

    pub fn program(&self) -> Option<&ProgramId> {
        self.program.as_ref()
    }

    /// Replace the program identity; any existing binding is dropped.
    pub fn set_program(&mut self, program: Option<ProgramId>) {
        self.program = program;
        self.state = SlotState::Unbound;
    }

    /// Drop the binding; the next frame recreates it.
    pub fn reset(&mut self) {
        self.state = SlotState::Unbound;
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.state, SlotState::Bound(_))
    }

    /// Return the binding, creating it through `exec` on first use.
    pub fn try_get_binding<E: PassExecutor>(&mut self, exec: &mut E) -> Option<&mut Binding> {
        let program = self.program.as_ref()?;
        if let SlotState::Unbound = self.state {
            match exec.create_binding(program) {
                Ok(binding) => {
                    debug!("ProgramSlot bound program `{program}`");
                    self.state = SlotState::Bound(binding);
                }
                Err(err) => {
                    warn!("ProgramSlot could not bind `{program}`: {err}");
                    return None;
                }
            }
        }
        match &mut self.state {
            SlotState::Bound(binding) => Some(binding),
            SlotState::Unbound => None,
        }
    }
}
