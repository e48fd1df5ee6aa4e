//! Two-step swap / replacement selection.
//!
//! At most one selection is pending. Starting a swap discards a pending
//! replacement and vice versa; starting the same kind again simply replaces
//! the pending slot.

use super::domain::{ScheduleError, Slot};
use super::store::ScheduleState;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Idle,
    PendingSwapSource(Slot),
    PendingReplacementTarget(Slot),
}

/// What a selection action did, so the caller can tell the user what comes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionStep {
    AwaitingSwapPartner(Slot),
    Swapped { first: Slot, second: Slot },
    AwaitingCoverer(Slot),
    Replaced { replaced: Slot, coverer: Slot },
    ReportingToggled { slot: Slot, reporting: bool },
    Cancelled,
}

impl Selection {
    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }

    pub fn pending_swap(&self) -> Option<&Slot> {
        match self {
            Selection::PendingSwapSource(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn pending_replacement(&self) -> Option<&Slot> {
        match self {
            Selection::PendingReplacementTarget(slot) => Some(slot),
            _ => None,
        }
    }

    pub fn begin_swap(&mut self, slot: Slot) -> SelectionStep {
        debug!(%slot, "swap source selected");
        *self = Selection::PendingSwapSource(slot.clone());
        SelectionStep::AwaitingSwapPartner(slot)
    }

    /// Commits the pending swap against `slot`. The selection is consumed even
    /// when the swap is rejected.
    pub fn complete_swap(
        &mut self,
        state: &mut ScheduleState,
        slot: Slot,
    ) -> Result<SelectionStep, ScheduleError> {
        let Selection::PendingSwapSource(source) = std::mem::take(self) else {
            return Err(ScheduleError::NoPendingSwap);
        };
        state.swap(&source, &slot)?;
        Ok(SelectionStep::Swapped {
            first: source,
            second: slot,
        })
    }

    /// Swap gesture: selects a source when none is pending, otherwise commits.
    pub fn swap_with(
        &mut self,
        state: &mut ScheduleState,
        slot: Slot,
    ) -> Result<SelectionStep, ScheduleError> {
        if self.pending_swap().is_some() {
            self.complete_swap(state, slot)
        } else {
            Ok(self.begin_swap(slot))
        }
    }

    pub fn begin_replacement(&mut self, slot: Slot) -> SelectionStep {
        debug!(%slot, "employee marked for replacement");
        *self = Selection::PendingReplacementTarget(slot.clone());
        SelectionStep::AwaitingCoverer(slot)
    }

    /// Commits the pending replacement with `coverer` taking over. The
    /// selection is consumed even when the replacement is rejected.
    pub fn complete_replacement(
        &mut self,
        state: &mut ScheduleState,
        coverer: Slot,
    ) -> Result<SelectionStep, ScheduleError> {
        let Selection::PendingReplacementTarget(replaced) = std::mem::take(self) else {
            return Err(ScheduleError::NoPendingReplacement);
        };
        state.replace(&replaced, &coverer)?;
        Ok(SelectionStep::Replaced { replaced, coverer })
    }

    /// Plain click on an occupant: completes a pending replacement, otherwise
    /// toggles the occupant's reporting flag.
    pub fn click(
        &mut self,
        state: &mut ScheduleState,
        slot: Slot,
    ) -> Result<SelectionStep, ScheduleError> {
        if self.pending_replacement().is_some() {
            return self.complete_replacement(state, slot);
        }
        let reporting = state.toggle_reporting(slot.week, &slot.employee);
        Ok(SelectionStep::ReportingToggled { slot, reporting })
    }

    pub fn cancel(&mut self) -> SelectionStep {
        *self = Selection::Idle;
        SelectionStep::Cancelled
    }
}
