use tracing::debug;

use crate::{labels, Result};

/// What a confirmation dialog shows. Built when the dialog is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationRequest {
    pub title: String,
    pub body: String,
    pub confirm_label: String,
    pub cancel_label: String,
}

impl ConfirmationRequest {
    pub fn clear_ignored_users(count: usize) -> Self {
        Self {
            title: labels::CONFIRM_CLEAR_TITLE.to_owned(),
            body: labels::confirm_clear_description(count),
            confirm_label: labels::CONFIRM_CLEAR_YES.to_owned(),
            cancel_label: labels::CONFIRM_CLEAR_NO.to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Idle,
    PendingConfirmation(ConfirmationRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Cancelled,
    Cleared,
    /// An answer arrived while nothing was pending.
    NotPending,
}

/// Guards clearing the ignore list behind an explicit confirmation.
#[derive(Debug, Default)]
pub struct ClearGate {
    state: GateState,
}

impl ClearGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    pub fn pending(&self) -> Option<&ConfirmationRequest> {
        match &self.state {
            GateState::Idle => None,
            GateState::PendingConfirmation(request) => Some(request),
        }
    }

    /// The clear action was pressed with `list_len` entries in the list.
    ///
    /// An empty list is ignored. A request that is already pending stays as
    /// it was presented.
    pub fn trigger(&mut self, list_len: usize) -> Option<&ConfirmationRequest> {
        if let GateState::Idle = self.state {
            if list_len == 0 {
                debug!("clear pressed on an empty ignore list, ignoring");
                return None;
            }

            self.state =
                GateState::PendingConfirmation(ConfirmationRequest::clear_ignored_users(list_len));
        }

        self.pending()
    }

    /// Resolve the pending request. `clear` only runs when `confirmed`.
    ///
    /// The gate is idle again afterwards, whatever `clear` returns.
    pub fn answer<F>(&mut self, confirmed: bool, clear: F) -> Result<GateOutcome>
    where
        F: FnOnce() -> Result<bool>,
    {
        if let GateState::Idle = std::mem::take(&mut self.state) {
            return Ok(GateOutcome::NotPending);
        }

        if !confirmed {
            return Ok(GateOutcome::Cancelled);
        }

        clear()?;
        Ok(GateOutcome::Cleared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn empty_list_is_suppressed() {
        let mut gate = ClearGate::new();
        assert!(gate.trigger(0).is_none());
        assert_eq!(gate.state(), &GateState::Idle);
    }

    #[test]
    fn request_reflects_count_at_presentation() {
        let mut gate = ClearGate::new();
        let request = gate.trigger(3).cloned().unwrap();
        assert!(request.body.contains("3 users"));

        // pressing again while the dialog is up keeps the first request
        let again = gate.trigger(5).cloned().unwrap();
        assert_eq!(request, again);
    }

    #[test]
    fn cancel_does_not_clear() {
        let mut gate = ClearGate::new();
        gate.trigger(2);

        let mut ran = false;
        let outcome = gate
            .answer(false, || {
                ran = true;
                Ok(true)
            })
            .unwrap();

        assert_eq!(outcome, GateOutcome::Cancelled);
        assert!(!ran);
        assert_eq!(gate.state(), &GateState::Idle);
    }

    #[test]
    fn confirm_clears() {
        let mut gate = ClearGate::new();
        gate.trigger(2);

        let mut ran = false;
        let outcome = gate
            .answer(true, || {
                ran = true;
                Ok(true)
            })
            .unwrap();

        assert_eq!(outcome, GateOutcome::Cleared);
        assert!(ran);
        assert_eq!(gate.state(), &GateState::Idle);
    }

    #[test]
    fn answer_without_trigger_is_ignored() {
        let mut gate = ClearGate::new();
        let outcome = gate.answer(true, || panic!("must not clear")).unwrap();
        assert_eq!(outcome, GateOutcome::NotPending);
    }

    #[test]
    fn failed_clear_still_returns_to_idle() {
        let mut gate = ClearGate::new();
        gate.trigger(1);

        let res = gate.answer(true, || Err(Error::Generic("disk full".to_owned())));
        assert!(res.is_err());
        assert_eq!(gate.state(), &GateState::Idle);
    }
}
