use tracing::{debug, warn};

use shared_models::appointment::AppointmentStatus;

use crate::models::SchedulingError;

/// Valid next statuses for a given current status. `cancelled` is terminal.
pub fn valid_transitions(from: AppointmentStatus) -> &'static [AppointmentStatus] {
    match from {
        AppointmentStatus::Pending => {
            &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
        }
        AppointmentStatus::Confirmed => &[AppointmentStatus::Cancelled],
        AppointmentStatus::Cancelled => &[],
    }
}

/// Rejects everything outside the state machine. Same-state requests are
/// not handled here; the scheduler treats them as a no-op before asking.
pub fn validate_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
) -> Result<(), SchedulingError> {
    debug!("Validating status transition {} -> {}", from, to);

    if !valid_transitions(from).contains(&to) {
        warn!("Invalid status transition attempted: {} -> {}", from, to);
        return Err(SchedulingError::IllegalTransition { from, to });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::{Cancelled, Confirmed, Pending};

    #[test]
    fn pending_can_confirm_or_cancel() {
        assert!(validate_transition(Pending, Confirmed).is_ok());
        assert!(validate_transition(Pending, Cancelled).is_ok());
    }

    #[test]
    fn confirmed_can_only_cancel() {
        assert!(validate_transition(Confirmed, Cancelled).is_ok());
        assert!(validate_transition(Confirmed, Pending).is_err());
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(valid_transitions(Cancelled).is_empty());
        assert!(validate_transition(Cancelled, Pending).is_err());
        assert!(validate_transition(Cancelled, Confirmed).is_err());
    }
}
