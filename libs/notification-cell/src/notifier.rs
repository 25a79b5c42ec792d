use async_trait::async_trait;
use tracing::debug;

use shared_models::appointment::Appointment;

/// One-way observer of appointment state transitions. Methods return `()`:
/// implementations swallow delivery failures, so a failed notification
/// never fails the operation that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A booking request was accepted and recorded as pending.
    async fn notify_created(&self, appointment: &Appointment);

    /// The appointment was confirmed.
    async fn notify_confirmed(&self, appointment: &Appointment);

    /// The appointment was cancelled, directly or by cascade.
    async fn notify_cancelled(&self, appointment: &Appointment);
}

/// Used when no email credentials are configured; transitions are only
/// visible in the logs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify_created(&self, appointment: &Appointment) {
        debug!("notification skipped (created): appointment {}", appointment.id);
    }

    async fn notify_confirmed(&self, appointment: &Appointment) {
        debug!("notification skipped (confirmed): appointment {}", appointment.id);
    }

    async fn notify_cancelled(&self, appointment: &Appointment) {
        debug!("notification skipped (cancelled): appointment {}", appointment.id);
    }
}
