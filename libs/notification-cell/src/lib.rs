pub mod mailer;
pub mod notifier;

pub use mailer::EmailNotifier;
pub use notifier::{NoopNotifier, Notifier};
