//! Extension points for the host checkout flow.
//!
//! The checkout flow asks a [`CheckoutHooks`] implementation whether a sale
//! may start and tells it when a payment completes. [`EmployeeStore`] is the
//! usual implementation: a sale needs a logged-in employee, and a completed
//! payment becomes a sales record attributed to them.

use crate::{
    core::{
        notify::{Notifier, Severity},
        sales::{SaleData, SalesRecord},
        store::EmployeeStore,
    },
    errors::Result,
    storage::KeyValueStorage,
};
use std::future::Future;
use tracing::debug;

/// Gate and observer the checkout flow calls into.
pub trait CheckoutHooks: Send {
    /// Pre-sale gate: may a new sale start right now?
    fn may_start_sale(&self) -> bool;

    /// Post-sale observer, called once payment has completed.
    fn sale_completed(&mut self, sale: SaleData)
    -> impl Future<Output = Result<SalesRecord>> + Send;
}

impl<S: KeyValueStorage> CheckoutHooks for EmployeeStore<S> {
    fn may_start_sale(&self) -> bool {
        self.is_logged_in()
    }

    async fn sale_completed(&mut self, sale: SaleData) -> Result<SalesRecord> {
        self.record_sale(sale).await
    }
}

/// Outcome of asking to start a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleStart {
    /// Go ahead
    Ready,
    /// Show the login surface; the start is remembered until login completes
    LoginRequired,
}

/// Drives a checkout through its hooks and reports to a notifier.
pub struct Checkout<'a, H, N> {
    hooks: &'a mut H,
    notifier: &'a N,
    deferred_start: bool,
}

impl<'a, H: CheckoutHooks, N: Notifier> Checkout<'a, H, N> {
    /// Wraps the hooks and notifier for one checkout surface.
    pub const fn new(hooks: &'a mut H, notifier: &'a N) -> Self {
        Self {
            hooks,
            notifier,
            deferred_start: false,
        }
    }

    /// Asks the gate whether a sale may start. When it may not, the request is
    /// deferred until [`Checkout::login_completed`].
    pub fn start_sale(&mut self) -> SaleStart {
        if self.hooks.may_start_sale() {
            self.deferred_start = false;
            return SaleStart::Ready;
        }
        self.deferred_start = true;
        self.notifier
            .notify("Please log in before starting a sale", Severity::Warning);
        SaleStart::LoginRequired
    }

    /// Whether a start request is waiting for a login.
    #[must_use]
    pub const fn has_deferred_start(&self) -> bool {
        self.deferred_start
    }

    /// Resumes a deferred start after a login. Returns `None` if nothing was
    /// waiting.
    pub fn login_completed(&mut self) -> Option<SaleStart> {
        if !self.deferred_start {
            return None;
        }
        debug!("Resuming deferred sale start");
        Some(self.start_sale())
    }

    /// Hands the completed sale to the observer.
    ///
    /// # Errors
    /// Whatever the observer returns, e.g. `NotLoggedIn` from the store.
    pub async fn complete_payment(&mut self, sale: SaleData) -> Result<SalesRecord> {
        match self.hooks.sale_completed(sale).await {
            Ok(record) => {
                self.notifier.notify(
                    &format!("Sale {} recorded", record.sale.receipt_number),
                    Severity::Success,
                );
                Ok(record)
            }
            Err(e) => {
                self.notifier
                    .notify(&format!("Sale could not be recorded: {e}"), Severity::Error);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::permissions::Role;
    use crate::errors::Error;
    use crate::test_utils::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<(String, Severity)>>,
    }

    impl RecordingNotifier {
        fn severities(&self) -> Vec<Severity> {
            self.messages.lock().unwrap().iter().map(|(_, s)| *s).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str, severity: Severity) {
            self.messages
                .lock()
                .unwrap()
                .push((message.to_string(), severity));
        }
    }

    #[tokio::test]
    async fn test_start_sale_requires_login() -> Result<()> {
        let mut store = setup_store().await?;
        let notifier = RecordingNotifier::default();
        let mut checkout = Checkout::new(&mut store, &notifier);

        assert_eq!(checkout.start_sale(), SaleStart::LoginRequired);
        assert!(checkout.has_deferred_start());
        assert_eq!(notifier.severities(), vec![Severity::Warning]);
        Ok(())
    }

    #[tokio::test]
    async fn test_deferred_start_resumes_after_login() -> Result<()> {
        let mut store = setup_store().await?;
        create_test_employee(&mut store, "eve", Role::Cashier).await?;
        let notifier = RecordingNotifier::default();

        {
            let mut checkout = Checkout::new(&mut store, &notifier);
            assert_eq!(checkout.start_sale(), SaleStart::LoginRequired);
            assert_eq!(checkout.login_completed(), Some(SaleStart::LoginRequired));
        }

        store.authenticate("eve", TEST_PASSWORD).await?;
        let mut checkout = Checkout::new(&mut store, &notifier);
        assert_eq!(checkout.login_completed(), None);
        assert_eq!(checkout.start_sale(), SaleStart::Ready);
        assert!(!checkout.has_deferred_start());
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_payment_records_sale() -> Result<()> {
        let mut store = setup_store().await?;
        let eve = create_test_employee(&mut store, "eve", Role::Cashier).await?;
        store.authenticate("eve", TEST_PASSWORD).await?;
        let notifier = RecordingNotifier::default();

        let record = {
            let mut checkout = Checkout::new(&mut store, &notifier);
            assert_eq!(checkout.start_sale(), SaleStart::Ready);
            checkout.complete_payment(test_sale("R-77", 19.5)).await?
        };

        assert_eq!(record.employee_id, eve.id);
        assert_eq!(store.sales().len(), 1);
        assert_eq!(notifier.severities(), vec![Severity::Success]);
        Ok(())
    }

    #[tokio::test]
    async fn test_complete_payment_without_session_reports_error() -> Result<()> {
        let mut store = setup_store().await?;
        let notifier = RecordingNotifier::default();
        let mut checkout = Checkout::new(&mut store, &notifier);

        let result = checkout.complete_payment(test_sale("R-1", 1.0)).await;

        assert!(matches!(result, Err(Error::NotLoggedIn)));
        assert_eq!(notifier.severities(), vec![Severity::Error]);
        Ok(())
    }
}
