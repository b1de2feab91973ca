use tracing::{info, warn};

use supply_core::{ListParams, ListResult, ServiceError, new_id, now_rfc3339};

use crate::allocation::{
    ScheduleDay, ValidationReport, build_schedule, build_submission, validate_items,
};
use crate::model::{Order, OrderForm, OrderStatus};

use super::CartService;

impl CartService {
    // ── Scheduling step ──

    /// Validate the whole cart against the flow's slot requirements. The
    /// wizard calls this before advancing past the scheduling step.
    pub fn validate(&self, customer: &str) -> Result<ValidationReport, ServiceError> {
        let items = self.store.load_cart(customer)?;
        Ok(validate_items(&items, &self.requirements))
    }

    /// The derived date → time → deliveries view for the review step.
    pub fn schedule(&self, customer: &str) -> Result<Vec<ScheduleDay>, ServiceError> {
        let items = self.store.load_cart(customer)?;
        Ok(build_schedule(&items, &self.config))
    }

    // ── Checkout ──

    /// Turn the cart into a submitted order: validate, map to the wire
    /// payload, persist the order record, and clear the cart.
    pub fn checkout(&self, customer: &str, form: OrderForm) -> Result<Order, ServiceError> {
        let items = self.store.load_cart(customer)?;
        if items.is_empty() {
            return Err(ServiceError::Validation("cart is empty".into()));
        }

        let report = validate_items(&items, &self.requirements);
        if !report.ok {
            warn!(
                "checkout blocked for {}: {} items need attention",
                customer,
                report.items.len()
            );
            return Err(ServiceError::Validation(format!(
                "cart is not ready for checkout: {} of {} items have allocation findings",
                report.items.len(),
                items.len()
            )));
        }

        let now = now_rfc3339();
        let order = Order {
            id: new_id(),
            customer: customer.to_string(),
            status: OrderStatus::Processing,
            submission: build_submission(&items, form),
            create_at: Some(now.clone()),
            update_at: Some(now),
        };

        self.store.save_order(&order)?;
        self.store.clear_cart(customer)?;
        info!(
            "customer {} checked out order {} with {} items",
            customer,
            order.id,
            order.submission.items.len()
        );
        Ok(order)
    }

    // ── Orders ──

    pub fn get_order(&self, customer: &str, order_id: &str) -> Result<Order, ServiceError> {
        self.store.load_order(customer, order_id)
    }

    /// The customer's orders, newest first.
    pub fn list_orders(
        &self,
        customer: &str,
        params: &ListParams,
    ) -> Result<ListResult<Order>, ServiceError> {
        let orders = self.store.load_orders(customer)?;
        let total = orders.len();
        let items = orders
            .into_iter()
            .skip(params.offset)
            .take(params.limit)
            .collect();
        Ok(ListResult { items, total })
    }

    /// Cancel a processing order. Cancelling twice is a conflict.
    pub fn cancel_order(&self, customer: &str, order_id: &str) -> Result<Order, ServiceError> {
        let mut order = self.store.load_order(customer, order_id)?;
        if order.status == OrderStatus::Cancelled {
            return Err(ServiceError::Conflict(format!(
                "order {order_id} is already cancelled"
            )));
        }
        order.status = OrderStatus::Cancelled;
        order.update_at = Some(now_rfc3339());
        self.store.save_order(&order)?;
        info!("customer {} cancelled order {}", customer, order_id);
        Ok(order)
    }
}
