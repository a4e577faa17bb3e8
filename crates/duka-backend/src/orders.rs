use async_trait::async_trait;
use chrono::Utc;
use duka_commerce::checkout::calculate_summary;
use duka_commerce::order::{Order, OrderGateway, OrderItem, OrderRequest, OrderStatus, ShippingInfo};
use duka_commerce::validation::FieldErrors;
use duka_commerce::{CommerceError, OrderId};
use tracing::{debug, info};

use crate::latency::pause;
use crate::MockBackend;

impl MockBackend {
    /// Check a submission the way the order service would.
    fn check_request(request: &OrderRequest) -> Result<(), CommerceError> {
        let mut errors = FieldErrors::new();
        if request.items.is_empty() {
            errors.push("items", "Order must contain at least one item");
        }
        errors.merge(request.form_data.validate_information());
        errors.merge(request.form_data.validate_payment());
        errors.into_result()
    }
}

#[async_trait]
impl OrderGateway for MockBackend {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderId, CommerceError> {
        pause(self.latency.order_submit_ms).await;

        Self::check_request(request)?;

        let form = &request.form_data;
        let summary = calculate_summary(&request.items, form.shipping_method)?;
        let method = form.shipping_method.method();

        let mut orders = self.orders.lock().await;

        let mut id = OrderId::generate();
        while orders.iter().any(|o| o.id == id) {
            id = OrderId::generate();
        }

        let items = request
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| OrderItem {
                id: format!("item-{}", i + 1),
                product_id: item.id.clone(),
                name: item.name.clone(),
                price: item.price,
                quantity: item.quantity,
                image: item.image.clone(),
            })
            .collect();

        let now = Utc::now();
        let order = Order {
            id: id.clone(),
            user_id: self.user_id.clone(),
            items,
            status: OrderStatus::Pending,
            subtotal: summary.subtotal,
            shipping: summary.shipping,
            tax: summary.tax,
            total: summary.total,
            shipping_address: form.shipping_address(),
            billing_address: form.billing_address(),
            payment_method: form.payment_method.as_str().to_string(),
            shipping_info: ShippingInfo {
                method: method.name.clone(),
                carrier: None,
                tracking_number: None,
                estimated_delivery: method.delivery_estimate(),
                cost: summary.shipping,
            },
            created_at: now,
            updated_at: now,
        };

        info!(
            order_id = %id,
            items = order.items.len(),
            total = %order.total,
            payment_method = %order.payment_method,
            "order placed"
        );
        orders.push(order);

        Ok(id)
    }

    async fn get(&self, id: &OrderId) -> Result<Order, CommerceError> {
        pause(self.latency.order_detail_ms).await;

        debug!(order_id = %id, "fetching order");
        self.orders
            .lock()
            .await
            .iter()
            .find(|o| &o.id == id)
            .cloned()
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))
    }

    /// Newest first.
    async fn list(&self) -> Result<Vec<Order>, CommerceError> {
        pause(self.latency.order_list_ms).await;

        let mut orders = self.orders.lock().await.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = orders.len(), "listed orders");
        Ok(orders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use duka_commerce::cart::CartItem;
    use duka_commerce::checkout::{CheckoutFormData, PaymentMethod, ShippingTier};
    use duka_commerce::Money;

    fn form() -> CheckoutFormData {
        CheckoutFormData {
            email: "jane@example.com".into(),
            first_name: "Jane".into(),
            last_name: "Wanjiru".into(),
            address: "12 Moi Avenue".into(),
            city: "Nairobi".into(),
            state: "Nairobi County".into(),
            zip_code: "00100".into(),
            phone: "+254700000001".into(),
            shipping_method: ShippingTier::Express,
            payment_method: PaymentMethod::Mpesa,
            mpesa_phone: "+254700000001".into(),
            ..CheckoutFormData::default()
        }
    }

    fn request() -> OrderRequest {
        OrderRequest {
            items: vec![
                CartItem::new("1", "Wireless Bluetooth Headphones", Money::kes(9999), 1),
                CartItem::new("3", "Premium Leather Backpack", Money::kes(7999), 1),
            ],
            form_data: form(),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_pending_order() {
        let backend = MockBackend::instant();
        let id = backend.submit(&request()).await.unwrap();
        assert!(id.as_str().starts_with("ORD-"));

        let order = OrderGateway::get(&backend, &id).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.user_id.as_str(), "1");
        assert_eq!(order.items[1].id, "item-2");
        assert_eq!(order.total.display(), "KES 22,376.68");
        assert_eq!(order.payment_method, "mpesa");
        assert_eq!(order.shipping_info.method, "Express Shipping");
        assert_eq!(
            order.shipping_info.estimated_delivery.as_deref(),
            Some("1-2 business days")
        );
        assert_eq!(order.shipping_address.full_name(), "Jane Wanjiru");
    }

    #[tokio::test]
    async fn test_new_order_listed_first() {
        let backend = MockBackend::instant();
        let id = backend.submit(&request()).await.unwrap();

        let orders = OrderGateway::list(&backend).await.unwrap();
        assert_eq!(orders.len(), 4);
        assert_eq!(orders[0].id, id);
        let seeded: Vec<_> = orders[1..].iter().map(|o| o.id.as_str()).collect();
        assert_eq!(seeded, vec!["ORD-1234-ABCD", "ORD-5678-EFGH", "ORD-9012-IJKL"]);
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_and_invalid() {
        let backend = MockBackend::instant();

        let mut empty = request();
        empty.items.clear();
        let err = backend.submit(&empty).await.unwrap_err();
        assert!(err.field_errors().is_some_and(|e| e.contains("items")));

        let mut invalid = request();
        invalid.form_data.email = "nope".into();
        let err = backend.submit(&invalid).await.unwrap_err();
        assert!(err.field_errors().is_some_and(|e| e.contains("email")));

        assert_eq!(OrderGateway::list(&backend).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_get_unknown_order() {
        let backend = MockBackend::instant();
        let err = OrderGateway::get(&backend, &OrderId::new("ORD-NOPE"))
            .await
            .unwrap_err();
        assert!(matches!(err, CommerceError::OrderNotFound(_)));
    }
}
