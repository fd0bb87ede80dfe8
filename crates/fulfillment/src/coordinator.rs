//! Order coordinator: basket to persisted order to downstream fan-out.

use broker::Publisher;
use common::{BasketId, OrderId};
use domain::{
    Address, CatalogItemOrdered, DeliveryPayload, Order, OrderItem, UriComposer,
    WarehouseReservationEvent,
};
use stores::{BasketStore, CatalogStore, OrderStore};

use crate::error::CheckoutError;
use crate::services::DeliveryIntake;

/// Coordinates order creation and the fan-out to the warehouse pipeline
/// and the delivery intake service.
///
/// All steps run in strict sequence per invocation: validate, persist the
/// order, publish the warehouse event, call delivery intake. Each step is
/// a hard dependency on the previous one; failures after the order write
/// surface as [`CheckoutError::PublishFailed`] /
/// [`CheckoutError::DeliveryFailed`] without rollback.
pub struct OrderCoordinator<B, C, O, P, D>
where
    B: BasketStore,
    C: CatalogStore,
    O: OrderStore,
    P: Publisher,
    D: DeliveryIntake,
{
    baskets: B,
    catalog: C,
    orders: O,
    publisher: P,
    delivery: D,
    uris: UriComposer,
}

impl<B, C, O, P, D> OrderCoordinator<B, C, O, P, D>
where
    B: BasketStore,
    C: CatalogStore,
    O: OrderStore,
    P: Publisher,
    D: DeliveryIntake,
{
    /// Creates a new coordinator over the given capabilities.
    pub fn new(
        baskets: B,
        catalog: C,
        orders: O,
        publisher: P,
        delivery: D,
        uris: UriComposer,
    ) -> Self {
        Self {
            baskets,
            catalog,
            orders,
            publisher,
            delivery,
            uris,
        }
    }

    /// Creates an order from the basket and fans it out downstream.
    ///
    /// Returns the store-assigned order id on full success.
    #[tracing::instrument(skip(self, shipping_address))]
    pub async fn create_order(
        &self,
        basket_id: BasketId,
        shipping_address: Address,
    ) -> Result<OrderId, CheckoutError> {
        metrics::counter!("checkout_requests_total").increment(1);
        let started = std::time::Instant::now();

        let basket = self
            .baskets
            .get_by_id_with_items(basket_id)
            .await?
            .ok_or(CheckoutError::BasketNotFound(basket_id))?;

        if basket.is_empty() {
            return Err(CheckoutError::EmptyBasket(basket_id));
        }

        let catalog_items = self
            .catalog
            .list_by_ids(&basket.catalog_item_ids())
            .await?;

        let mut items = Vec::with_capacity(basket.items.len());
        for line in &basket.items {
            let catalog_item = catalog_items
                .iter()
                .find(|c| c.id == line.catalog_item_id)
                .ok_or(CheckoutError::UnknownCatalogItem(line.catalog_item_id))?;

            let item_ordered = CatalogItemOrdered::new(
                catalog_item.id,
                catalog_item.name.clone(),
                self.uris.compose_pic_uri(&catalog_item.picture_uri),
            );
            // Price and quantity are copied from the basket line, never
            // recomputed from current catalog pricing.
            items.push(OrderItem::new(item_ordered, line.unit_price, line.quantity)?);
        }

        let order = Order::new(basket.buyer_id.clone(), shipping_address, items)?;

        let order_id = self.orders.add(order.clone()).await?;
        tracing::info!(%order_id, total = %order.total(), "order persisted");

        let event = WarehouseReservationEvent::from_order(order_id, &order);
        let body = serde_json::to_vec(&event)?;
        self.publisher
            .publish(body)
            .await
            .map_err(|source| CheckoutError::PublishFailed { order_id, source })?;
        tracing::info!(%order_id, "warehouse reservation event published");

        let payload = DeliveryPayload::from_order(&order);
        self.delivery
            .send(&payload)
            .await
            .map_err(|source| CheckoutError::DeliveryFailed { order_id, source })?;

        metrics::counter!("orders_created_total").increment(1);
        metrics::histogram!("checkout_duration_seconds").record(started.elapsed().as_secs_f64());
        tracing::info!(%order_id, "checkout completed");

        Ok(order_id)
    }
}
