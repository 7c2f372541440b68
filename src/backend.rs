//! # Backend Gateways
//!
//! [`UserGateway`] is the user-management side of the backend. [`InMemoryBackend`]
//! implements it together with the two [`ListGateway`]s and answers like the real
//! search endpoints: filter, sort, then cut one page out of the result and report
//! the total number of matches.

use crate::admin_users::AdminUser;
use crate::model::{OrderRecord, UserId, UserRecord};
use crate::order_archive::ArchivedOrder;
use async_trait::async_trait;
use list_framework::{FilterValue, ListError, ListGateway, Page, RequestDescriptor, SortDirection};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn delete_user(&self, id: UserId) -> Result<(), ListError>;
}

/// Users and orders held in memory.
#[derive(Default)]
pub struct InMemoryBackend {
    users: RwLock<Vec<UserRecord>>,
    orders: RwLock<Vec<OrderRecord>>,
    latency: Duration,
}

impl InMemoryBackend {
    pub fn new(users: Vec<UserRecord>, orders: Vec<OrderRecord>) -> Self {
        Self {
            users: RwLock::new(users),
            orders: RwLock::new(orders),
            latency: Duration::ZERO,
        }
    }

    /// Delays every answer, to make overlapping requests observable.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn respond(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Drops the table prefix of a column key (`booking.email` → `email`).
fn field_name(property: &str) -> &str {
    property.rsplit('.').next().unwrap_or(property)
}

fn text_matches(value: &str, filter: &FilterValue) -> bool {
    match filter {
        FilterValue::Text(text) => value.to_lowercase().contains(&text.trim().to_lowercase()),
        FilterValue::Date(_) => false,
    }
}

fn paginate<R: Clone>(mut matches: Vec<R>, descriptor: &RequestDescriptor) -> Option<Page<R>> {
    let total = matches.len() as u64;
    if total == 0 {
        return None;
    }
    let size = descriptor.pageable.page_size as usize;
    let start = (descriptor.pageable.page_number as usize).saturating_mul(size);
    let content = if start >= matches.len() {
        Vec::new()
    } else {
        let end = (start + size).min(matches.len());
        matches.drain(start..end).collect()
    };
    Some(Page::new(content, total))
}

fn sort_by<R>(records: &mut [R], descriptor: &RequestDescriptor, key: impl Fn(&R, &str) -> Option<String>) {
    if let Some(rule) = descriptor.pageable.sort.first() {
        let property = field_name(&rule.property);
        records.sort_by(|a, b| {
            let ordering = key(a, property).cmp(&key(b, property));
            match rule.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }
}

#[async_trait]
impl ListGateway<AdminUser> for InMemoryBackend {
    async fn fetch_page(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Option<Page<UserRecord>>, ListError> {
        self.respond().await;
        let users = self.users.read().await;
        let mut matches: Vec<UserRecord> = users
            .iter()
            .filter(|user| {
                descriptor.filters.iter().all(|(field, filter)| match field.as_str() {
                    "username" => text_matches(&user.username, filter),
                    "email" => text_matches(&user.email, filter),
                    _ => true,
                })
            })
            .cloned()
            .collect();
        sort_by(&mut matches, descriptor, |user, property| match property {
            "email" => Some(user.email.clone()),
            "name" | "username" => Some(user.username.clone()),
            "role" => Some(user.user_role_id.0.to_string()),
            _ => None,
        });
        debug!(matches = matches.len(), "Users searched");
        Ok(paginate(matches, descriptor))
    }
}

#[async_trait]
impl ListGateway<ArchivedOrder> for InMemoryBackend {
    async fn fetch_page(
        &self,
        descriptor: &RequestDescriptor,
    ) -> Result<Option<Page<OrderRecord>>, ListError> {
        self.respond().await;
        let orders = self.orders.read().await;
        let mut matches: Vec<OrderRecord> = orders
            .iter()
            .filter(|record| {
                descriptor.filters.iter().all(|(field, filter)| match (field.as_str(), filter) {
                    ("bookingDate", FilterValue::Date(date)) => record.booking.booking_date.date() == *date,
                    ("bookingDate", FilterValue::Text(text)) => {
                        record.booking.booking_date.date().to_string() == text.trim()
                    }
                    ("email", filter) => text_matches(&record.booking.email, filter),
                    ("bookingToken", filter) => text_matches(&record.booking.booking_token, filter),
                    _ => true,
                })
            })
            .cloned()
            .collect();
        sort_by(&mut matches, descriptor, |record, property| match property {
            "bookingDate" => Some(record.booking.booking_date.to_string()),
            "email" => Some(record.booking.email.clone()),
            "bookingToken" => Some(record.booking.booking_token.clone()),
            "state" => Some(record.order.state.key().to_string()),
            _ => None,
        });
        debug!(matches = matches.len(), "Orders searched");
        Ok(paginate(matches, descriptor))
    }
}

#[async_trait]
impl UserGateway for InMemoryBackend {
    async fn delete_user(&self, id: UserId) -> Result<(), ListError> {
        self.respond().await;
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|user| user.id != id);
        if users.len() == before {
            return Err(ListError::NotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OrderState, RoleId};
    use chrono::NaiveDate;
    use list_framework::{build_descriptor, FilterSet, PageSizes, Pageable, SortRule};

    fn users() -> Vec<UserRecord> {
        vec![
            UserRecord::new(1, "admin", "admin@mts.com", RoleId::ADMIN),
            UserRecord::new(2, "waiter", "waiter@mts.com", RoleId::WAITER),
            UserRecord::new(3, "bea", "bea@example.com", RoleId::CUSTOMER),
        ]
    }

    fn descriptor(pageable: Pageable, filters: FilterSet) -> RequestDescriptor {
        build_descriptor(&pageable, &filters, &PageSizes::new(vec![1, 2, 8])).unwrap()
    }

    #[tokio::test]
    async fn test_user_search_filters_sorts_and_pages() {
        let backend = InMemoryBackend::new(users(), Vec::new());
        let pageable = Pageable {
            page_size: 1,
            page_number: 1,
            sort: vec![SortRule::new("userView.email", SortDirection::Desc)],
        };
        let filters = FilterSet::new().set("email", FilterValue::text("MTS"));

        let page = ListGateway::<AdminUser>::fetch_page(&backend, &descriptor(pageable, filters))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.content[0].username, "admin");
    }

    #[tokio::test]
    async fn test_empty_search_answers_none() {
        let backend = InMemoryBackend::new(users(), Vec::new());
        let filters = FilterSet::new().set("username", FilterValue::text("nobody"));

        let page = ListGateway::<AdminUser>::fetch_page(&backend, &descriptor(Pageable::first(8), filters))
            .await
            .unwrap();
        assert!(page.is_none());
    }

    #[tokio::test]
    async fn test_order_search_by_booking_date() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let orders = vec![
            OrderRecord::new(1, day.and_hms_opt(19, 0, 0).unwrap(), "a@x.com", "CB_1", OrderState::OrderPaid),
            OrderRecord::new(2, day.and_hms_opt(20, 0, 0).unwrap(), "b@x.com", "CB_2", OrderState::Canceled),
            OrderRecord::new(
                3,
                day.succ_opt().unwrap().and_hms_opt(19, 0, 0).unwrap(),
                "c@x.com",
                "CB_3",
                OrderState::OrderPaid,
            ),
        ];
        let backend = InMemoryBackend::new(Vec::new(), orders);
        let filters = FilterSet::new().set("bookingDate", FilterValue::from(day));

        let page = ListGateway::<ArchivedOrder>::fetch_page(&backend, &descriptor(Pageable::first(8), filters))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(page.total_elements, 2);
    }

    #[tokio::test]
    async fn test_delete_unknown_user_is_not_found() {
        let backend = InMemoryBackend::new(users(), Vec::new());

        assert!(backend.delete_user(UserId(2)).await.is_ok());
        assert_eq!(
            backend.delete_user(UserId(2)).await,
            Err(ListError::NotFound("user_2".to_string()))
        );
    }
}
