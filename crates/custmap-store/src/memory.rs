//! In-memory customer adapters for development and testing.
//!
//! These implementations use `RwLock::unwrap()` intentionally. Lock poisoning
//! only occurs when another thread panicked while holding the lock, which is
//! an unrecoverable state.

use async_trait::async_trait;
use custmap_core::error::{CustmapError, Result};
use custmap_core::models::{Customer, CustomerRecord, ImageRef};
use custmap_core::ports::{CustomerDirectory, SubmissionSink};
use std::sync::{Arc, RwLock};

/// Placeholder avatar shared by the seeded customers
pub const DEFAULT_AVATAR: &str = "https://cdn-icons-png.flaticon.com/512/149/149071.png";

/// In-memory implementation of CustomerDirectory
#[derive(Debug, Clone, Default)]
pub struct MemoryCustomerDirectory {
    customers: Arc<RwLock<Vec<Customer>>>,
}

impl MemoryCustomerDirectory {
    pub fn new(customers: Vec<Customer>) -> Self {
        Self { customers: Arc::new(RwLock::new(customers)) }
    }

    /// The fixed demo directory
    pub fn seeded() -> Self {
        let avatar = ImageRef::new(DEFAULT_AVATAR);
        let customers = [
            ("1", "Ted James", "Phoenix", "Arizona"),
            ("2", "Michelle", "Encinitas", "California"),
            ("3", "Zed Bishop", "Seattle", "Washington"),
            ("4", "Tina Adams", "Chandler", "Arizona"),
            ("5", "Igor Minar", "Dallas", "Texas"),
            ("6", "Brad Green", "Orlando", "Florida"),
            ("7", "Misko Hevery", "Carey", "North Carolina"),
            ("8", "Heedy Wahlin", "Anaheim", "California"),
        ]
        .into_iter()
        .map(|(id, name, city, state)| {
            Customer::new(id, name, city, state).with_avatar(avatar.clone())
        })
        .collect();

        Self::new(customers)
    }
}

#[async_trait]
impl CustomerDirectory for MemoryCustomerDirectory {
    async fn list_customers(&self) -> Result<Vec<Customer>> {
        Ok(self.customers.read().unwrap().clone())
    }

    async fn get_customer(&self, id: &str) -> Result<Option<Customer>> {
        let customers = self.customers.read().unwrap();
        Ok(customers.iter().find(|c| c.id == id).cloned())
    }
}

/// Submission sink that logs each record and keeps it in memory
#[derive(Debug, Clone, Default)]
pub struct LoggingSubmissionSink {
    records: Arc<RwLock<Vec<CustomerRecord>>>,
}

impl LoggingSubmissionSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record delivered so far, oldest first
    pub fn records(&self) -> Vec<CustomerRecord> {
        self.records.read().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl SubmissionSink for LoggingSubmissionSink {
    async fn deliver(&self, record: &CustomerRecord) -> Result<()> {
        let payload = serde_json::to_string(record)
            .map_err(|e| CustmapError::Serialization(e.to_string()))?;

        tracing::info!(
            id = %record.id,
            submission = %record.submission_id,
            record = %payload,
            "Customer record submitted"
        );

        self.records.write().unwrap().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use custmap_core::models::CustomerFormData;
    use uuid::Uuid;

    fn record(id: &str) -> CustomerRecord {
        CustomerRecord {
            submission_id: Uuid::new_v4(),
            id: id.to_string(),
            form: CustomerFormData { name: "Ted James".into(), ..Default::default() },
            image: None,
            coordinates: None,
            full_address: None,
            submitted_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_seeded_directory_order() {
        let directory = MemoryCustomerDirectory::seeded();
        let customers = directory.list_customers().await.unwrap();

        assert_eq!(customers.len(), 8);
        assert_eq!(customers[0].name, "Ted James");
        assert_eq!(customers[6].location(), "Carey, North Carolina");
        assert!(customers.iter().all(|c| c.avatar.as_ref().map(ImageRef::as_str) == Some(DEFAULT_AVATAR)));
    }

    #[tokio::test]
    async fn test_get_customer() {
        let directory = MemoryCustomerDirectory::seeded();

        let zed = directory.get_customer("3").await.unwrap().unwrap();
        assert_eq!(zed.city, "Seattle");
        assert!(directory.get_customer("99").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sink_keeps_records_in_order() {
        let sink = LoggingSubmissionSink::new();
        assert!(sink.is_empty());

        sink.deliver(&record("1")).await.unwrap();
        sink.deliver(&record("4")).await.unwrap();

        let ids: Vec<String> = sink.records().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }
}
