use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Customer, CustomerRecord};

/// Port for the customer list
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// List every customer in display order
    async fn list_customers(&self) -> Result<Vec<Customer>>;

    /// Get a customer by ID
    async fn get_customer(&self, id: &str) -> Result<Option<Customer>>;
}

/// Port for delivering submitted customer records
#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn deliver(&self, record: &CustomerRecord) -> Result<()>;
}
