use tabrec_model::DomainRecord;

use crate::error::Result;

/// A producer of collection messages.
pub trait MessageSource: Send + Sync {
    /// Short label used in logs.
    fn name(&self) -> &str;

    fn fetch_messages(&self) -> Result<Vec<DomainRecord>>;
}
