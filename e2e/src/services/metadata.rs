use huobi_common::{config::METADATA_SERVICE, service::metadata::Metadata};

use super::{read_empty, ReadOutcome};
use crate::transaction::{CallError, ServiceCaller};

/// Read-only view of the chain metadata
#[derive(Clone)]
pub struct MetadataService {
    caller: ServiceCaller,
}

impl MetadataService {
    pub fn new(caller: ServiceCaller) -> Self {
        Self { caller }
    }

    pub async fn get_metadata(&self) -> Result<ReadOutcome<Metadata>, CallError> {
        read_empty(&self.caller, METADATA_SERVICE, "get_metadata").await
    }
}
