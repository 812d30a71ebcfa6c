use serde_json::Value;

use crate::error::ProxyError;
use crate::forward::forward;
use crate::options::fetch_field_options;
use crate::record::Submission;
use crate::route::ResourceRoute;
use crate::upstream::Upstream;
use crate::validate::validate_fields;

pub struct ProxyService<U: Upstream> {
    upstream: U,
}

impl<U: Upstream> ProxyService<U> {
    pub fn new(upstream: U) -> Self {
        Self { upstream }
    }

    pub fn upstream(&self) -> &U {
        &self.upstream
    }

    /// Validates the first record of `submission` for `route` and forwards it.
    /// Returns the upstream body on success.
    pub fn submit(
        &self,
        route: &ResourceRoute,
        mut submission: Submission,
    ) -> Result<Value, ProxyError> {
        // 1. Only the first record is handled
        let dropped = submission.keep_first();
        if dropped > 0 {
            tracing::warn!(
                resource = route.path,
                dropped,
                "ignoring records after the first"
            );
        }
        let record = submission.first_mut().ok_or(ProxyError::MissingRecord)?;

        // 2. Name -> [id] for the linked field
        if let Some(link) = &route.link {
            link.resolve(&self.upstream, &mut record.fields)?;
        }

        // 3. Current choices, fetched fresh
        let options = fetch_field_options(&self.upstream)?;

        // 4. Reject before anything is written
        let errors = validate_fields(&record.fields, route.table, &options);
        if !errors.is_empty() {
            tracing::info!(
                resource = route.path,
                invalid = errors.len(),
                "rejected invalid field values"
            );
            return Err(ProxyError::Validation(errors));
        }

        // 5. Relay
        forward(&self.upstream, route.endpoint, &submission)
    }
}
