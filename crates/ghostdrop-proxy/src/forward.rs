use serde_json::Value;

use crate::error::ProxyError;
use crate::record::Submission;
use crate::upstream::Upstream;

/// Creates the submission's records at `endpoint` and hands back the upstream
/// body untouched, whatever its status.
pub fn forward<U: Upstream + ?Sized>(
    upstream: &U,
    endpoint: &str,
    submission: &Submission,
) -> Result<Value, ProxyError> {
    let payload = submission.to_value()?;
    let reply = upstream.create_records(endpoint, &payload)?;
    if !reply.is_success() {
        tracing::warn!(endpoint, status = reply.status, "upstream rejected forwarded records");
    }
    Ok(reply.body)
}
