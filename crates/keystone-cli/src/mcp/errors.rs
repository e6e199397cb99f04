//! Conversion of core errors into MCP error data

use keystone_core::GenerationError;
use rmcp::ErrorData;

/// Validation failures are the caller's fault and map to `invalid_params`;
/// everything else is reported as an internal error.
pub fn to_mcp_error(message: &str, error: &GenerationError) -> ErrorData {
    if error.is_validation() {
        ErrorData::invalid_params(error.user_message(), None)
    } else {
        ErrorData::internal_error(format!("{message}: {error}"), None)
    }
}
