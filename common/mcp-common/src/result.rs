//! Tool result helpers

use rmcp::{
    model::{CallToolResult, Content},
    ErrorData as McpError,
};
use serde::Serialize;

/// Wrap any serializable payload as a successful tool result
///
/// The payload is pretty-printed JSON in a single text content item. A
/// payload that itself describes a failure (e.g. `{"success": false}`) is
/// still a successful tool result at the protocol level.
pub fn json_success<T: Serialize>(data: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| McpError::internal_error(format!("JSON error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Payload {
        success: bool,
        error: Option<String>,
    }

    #[test]
    fn test_json_success() {
        let result = json_success(&Payload {
            success: false,
            error: Some("invalid query".to_string()),
        })
        .unwrap();

        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(result.content.len(), 1);

        let text = &result.content[0].raw.as_text().unwrap().text;
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(value["error"], "invalid query");
    }
}
