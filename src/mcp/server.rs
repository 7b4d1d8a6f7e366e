/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Processes tool calls against the habit tracker
/// 3. Sends JSON-RPC responses to stdout

use std::collections::HashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{DaykeeperServer, ServerError};

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying habit tracker
    daykeeper: DaykeeperServer,
    /// Whether the client finished the initialize handshake
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(daykeeper: DaykeeperServer) -> Self {
        Self {
            daykeeper,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        Some(self.handle_request(request))
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Daykeeper MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        JsonRpcResponse::success(request.id, serde_json::to_value(result).unwrap())
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "habit_create".to_string(),
                description: "Create a new daily habit to track".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Name of the habit"}
                    },
                    "required": ["name"]
                }),
            },
            ToolDefinition {
                name: "habit_list".to_string(),
                description: "List all habits with current streaks and freeze state. \
                              Also applies the day-rollover bookkeeping, so call this to refresh streaks."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "habit_update".to_string(),
                description: "Rename an existing habit".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habit_id": {"type": "string", "description": "ID of the habit"},
                        "name": {"type": "string", "description": "New name"}
                    },
                    "required": ["habit_id", "name"]
                }),
            },
            ToolDefinition {
                name: "habit_reorder".to_string(),
                description: "Reorder the habit list; pass every habit ID in the desired order".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "ordered_ids": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "All habit IDs in display order"
                        }
                    },
                    "required": ["ordered_ids"]
                }),
            },
            ToolDefinition {
                name: "habit_delete".to_string(),
                description: "Delete a habit and its completion history".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habit_id": {"type": "string", "description": "ID of the habit"}
                    },
                    "required": ["habit_id"]
                }),
            },
            ToolDefinition {
                name: "completion_toggle".to_string(),
                description: "Toggle a habit's completion for a calendar day (today or a past day to backfill). \
                              Recomputes the streak from the full history."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habit_id": {"type": "string", "description": "ID of the habit"},
                        "date": {"type": "string", "description": "Day to toggle (YYYY-MM-DD)"}
                    },
                    "required": ["habit_id", "date"]
                }),
            },
            ToolDefinition {
                name: "freeze_toggle".to_string(),
                description: "Toggle a one-day streak freeze for today. A freeze keeps an uncompleted \
                              today from breaking the streak; it cannot be set on an already-completed day."
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habit_id": {"type": "string", "description": "ID of the habit"}
                    },
                    "required": ["habit_id"]
                }),
            },
            ToolDefinition {
                name: "completions_month".to_string(),
                description: "All completed habit-days in a calendar month".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "month": {"type": "string", "description": "Month to query (YYYY-MM)"}
                    },
                    "required": ["month"]
                }),
            },
            ToolDefinition {
                name: "progress_month".to_string(),
                description: "Aggregate completion percentage across all habits for a calendar month".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "month": {"type": "string", "description": "Month to query (YYYY-MM)"}
                    },
                    "required": ["month"]
                }),
            },
        ];

        JsonRpcResponse::success(request.id, json!({"tools": tools}))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = self.dispatch_tool(&tool_params.name, tool_params.arguments);
        JsonRpcResponse::success(request.id, serde_json::to_value(result).unwrap())
    }

    /// Route a tool call to its implementation
    ///
    /// "Today" is resolved here, once per request, from the configured
    /// timezone; everything below receives it as a plain date.
    fn dispatch_tool(&self, name: &str, args: HashMap<String, Value>) -> ToolCallResult {
        let storage = self.daykeeper.storage();
        let today = self.daykeeper.today();

        match name {
            "habit_create" => run_tool(args, |params| tools::create_habit(storage, params)),
            "habit_list" => {
                // No parameters to parse
                to_result(tools::list_habits(storage, today))
            }
            "habit_update" => run_tool(args, |params| tools::update_habit(storage, params)),
            "habit_reorder" => run_tool(args, |params| tools::reorder_habits(storage, params)),
            "habit_delete" => run_tool(args, |params| tools::delete_habit(storage, params)),
            "completion_toggle" => {
                run_tool(args, |params| tools::toggle_completion(storage, params, today))
            }
            "freeze_toggle" => {
                run_tool(args, |params| tools::toggle_freeze(storage, params, today))
            }
            "completions_month" => {
                run_tool(args, |params| tools::completions_month(storage, params))
            }
            "progress_month" => run_tool(args, |params| tools::progress_month(storage, params)),
            _ => ToolCallResult::error(format!("Unknown tool: {}", name)),
        }
    }
}

/// Deserialize tool arguments, run the tool, serialize the outcome
fn run_tool<P, R, F>(args: HashMap<String, Value>, call: F) -> ToolCallResult
where
    P: DeserializeOwned,
    R: Serialize,
    F: FnOnce(P) -> Result<R, tools::ToolError>,
{
    let params: P = match serde_json::from_value(Value::Object(args.into_iter().collect())) {
        Ok(p) => p,
        Err(e) => return ToolCallResult::error(format!("Invalid arguments: {}", e)),
    };

    to_result(call(params))
}

fn to_result<R: Serialize>(outcome: Result<R, tools::ToolError>) -> ToolCallResult {
    match outcome {
        Ok(response) => match serde_json::to_string_pretty(&response) {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => ToolCallResult::error(format!("Failed to serialize response: {}", e)),
        },
        Err(e) => ToolCallResult::error(e.to_string()),
    }
}
