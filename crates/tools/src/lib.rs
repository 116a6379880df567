//! Tool layer: named operations with a JSON parameter schema that an LLM
//! runtime can bind, plus the registry that looks them up by name.
//!
//! Arguments arrive as a flat `key -> string` map (the way the CLI and most
//! function-calling runtimes hand them over) and each tool parses its own.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

// ── Tool trait and registry ──────────────────────────────────────────────────

/// JSON Schema type of a tool parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
}

impl ParamType {
    fn json_type(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
        }
    }

    /// Render a string-encoded default as this type, falling back to a JSON
    /// string when it does not parse.
    fn render(self, raw: &str) -> Value {
        let parsed = match self {
            Self::String => None,
            Self::Integer => raw.parse::<i64>().ok().map(Value::from),
            Self::Number => raw.parse::<f64>().ok().map(Value::from),
        };
        parsed.unwrap_or_else(|| Value::String(raw.to_string()))
    }
}

/// Optional metadata about a tool (grouping, usage examples).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub read_only: bool,
    /// Free-form group name; `ToolRegistry::tools_in_group` filters on it.
    pub group: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<String>,
}

/// Describes a single parameter that a tool accepts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolParam {
    pub name: String,
    pub description: String,
    pub required: bool,
    #[serde(default)]
    pub param_type: ParamType,
    /// Allowed values when the parameter is an enum.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
    /// Default value expressed as a string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl ToolParam {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
            ..Self::default()
        }
    }

    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = param_type;
        self
    }

    pub fn with_default(mut self, default: impl ToString) -> Self {
        self.default = Some(default.to_string());
        self
    }

    pub fn with_enum(mut self, values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    fn schema_property(&self) -> Value {
        let mut prop = json!({
            "type": self.param_type.json_type(),
            "description": self.description,
        });
        if !self.enum_values.is_empty() {
            prop["enum"] = json!(self.enum_values);
        }
        if let Some(raw) = &self.default {
            prop["default"] = self.param_type.render(raw);
        }
        prop
    }
}

/// What the model sees when deciding which tool to call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub params: Vec<ToolParam>,
    #[serde(default)]
    pub metadata: ToolMetadata,
}

impl ToolSpec {
    /// One element of an OpenAI-style `tools` array:
    ///
    /// ```json
    /// {
    ///   "type": "function",
    ///   "function": {
    ///     "name": "list_articles",
    ///     "description": "...",
    ///     "parameters": { "type": "object", "properties": { ... }, "required": [...] }
    ///   }
    /// }
    /// ```
    pub fn to_openai_tool_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .params
            .iter()
            .map(|p| (p.name.clone(), p.schema_property()))
            .collect();
        let required: Vec<&str> = self
            .params
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect();

        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}

/// The `tools` array for a chat-completions request.
pub fn specs_to_openai_tools(specs: &[ToolSpec]) -> Value {
    Value::Array(specs.iter().map(ToolSpec::to_openai_tool_schema).collect())
}

/// The result returned after a tool runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub output: String,
}

impl ToolOutput {
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn failed(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
        }
    }
}

/// Trait implemented by every tool.
#[async_trait]
pub trait Tool: Send + Sync {
    fn spec(&self) -> ToolSpec;
    async fn run(&self, args: &HashMap<String, String>) -> Result<ToolOutput>;
}

/// Central registry for all available tools.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn list_specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.spec().name == name)
            .map(|t| t.as_ref())
    }

    /// Return the names of all tools belonging to the given group.
    pub fn tools_in_group(&self, group: &str) -> Vec<String> {
        self.tools
            .iter()
            .filter(|t| t.spec().metadata.group == group)
            .map(|t| t.spec().name)
            .collect()
    }
}

// ── Built-in tools ───────────────────────────────────────────────────────────

pub mod builtins;
pub use builtins::{
    FuzzySearchArticlesTool, GetAvailableCategoriesTool, GetDatesAndCategoriesTool,
    GetNewsUpdateTool, ListArticlesTool, ReadArticleTool, article_registry, register_article_tools,
};

// ── ToolRegistry tests ───────────────────────────────────────────────────────
