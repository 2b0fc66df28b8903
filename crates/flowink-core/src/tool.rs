//! Tool registry rendered by the tool layer.

use crate::options::GraphOptions;

/// Built-in inline text editing tool.
pub const TEXT_EDIT_TOOL: &str = "text-edit";
/// Built-in rubber-band multi-selection tool.
pub const MULTIPLE_SELECT_TOOL: &str = "multiple-select";

/// A registered tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolEntry {
    pub name: String,
    /// Whether the tool is shown when the graph is in silent mode.
    pub silent_mode_visible: bool,
}

/// Ordered set of tools available to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolContext {
    tools: Vec<ToolEntry>,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self {
            tools: vec![
                ToolEntry { name: TEXT_EDIT_TOOL.to_string(), silent_mode_visible: false },
                ToolEntry { name: MULTIPLE_SELECT_TOOL.to_string(), silent_mode_visible: false },
            ],
        }
    }
}

impl ToolContext {
    /// Tool context with the built-in tools.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tool context without any tools.
    pub fn empty() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool, replacing one with the same name in place.
    pub fn register(&mut self, entry: ToolEntry) {
        match self.tools.iter_mut().find(|t| t.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.tools.push(entry),
        }
    }

    /// All registered tools, in registration order.
    pub fn tools(&self) -> &[ToolEntry] {
        &self.tools
    }

    /// Whether `name` is hidden: disabled by option, unknown, or not shown in silent mode.
    pub fn is_disabled(&self, name: &str, options: &GraphOptions) -> bool {
        if options.disabled_tools.iter().any(|t| t == name) {
            return true;
        }
        match self.tools.iter().find(|t| t.name == name) {
            Some(tool) => options.is_silent_mode && !tool.silent_mode_visible,
            None => true,
        }
    }

    /// Tools that should be shown, in registration order.
    pub fn enabled_tools<'a>(&'a self, options: &GraphOptions) -> Vec<&'a ToolEntry> {
        self.tools
            .iter()
            .filter(|t| !self.is_disabled(&t.name, options))
            .collect()
    }
}
