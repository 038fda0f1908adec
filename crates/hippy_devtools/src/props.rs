use std::rc::Rc;

use hippy_devtools_common::DevtoolsTab;
use serde::{Deserialize, Serialize};

use crate::bridge::FrontendBridge;
use crate::store::InspectorStore;

/// Source position of an inspected element.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub file_name: String,
    pub line_number: u32,
}

/// The parts of an inspected element the source hooks look at.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InspectedElement {
    pub id: u64,
    #[serde(default = "default_true")]
    pub can_view_source: bool,
    #[serde(default)]
    pub source: Option<SourceLocation>,
}

fn default_true() -> bool {
    true
}

/// Element-source hooks handed to the inspector.
///
/// Opening files in an editor is not available from the embedded frontend,
/// so elements never report viewable source.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementSource {
    pub project_roots: Vec<String>,
}

impl ElementSource {
    pub fn can_view_element_source(&self, element: &InspectedElement) -> bool {
        if element.can_view_source && element.source.is_some() {
            log::debug!(
                "[DevTools] Element {} has source but no editor is available ({} project roots)",
                element.id,
                self.project_roots.len()
            );
        }
        false
    }

    pub fn view_element_source(&self, id: u64, element: &InspectedElement) {
        match &element.source {
            Some(source) => log::debug!(
                "[DevTools] Source navigation unavailable for {}:{}",
                source.file_name,
                source.line_number
            ),
            None => log::error!("[DevTools] Cannot inspect element {id}"),
        }
    }
}

/// Everything the inspector tree is rendered with.
#[derive(Clone)]
pub struct InspectorProps {
    pub bridge: Rc<FrontendBridge>,
    pub store: Rc<InspectorStore>,
    pub show_tab_bar: bool,
    pub warn_if_legacy_backend_detected: bool,
    /// Tab selected on first render, read from the persisted preference
    pub default_tab: DevtoolsTab,
    pub element_source: ElementSource,
}
