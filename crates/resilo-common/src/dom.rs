use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Identifier assigned to an element for the lifetime of one page render.
pub type ElementId = u32;

/// Custom deserializer for HashMap<String, String> that filters out null values.
/// The in-page collector emits attributes with null values for absent entries.
fn deserialize_nullable_string_map<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let map: HashMap<String, Option<String>> = HashMap::deserialize(deserializer)?;
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| v.map(|val| (k, val)))
        .collect())
}

/// Structural snapshot of the current page, produced by the browser side
/// and consumed by scan strategies and heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSnapshot {
    pub page: PageInfo,
    pub elements: Vec<Element>,
}

impl PageSnapshot {
    /// Get element by ID.
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Iterate the page's forms.
    pub fn forms(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|e| e.element_type == "form")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageInfo {
    pub url: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: String, // "input", "button", "form", etc.
    pub text: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
    pub placeholder: Option<String>,

    pub selector: String,

    pub rect: Rect,

    #[serde(default, deserialize_with = "deserialize_nullable_string_map")]
    pub attributes: HashMap<String, String>,
    #[serde(default)]
    pub state: ElementState,

    /// For forms: IDs of the controls the form owns.
    #[serde(default)]
    pub children: Vec<ElementId>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn attr_is(&self, name: &str, value: &str) -> bool {
        self.attr(name).is_some_and(|v| v == value)
    }

    pub fn attr_contains(&self, name: &str, needle: &str) -> bool {
        self.attr(name)
            .is_some_and(|v| v.to_lowercase().contains(&needle.to_lowercase()))
    }

    pub fn tag_is(&self, tag: &str) -> bool {
        self.element_type == tag
    }

    /// Whether this element is a form control that accepts keyboard input.
    pub fn is_text_control(&self) -> bool {
        match self.element_type.as_str() {
            "textarea" => true,
            "input" => !matches!(
                self.attr("type").unwrap_or("text"),
                "checkbox" | "radio" | "submit" | "button" | "reset" | "file" | "hidden"
            ),
            _ => self.attr_is("contenteditable", "true"),
        }
    }

    /// Whether this element submits the form it belongs to.
    pub fn is_submit_control(&self) -> bool {
        match self.element_type.as_str() {
            "button" => !matches!(self.attr("type"), Some("button") | Some("reset")),
            "input" => self.attr_is("type", "submit"),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ElementState {
    pub visible: bool,
    pub disabled: bool,
    pub checked: bool,
    pub readonly: bool,
}
