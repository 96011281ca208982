//! Plain-text rendering of page snapshots for logs and failure reports.

use crate::dom::{Element, PageSnapshot};

/// Field names whose values must never appear in output.
const SENSITIVE_FIELDS: &[&str] = &["password", "secret", "token", "card", "cvv"];

pub fn format_snapshot(snapshot: &PageSnapshot) -> String {
    let mut output = format!(
        "@ {} \"{}\"\n",
        snapshot.page.url, snapshot.page.title
    );

    for el in &snapshot.elements {
        // e.g. [3] input "Email" = "user@test.com" {disabled}
        let label = el
            .text
            .clone()
            .or_else(|| el.label.clone())
            .or_else(|| el.placeholder.clone())
            .unwrap_or_default();

        let mut flags = Vec::new();
        if !el.state.visible {
            flags.push("hidden");
        }
        if el.state.disabled {
            flags.push("disabled");
        }
        if el.state.checked {
            flags.push("checked");
        }
        if el.state.readonly {
            flags.push("readonly");
        }
        let flags_str = if flags.is_empty() {
            String::new()
        } else {
            format!(" {{{}}}", flags.join(", "))
        };

        let value_suffix = match &el.value {
            Some(val) if !val.is_empty() => {
                format!(" = {:?}", mask_sensitive(el, val))
            }
            _ => String::new(),
        };

        output.push_str(&format!(
            "[{}] {} {:?}{}{}\n",
            el.id, el.element_type, label, value_suffix, flags_str
        ));
    }

    output
}

fn mask_sensitive(el: &Element, value: &str) -> String {
    let mut evidence = vec![el.attr("type"), el.attr("name"), el.attr("id")];
    evidence.push(el.placeholder.as_deref());

    let sensitive = evidence.into_iter().flatten().any(|hint| {
        let hint = hint.to_lowercase();
        SENSITIVE_FIELDS.iter().any(|field| hint.contains(field))
    });

    if sensitive {
        "*".repeat(value.chars().count().min(8))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{ElementState, PageInfo, Rect};
    use std::collections::HashMap;

    fn element(id: u32, type_: &str, value: Option<&str>) -> Element {
        Element {
            id,
            element_type: type_.to_string(),
            text: None,
            label: None,
            value: value.map(|s| s.to_string()),
            placeholder: None,
            selector: format!("[data-resilo-id=\"{}\"]", id),
            rect: Rect {
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            attributes: HashMap::new(),
            state: ElementState {
                visible: true,
                ..Default::default()
            },
            children: vec![],
        }
    }

    #[test]
    fn password_values_are_masked() {
        let mut field = element(1, "input", Some("hunter2hunter2"));
        field
            .attributes
            .insert("type".to_string(), "password".to_string());

        let snapshot = PageSnapshot {
            page: PageInfo {
                url: "http://localhost:3000/login".to_string(),
                title: "Login".to_string(),
            },
            elements: vec![field],
        };

        let rendered = format_snapshot(&snapshot);
        assert!(rendered.contains("********"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn hidden_and_disabled_flags_render() {
        let mut button = element(2, "button", None);
        button.state.visible = false;
        button.state.disabled = true;

        let snapshot = PageSnapshot {
            page: PageInfo {
                url: "http://localhost:3000".to_string(),
                title: "Home".to_string(),
            },
            elements: vec![button],
        };

        assert!(format_snapshot(&snapshot).contains("{hidden, disabled}"));
    }
}
