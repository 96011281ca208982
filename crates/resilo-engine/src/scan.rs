//! Heuristic DOM scans over a [`PageSnapshot`].
//!
//! These back the `AttributeScan`/`FormScan` strategies and provide the
//! canned final-resort heuristics the flows plug into requests.

use resilo_common::dom::{Element, ElementId, PageSnapshot};
use resilo_common::strategy::{AttributeProbe, FieldRole, FormProbe};
use resilo_common::text;

/// Score a role match needs to reach before weak evidence counts.
const ROLE_EVIDENCE_THRESHOLD: f64 = 0.84;

/// First element whose attribute evidence satisfies the probe.
pub fn attribute_scan(
    snapshot: &PageSnapshot,
    probe: &AttributeProbe,
    require_visible: bool,
) -> Option<ElementId> {
    snapshot
        .elements
        .iter()
        .filter(|e| visible_enough(e, require_visible))
        .filter(|e| probe.tag.as_deref().is_none_or(|tag| e.tag_is(tag)))
        .find(|e| match &probe.contains {
            Some(needle) => e.attr_contains(&probe.attribute, needle),
            None => e.attr(&probe.attribute).is_some(),
        })
        .map(|e| e.id)
}

/// Find the control playing a role inside the page's forms.
///
/// Controls owned by a form are tried first, in form order; a control
/// needs either hard type evidence (`input type=email`) or fuzzy name/
/// placeholder/label evidence for the role keyword. When several controls
/// qualify, the best-scoring one in the first form that has any wins.
pub fn form_scan(
    snapshot: &PageSnapshot,
    probe: &FormProbe,
    require_visible: bool,
) -> Option<ElementId> {
    for form in snapshot.forms() {
        let mut best: Option<(f64, ElementId)> = None;
        for id in &form.children {
            let Some(el) = snapshot.get(*id) else {
                continue;
            };
            if !visible_enough(el, require_visible) {
                continue;
            }
            if let Some(score) = role_score(el, probe.role)
                && best.is_none_or(|(b, _)| score > b)
            {
                best = Some((score, el.id));
            }
        }
        if let Some((_, id)) = best {
            return Some(id);
        }
    }
    None
}

/// How well an element fits a role, or `None` when it does not qualify.
fn role_score(el: &Element, role: FieldRole) -> Option<f64> {
    match role {
        FieldRole::Submit => el.is_submit_control().then_some(1.0),

        FieldRole::Password => {
            (el.tag_is("input") && el.attr_is("type", "password")).then_some(1.0)
        }

        FieldRole::Email | FieldRole::Search | FieldRole::Text => {
            if !el.is_text_control() {
                return None;
            }
            // Hard evidence: the input type names the role outright.
            if el.attr_is("type", role.keyword()) {
                return Some(1.0);
            }
            if role == FieldRole::Text {
                // Any remaining text control qualifies weakly.
                return Some(0.5);
            }
            let evidence = [
                el.attr("name"),
                el.attr("id"),
                el.placeholder.as_deref(),
                el.label.as_deref(),
            ];
            let score = evidence
                .into_iter()
                .flatten()
                .map(|hint| text::fuzzy_score(hint, role.keyword()))
                .fold(0.0, f64::max);
            (score >= ROLE_EVIDENCE_THRESHOLD).then_some(score)
        }
    }
}

fn visible_enough(el: &Element, require_visible: bool) -> bool {
    !require_visible || el.state.visible
}

// Canned heuristics, signature-compatible with
// `ResolutionRequest::heuristic` (fn(&PageSnapshot) -> Option<ElementId>).

/// First `<input type=search>` on the page, visible or not.
pub fn first_search_input(snapshot: &PageSnapshot) -> Option<ElementId> {
    attribute_scan(snapshot, &AttributeProbe::input_type("search"), false)
}

/// First password input on the page.
pub fn first_password_input(snapshot: &PageSnapshot) -> Option<ElementId> {
    attribute_scan(snapshot, &AttributeProbe::input_type("password"), false)
}

/// Submit control of the page's only form; `None` when the page has zero
/// or several forms, since guessing between forms is worse than failing.
pub fn lone_form_submit(snapshot: &PageSnapshot) -> Option<ElementId> {
    let mut forms = snapshot.forms();
    let form = forms.next()?;
    if forms.next().is_some() {
        return None;
    }
    form.children
        .iter()
        .filter_map(|id| snapshot.get(*id))
        .find(|el| el.is_submit_control())
        .map(|el| el.id)
}
