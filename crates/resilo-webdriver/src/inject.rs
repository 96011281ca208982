//! JavaScript injected into the page under test.

/// Collects the structural page snapshot.
///
/// Every collected node gets a `data-resilo-id` attribute so the host can
/// find it again by CSS after the scan; IDs start at `arguments[0]` so the
/// host-side counter stays the single source of ID allocation. The
/// attribute disappears with the page on navigation, which is exactly the
/// lifetime the IDs are supposed to have.
pub const SNAPSHOT_JS: &str = r#"
const start = arguments[0];
const nodes = Array.from(document.querySelectorAll(
    'input, textarea, select, button, a, form, [role="button"]'
));
const byNode = new Map();
const items = nodes.map((el, i) => {
    const id = start + i;
    byNode.set(el, id);
    el.setAttribute('data-resilo-id', String(id));
    const rect = el.getBoundingClientRect();
    const attrs = {};
    for (const a of el.attributes) { attrs[a.name] = a.value; }
    let label = el.getAttribute('aria-label');
    if (!label && el.labels && el.labels.length > 0) {
        label = el.labels[0].textContent.trim();
    }
    return {
        id: id,
        type: el.tagName.toLowerCase(),
        text: (el.innerText || '').trim().slice(0, 200) || null,
        label: label || null,
        value: ('value' in el) ? String(el.value).slice(0, 200) : null,
        placeholder: el.getAttribute('placeholder'),
        selector: '[data-resilo-id="' + id + '"]',
        attributes: attrs,
        state: {
            visible: !!(el.offsetWidth || el.offsetHeight || el.getClientRects().length),
            disabled: !!el.disabled,
            checked: !!el.checked,
            readonly: !!el.readOnly
        },
        rect: { x: rect.x, y: rect.y, width: rect.width, height: rect.height },
        children: []
    };
});
items.forEach((item, i) => {
    const el = nodes[i];
    if (el.tagName === 'FORM') {
        item.children = Array.from(el.elements || [])
            .map(c => byNode.get(c))
            .filter(x => x !== undefined);
    }
});
return {
    page: { url: location.href, title: document.title },
    elements: items
};
"#;

/// Picks a `<select>` option by visible label and fires a change event,
/// the way a user-driven selection would.
pub const SELECT_BY_LABEL_JS: &str = r#"
const sel = document.querySelector(arguments[0]);
if (!sel) return false;
const wanted = arguments[1].trim();
for (const opt of sel.options) {
    if (opt.textContent.trim() === wanted) {
        sel.value = opt.value;
        sel.dispatchEvent(new Event('change', { bubbles: true }));
        return true;
    }
}
return false;
"#;
