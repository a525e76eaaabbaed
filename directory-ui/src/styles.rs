#![cfg(target_arch = "wasm32")]

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node};

const STYLE_TAG_SELECTOR: &str = "style[data-directory-ui]";

/// Default CSS for the directory along with easy-to-override design tokens.
pub const DEFAULT_STYLES: &str = r#"
:root {
  --directory-font-family: 'Inter', system-ui, -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif;
  --directory-bg: #f8fafc;
  --directory-card-bg: #ffffff;
  --directory-card-border: rgba(148, 163, 184, 0.28);
  --directory-radius: 14px;
  --directory-text: #1f2933;
  --directory-muted: #52606d;
  --directory-heading: #11181c;
  --directory-accent: #0b5394;
  --directory-accent-bg: rgba(11, 83, 148, 0.1);
  --directory-error: #b42318;
  --directory-error-bg: rgba(180, 35, 24, 0.08);
}

.directory-root {
  font-family: var(--directory-font-family);
  background: var(--directory-bg);
  color: var(--directory-text);
  min-height: 100%;
}

.directory-header {
  background: var(--directory-accent);
  padding: 18px 24px;
}

.directory-header h1 {
  color: #ffffff;
  margin: 0 0 12px;
  font-size: 1.5rem;
}

.search-box {
  position: relative;
  max-width: 480px;
  margin: 0 auto;
}

.search-box input {
  width: 100%;
  box-sizing: border-box;
  padding: 10px 14px;
  border-radius: 10px;
  border: 1px solid var(--directory-card-border);
  font-size: 1rem;
}

.suggestion-list {
  position: absolute;
  z-index: 10;
  left: 0;
  right: 0;
  margin: 4px 0 0;
  padding: 0;
  list-style: none;
  background: var(--directory-card-bg);
  border: 1px solid var(--directory-card-border);
  border-radius: 10px;
  box-shadow: 0 12px 24px rgba(15, 23, 42, 0.12);
}

.suggestion-item {
  padding: 8px 14px;
  cursor: pointer;
}

.suggestion-item:hover {
  background: var(--directory-accent-bg);
}

.directory-body {
  display: grid;
  grid-template-columns: minmax(220px, 1fr) 3fr;
  gap: 24px;
  padding: 24px;
}

.filter-panel,
.doctor-card {
  background: var(--directory-card-bg);
  border: 1px solid var(--directory-card-border);
  border-radius: var(--directory-radius);
  padding: 16px;
}

.filter-panel h3 {
  font-size: 0.8rem;
  text-transform: uppercase;
  color: var(--directory-muted);
  margin: 16px 0 8px;
}

.filter-clear {
  border: none;
  background: none;
  padding: 0;
  color: var(--directory-accent);
  cursor: pointer;
  font-size: 0.85rem;
}

.filter-option {
  display: flex;
  align-items: center;
  gap: 8px;
  padding: 3px 0;
}

.specialty-options {
  max-height: 240px;
  overflow-y: auto;
}

.directory-error {
  background: var(--directory-error-bg);
  color: var(--directory-error);
  border-radius: 10px;
  padding: 12px 16px;
  margin: 16px 24px 0;
  display: flex;
  justify-content: space-between;
  gap: 12px;
}

.result-heading {
  margin: 0 0 16px;
  color: var(--directory-heading);
}

.doctor-list {
  list-style: none;
  margin: 0;
  padding: 0;
  display: flex;
  flex-direction: column;
  gap: 12px;
}

.doctor-card {
  display: flex;
  gap: 16px;
}

.doctor-photo {
  width: 72px;
  height: 72px;
  border-radius: 50%;
  object-fit: cover;
}

.doctor-name {
  margin: 0 0 4px;
  color: var(--directory-heading);
}

.doctor-meta {
  margin: 2px 0;
  color: var(--directory-muted);
  font-size: 0.9rem;
}

.doctor-fee {
  margin-left: auto;
  font-weight: 600;
  white-space: nowrap;
}

.consultation-tag {
  display: inline-block;
  margin-right: 6px;
  padding: 2px 8px;
  border-radius: 999px;
  background: var(--directory-accent-bg);
  color: var(--directory-accent);
  font-size: 0.75rem;
}

.directory-empty,
.directory-loading {
  padding: 32px;
  text-align: center;
  color: var(--directory-muted);
}

@media (max-width: 768px) {
  .directory-body {
    grid-template-columns: 1fr;
  }
}
"#;

/// Inject the default styles once per document.
pub fn ensure_styles(document: &Document) -> Result<(), JsValue> {
    if document.query_selector(STYLE_TAG_SELECTOR)?.is_some() {
        return Ok(());
    }

    let head = document
        .head()
        .ok_or_else(|| JsValue::from_str("Document không có thẻ <head>"))?;

    let style_el = document.create_element("style")?;
    style_el.set_attribute("data-directory-ui", "v1")?;
    style_el.set_text_content(Some(DEFAULT_STYLES));
    head.append_child(&style_el.clone().dyn_into::<Node>()?)?;

    Ok(())
}
