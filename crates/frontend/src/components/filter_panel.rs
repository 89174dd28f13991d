use atlas_shared::flags;
use atlas_shared::state::{Action, EmpirePreview};
use dioxus::prelude::*;

/// One checkbox row, detached from the frame it was rendered from.
#[derive(Debug, Clone, PartialEq)]
pub struct EmpireRow {
    pub empire: String,
    pub active: bool,
    pub icon_url: Option<String>,
}

impl From<&EmpirePreview<'_>> for EmpireRow {
    fn from(preview: &EmpirePreview<'_>) -> Self {
        EmpireRow {
            empire: preview.empire.to_string(),
            active: preview.active,
            icon_url: preview.icon.map(flags::icon_url),
        }
    }
}

#[component]
pub fn FilterPanel(rows: Vec<EmpireRow>, on_action: EventHandler<Action>) -> Element {
    let mut open = use_signal(|| false);
    let is_open = *open.read();
    let active_count = rows.iter().filter(|r| r.active).count();
    let total = rows.len();

    rsx! {
        div { class: if is_open { "filter-panel open" } else { "filter-panel" },
            button {
                class: "filter-toggle",
                onclick: move |_| {
                    let next = !*open.read();
                    open.set(next);
                },
                "Empires ({active_count}/{total})"
            }
            if is_open {
                div { class: "filter-body",
                    div { class: "filter-actions",
                        button { onclick: move |_| on_action.call(Action::SetAllEmpires(true)), "All" }
                        button { onclick: move |_| on_action.call(Action::SetAllEmpires(false)), "None" }
                    }
                    for row in rows.iter().cloned() {
                        FilterRow { key: "{row.empire}", row: row.clone(), on_action }
                    }
                }
            }
        }
    }
}

#[component]
fn FilterRow(row: EmpireRow, on_action: EventHandler<Action>) -> Element {
    let empire = row.empire.clone();
    rsx! {
        label { class: "filter-row",
            input {
                r#type: "checkbox",
                checked: row.active,
                onchange: move |_| on_action.call(Action::ToggleEmpire(empire.clone())),
            }
            if let Some(url) = row.icon_url.as_deref() {
                img { class: "flag-preview", src: "{url}", alt: "" }
            } else {
                span { class: "flag-preview dot" }
            }
            span { "{row.empire}" }
        }
    }
}
