use atlas_shared::models::Year;
use atlas_shared::state::Action;
use atlas_shared::timeline::{YEAR_MAX, YEAR_MIN};
use dioxus::prelude::*;

/// Parse the slider value; anything unparsable is ignored.
pub fn parse_year(value: &str) -> Option<Year> {
    value.trim().parse().ok()
}

#[component]
pub fn TimelineControls(year: Year, playing: bool, on_action: EventHandler<Action>) -> Element {
    rsx! {
        div { class: "timeline",
            button {
                class: if playing { "play-button playing" } else { "play-button" },
                title: if playing { "Pause" } else { "Play" },
                onclick: move |_| on_action.call(Action::TogglePlay),
                if playing { "\u{23F8}" } else { "\u{25B6}" }
            }
            input {
                class: "year-slider",
                r#type: "range",
                min: "{YEAR_MIN}",
                max: "{YEAR_MAX}",
                step: "1",
                value: "{year}",
                oninput: move |evt: Event<FormData>| {
                    if let Some(y) = parse_year(&evt.value()) {
                        on_action.call(Action::Seek(y));
                    }
                },
            }
            span { class: "year-label", "{year}" }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1650"), Some(1650));
        assert_eq!(parse_year(" 1498 "), Some(1498));
        assert_eq!(parse_year(""), None);
        assert_eq!(parse_year("16.5"), None);
    }
}
