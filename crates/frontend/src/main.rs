mod api;
mod components;
mod coords;
mod markers;
mod pages;

use atlas_shared::models::Year;
use dioxus::prelude::*;

#[derive(Routable, Clone, PartialEq)]
enum Route {
    #[route("/")]
    Home {},
    #[route("/year/:year")]
    YearView { year: Year },
}

#[component]
fn Home() -> Element {
    rsx! {
        pages::atlas::AtlasPage { initial_year: None::<Year> }
    }
}

#[component]
fn YearView(year: Year) -> Element {
    rsx! {
        pages::atlas::AtlasPage { initial_year: Some(year) }
    }
}

const CSS: Asset = asset!("/assets/main.css");
const FAVICON: Asset = asset!("/assets/favicon.svg");

#[allow(non_snake_case)]
fn App() -> Element {
    rsx! {
        document::Link { rel: "icon", r#type: "image/svg+xml", href: FAVICON }
        document::Stylesheet { href: CSS }
        Router::<Route> {}
    }
}

fn main() {
    launch(App);
}
