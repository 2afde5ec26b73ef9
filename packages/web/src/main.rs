use dioxus::prelude::*;
use ui::views::HomeView;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
    /// Entry point for embedding sites that hand over a cookie session.
    #[route("/embedded")]
    Embedded {},
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: ui::STOREFRONT_CSS }

        ui::SessionProvider {
            config: ui::load_config(),
            Router::<Route> {}
        }
    }
}

#[component]
fn Home() -> Element {
    rsx! { HomeView {} }
}

#[component]
fn Embedded() -> Element {
    let nav = use_navigator();
    rsx! {
        ui::EmbeddedSessionImport {
            on_complete: move |imported: bool| {
                tracing::debug!("Embedded launch, session imported: {imported}");
                nav.replace(Route::Home {});
            },
        }
    }
}
