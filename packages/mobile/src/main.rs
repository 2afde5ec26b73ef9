use dioxus::prelude::*;
use bridge::HostBridge;
use ui::views::HomeView;

mod bridge;
mod device;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(HostBridge)]
        #[route("/")]
        Home {},
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
