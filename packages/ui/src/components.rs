//! Small form primitives shared by the dialogs.

use dioxus::prelude::*;

const FIELD_CLASS: &str = "bg-white border border-neutral-300 rounded px-3 py-2 text-sm text-neutral-800 outline-none font-[inherit] focus:border-orange-500 focus:shadow-[0_0_0_1px_var(--color-orange-500)] disabled:bg-neutral-100 disabled:text-neutral-400";

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Outline,
    Ghost,
}

impl ButtonVariant {
    fn class(self) -> &'static str {
        match self {
            ButtonVariant::Primary => "bg-orange-500 text-white hover:bg-orange-600 disabled:bg-orange-300",
            ButtonVariant::Outline => "border border-neutral-300 text-neutral-700 bg-white hover:bg-neutral-50 disabled:text-neutral-400",
            ButtonVariant::Ghost => "text-neutral-600 hover:bg-neutral-100 disabled:text-neutral-300",
        }
    }
}

#[component]
pub fn Button(
    #[props(default)] variant: ButtonVariant,
    #[props(default)] disabled: bool,
    #[props(default = "button".to_string())] r#type: String,
    #[props(default)] class: String,
    #[props(default)] onclick: EventHandler<MouseEvent>,
    children: Element,
) -> Element {
    rsx! {
        button {
            class: "inline-flex items-center justify-center gap-2 rounded px-4 py-2 text-sm font-medium cursor-pointer transition-colors disabled:cursor-not-allowed {variant.class()} {class}",
            r#type: "{r#type}",
            disabled,
            onclick: move |evt| onclick.call(evt),
            {children}
        }
    }
}

#[component]
pub fn Input(
    #[props(default)] id: String,
    #[props(default)] class: String,
    #[props(default = "text".to_string())] r#type: String,
    #[props(default)] placeholder: String,
    #[props(default)] value: String,
    #[props(default)] disabled: bool,
    #[props(default)] maxlength: Option<usize>,
    #[props(default)] inputmode: Option<String>,
    #[props(default)] oninput: EventHandler<FormEvent>,
    #[props(default)] onfocus: EventHandler<FocusEvent>,
    #[props(default)] onblur: EventHandler<FocusEvent>,
) -> Element {
    rsx! {
        input {
            id: "{id}",
            class: "{FIELD_CLASS} {class}",
            r#type: "{r#type}",
            placeholder: "{placeholder}",
            value: "{value}",
            disabled,
            maxlength: maxlength.map(|n| n.to_string()),
            inputmode,
            oninput: move |evt| oninput.call(evt),
            onfocus: move |evt| onfocus.call(evt),
            onblur: move |evt| onblur.call(evt),
        }
    }
}

/// A styled [`dioxus_primitives::label::Label`].
#[component]
pub fn Label(html_for: String, children: Element) -> Element {
    rsx! {
        dioxus_primitives::label::Label {
            html_for,
            class: "block text-xs font-medium uppercase tracking-wide text-neutral-500",
            {children}
        }
    }
}
