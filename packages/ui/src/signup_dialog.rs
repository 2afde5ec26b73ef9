use dioxus::prelude::*;

use api::auth::{sanitize_phone_input, OTP_DIGITS, PHONE_DIGITS};
use api::{FirebasePhoneAuth, PendingVerification, Registration, SignupFlow};

use crate::challenge::use_challenge;
use crate::components::{Button, ButtonVariant, Input, Label};
use crate::session::{api_client, use_config, use_session};
use crate::views::ModalOverlay;

/// Registration with name, email and a verified phone number.
///
/// On success the customer is sent back to the login dialog.
#[component]
pub fn SignupDialog(on_close: EventHandler<()>, on_login: EventHandler<()>) -> Element {
    let session = use_session();
    let config = use_config();
    let challenge = use_challenge(config.auth.recaptcha_site_key.clone());

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut phone = use_signal(String::new);
    let mut otp = use_signal(String::new);
    let mut pending = use_signal(|| None::<PendingVerification>);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let registration = move || Registration {
        name: name(),
        email: email(),
        phone: phone(),
    };

    let send_config = config.clone();
    let handle_send = move |_| {
        let config = send_config.clone();
        spawn(async move {
            error.set(None);
            busy.set(true);
            let backend = api_client(&config, &session.peek());
            let provider = FirebasePhoneAuth::new(config.auth.firebase_api_key.clone());
            let outcome = SignupFlow::new(&backend, &provider, config.auth.country_code.clone())
                .request_code(&registration(), &challenge)
                .await
                .map_err(|e| e.to_string());
            busy.set(false);

            match outcome {
                Ok(verification) => pending.set(Some(verification)),
                Err(e) => {
                    tracing::warn!("Signup OTP request failed: {e}");
                    error.set(Some(e));
                }
            }
        });
    };

    let verify_config = config.clone();
    let handle_verify = move |_| {
        let config = verify_config.clone();
        spawn(async move {
            error.set(None);
            busy.set(true);
            let backend = api_client(&config, &session.peek());
            let provider = FirebasePhoneAuth::new(config.auth.firebase_api_key.clone());
            let verification = pending.peek().clone();
            let result = SignupFlow::new(&backend, &provider, config.auth.country_code.clone())
                .complete(verification.as_ref(), &registration(), &otp())
                .await;
            busy.set(false);

            match result {
                Ok(()) => on_login.call(()),
                Err(e) => {
                    tracing::warn!("Signup failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let code_sent = pending.read().is_some();

    rsx! {
        ModalOverlay {
            title: "Sign up",
            on_close: move |_| on_close.call(()),
            div {
                class: "p-6 flex flex-col gap-4",

                div {
                    Label { html_for: "signup-name", "Name" }
                    Input {
                        id: "signup-name",
                        class: "w-full mt-1.5",
                        placeholder: "Your name",
                        value: name(),
                        disabled: code_sent,
                        oninput: move |evt: FormEvent| name.set(evt.value()),
                    }
                }
                div {
                    Label { html_for: "signup-email", "Email" }
                    Input {
                        id: "signup-email",
                        class: "w-full mt-1.5",
                        r#type: "email",
                        placeholder: "you@example.com",
                        value: email(),
                        disabled: code_sent,
                        oninput: move |evt: FormEvent| email.set(evt.value()),
                    }
                }
                div {
                    Label { html_for: "signup-phone", "Phone number" }
                    div {
                        class: "flex items-center gap-2 mt-1.5",
                        span { class: "text-sm text-neutral-500", "{config.auth.country_code}" }
                        Input {
                            id: "signup-phone",
                            class: "flex-1",
                            r#type: "tel",
                            inputmode: "numeric",
                            placeholder: "10-digit phone number",
                            maxlength: PHONE_DIGITS,
                            value: phone(),
                            disabled: code_sent,
                            oninput: move |evt: FormEvent| phone.set(sanitize_phone_input(&evt.value())),
                        }
                    }
                }

                if code_sent {
                    div {
                        Label { html_for: "signup-otp", "OTP" }
                        Input {
                            id: "signup-otp",
                            class: "w-full mt-1.5 tracking-[0.5em]",
                            inputmode: "numeric",
                            placeholder: "6-digit code",
                            maxlength: OTP_DIGITS,
                            value: otp(),
                            oninput: move |evt: FormEvent| {
                                otp.set(evt.value().chars().filter(char::is_ascii_digit).take(OTP_DIGITS).collect())
                            },
                        }
                    }
                }

                if let Some(message) = error() {
                    p { class: "m-0 text-sm text-red-600", "{message}" }
                }

                if code_sent {
                    Button {
                        class: "w-full",
                        disabled: busy(),
                        onclick: handle_verify,
                        if busy() { "Verifying..." } else { "Verify & Sign up" }
                    }
                } else {
                    Button {
                        class: "w-full",
                        disabled: busy(),
                        onclick: handle_send,
                        if busy() { "Sending..." } else { "Send OTP" }
                    }
                }

                Button {
                    variant: ButtonVariant::Ghost,
                    class: "w-full",
                    onclick: move |_| on_login.call(()),
                    "Already have an account? Login"
                }
            }
        }
    }
}
