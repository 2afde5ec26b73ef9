use dioxus::prelude::*;

use api::auth::{sanitize_phone_input, validate_phone, OTP_DIGITS, PHONE_DIGITS};
use api::{CodeRequest, FirebasePhoneAuth, LoginFlow, PendingVerification};

use crate::challenge::use_challenge;
use crate::components::{Button, ButtonVariant, Input, Label};
use crate::session::{api_client, commit, use_config, use_session};
use crate::views::ModalOverlay;

/// Phone + OTP sign-in.
///
/// `on_signup` is called when the customer asks to register instead, or when
/// an unknown phone number should be redirected to sign-up.
#[component]
pub fn LoginDialog(on_close: EventHandler<()>, on_signup: EventHandler<()>) -> Element {
    let session = use_session();
    let config = use_config();
    let challenge = use_challenge(config.auth.recaptcha_site_key.clone());

    let mut phone = use_signal(String::new);
    let mut otp = use_signal(String::new);
    let mut pending = use_signal(|| None::<PendingVerification>);
    let mut error = use_signal(|| None::<String>);
    let mut busy = use_signal(|| false);

    let send_config = config.clone();
    let handle_send = move |_| {
        let config = send_config.clone();
        spawn(async move {
            error.set(None);
            if let Err(e) = validate_phone(&phone()) {
                error.set(Some(e.to_string()));
                return;
            }
            busy.set(true);
            let backend = api_client(&config, &session.peek());
            let provider = FirebasePhoneAuth::new(config.auth.firebase_api_key.clone());
            let flow = LoginFlow::new(
                &backend,
                &provider,
                config.auth.country_code.clone(),
                config.auth.unknown_phone,
            );
            let outcome = flow
                .request_code(&phone(), &challenge)
                .await
                .map_err(|e| e.to_string());
            busy.set(false);

            match outcome {
                Ok(CodeRequest::Sent(verification)) => pending.set(Some(verification)),
                Ok(CodeRequest::RedirectToSignup) => on_signup.call(()),
                Err(e) => {
                    tracing::warn!("OTP request failed: {e}");
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
            let flow = LoginFlow::new(
                &backend,
                &provider,
                config.auth.country_code.clone(),
                config.auth.unknown_phone,
            );
            let verification = pending.peek().clone();
            let result = flow.verify(verification.as_ref(), &otp()).await;
            busy.set(false);

            match result {
                Ok(verified) => {
                    commit(session, |state| state.sign_in(verified.session, verified.customer)).await;
                    on_close.call(());
                }
                Err(e) => {
                    tracing::warn!("OTP verification failed: {e}");
                    error.set(Some(e.to_string()));
                }
            }
        });
    };

    let code_sent = pending.read().is_some();

    rsx! {
        ModalOverlay {
            title: "Login",
            on_close: move |_| on_close.call(()),
            div {
                class: "p-6 flex flex-col gap-4",

                div {
                    Label { html_for: "login-phone", "Phone number" }
                    div {
                        class: "flex items-center gap-2 mt-1.5",
                        span { class: "text-sm text-neutral-500", "{config.auth.country_code}" }
                        Input {
                            id: "login-phone",
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
                        Label { html_for: "login-otp", "OTP" }
                        Input {
                            id: "login-otp",
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
                        if busy() { "Verifying..." } else { "Verify OTP" }
                    }
                    Button {
                        variant: ButtonVariant::Ghost,
                        class: "w-full",
                        disabled: busy(),
                        onclick: move |_| {
                            pending.set(None);
                            otp.set(String::new());
                            error.set(None);
                        },
                        "Change number"
                    }
                } else {
                    Button {
                        class: "w-full",
                        disabled: busy(),
                        onclick: handle_send,
                        if busy() { "Sending..." } else { "Send OTP" }
                    }
                }

                p {
                    class: "m-0 text-center text-sm text-neutral-500",
                    "New here? "
                    button {
                        class: "text-orange-600 font-medium cursor-pointer",
                        onclick: move |_| on_signup.call(()),
                        "Create an account"
                    }
                }
            }
        }
    }
}
