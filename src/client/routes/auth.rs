use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaArrowLeft;
use dioxus_free_icons::Icon;
use dioxus_logger::tracing;

use linkshield::{
    error::FieldErrors,
    model::form::{SignInForm, SignUpForm},
    nav::Page,
};

use crate::client::{app::AppContext, components::Page as PageLayout};

#[component]
fn Field(
    label: &'static str,
    name: &'static str,
    kind: &'static str,
    value: String,
    error: Option<String>,
    oninput: EventHandler<String>,
) -> Element {
    rsx!(
        label { class: "form-control w-full",
            div { class: "label",
                span { class: "label-text", "{label}" }
            }
            input {
                class: if error.is_some() { "input input-bordered input-error w-full" } else { "input input-bordered w-full" },
                name: "{name}",
                r#type: "{kind}",
                value: "{value}",
                oninput: move |event| oninput.call(event.value()),
            }
            if let Some(error) = error {
                div { class: "label",
                    span { class: "label-text-alt text-error", "{error}" }
                }
            }
        }
    )
}

#[component]
pub fn Auth() -> Element {
    let context = use_context::<AppContext>();
    let mut page = use_context::<Signal<Page>>();

    let mut is_sign_up = use_signal(|| false);
    let mut form = use_signal(SignUpForm::default);
    let mut errors = use_signal(FieldErrors::new);
    let mut banner = use_signal(|| None::<Result<String, String>>);
    let mut submitting = use_signal(|| false);

    let error_for = move |field: &str| errors.read().get(field).cloned();

    let mut toggle_mode = move |_| {
        is_sign_up.toggle();
        form.set(SignUpForm::default());
        errors.set(FieldErrors::new());
        banner.set(None);
    };

    let session = context.session.clone();
    let submit = move |event: FormEvent| {
        event.prevent_default();
        let session = session.clone();
        let current = form.read().clone();

        let checked = if is_sign_up() {
            current.check()
        } else {
            SignInForm {
                email: current.email.clone(),
                password: current.password.clone(),
            }
            .check()
        };
        if let Err(field_errors) = checked {
            errors.set(field_errors);
            return;
        }

        errors.set(FieldErrors::new());
        banner.set(None);
        submitting.set(true);

        spawn(async move {
            if is_sign_up() {
                match session
                    .sign_up(current.email.trim(), &current.password, &current.details())
                    .await
                {
                    Ok(_) => {
                        banner.set(Some(Ok(
                            "Account created successfully! You can now sign in.".to_string()
                        )));
                        is_sign_up.set(false);
                    }
                    Err(e) => banner.set(Some(Err(e.user_message()))),
                }
            } else {
                match session.sign_in(current.email.trim(), &current.password).await {
                    Ok(()) => page.set(Page::Account),
                    Err(e) => {
                        tracing::debug!(kind = ?e.kind(), "Sign in rejected");
                        banner.set(Some(Err(e.user_message())));
                    }
                }
            }

            submitting.set(false);
        });
    };

    let session = context.session.clone();
    let reset_password = move |_| {
        let session = session.clone();
        let email = form.read().email.trim().to_string();
        if email.is_empty() {
            let mut field_errors = FieldErrors::new();
            field_errors.insert("email".to_string(), "Email is required".to_string());
            errors.set(field_errors);
            return;
        }

        spawn(async move {
            match session.reset_password(&email).await {
                Ok(()) => banner.set(Some(Ok(
                    "Password reset email sent. Please check your inbox.".to_string()
                ))),
                Err(e) => banner.set(Some(Err(e.user_message()))),
            }
        });
    };

    let sign_up = is_sign_up();

    rsx!(
        PageLayout { class: "flex items-center justify-center bg-base-200",
            div { class: "w-full max-w-md flex flex-col gap-6",
                button {
                    class: "btn btn-ghost btn-sm self-start flex gap-2",
                    onclick: move |_| page.set(Page::Home),
                    Icon { width: 14, height: 14, icon: FaArrowLeft }
                    "Back to Home"
                }
                div { class: "card bg-base-100 shadow-xl",
                    form { class: "card-body gap-2",
                        onsubmit: submit,
                        h2 { class: "card-title text-2xl",
                            if sign_up { "Create Account" } else { "Welcome Back" }
                        }
                        match banner() {
                            Some(Ok(text)) => rsx!(div { class: "alert alert-success", "{text}" }),
                            Some(Err(text)) => rsx!(div { class: "alert alert-error", "{text}" }),
                            None => rsx!(),
                        }
                        if sign_up {
                            div { class: "grid grid-cols-2 gap-2",
                                Field {
                                    label: "First Name",
                                    name: "first_name",
                                    kind: "text",
                                    value: form.read().first_name.clone(),
                                    error: error_for("first_name"),
                                    oninput: move |value| form.write().first_name = value,
                                }
                                Field {
                                    label: "Last Name",
                                    name: "last_name",
                                    kind: "text",
                                    value: form.read().last_name.clone(),
                                    error: error_for("last_name"),
                                    oninput: move |value| form.write().last_name = value,
                                }
                            }
                            Field {
                                label: "Username",
                                name: "username",
                                kind: "text",
                                value: form.read().username.clone(),
                                error: error_for("username"),
                                oninput: move |value| form.write().username = value,
                            }
                        }
                        Field {
                            label: "Email",
                            name: "email",
                            kind: "email",
                            value: form.read().email.clone(),
                            error: error_for("email"),
                            oninput: move |value| form.write().email = value,
                        }
                        Field {
                            label: "Password",
                            name: "password",
                            kind: "password",
                            value: form.read().password.clone(),
                            error: error_for("password"),
                            oninput: move |value| form.write().password = value,
                        }
                        if sign_up {
                            Field {
                                label: "Confirm Password",
                                name: "confirm_password",
                                kind: "password",
                                value: form.read().confirm_password.clone(),
                                error: error_for("confirm_password"),
                                oninput: move |value| form.write().confirm_password = value,
                            }
                            label { class: "label cursor-pointer justify-start gap-2",
                                input {
                                    class: "checkbox checkbox-sm",
                                    r#type: "checkbox",
                                    checked: form.read().accept_terms,
                                    onchange: move |event| form.write().accept_terms = event.checked(),
                                }
                                span { class: "label-text", "I accept the terms and conditions" }
                            }
                            if let Some(error) = error_for("accept_terms") {
                                span { class: "text-sm text-error", "{error}" }
                            }
                        }
                        button {
                            class: "btn btn-primary mt-4",
                            r#type: "submit",
                            disabled: submitting(),
                            if submitting() {
                                "Please wait..."
                            } else if sign_up {
                                "Create Account"
                            } else {
                                "Sign In"
                            }
                        }
                        if !sign_up {
                            button {
                                class: "btn btn-link btn-sm",
                                r#type: "button",
                                onclick: reset_password,
                                "Forgot your password?"
                            }
                        }
                        button {
                            class: "btn btn-ghost btn-sm",
                            r#type: "button",
                            onclick: move |event| toggle_mode(event),
                            if sign_up {
                                "Already have an account? Sign in"
                            } else {
                                "Don't have an account? Sign up"
                            }
                        }
                    }
                }
            }
        }
    )
}
