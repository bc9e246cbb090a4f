use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{FaStar, FaTrash, FaTriangleExclamation, FaUser};
use dioxus_free_icons::Icon;
use dioxus_logger::tracing;

use linkshield::{
    model::{
        auth::Identity,
        history::HistoryEntry,
        scan::ScanWithDetails,
        usage::{UsageCounter, UsageStats},
    },
    nav::Page,
    service::{
        history::HistoryService, scan::ScanService, session::SessionState,
        usage::{UsagePolicy, UsageService},
    },
};

use crate::client::{
    app::AppContext,
    components::{EmailVerificationBanner, Page as PageLayout},
};

#[derive(Clone, Copy, PartialEq)]
enum Tab {
    Dashboard,
    Scans,
    History,
}

/// Accessors for the signed-in user, created once per dashboard.
#[derive(Clone)]
struct Services {
    usage: UsageService,
    scans: ScanService,
    history: HistoryService,
}

impl Services {
    fn dispose(&self) {
        self.usage.dispose();
        self.scans.dispose();
        self.history.dispose();
    }
}

#[component]
pub fn Account() -> Element {
    let mut page = use_context::<Signal<Page>>();
    let session_state = use_context::<Signal<SessionState>>();

    let state = session_state.read().clone();
    match state {
        SessionState::Initializing | SessionState::ProfileLoading { .. } => rsx!(
            PageLayout { class: "flex items-center justify-center",
                span { class: "loading loading-spinner loading-lg" }
            }
        ),
        SessionState::Ready { profile, .. } => rsx!(
            Dashboard { key: "{profile.user.user_id}", user_id: profile.user.user_id }
        ),
        SessionState::SignedOut | SessionState::IdentityOnly { .. } => rsx!(
            PageLayout { class: "flex items-center justify-center",
                div { class: "flex flex-col items-center gap-4 text-center",
                    Icon { width: 48, height: 48, icon: FaTriangleExclamation }
                    h2 { class: "text-xl font-semibold", "Authentication Required" }
                    p { class: "opacity-70", "Please sign in to access your account." }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| page.set(Page::Auth),
                        "Sign In"
                    }
                }
            }
        ),
    }
}

#[component]
fn Dashboard(user_id: i32) -> Element {
    let context = use_context::<AppContext>();
    let session_state = use_context::<Signal<SessionState>>();
    let mut tab = use_signal(|| Tab::Dashboard);

    let mut usage = use_signal(|| None::<UsageStats>);
    let mut usage_history = use_signal(Vec::<UsageCounter>::new);
    let mut usage_error = use_signal(|| None::<String>);
    let mut scans = use_signal(Vec::<ScanWithDetails>::new);
    let mut history = use_signal(Vec::<HistoryEntry>::new);
    let mut action_error = use_signal(|| None::<String>);

    let services = use_hook(|| {
        let session = &context.session;
        match (
            session.usage_service(),
            session.scan_service(),
            session.history_service(),
        ) {
            (Some(usage), Some(scans), Some(history)) => Some(Services {
                usage,
                scans,
                history,
            }),
            _ => None,
        }
    });

    let loader = services.clone();
    use_future(move || {
        let services = loader.clone();
        async move {
            let Some(services) = services else { return };

            let _ = services.usage.fetch_usage_stats().await;
            services.usage.fetch_usage_history().await;
            if let Err(e) = services.scans.fetch_scans().await {
                action_error.set(Some(e.user_message()));
            }
            if let Err(e) = services.history.fetch_history().await {
                action_error.set(Some(e.user_message()));
            }

            if let Err(e) = services.usage.start_change_feed().await {
                tracing::warn!(user_id, error = %e, "Usage change feed unavailable");
            }
            if let Err(e) = services.scans.start_change_feed().await {
                tracing::warn!(user_id, error = %e, "Scan change feed unavailable");
            }
            if let Err(e) = services.history.start_change_feed().await {
                tracing::warn!(user_id, error = %e, "History change feed unavailable");
            }

            let mut stats_changes = services.usage.subscribe_stats();
            let mut usage_history_changes = services.usage.subscribe_history();
            let mut scan_changes = services.scans.subscribe();
            let mut history_changes = services.history.subscribe();

            loop {
                usage.set(services.usage.usage_stats());
                usage_history.set(services.usage.usage_history());
                usage_error.set(services.usage.error());
                scans.set(services.scans.scans());
                history.set(services.history.history());

                let changed = tokio::select! {
                    changed = stats_changes.changed() => changed,
                    changed = usage_history_changes.changed() => changed,
                    changed = scan_changes.changed() => changed,
                    changed = history_changes.changed() => changed,
                };
                if changed.is_err() {
                    break;
                }
            }
        }
    });

    let dropped = services.clone();
    use_drop(move || {
        if let Some(services) = &dropped {
            services.dispose();
        }
    });

    let Some(services) = services else {
        return rsx!();
    };

    let state = session_state.read().clone();
    let (Some(identity), Some(profile)) = (state.identity(), state.profile()) else {
        return rsx!();
    };
    let verified = Identity::is_email_verified(identity);
    let plan = profile.plan_name().unwrap_or("Free").to_string();
    let stats = usage.read().clone();
    let limits = UsagePolicy::plan_limits(stats.as_ref());
    let percentage = UsagePolicy::usage_percentage(stats.as_ref());
    let can_scan = UsagePolicy::can_perform_scan(verified, stats.as_ref());

    let session = context.session.clone();
    let sign_out = move |_| {
        let session = session.clone();
        spawn(async move {
            if let Err(e) = session.sign_out().await {
                tracing::error!(error = %e, "Sign out failed");
            }
        });
    };

    rsx!(
        PageLayout {
            div { class: "max-w-3xl mx-auto flex flex-col gap-6 py-6",
                EmailVerificationBanner {}
                if let Some(message) = usage_error() {
                    div { class: "alert alert-error", "{message}" }
                }
                if let Some(message) = action_error() {
                    div { class: "alert alert-error", "{message}" }
                }
                div { class: "card bg-base-200",
                    div { class: "card-body flex-row items-center justify-between",
                        div { class: "flex items-center gap-4",
                            div { class: "w-16 h-16 rounded-full border flex items-center justify-center",
                                Icon { width: 28, height: 28, icon: FaUser }
                            }
                            div {
                                p { class: "font-semibold", "{profile.display_name()}" }
                                p { class: "text-sm opacity-70", "{profile.user.email}" }
                                p { class: "text-xs opacity-60", "{plan} Plan" }
                            }
                        }
                        button { class: "btn btn-outline btn-sm", onclick: sign_out, "Sign Out" }
                    }
                }
                div { role: "tablist", class: "tabs tabs-boxed",
                    for (label, value) in [("Dashboard", Tab::Dashboard), ("Scans", Tab::Scans), ("History", Tab::History)] {
                        a {
                            role: "tab",
                            class: if tab() == value { "tab tab-active" } else { "tab" },
                            onclick: move |_| tab.set(value),
                            "{label}"
                        }
                    }
                }
                match tab() {
                    Tab::Dashboard => rsx!(
                        div { class: "card bg-base-200",
                            div { class: "card-body gap-3",
                                h3 { class: "card-title text-base", "Today's Usage" }
                                match limits {
                                    Some(limits) => rsx!(
                                        progress { class: "progress progress-primary w-full", value: "{percentage}", max: "100" }
                                        p { class: "text-sm",
                                            "{limits.used} of {limits.daily} scans used, {limits.remaining} remaining on the {limits.plan} plan"
                                        }
                                    ),
                                    None => rsx!(p { class: "text-sm opacity-70", "No usage recorded yet." }),
                                }
                                if !usage_history.read().is_empty() {
                                    ul { class: "text-xs opacity-70",
                                        for counter in usage_history.read().iter() {
                                            li { key: "{counter.usage_id}", "{counter.period_start}: {counter.scans_used} scans" }
                                        }
                                    }
                                }
                            }
                        }
                        NewScan { scans: services.scans.clone(), can_scan, verified }
                    ),
                    Tab::Scans => rsx!(
                        ScanList { scans: services.scans.clone(), rows: scans() }
                    ),
                    Tab::History => rsx!(
                        HistoryList { history: services.history.clone(), rows: history() }
                    ),
                }
            }
        }
    )
}

#[component]
fn NewScan(scans: ScanService, can_scan: bool, verified: bool) -> Element {
    let mut url = use_signal(String::new);
    let mut message = use_signal(|| None::<Result<String, String>>);

    let submit = move |event: FormEvent| {
        event.prevent_default();
        let scans = scans.clone();
        let target = url();
        spawn(async move {
            match scans.submit_scan(&target, None).await {
                Ok(scan) => {
                    url.set(String::new());
                    message.set(Some(Ok(format!("Scan #{} submitted", scan.scan_id))));
                }
                Err(e) => {
                    let text = e
                        .field_errors()
                        .and_then(|fields| fields.get("url").cloned())
                        .unwrap_or_else(|| e.user_message());
                    message.set(Some(Err(text)));
                }
            }
        });
    };

    rsx!(
        form { class: "card bg-base-200", onsubmit: submit,
            div { class: "card-body gap-3",
                h3 { class: "card-title text-base", "New Scan" }
                input {
                    class: "input input-bordered w-full",
                    r#type: "url",
                    placeholder: "https://example.com",
                    value: "{url}",
                    oninput: move |event| url.set(event.value()),
                }
                button { class: "btn btn-primary", r#type: "submit", disabled: !can_scan, "Scan Link" }
                if !verified {
                    p { class: "text-sm text-warning", "Verify your email address to start scanning." }
                } else if !can_scan {
                    p { class: "text-sm text-warning", "Daily scan limit reached. Upgrade to Pro for unlimited scans." }
                }
                match message() {
                    Some(Ok(text)) => rsx!(p { class: "text-sm text-success", "{text}" }),
                    Some(Err(text)) => rsx!(p { class: "text-sm text-error", "{text}" }),
                    None => rsx!(),
                }
            }
        }
    )
}

#[component]
fn ScanList(scans: ScanService, rows: Vec<ScanWithDetails>) -> Element {
    if rows.is_empty() {
        return rsx!(p { class: "opacity-70 text-center", "No scans yet." });
    }

    rsx!(
        ul { class: "flex flex-col gap-2",
            for row in rows {
                li { key: "{row.scan.scan_id}", class: "card bg-base-200",
                    div { class: "card-body flex-row items-center justify-between py-3",
                        div {
                            p { class: "font-medium break-all", "{row.scan.url_scanned}" }
                            p { class: "text-xs opacity-60", "{row.scan.status} ({row.scan.progress}%)" }
                        }
                        button {
                            class: "btn btn-ghost btn-sm",
                            onclick: {
                                let scans = scans.clone();
                                let scan_id = row.scan.scan_id;
                                move |_| {
                                    let scans = scans.clone();
                                    spawn(async move {
                                        if let Err(e) = scans.save_to_history(scan_id, None).await {
                                            tracing::error!(scan_id, error = %e, "Failed to save scan to history");
                                        }
                                    });
                                }
                            },
                            "Save"
                        }
                    }
                }
            }
        }
    )
}

#[component]
fn HistoryList(history: HistoryService, rows: Vec<HistoryEntry>) -> Element {
    if rows.is_empty() {
        return rsx!(p { class: "opacity-70 text-center", "No saved scans yet." });
    }

    rsx!(
        ul { class: "flex flex-col gap-2",
            for entry in rows {
                li { key: "{entry.row.history_id}", class: "card bg-base-200",
                    div { class: "card-body flex-row items-center justify-between py-3",
                        div {
                            p { class: "font-medium break-all", "{entry.url()}" }
                            if let Some(notes) = entry.row.notes.clone() {
                                p { class: "text-xs opacity-60", "{notes}" }
                            }
                        }
                        div { class: "flex gap-1",
                            button {
                                class: if entry.row.is_favorite { "btn btn-ghost btn-sm text-warning" } else { "btn btn-ghost btn-sm" },
                                onclick: {
                                    let history = history.clone();
                                    let scan_id = entry.row.scan_id;
                                    move |_| {
                                        let history = history.clone();
                                        spawn(async move {
                                            if let Err(e) = history.toggle_favorite(scan_id).await {
                                                tracing::error!(scan_id, error = %e, "Failed to toggle favorite");
                                            }
                                        });
                                    }
                                },
                                Icon { width: 14, height: 14, icon: FaStar }
                            }
                            button {
                                class: "btn btn-ghost btn-sm",
                                onclick: {
                                    let history = history.clone();
                                    let scan_id = entry.row.scan_id;
                                    move |_| {
                                        let history = history.clone();
                                        spawn(async move {
                                            if let Err(e) = history.remove_from_history(scan_id).await {
                                                tracing::error!(scan_id, error = %e, "Failed to remove history entry");
                                            }
                                        });
                                    }
                                },
                                Icon { width: 14, height: 14, icon: FaTrash }
                            }
                        }
                    }
                }
            }
        }
    )
}
