//! MedVault shell binary.
//!
//! A line-oriented front end over the session store and the guard; enough
//! to drive the whole stack against a running backend without any
//! rendering machinery.

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use medvault_auth::Role;
use medvault_routing::{Route, Screen, SubRoute};
use medvault_session::{
    AccountDetails, ApiClient, CredentialStore, DoctorRegistration, FileCredentialStore,
    MemoryCredentialStore, PatientRegistration, RegisterRequest, SessionStore,
};
use medvault_shell::{AppShell, ShellConfig, View};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    medvault_observability::init();

    let config = ShellConfig::from_env();
    tracing::info!(api = %config.api_base_url, "starting MedVault shell");

    let credentials: Arc<dyn CredentialStore> = match FileCredentialStore::in_default_location() {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::warn!(error = %e, "credential persistence unavailable; using in-memory slot");
            Arc::new(MemoryCredentialStore::new())
        }
    };

    let client = ApiClient::new(config.client_config()).context("failed to build API client")?;
    let store = Arc::new(SessionStore::new(client, credentials));
    let mut shell = AppShell::new(store);

    let view = shell.start().await;
    present(&shell, &view);
    print_help();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        match command {
            "login" => match args.as_slice() {
                [email, password, role] => match role.parse::<Role>() {
                    Ok(role) => match shell.login(email, password, role).await {
                        Ok(session) => {
                            println!("signed in as {} ({})", session.display_name, session.role());
                        }
                        Err(err) => println!("login failed: {}", err.message),
                    },
                    Err(_) => println!("role must be one of: patient, doctor, admin"),
                },
                _ => println!("usage: login <email> <password> <role>"),
            },
            "signup" => match args.as_slice() {
                ["doctor", name, email, password, specialization, license] => {
                    let request = RegisterRequest::Doctor(DoctorRegistration {
                        account: account(name, email, password),
                        specialization: specialization.to_string(),
                        license_number: license.to_string(),
                    });
                    report_signup(shell.register(&request).await);
                }
                ["patient", name, email, password, contact, blood_group] => {
                    let request = RegisterRequest::Patient(PatientRegistration {
                        account: account(name, email, password),
                        emergency_contact: contact.to_string(),
                        blood_group: blood_group.to_string(),
                    });
                    report_signup(shell.register(&request).await);
                }
                _ => {
                    println!("usage: signup doctor <name> <email> <password> <specialization> <license>");
                    println!("       signup patient <name> <email> <password> <contact> <blood-group>");
                }
            },
            "go" => match args.as_slice() {
                [page] => match page.parse::<SubRoute>() {
                    Ok(sub) => shell.open_page(sub),
                    Err(()) => println!("unknown page '{page}'"),
                },
                _ => println!("usage: go <page>"),
            },
            "register" => shell.open(Route::Register),
            "dashboard" => shell.open(Route::Dashboard),
            "back" => shell.back(),
            "logout" => shell.logout(),
            "theme" => {
                shell.toggle_theme();
                println!("theme: {}", shell.theme().as_str());
            }
            "help" => print_help(),
            "quit" | "exit" => break,
            other => println!("unknown command '{other}' (try 'help')"),
        }

        let view = shell.view();
        present(&shell, &view);
    }

    Ok(())
}

fn account(name: &str, email: &str, password: &str) -> AccountDetails {
    AccountDetails {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        phone: None,
        address: None,
        date_of_birth: None,
    }
}

fn report_signup(result: medvault_session::AuthResult<medvault_session::UserPayload>) {
    match result {
        Ok(user) => println!("account created for {}; you can now sign in", user.email),
        Err(err) => println!("registration failed: {}", err.message),
    }
}

fn present(shell: &AppShell, view: &View) {
    match view {
        View::Loading => println!("… loading"),
        View::Screen(screen) => {
            println!("── {} ──", screen_title(screen));
            if let Some(chrome) = shell.chrome() {
                let labels: Vec<&str> = chrome.items.iter().map(|item| item.label).collect();
                println!("[{}] {} | {}", chrome.theme.as_str(), chrome.title, labels.join(" · "));
            }
        }
    }
}

fn screen_title(screen: &Screen) -> String {
    match screen {
        Screen::Login => "Sign in".to_string(),
        Screen::Register => "Create account".to_string(),
        Screen::PatientDashboard => "Patient dashboard".to_string(),
        Screen::DoctorDashboard => "Doctor dashboard".to_string(),
        Screen::AdminDashboard => "Admin dashboard".to_string(),
        Screen::SubPage { role, page } => format!("{page} ({role})"),
        Screen::InvalidRole { role } => format!("Invalid role: {role}"),
    }
}

fn print_help() {
    println!("commands:");
    println!("  login <email> <password> <role>");
    println!("  signup doctor <name> <email> <password> <specialization> <license>");
    println!("  signup patient <name> <email> <password> <contact> <blood-group>");
    println!("  go <page> · dashboard · back · register");
    println!("  logout · theme · help · quit");
}
