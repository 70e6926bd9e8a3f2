use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Integration credentials live in the database, so none of these hold secrets
    const DISPLAY_ENVS: [&str; 10] = [
        "RUST_LOG",
        "OIG_HOST",
        "OIG_PORT",
        "OIG_DATABASE_URL",
        "OIG_ORDER_SERVICE_URL",
        "OIG_FETCH_TIMEOUT",
        "OIG_WEBHOOK_TIMEOUT",
        "OIG_WEBHOOK_MAX_ATTEMPTS",
        "OIG_WEBHOOK_BASE_DELAY",
        "OIG_SYNC_WORKER_INTERVAL",
    ];

    println!("Current environment values:");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
