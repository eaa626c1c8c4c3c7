use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Environment variables the CLI reads credentials and defaults from.
const DEP_ENV: &[&str] = &[
    "DEP_TOKENS",
    "DEP_SERVER_URL",
    "DEP_CONSUMER_KEY",
    "DEP_CONSUMER_SECRET",
    "DEP_ACCESS_TOKEN",
    "DEP_ACCESS_SECRET",
    "DEP_ESCROW_KEY",
];

/// Write a token file in the vendor portal's format.
pub fn write_tokens(dir: &Path) -> PathBuf {
    let path = dir.join("tokens.json");
    std::fs::write(
        &path,
        r#"{
            "consumer_key": "CK_1",
            "consumer_secret": "CS_1",
            "access_token": "AT_1",
            "access_secret": "AS_1",
            "access_token_expiry": "2027-01-01T00:00:00Z"
        }"#,
    )
    .unwrap();
    path
}

/// Run the CLI binary with an isolated HOME and no inherited DEP settings.
pub fn run_cli(args: &[String], home: &Path, env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dep"));
    cmd.args(args);
    for name in DEP_ENV {
        cmd.env_remove(name);
    }
    cmd.env("HOME", home);
    cmd.env("XDG_CONFIG_HOME", home.join("config"));
    cmd.env_remove("RUST_LOG");
    for (name, value) in env {
        cmd.env(name, value);
    }
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI off the async runtime so a mock server can keep serving.
pub async fn run_cli_async(args: &[&str], home: &Path, env: &[(&str, &str)]) -> Output {
    let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
    let home = home.to_path_buf();
    let env: Vec<(String, String)> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    tokio::task::spawn_blocking(move || {
        let env: Vec<(&str, &str)> = env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        run_cli(&args, &home, &env)
    })
    .await
    .unwrap()
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
