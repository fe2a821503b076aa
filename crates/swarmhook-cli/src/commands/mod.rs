//! CLI command implementations.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use swarmhook_config::{DaemonConfig, load_daemon_config};
use swarmhook_core::{CommandRunner, ImageId, RoutingEntry};
use swarmhook_executor::ProcessRunner;

pub fn validate(path: &Path) -> Result<()> {
    match load_daemon_config(path) {
        Ok(config) => {
            println!("Configuration is valid");
            print!("{}", summarize(&config));
            Ok(())
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn resolve(config_path: &Path, image: &str) -> Result<()> {
    let config = load(config_path)?;
    let image = ImageId::from(image);

    match lookup(&config, &image) {
        Some(entry) => {
            print!("{}", describe(&image, entry));
            Ok(())
        }
        None => {
            println!("No service or stack is configured for {}", image);
            std::process::exit(1);
        }
    }
}

/// Run the deployment for `image` once, with the same command a push runs.
pub async fn deploy(config_path: &Path, workdir: Option<PathBuf>, image: &str) -> Result<()> {
    let config = load(config_path)?;
    let image = ImageId::from(image);

    let Some(entry) = lookup(&config, &image) else {
        println!("No service or stack is configured for {}", image);
        std::process::exit(1);
    };

    let command = entry.command(&image);
    println!("Running: {}", command.join(" "));

    let runner = match workdir {
        Some(dir) => ProcessRunner::with_working_dir(dir),
        None => ProcessRunner::new(),
    };
    let outcome = runner
        .run(&command)
        .await
        .with_context(|| format!("Failed to run {}", command.join(" ")))?;

    print!("{}", outcome.stdout_lossy());
    eprint!("{}", outcome.stderr_lossy());

    if outcome.succeeded {
        println!("Deployed {} to {} {}", image, entry.kind(), entry.target_name());
        Ok(())
    } else {
        println!(
            "Failed to deploy {} to {} {} (exit code {:?})",
            image,
            entry.kind(),
            entry.target_name(),
            outcome.exit_code
        );
        std::process::exit(1);
    }
}

fn load(path: &Path) -> Result<DaemonConfig> {
    load_daemon_config(path)
        .with_context(|| format!("Failed to load config file: {}", path.display()))
}

/// Resolve `image` the way a push does: the undetected sentinel never matches.
fn lookup<'a>(config: &'a DaemonConfig, image: &ImageId) -> Option<&'a RoutingEntry> {
    if image.is_undetected() {
        return None;
    }
    config.routes.resolve(image.as_str())
}

/// Human-readable listing of routes and interval jobs.
fn summarize(config: &DaemonConfig) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Routes: {}", config.routes.len());
    for (image, entry) in config.routes.iter_sorted() {
        let _ = match entry {
            RoutingEntry::Stack {
                stack_name,
                manifest_path,
            } => writeln!(out, "  {image} -> stack {stack_name} ({manifest_path})"),
            RoutingEntry::Service { service_name } => {
                writeln!(out, "  {image} -> service {service_name}")
            }
        };
    }

    let _ = writeln!(out, "Intervals: {}", config.intervals.len());
    for job in &config.intervals {
        let _ = writeln!(
            out,
            "  every {:?} (priority {}): {}",
            job.period,
            job.priority,
            job.name()
        );
    }

    out
}

fn describe(image: &ImageId, entry: &RoutingEntry) -> String {
    format!(
        "{} -> {} {}\ncommand: {}\n",
        image,
        entry.kind(),
        entry.target_name(),
        entry.command(image).join(" ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use swarmhook_config::parse_daemon_config;

    const CONFIG: &str = r#"{
        "services": {"myrepo/worker:latest": {"service": "worker"}},
        "stacks": {"myrepo/app:v2": {"stack": "appstack", "filepath": "/cfg/app.yml"}},
        "intervals": [{"interval": 30, "priority": 1, "command": "docker system prune -f"}]
    }"#;

    #[test]
    fn test_summarize_lists_routes_and_intervals() {
        let config = parse_daemon_config(CONFIG).unwrap();
        assert_eq!(
            summarize(&config),
            "Routes: 2\n\
             \x20 myrepo/app:v2 -> stack appstack (/cfg/app.yml)\n\
             \x20 myrepo/worker:latest -> service worker\n\
             Intervals: 1\n\
             \x20 every 30s (priority 1): docker system prune -f\n"
        );
    }

    #[test]
    fn test_describe_shows_command() {
        let config = parse_daemon_config(CONFIG).unwrap();
        let image = ImageId::from("myrepo/app:v2");
        let entry = config.routes.resolve(image.as_str()).unwrap();
        assert_eq!(
            describe(&image, entry),
            "myrepo/app:v2 -> stack appstack\ncommand: docker stack deploy -c /cfg/app.yml appstack\n"
        );
    }

    #[test]
    fn test_lookup_never_matches_undetected_image() {
        let config = parse_daemon_config(
            r#"{"services": {"Image not detected!": {"service": "oops"}, "myrepo/worker:latest": {"service": "worker"}}}"#,
        )
        .unwrap();

        assert!(config.routes.resolve(ImageId::UNDETECTED).is_some());
        assert!(lookup(&config, &ImageId::undetected()).is_none());
        assert!(lookup(&config, &ImageId::from("myrepo/worker:latest")).is_some());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.json");
        let err = load(&missing).unwrap_err();
        assert!(err.to_string().contains("config.json"));
    }
}
