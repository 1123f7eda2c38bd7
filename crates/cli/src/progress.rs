use indicatif::{ProgressBar, ProgressStyle};

/// Detect if we're running in a CI environment
fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Create a spinner with a message.
/// Returns a hidden spinner in CI environments.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = if is_ci() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };

    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn with_env_var<F: FnOnce()>(name: &str, value: &str, f: F) {
        let _lock = ENV_MUTEX.lock().unwrap();
        let original = std::env::var_os(name);
        std::env::set_var(name, value);
        f();
        match original {
            Some(val) => std::env::set_var(name, val),
            None => std::env::remove_var(name),
        }
    }

    #[test]
    fn test_is_ci_detects_ci_env() {
        with_env_var("CI", "true", || assert!(is_ci()));
    }

    #[test]
    fn test_is_ci_detects_github_actions() {
        with_env_var("GITHUB_ACTIONS", "true", || assert!(is_ci()));
    }

    #[test]
    fn test_spinner_is_hidden_in_ci() {
        with_env_var("CI", "1", || {
            let pb = spinner("Fetching schema...");
            assert!(pb.is_hidden());
            pb.finish_and_clear();
        });
    }

    #[test]
    fn test_spinner_with_empty_message() {
        let pb = spinner("");
        pb.finish_and_clear();
    }
}
