//! Command implementations for the CLI tool.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use uncompress::{Uncompress, UncompressOptions};

use crate::OutputFormat;
use crate::exit_codes::{ExitCode, error_to_exit_code};
use crate::output::create_formatter;

/// Configuration for a decompression task from the command line.
pub struct TaskConfig {
    pub src: Option<String>,
    pub dest: Option<String>,
    pub params: Option<PathBuf>,
    pub fetch: bool,
    pub mode: Option<String>,
    pub owner: Option<String>,
    pub group: Option<String>,
    pub timeout: Option<u64>,
    pub format: OutputFormat,
    pub quiet: bool,
}

/// Runs one task and prints its outcome.
pub fn uncompress(config: &TaskConfig) -> ExitCode {
    let formatter = create_formatter(config.format);

    let options = match build_options(config) {
        Ok(options) => options,
        Err(msg) => {
            print_failure(config.format, &msg);
            return ExitCode::BadArgs;
        }
    };

    match Uncompress::new(options).run() {
        Ok(result) => {
            if !config.quiet || config.format == OutputFormat::Json {
                println!("{}", formatter.format_result(&result));
            }
            ExitCode::Success
        }
        Err(e) => {
            match config.format {
                OutputFormat::Json => println!("{}", formatter.format_error(&e)),
                OutputFormat::Human => eprintln!("{}", formatter.format_error(&e)),
            }
            error_to_exit_code(&e)
        }
    }
}

/// Merges a parameter file with command line flags; flags win.
fn build_options(config: &TaskConfig) -> Result<UncompressOptions, String> {
    let mut options = match &config.params {
        Some(path) => read_params(path)?,
        None => match (&config.src, &config.dest) {
            (Some(src), Some(dest)) => UncompressOptions::new(src.as_str(), dest.as_str()),
            _ => return Err("both SRC and DEST are required".to_string()),
        },
    };

    if let Some(src) = &config.src {
        options.src = src.clone();
    }
    if let Some(dest) = &config.dest {
        options.dest = dest.clone();
    }
    if config.fetch {
        options.copy = false;
    }
    if let Some(mode) = &config.mode {
        options.mode = Some(mode.clone());
    }
    if let Some(owner) = &config.owner {
        options.owner = Some(owner.clone());
    }
    if let Some(group) = &config.group {
        options.group = Some(group.clone());
    }
    if let Some(timeout) = config.timeout {
        options.timeout = Some(timeout);
    }
    Ok(options)
}

fn read_params(path: &Path) -> Result<UncompressOptions, String> {
    let file = File::open(path)
        .map_err(|e| format!("Cannot read parameters '{}': {}", path.display(), e))?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| format!("Invalid parameters in '{}': {}", path.display(), e))
}

fn print_failure(format: OutputFormat, msg: &str) {
    match format {
        OutputFormat::Json => println!("{}", serde_json::json!({ "failed": true, "msg": msg })),
        OutputFormat::Human => eprintln!("Error: {}", msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> TaskConfig {
        TaskConfig {
            src: None,
            dest: None,
            params: None,
            fetch: false,
            mode: None,
            owner: None,
            group: None,
            timeout: None,
            format: OutputFormat::Json,
            quiet: false,
        }
    }

    #[test]
    fn test_options_from_flags() {
        let config = TaskConfig {
            src: Some("https://x/a.gz".into()),
            dest: Some("/tmp/".into()),
            fetch: true,
            mode: Some("0644".into()),
            ..config()
        };
        let options = build_options(&config).unwrap();
        assert_eq!(options.src, "https://x/a.gz");
        assert!(!options.copy);
        assert_eq!(options.mode.as_deref(), Some("0644"));
    }

    #[test]
    fn test_options_from_params_with_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let params = dir.path().join("task.json");
        std::fs::write(
            &params,
            r#"{"src": "a.xz", "dest": "/opt/", "mode": "0600", "copy": false}"#,
        )
        .unwrap();

        let config = TaskConfig {
            params: Some(params),
            mode: Some("0755".into()),
            ..config()
        };
        let options = build_options(&config).unwrap();
        assert_eq!(options.src, "a.xz");
        assert!(!options.copy);
        assert_eq!(options.mode.as_deref(), Some("0755"));
    }

    #[test]
    fn test_missing_params_file() {
        let config = TaskConfig {
            params: Some(PathBuf::from("/nonexistent/task.json")),
            ..config()
        };
        assert!(build_options(&config).is_err());
    }
}
