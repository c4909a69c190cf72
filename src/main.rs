//! Binary entry point for the fqn CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Preview the rewrite of every project (unified diff)
//! fqn solution --dry-run --format diff
//!
//! # Rewrite one file in place
//! fqn document src/App/Program.cs
//!
//! # Rewrite the directive under the cursor
//! fqn directive --at src/App/Program.cs:4:11
//!
//! # What can be done here?
//! fqn actions --at src/App/Program.cs:4:11
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use fqn::cli::{format_summary, run_actions, run_rewrite, RewriteScope, Workspace};
use fqn::config::{CliOverrides, ScopePolicy};
use fqn::error::{FqnError, OutputErrorCode};
use fqn::output::{emit_response, ErrorResponse, RewriteResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Rewrite C# using directives to fully-qualified namespace names.
///
/// Rewrite commands apply their changes unless `--dry-run` is given. JSON
/// output and JSON errors go to stdout; logs go to stderr.
#[derive(Parser, Debug)]
#[command(name = "fqn", version, about = "Fully qualify C# using directives")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Workspace root directory (default: current directory).
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    /// Which directives a whole-file rewrite touches.
    #[arg(long, global = true, value_enum)]
    scope: Option<ScopeArg>,

    /// Also rewrite the target of aliased directives.
    #[arg(long, global = true)]
    rename_aliased: bool,

    /// Extra namespace visible to every project. Can be repeated.
    #[arg(long = "reference", global = true, value_name = "NAMESPACE")]
    references: Vec<String>,

    /// Log level for tracing output. `RUST_LOG` takes precedence.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Log line format.
    #[arg(long, global = true, value_enum, default_value = "text")]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ScopeArg {
    /// Only directives inside namespace declarations.
    Namespace,
    /// Every directive in the file.
    File,
}

impl From<ScopeArg> for ScopePolicy {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Namespace => ScopePolicy::Namespace,
            ScopeArg::File => ScopePolicy::File,
        }
    }
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

/// Output format for rewrite commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum RewriteFormat {
    /// Human-readable summary (default).
    #[default]
    Text,
    /// Full JSON response.
    Json,
    /// Unified diff of the changes.
    Diff,
}

/// Output format for the actions command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ActionsFormat {
    #[default]
    Text,
    Json,
}

/// Arguments shared by the rewrite commands.
#[derive(Args, Debug, Clone, Copy)]
struct RewriteArgs {
    /// Preview changes without writing them.
    #[arg(long)]
    dry_run: bool,
    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    format: RewriteFormat,
}

/// CLI subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Rewrite the using directive at a position.
    Directive {
        /// Location of the directive (file:line:col).
        #[arg(long)]
        at: String,
        #[command(flatten)]
        args: RewriteArgs,
    },
    /// Rewrite every using directive in one file.
    Document {
        /// Workspace-relative path of the file.
        path: String,
        #[command(flatten)]
        args: RewriteArgs,
    },
    /// Rewrite every file of one project.
    Project {
        /// Project name (default: the first project).
        name: Option<String>,
        #[command(flatten)]
        args: RewriteArgs,
    },
    /// Rewrite every file of every project.
    Solution {
        #[command(flatten)]
        args: RewriteArgs,
    },
    /// List the actions offered at a position.
    Actions {
        /// Location of the directive (file:line:col).
        #[arg(long)]
        at: String,
        #[arg(long, value_enum, default_value = "text")]
        format: ActionsFormat,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_format);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);

            // Errors go to stdout as JSON, like every other response.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, format: LogFormat) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), FqnError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| FqnError::internal(format!("failed to start runtime: {}", e)))?;
    runtime.block_on(execute_async(cli))
}

async fn execute_async(cli: Cli) -> Result<(), FqnError> {
    let workspace = open_workspace(&cli.global)?;
    let (scope, args) = match cli.command {
        Command::Directive { at, args } => (RewriteScope::Directive { at }, args),
        Command::Document { path, args } => (RewriteScope::Document { path }, args),
        Command::Project { name, args } => (RewriteScope::Project { name }, args),
        Command::Solution { args } => (RewriteScope::Solution, args),
        Command::Actions { at, format } => return execute_actions(&workspace, &at, format).await,
    };
    execute_rewrite(&workspace, &scope, args).await
}

// ============================================================================
// Command Executors
// ============================================================================

fn open_workspace(global: &GlobalArgs) -> Result<Workspace, FqnError> {
    let root = match &global.workspace {
        Some(root) => root.clone(),
        None => std::env::current_dir()
            .map_err(|e| FqnError::internal(format!("failed to get current directory: {}", e)))?,
    };
    let overrides = CliOverrides {
        scope: global.scope.map(ScopePolicy::from),
        rename_aliased: global.rename_aliased.then_some(true),
        reference_namespaces: global.references.clone(),
        exclude: Vec::new(),
    };
    Workspace::open(&root, &overrides)
}

/// Run a rewrite; Ctrl-C stops a project or solution fold between files.
async fn execute_rewrite(
    workspace: &Workspace,
    scope: &RewriteScope,
    args: RewriteArgs,
) -> Result<(), FqnError> {
    let cancel = CancellationToken::new();
    let interrupt = cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted; stopping after the current file");
            interrupt.cancel();
        }
    });

    let result = run_rewrite(workspace, scope, !args.dry_run, Some(&cancel)).await;
    watcher.abort();
    output_rewrite(&result?, args.format)
}

fn output_rewrite(response: &RewriteResponse, format: RewriteFormat) -> Result<(), FqnError> {
    let mut stdout = io::stdout();
    match format {
        RewriteFormat::Json => {
            emit_response(response, &mut stdout).map_err(|e| FqnError::internal(e.to_string()))?
        }
        RewriteFormat::Text => write!(stdout, "{}", format_summary(response))
            .map_err(|e| FqnError::internal(e.to_string()))?,
        RewriteFormat::Diff => write!(stdout, "{}", response.diff.as_deref().unwrap_or_default())
            .map_err(|e| FqnError::internal(e.to_string()))?,
    }
    let _ = stdout.flush();
    Ok(())
}

async fn execute_actions(
    workspace: &Workspace,
    at: &str,
    format: ActionsFormat,
) -> Result<(), FqnError> {
    let response = run_actions(workspace, at).await?;
    let mut stdout = io::stdout();
    match format {
        ActionsFormat::Json => {
            emit_response(&response, &mut stdout).map_err(|e| FqnError::internal(e.to_string()))?
        }
        ActionsFormat::Text => {
            if let Some(name) = &response.canonical_name {
                writeln!(stdout, "canonical: {}", name)
                    .map_err(|e| FqnError::internal(e.to_string()))?;
            }
            for action in &response.actions {
                writeln!(stdout, "{:<10} {}", action.kind, action.title)
                    .map_err(|e| FqnError::internal(e.to_string()))?;
            }
        }
    }
    let _ = stdout.flush();
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod cli_parsing {
        use super::*;

        #[test]
        fn rewrite_defaults_to_text_and_apply() {
            let cli = Cli::try_parse_from(["fqn", "document", "Program.cs"]).unwrap();
            match cli.command {
                Command::Document { path, args } => {
                    assert_eq!(path, "Program.cs");
                    assert!(!args.dry_run);
                    assert_eq!(args.format, RewriteFormat::Text);
                }
                _ => panic!("expected Document"),
            }
        }

        #[test]
        fn directive_requires_location() {
            assert!(Cli::try_parse_from(["fqn", "directive"]).is_err());
            let cli = Cli::try_parse_from([
                "fqn",
                "directive",
                "--at",
                "A.cs:3:11",
                "--dry-run",
                "--format",
                "diff",
            ])
            .unwrap();
            match cli.command {
                Command::Directive { at, args } => {
                    assert_eq!(at, "A.cs:3:11");
                    assert!(args.dry_run);
                    assert_eq!(args.format, RewriteFormat::Diff);
                }
                _ => panic!("expected Directive"),
            }
        }

        #[test]
        fn project_name_is_optional() {
            let cli = Cli::try_parse_from(["fqn", "project"]).unwrap();
            assert!(matches!(cli.command, Command::Project { name: None, .. }));
            let cli = Cli::try_parse_from(["fqn", "project", "App"]).unwrap();
            assert!(matches!(cli.command, Command::Project { name: Some(ref n), .. } if n == "App"));
        }

        #[test]
        fn global_flags_after_subcommand() {
            let cli = Cli::try_parse_from([
                "fqn",
                "solution",
                "--scope",
                "file",
                "--rename-aliased",
                "--reference",
                "Vendor.Sdk",
                "--reference",
                "Vendor.Sdk.Io",
                "--log-format",
                "json",
            ])
            .unwrap();
            assert_eq!(cli.global.scope, Some(ScopeArg::File));
            assert!(cli.global.rename_aliased);
            assert_eq!(cli.global.references, vec!["Vendor.Sdk", "Vendor.Sdk.Io"]);
            assert_eq!(cli.global.log_format, LogFormat::Json);
        }

        #[test]
        fn unknown_scope_is_rejected() {
            assert!(Cli::try_parse_from(["fqn", "solution", "--scope", "module"]).is_err());
        }
    }
}
