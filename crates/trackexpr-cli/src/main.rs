//! trackexpr CLI
//!
//! Evaluate a single expression or start a REPL, optionally against a
//! JSON context file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trackexpr::{Context, Engine, EngineConfig, Value};

mod repl;

/// Evaluate tracking expressions
#[derive(Parser, Debug)]
#[command(name = "trackexpr")]
#[command(about = "Evaluate tracking data-path expressions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate one expression and print the result
    Eval {
        /// The expression to evaluate
        expr: String,

        #[command(flatten)]
        context: ContextArgs,

        /// Print the parsed AST instead of evaluating
        #[arg(long)]
        ast: bool,

        /// Print the expression text instead of failing
        #[arg(long)]
        fallback: bool,
    },

    /// Start an interactive session
    Repl {
        #[command(flatten)]
        context: ContextArgs,
    },
}

/// Options shared by every subcommand that evaluates.
#[derive(Args, Debug)]
struct ContextArgs {
    /// JSON file whose top-level fields become bindings
    #[arg(short, long, value_name = "FILE")]
    context: Option<PathBuf>,

    /// Extra binding as NAME=JSON (can be repeated); non-JSON is a string
    #[arg(long = "set", value_name = "NAME=JSON")]
    set: Vec<String>,

    /// Enable typeof, void, delete, in and instanceof
    #[arg(long)]
    keyword_operators: bool,
}

impl ContextArgs {
    fn engine(&self) -> Engine {
        Engine::with_config(EngineConfig {
            keyword_operators: self.keyword_operators,
            ..EngineConfig::default()
        })
    }

    fn build_context(&self) -> Result<Context> {
        let mut context = match &self.context {
            Some(path) => load_context(path)?,
            None => Context::new(),
        };
        for binding in &self.set {
            let (name, value) = parse_binding(binding)?;
            context.insert(name, value);
        }
        Ok(context)
    }
}

fn load_context(path: &Path) -> Result<Context> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read context file {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("context file {} is not valid JSON", path.display()))?;
    if !json.is_object() {
        bail!("context file {} must hold a JSON object", path.display());
    }
    Ok(Context::from_json(&json))
}

fn parse_binding(binding: &str) -> Result<(String, Value)> {
    let Some((name, raw)) = binding.split_once('=') else {
        bail!("binding '{}' must look like NAME=JSON", binding);
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("binding '{}' has an empty name", binding);
    }
    let value = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(json) => Value::from_json(&json),
        Err(_) => Value::string(raw),
    };
    Ok((name.to_string(), value))
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();
    tracing::debug!("trackexpr v{}", trackexpr::VERSION);

    match cli.command {
        Command::Eval {
            expr,
            context,
            ast,
            fallback,
        } => {
            let engine = context.engine();
            if ast {
                let node = engine.parse(&expr).context("failed to parse expression")?;
                println!("{}", node);
                println!("{:#?}", node);
                return Ok(());
            }
            let ctx = context.build_context()?;
            let value = if fallback {
                engine.evaluate_or_source(&expr, &ctx)
            } else {
                engine
                    .evaluate(&expr, &ctx)
                    .context("failed to evaluate expression")?
            };
            println!("{:?}", value);
            Ok(())
        }
        Command::Repl { context } => {
            let engine = context.engine();
            let ctx = context.build_context()?;
            repl::run(engine, ctx)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_binding_json() {
        let (name, value) = parse_binding("n=[1,2]").unwrap();
        assert_eq!(name, "n");
        assert_eq!(value.get_member("length"), Value::Number(2.0));
    }

    #[test]
    fn test_parse_binding_plain_string() {
        let (_, value) = parse_binding("s=hello").unwrap();
        assert_eq!(value, Value::string("hello"));
    }

    #[test]
    fn test_parse_binding_rejects_missing_equals() {
        assert!(parse_binding("novalue").is_err());
        assert!(parse_binding("=1").is_err());
    }

    #[test]
    fn test_cli_parses_eval() {
        let cli = Cli::try_parse_from(["trackexpr", "eval", "1+1", "--set", "a=1", "--ast"]).unwrap();
        match cli.command {
            Command::Eval { expr, context, ast, .. } => {
                assert_eq!(expr, "1+1");
                assert_eq!(context.set, vec!["a=1".to_string()]);
                assert!(ast);
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
