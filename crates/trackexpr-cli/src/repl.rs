//! Interactive session

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use trackexpr::sandbox;
use trackexpr::{Context, Engine, Value};

const PROMPT: &str = "trackexpr> ";

const HELP: &str = "\
Commands:
  :ast <expr>   print the parsed AST
  :vars         list caller bindings
  :help         show this message
  :quit         leave the session";

/// What a REPL line asks for.
#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Empty,
    Quit,
    Help,
    Vars,
    Ast(&'a str),
    Eval(&'a str),
    Unknown(&'a str),
}

fn classify(line: &str) -> Input<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix(':') else {
        return Input::Eval(line);
    };
    let (name, rest) = command.split_once(char::is_whitespace).unwrap_or((command, ""));
    match name {
        "q" | "quit" | "exit" => Input::Quit,
        "h" | "help" => Input::Help,
        "vars" => Input::Vars,
        "ast" => Input::Ast(rest.trim()),
        _ => Input::Unknown(name),
    }
}

/// Bindings the caller added or replaced. A default name bound to anything
/// other than its default value counts as replaced.
fn caller_bindings(context: &Context) -> Vec<(&String, &Value)> {
    let defaults = sandbox::defaults();
    context
        .iter()
        .filter(|(name, value)| {
            defaults
                .get(name.as_str())
                .map_or(true, |default| !default.same_value_zero(value))
        })
        .collect()
}

/// Run the read-eval-print loop until `:quit` or end of input.
pub fn run(engine: Engine, context: Context) -> Result<()> {
    let mut editor = DefaultEditor::new()?;
    println!("trackexpr {} (type :help for commands)", trackexpr::VERSION);

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        if !line.trim().is_empty() {
            editor.add_history_entry(line.as_str())?;
        }

        match classify(&line) {
            Input::Empty => {}
            Input::Quit => break,
            Input::Help => println!("{}", HELP),
            Input::Vars => {
                for (name, value) in caller_bindings(&context) {
                    println!("{} = {:?}", name, value);
                }
            }
            Input::Ast(source) => match engine.parse(source) {
                Ok(node) => println!("{}\n{:#?}", node, node),
                Err(e) => eprintln!("error: {}", e),
            },
            Input::Eval(source) => match engine.evaluate(source, &context) {
                Ok(value) => println!("{:?}", value),
                Err(e) => eprintln!("error: {}", e),
            },
            Input::Unknown(name) => eprintln!("unknown command :{} (try :help)", name),
        }
    }
    Ok(())
}
