//! Quill Language CLI
//!
//! Command-line interface for the Quill programming language.

use std::env;
use std::fs;
use std::io::{self, Write};
use std::process;

use tracing::{debug, Level};

use quill_lang::{check, AnalyzerOptions, Diagnostic, Lexer, Program, VERSION};

/// Settings collected from the command line
#[derive(Debug, Default)]
struct Options {
    show_tokens: bool,
    show_ast: bool,
    show_help: bool,
    show_version: bool,
    no_color: bool,
    verbosity: u8,
    analyzer: AnalyzerOptions,
    filename: Option<String>,
}

fn main() {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(flag) => {
            eprintln!("Unknown flag: {}", flag);
            print_usage();
            process::exit(1);
        }
    };

    if options.show_help {
        print_help();
        return;
    }

    if options.show_version {
        println!("quill {}", VERSION);
        return;
    }

    init_logging(options.verbosity);

    if options.no_color {
        colored::control::set_override(false);
    }

    let Some(ref file) = options.filename else {
        println!("Quill v{} - Language Checker", VERSION);
        println!("Type 'exit' to quit\n");
        repl(&options);
        return;
    };

    let result = if options.show_tokens {
        show_file_tokens(file)
    } else {
        check_file(file, &options)
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

/// Parse flags; returns the offending flag if one is unknown
fn parse_args(args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();

    for arg in args {
        match arg.as_str() {
            "--tokens" | "-t" => options.show_tokens = true,
            "--ast" | "-a" => options.show_ast = true,
            "--strict" | "-s" => options.analyzer.strict_initialization = true,
            "--no-color" => options.no_color = true,
            "--verbose" | "-v" => options.verbosity = options.verbosity.saturating_add(1),
            "-vv" => options.verbosity = options.verbosity.saturating_add(2),
            "--help" | "-h" => options.show_help = true,
            "--version" | "-V" => options.show_version = true,
            _ if arg.starts_with('-') => return Err(arg),
            _ => options.filename = Some(arg),
        }
    }

    Ok(options)
}

/// Send logs to stderr so they never mix with program output
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .with_level(true)
        .init();
}

fn print_usage() {
    eprintln!("Usage: quill [OPTIONS] [script]");
    eprintln!("       quill --help");
}

fn print_help() {
    println!("Quill v{} - A small teaching language", VERSION);
    println!();
    println!("USAGE:");
    println!("    quill [OPTIONS] [script]");
    println!();
    println!("OPTIONS:");
    println!("    -t, --tokens    Show tokenization output (lexer only)");
    println!("    -a, --ast       Print the syntax tree after parsing");
    println!("    -s, --strict    Treat uninitialized reads as errors");
    println!("        --no-color  Disable colored diagnostics");
    println!("    -v, --verbose   Log progress to stderr (repeat for more)");
    println!("    -h, --help      Show this help message");
    println!("    -V, --version   Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    quill script.ql           Check a Quill script");
    println!("    quill --ast script.ql     Check and print the syntax tree");
    println!("    quill --tokens script.ql  Show tokens from lexer");
    println!("    quill                     Start interactive prompt");
}

/// Check a script file. Returns whether it was free of errors.
fn check_file(filename: &str, options: &Options) -> Result<bool, String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{}': {}", filename, e))?;

    debug!(file = filename, bytes = source.len(), "checking script");
    let valid = check_source(&source, Some(filename), options);
    if valid {
        println!("No errors found.");
    }
    Ok(valid)
}

/// Parse and analyze `source`, printing the tree and every diagnostic
fn check_source(source: &str, filename: Option<&str>, options: &Options) -> bool {
    let analysis = match check(source, filename, options.analyzer) {
        Ok(analysis) => analysis,
        Err(error) => {
            eprint!("{}", Diagnostic::with_source(error, source));
            return false;
        }
    };

    if options.show_ast {
        print_ast(&analysis.program);
    }

    for diagnostic in &analysis.diagnostics {
        let rendered = Diagnostic::with_source(diagnostic.to_error(), source)
            .severity(diagnostic.severity);
        eprint!("{}", rendered);
    }

    analysis.is_valid()
}

fn print_ast(program: &Program) {
    println!("{}", "=".repeat(60));
    print!("{}", program);
    println!("{}", "=".repeat(60));
}

/// Show tokens from lexing a file
fn show_file_tokens(filename: &str) -> Result<bool, String> {
    let source = fs::read_to_string(filename)
        .map_err(|e| format!("Failed to read file '{}': {}", filename, e))?;

    let tokens = Lexer::new(&source, Some(filename)).tokenize();

    println!("Tokens for '{}':", filename);
    println!("{}", "=".repeat(60));

    for (i, token) in tokens.iter().enumerate() {
        println!(
            "{:4}: {:28} | {:?} ({}:{})",
            i,
            token.token_type.to_string(),
            token.lexeme,
            token.location.line,
            token.location.column
        );
    }

    println!("{}", "=".repeat(60));
    println!("Total tokens: {}", tokens.len());

    Ok(!tokens.iter().any(|token| token.error().is_some()))
}

/// Start an interactive prompt; every line is checked on its own
fn repl(options: &Options) {
    let mut line_number = 1;

    loop {
        print!("quill:{} > ", line_number);
        if let Err(e) = io::stdout().flush() {
            eprintln!("Error writing prompt: {}", e);
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break, // EOF
            Ok(_) => {
                let input = input.trim();

                if input == "exit" || input == "quit" {
                    break;
                }

                if input.is_empty() {
                    continue;
                }

                if check_source(input, Some("<repl>"), options) {
                    println!("ok");
                }

                line_number += 1;
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    println!("\nGoodbye!");
}
