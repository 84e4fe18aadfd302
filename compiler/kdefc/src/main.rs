//! kdefc CLI

use kdef_load::{DefinitionOutcome, Files};
use kdefc::commands::{explain_error, load_file, new_sink, prove_file, report};
use kdefc::{init_tracing, parse_load_options, parse_prove_options};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "load" => {
            let options = parse_load_options(&args[2..]).unwrap_or_else(|err| usage_error(&err));
            init_tracing(options.global.verbose);
            let files = Files::from_env();
            let mut sink = new_sink(&options.global);
            let result = load_file(&options, &files, &mut sink);
            report(&sink, options.global.color);
            match result {
                Ok(DefinitionOutcome::Preprocessed(text)) => println!("{text}"),
                Ok(DefinitionOutcome::Definition(definition)) => {
                    println!(
                        "OK: {} modules, main module {}",
                        definition.modules().len(),
                        definition.main_module().name()
                    );
                }
                Err(_) => std::process::exit(1),
            }
        }
        "prove" => {
            let options = parse_prove_options(&args[2..]).unwrap_or_else(|err| usage_error(&err));
            init_tracing(options.global.verbose);
            let files = Files::from_env();
            let mut sink = new_sink(&options.global);
            let result = prove_file(&options, &files, &mut sink);
            report(&sink, options.global.color);
            match result {
                Ok(request) => print!("{request}"),
                Err(_) => std::process::exit(1),
            }
        }
        "--explain" | "explain" => {
            if args.len() < 3 {
                eprintln!("Usage: kdefc explain <CODE>");
                eprintln!("Example: kdefc explain E3001");
                std::process::exit(1);
            }
            match explain_error(&args[2]) {
                Ok(text) => println!("{text}"),
                Err(err) => {
                    eprintln!("{err}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" => {
            println!("kdefc {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("error: {message}");
    eprintln!("Run `kdefc help` for usage.");
    std::process::exit(1);
}

fn print_usage() {
    println!("kdefc: load and check K definitions");
    println!();
    println!("Usage: kdefc <command> [options]");
    println!();
    println!("Commands:");
    println!("  load <file>          Load a definition, check its klabels, report");
    println!("  prove <spec-file>    Load and check a spec for a prover");
    println!("  explain <code>       Explain a diagnostic code (e.g., E3001)");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Definition options:");
    println!("  -I <dir>                 Add a lookup directory for requires");
    println!("  --main-module <name>     Main module (default: file name, upper-cased)");
    println!("  --syntax-module <name>   Main syntax module (default: <main>-SYNTAX)");
    println!("  --md-selector <expr>     Markdown block selector (default: k)");
    println!("  --no-prelude             Do not import the prelude");
    println!("  --kore                   Require globally unique symbols");
    println!("  --preprocess             Print the raw definition instead of loading it");
    println!("  --left-assoc             Default binary productions to left associativity");
    println!();
    println!("Prove options:");
    println!("  --spec-module, -sm <name>      Module containing the claims");
    println!("  --def-module, -m <name>        Module the proof runs under");
    println!("  --save-proof-definition-to <dir>");
    println!("                                 Save the definition to <dir>/proof-spec-kompiled");
    println!("  --depth <n>                    Maximum number of steps");
    println!("  --boundary-cells <a,b>         Cells marking the evaluation boundary");
    println!("  --concrete-rules <r1,r2>       Extra rule labels treated as concrete");
    println!("  --debugger                     Launch the prover's debugger");
    println!("  --debug-script <file>          Script run when the debugger starts");
    println!();
    println!("General options:");
    println!("  --debug              Save extracted markdown under the temp directory");
    println!("  --verbose, -v        Log every imported file");
    println!("  -Werror              Treat warnings as errors");
    println!("  --color=<mode>       auto, always, never");
    println!();
    println!("Environment:");
    println!("  KDEF_INCLUDE         Include directory holding builtin/ (prelude.md)");
    println!("  RUST_LOG             Enable tracing output (e.g., kdef_load=debug)");
}
