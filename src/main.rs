//! The `tagsmith` binary.

use clap::{Args, Parser, Subcommand};
use std::error::Error;
use std::ffi::OsString;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use tagsmith::{AttributeMap, AttributeValue, IfExists};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_PARSE_CONFIG: i32 = 2;
const EXIT_READ_INPUT: i32 = 3;

#[derive(Debug, Parser)]
#[command(about, author, version)]
#[command(after_help = "\
By default, tagsmith reads extra command-line options from the config file given by \
--config-file.  Pass --config-file none to disable this.  A missing config file is not \
an error.")]
struct Cli {
    /// Path to config file containing command-line arguments, or 'none'
    #[arg(short, long, value_name = "PATH", default_value = get_default_config_path())]
    config_file: String,

    /// Namespace class names as well as ids
    #[arg(long, global = true)]
    classes: bool,

    /// What to do when the tag already has a child like the inserted one
    #[arg(long, global = true, value_name = "POLICY")]
    if_exists: Option<IfExists>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the tree of the first tag in the input
    Parse {
        /// Where to start looking for a tag
        #[arg(long, default_value_t = 0)]
        offset: usize,

        #[command(flatten)]
        input: Input,
    },

    /// Encode the opening tags of unclosed elements as text
    Repair {
        #[command(flatten)]
        input: Input,
    },

    /// Namespace ids, input names and the references to them
    Namespace {
        /// The namespace to apply
        #[arg(long, value_name = "NS")]
        ns: String,

        /// Only namespace input names
        #[arg(long, conflicts_with = "attributes_only")]
        inputs_only: bool,

        /// Only namespace ids, their references and classes
        #[arg(long)]
        attributes_only: bool,

        #[command(flatten)]
        input: Input,
    },

    /// Insert HTML at the end of the first tag's body
    Append(Insertion),

    /// Insert HTML at the start of the first tag's body
    Prepend(Insertion),

    /// Merge attributes into the first tag
    Modify {
        /// An attribute to set; `true` and `false` set or remove a boolean
        /// attribute
        #[arg(long = "attr", value_name = "NAME=VALUE", value_parser = parse_attribute, required = true)]
        attributes: Vec<(String, AttributeValue)>,

        #[command(flatten)]
        input: Input,
    },
}

#[derive(Debug, Args)]
struct Insertion {
    /// The HTML to insert
    #[arg(long, value_name = "HTML")]
    html: String,

    #[command(flatten)]
    input: Input,
}

#[derive(Debug, Args)]
struct Input {
    /// HTML file to read; or standard input if none passed
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,
}

impl Input {
    fn read(&self) -> io::Result<String> {
        match &self.file {
            Some(path) => fs::read_to_string(path),
            None => {
                let mut s = String::with_capacity(2048);
                io::stdin().read_to_string(&mut s)?;
                Ok(s)
            }
        }
    }
}

fn parse_attribute(s: &str) -> Result<(String, AttributeValue), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {:?}", s))?;
    if name.is_empty() {
        return Err(format!("missing attribute name in {:?}", s));
    }
    let value = match value {
        "true" => AttributeValue::Boolean(true),
        "false" => AttributeValue::Boolean(false),
        _ => AttributeValue::Scalar(value.to_string()),
    };
    Ok((name.to_string(), value))
}

#[cfg(all(not(windows), not(target_arch = "wasm32")))]
fn get_default_config_path() -> String {
    if let Ok(xdg_dirs) = xdg::BaseDirectories::with_prefix("tagsmith") {
        if let Some(path) = xdg_dirs.find_config_file("config") {
            if let Some(path_str) = path.to_str() {
                return path_str.into();
            }
        }
    }

    "none".into()
}

#[cfg(any(windows, target_arch = "wasm32"))]
fn get_default_config_path() -> String {
    "none".into()
}

fn main() -> Result<(), Box<dyn Error>> {
    let default_config_path = get_default_config_path();
    let mut args = std::env::args_os().collect::<Vec<_>>();
    let cli = Cli::parse_from(&args);

    if cli.config_file != "none" {
        match fs::read_to_string(&cli.config_file) {
            Ok(config) => {
                let extra = match shell_words::split(&config) {
                    Ok(extra) => extra,
                    Err(e) => {
                        eprintln!("failed to parse {}: {}", cli.config_file, e);
                        process::exit(EXIT_PARSE_CONFIG);
                    }
                };
                args.splice(1..1, extra.into_iter().map(OsString::from));
            }
            Err(e) if cli.config_file != default_config_path => {
                eprintln!("failed to read {}: {}", cli.config_file, e);
                process::exit(EXIT_PARSE_CONFIG);
            }
            Err(_) => (),
        }
    }

    let cli = Cli::parse_from(args);

    let output = match run(&cli) {
        Ok(output) => output,
        Err(Failure::Input(e)) => {
            eprintln!("failed to read input: {}", e);
            process::exit(EXIT_READ_INPUT);
        }
        Err(Failure::Html(e)) => {
            eprintln!("{}", e);
            process::exit(EXIT_FAILURE);
        }
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;

    process::exit(EXIT_SUCCESS);
}

enum Failure {
    Input(io::Error),
    Html(Box<dyn Error>),
}

impl From<io::Error> for Failure {
    fn from(e: io::Error) -> Self {
        Failure::Input(e)
    }
}

impl From<tagsmith::ParseError> for Failure {
    fn from(e: tagsmith::ParseError) -> Self {
        Failure::Html(e.into())
    }
}

impl From<tagsmith::MutationError> for Failure {
    fn from(e: tagsmith::MutationError) -> Self {
        Failure::Html(e.into())
    }
}

fn run(cli: &Cli) -> Result<String, Failure> {
    Ok(match &cli.command {
        Command::Parse { offset, input } => {
            let html = input.read()?;
            format!("{}", tagsmith::parse_tag(&html, *offset)?)
        }
        Command::Repair { input } => tagsmith::encode_invalid_tags(&input.read()?)?,
        Command::Namespace {
            ns,
            inputs_only,
            attributes_only,
            input,
        } => {
            let html = input.read()?;
            if *inputs_only {
                tagsmith::namespace_inputs(&html, ns)
            } else if *attributes_only {
                tagsmith::namespace_attributes(&html, ns, cli.classes)
            } else {
                tagsmith::namespace_html(&html, ns, cli.classes)
            }
        }
        Command::Append(insertion) => {
            let tag = insertion.input.read()?;
            tagsmith::append_to_tag(&tag, &insertion.html, cli.if_exists)?
        }
        Command::Prepend(insertion) => {
            let tag = insertion.input.read()?;
            tagsmith::prepend_to_tag(&tag, &insertion.html, cli.if_exists)?
        }
        Command::Modify { attributes, input } => {
            let tag = input.read()?;
            let attributes = attributes.iter().cloned().collect::<AttributeMap>();
            tagsmith::modify_tag_attributes(&tag, attributes)?
        }
    })
}
