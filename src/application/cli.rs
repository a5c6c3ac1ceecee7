#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::env;
use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use owo_colors::OwoColorize;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::BackendName;
use crate::domain::services::actions::help_text;
use crate::domain::services::load_image_file;
use crate::domain::services::orchestrator;
use crate::domain::services::Downloads;
use crate::domain::services::ImageIntake;
use crate::infrastructure::backends::BackendManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

fn log_dir_from(override_dir: Option<String>) -> path::PathBuf {
    match override_dir {
        Some(dir) if !dir.is_empty() => return path::PathBuf::from(dir),
        _ => return dirs::cache_dir().unwrap_or_default().join("lumina"),
    }
}

/// Debug log directory, `LUMINA_LOG_DIR` when set.
pub fn log_dir() -> path::PathBuf {
    return log_dir_from(env::var("LUMINA_LOG_DIR").ok());
}

pub fn log_path() -> path::PathBuf {
    return log_dir().join("debug.log");
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!(
        "Created default config file at {}",
        config_file_path.to_string_lossy()
    );
    return Ok(());
}

/// Runs a single edit without the TUI and writes the result to disk.
async fn edit_headless(edit_matches: &ArgMatches) -> Result<()> {
    let paths = edit_matches
        .get_many::<String>("image")
        .map(|vals| return vals.map(path::PathBuf::from).collect::<Vec<_>>())
        .unwrap_or_default();
    let prompt = edit_matches
        .get_one::<String>("prompt")
        .map(|e| return e.to_string())
        .unwrap_or_default();
    let output = edit_matches
        .get_one::<String>("output")
        .map(path::PathBuf::from);

    let mut files = vec![];
    for path in paths.iter() {
        files.push(load_image_file(path).await?);
    }

    let intake = ImageIntake::new(Config::get(ConfigKey::MaxImages).parse::<usize>()?);
    let images = intake.add_images(files, &[]).unwrap_or_default();
    if images.len() < paths.len() {
        eprintln!(
            "{}",
            format!(
                "Using {} of {} files. Non-image files and files past the limit of {} are skipped.",
                images.len(),
                paths.len(),
                intake.max_images()
            )
            .yellow()
        );
    }

    let backend_name = match BackendName::parse(Config::get(ConfigKey::Backend)) {
        Some(name) => name,
        None => bail!("Unknown backend {}", Config::get(ConfigKey::Backend)),
    };
    let backend = BackendManager::get(backend_name)?;
    let model = Config::get(ConfigKey::Model);

    let result =
        match orchestrator::generate_edit(backend.as_ref(), &model, &prompt, &images).await {
            Ok(result) => result,
            Err(err) => bail!(err),
        };

    let file_path = Downloads::default().save(&result, output).await?;
    println!("{}", file_path.to_string_lossy());

    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_debug() -> Command {
    let mut cmd = Command::new("debug");
    cmd = cmd.about("Debug helpers for Lumina")
        .hide(true)
        .subcommand(
            Command::new("log-path").about("Output path to debug log file generated when running Lumina with environment variable RUST_LOG=lumina")
        )
        .subcommand(
            Command::new("enum-config").about("List all config keys as strings.")
        );

    return cmd;
}

fn subcommand_edit() -> Command {
    return Command::new("edit")
        .about("Edit images without starting the interface. Prints the path of the saved result.")
        .arg(
            Arg::new("image")
                .short('i')
                .long("image")
                .help("Source image to edit. Repeat to combine up to the image limit.")
                .action(ArgAction::Append)
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("prompt")
                .short('p')
                .long("prompt")
                .help("Natural language description of the edit.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .help("File path to write the result to. Defaults to a timestamped file in the output directory.")
                .num_args(1),
        );
}

fn arg_backend() -> Arg {
    return Arg::new(ConfigKey::Backend.to_string())
        .short('b')
        .long(ConfigKey::Backend.to_string())
        .env("LUMINA_BACKEND")
        .num_args(1)
        .help(format!(
            "The backend hosting the image model. [default: {}]",
            Config::default(ConfigKey::Backend)
        ))
        .value_parser(PossibleValuesParser::new(BackendName::VARIANTS))
        .global(true);
}

fn arg_model() -> Arg {
    return Arg::new(ConfigKey::Model.to_string())
        .short('m')
        .long(ConfigKey::Model.to_string())
        .env("LUMINA_MODEL")
        .num_args(1)
        .help(format!(
            "The image model used for edits. [default: {}]",
            Config::default(ConfigKey::Model)
        ))
        .global(true);
}

pub fn build() -> Command {
    let commands_text = help_text()
        .split('\n')
        .map(|line| {
            if line.starts_with('-') {
                return format!("  {line}");
            }
            if line.starts_with("COMMANDS:") || line.starts_with("HOTKEYS:") {
                return format!("EDITOR {line}").underline().bold().to_string();
            }
            return line.to_string();
        })
        .collect::<Vec<String>>()
        .join("\n");

    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    return Command::new("lumina")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_debug())
        .subcommand(subcommand_edit())
        .arg(arg_backend())
        .arg(arg_model())
        .arg(
            Arg::new(ConfigKey::BackendHealthCheckTimeout.to_string())
                .long(ConfigKey::BackendHealthCheckTimeout.to_string())
                .env("LUMINA_BACKEND_HEALTH_CHECK_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before timing out when doing a healthcheck for a backend. [default: {}]", Config::default(ConfigKey::BackendHealthCheckTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("LUMINA_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::GeminiURL.to_string())
                .long(ConfigKey::GeminiURL.to_string())
                .env("LUMINA_GEMINI_URL")
                .num_args(1)
                .help(format!("Gemini API URL. Can be swapped to a compatible proxy. [default: {}]", Config::default(ConfigKey::GeminiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::GeminiToken.to_string())
                .long(ConfigKey::GeminiToken.to_string())
                .env("LUMINA_GEMINI_TOKEN")
                .num_args(1)
                .help("Google Gemini API token.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::MaxImages.to_string())
                .long(ConfigKey::MaxImages.to_string())
                .env("LUMINA_MAX_IMAGES")
                .num_args(1)
                .help(format!("Maximum number of source images sent with an edit. [default: {}]", Config::default(ConfigKey::MaxImages)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::OutputDir.to_string())
                .long(ConfigKey::OutputDir.to_string())
                .env("LUMINA_OUTPUT_DIR")
                .num_args(1)
                .help("Directory saved results are written to. Defaults to the downloads directory, or the current directory when there is none.")
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("LUMINA_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before an edit request to the backend times out. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        );
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("debug", debug_matches)) => {
            match debug_matches.subcommand() {
                Some(("log-path", _)) => {
                    println!("{}", log_path().to_string_lossy());
                }
                Some(("enum-config", _)) => {
                    let res = ConfigKey::VARIANTS.join("\n");
                    println!("{}", res);
                }
                _ => {
                    subcommand_debug().print_long_help()?;
                }
            }

            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("edit", edit_matches)) => {
            Config::load(build(), vec![&matches, edit_matches]).await?;
            edit_headless(edit_matches).await?;
            return Ok(false);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
