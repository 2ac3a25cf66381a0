use clap::{
    crate_authors, crate_description, crate_name, crate_version, Arg, ArgAction, ArgMatches,
    Command,
};
use colored::Colorize;
use sprout::{
    errors::{FileOperation, IoError},
    fs::StdFs,
    preview::{format_step, preview_as_tree, render_table},
    prompt, workspace, Options, SproutError,
};
use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::{Path, PathBuf},
};

fn input_arg() -> Arg {
    Arg::new("input").help("File holding the tree text. Use '-' for stdin; omit to open an editor")
}

fn destination_arg() -> Arg {
    Arg::new("destination")
        .short('d')
        .long("destination")
        .help("Directory to create the structure in; defaults to the enclosing git working tree")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .short('c')
        .long("config")
        .help("Classification config to use instead of <destination>/sprout.toml")
}

// The CLI layer should only parse inputs and forward them to library code.
fn main() -> miette::Result<()> {
    let matches = Command::new(crate_name!())
        .about(crate_description!())
        .author(crate_authors!())
        .version(crate_version!())
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .subcommand_required(true)
        .subcommand(
            Command::new("create")
                .about("Creates the folders and files described by a tree")
                .arg(input_arg())
                .arg(destination_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Skip the confirmation prompt")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("preview")
                .about("Shows how a tree will be parsed without creating anything")
                .arg(input_arg())
                .arg(destination_arg())
                .arg(config_arg()),
        )
        .get_matches();

    init_logger(matches.get_flag("verbose"));

    match matches.subcommand() {
        Some(("create", args)) => handle_create(args)?,
        Some(("preview", args)) => handle_preview(args)?,
        _ => unreachable!(),
    }

    Ok(())
}

fn init_logger(is_verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if is_verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }

    builder.init();
}

fn options(args: &ArgMatches) -> Options {
    Options {
        config: args.get_one::<String>("config").map(PathBuf::from),
    }
}

fn read_stdin() -> Result<String, SproutError> {
    let mut text = String::new();

    io::stdin()
        .read_to_string(&mut text)
        .map_err(|error| IoError::new(FileOperation::ReadInput, PathBuf::from("<stdin>"), error))?;

    Ok(text)
}

fn read_input(args: &ArgMatches) -> Result<String, SproutError> {
    match args.get_one::<String>("input").map(String::as_str) {
        Some("-") => read_stdin(),
        Some(path) => fs::read_to_string(path).map_err(|error| {
            SproutError::from(IoError::new(FileOperation::ReadInput, PathBuf::from(path), error))
        }),
        None if io::stdin().is_terminal() => Ok(prompt::read_from_editor()?),
        None => read_stdin(),
    }
}

fn destination(args: &ArgMatches) -> Result<Option<PathBuf>, SproutError> {
    let cwd = std::env::current_dir()
        .map_err(|error| IoError::new(FileOperation::ResolveWorkspace, PathBuf::from("."), error))?;

    let explicit = args.get_one::<String>("destination").map(Path::new);

    Ok(workspace::resolve_destination(explicit, &cwd))
}

fn handle_create(args: &ArgMatches) -> Result<(), SproutError> {
    // no destination means no work at all, not even reading the input
    let destination = destination(args)?.ok_or(SproutError::NoDestination)?;

    let text = read_input(args)?;

    let plan = sprout::prepare(&text, Some(&destination), &options(args))?;

    preview_as_tree(&plan.entries, &plan.destination);

    if !args.get_flag("yes") && !prompt::confirm_apply()? {
        println!("{}", "Canceled, nothing was created".yellow());
        return Ok(());
    }

    let created = plan.apply_with(&StdFs, |step| println!("{}", format_step(step)))?;

    println!(
        "\n{} Folder structure created in {}",
        "✔".bold().green(),
        created.destination.display()
    );

    Ok(())
}

fn handle_preview(args: &ArgMatches) -> Result<(), SproutError> {
    // previewing works without a workspace; it only loses the workspace config
    let destination = destination(args)?;

    let text = read_input(args)?;

    let entries = sprout::preview_structure(&text, destination.as_deref(), &options(args))?;

    preview_as_tree(&entries, destination.as_deref().unwrap_or(Path::new(".")));

    print!("{}", render_table(&entries));

    Ok(())
}
