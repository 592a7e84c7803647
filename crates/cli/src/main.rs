use anyhow::{Context, Result};
use bosun_argparse::{Cli, Command, CommandGroup, EnvVar, FlagDef, OptionDef, Settings};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    // a missing .env file is fine
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut cli = build_cli().context("invalid command line definition")?;
    let Some(params) = cli.parse_or_exit() else {
        return Ok(());
    };

    tracing::debug!(verbose = ?params.get_int("verbose"), "arguments parsed");
    let json = serde_json::to_string_pretty(&params).context("failed to serialize parsed params")?;
    println!("{json}");
    Ok(())
}

fn build_cli() -> bosun_argparse::ParseResult<Cli> {
    let settings = Settings {
        script_name: Some("bosun".to_string()),
        description: "Push, pull and manage remotes. Prints the parsed arguments as JSON.".to_string(),
        ..Settings::default()
    };

    let push = Command::builder("push")
        .description("Push local commits to a remote")
        .element(
            OptionDef::builder("branch")
                .description("Branch to push")
                .short("-b")
                .long("--branch")
                .default_value("main")
                .build()?,
        )
        .element(
            FlagDef::builder("tags")
                .description("Push tags as well")
                .long("--tags")
                .build()?,
        )
        .callback(|ctx, command| {
            tracing::info!(
                command = command.name(),
                branch = ?ctx.params().get_str("branch"),
                "push selected"
            );
        })
        .build()?;

    let pull = Command::builder("pull")
        .description("Fetch from a remote and integrate")
        .element(
            FlagDef::builder("rebase")
                .description("Rebase instead of merging")
                .long("--rebase")
                .build()?,
        )
        .build()?;

    let remote = Command::builder("remote")
        .description("Manage remotes")
        .element(
            CommandGroup::builder("action")
                .description("What to do with the remote")
                .command(Command::builder("add").description("Add a remote").build()?)
                .command(Command::builder("remove").description("Remove a remote").build()?)
                .required(true)
                .build()?,
        )
        .element(
            OptionDef::builder("name")
                .description("Name of the remote")
                .short("-n")
                .long("--name")
                .build()?,
        )
        .element(
            OptionDef::builder("urls")
                .description("Fetch and push URLs")
                .long("--urls")
                .arity("+".parse()?)
                .required(false)
                .build()?,
        )
        .build()?;

    Ok(Cli::with_settings(settings)
        .command_group(
            CommandGroup::builder("cmd")
                .description("What to do")
                .commands([push, pull, remote])
                .required(true)
                .build()?,
        )
        .flag(
            FlagDef::builder("force")
                .description("Force the command to execute")
                .short("-f")
                .long("--force")
                .build()?,
        )
        .option(
            OptionDef::builder("remote")
                .description("The remote to talk to")
                .short("-r")
                .long("--remote")
                .default_value("origin")
                .build()?,
        )
        .option(
            OptionDef::builder("depth")
                .description("Limit history to this many commits")
                .long("--depth")
                .kind("int")
                .required(false)
                .build()?,
        )
        .env_var(
            EnvVar::builder("BOSUN_TOKEN")
                .description("Token sent to the remote")
                .required(false)
                .build()?,
        ))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
