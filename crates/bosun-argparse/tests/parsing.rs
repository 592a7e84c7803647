use std::sync::{Arc, Mutex};

use bosun_argparse::{
    Arity, Cli, Command, CommandGroup, FlagDef, OptionDef, ParseError, ParseOutcome, Params, Value,
};

fn push_pull(required: bool) -> CommandGroup {
    CommandGroup::builder("cmd")
        .description("The primary command group")
        .command(
            Command::builder("push")
                .description("Push up to the remote")
                .build()
                .unwrap(),
        )
        .command(
            Command::builder("pull")
                .description("Pull from the upstream")
                .build()
                .unwrap(),
        )
        .required(required)
        .build()
        .unwrap()
}

fn git(required_remote: bool) -> Cli {
    Cli::new()
        .command_group(push_pull(true))
        .flag(
            FlagDef::builder("force")
                .description("Force the command to execute")
                .short("-f")
                .long("--force")
                .build()
                .unwrap(),
        )
        .option(
            OptionDef::builder("remote")
                .description("The remote repo to push to")
                .short("-r")
                .long("--remote")
                .required(required_remote)
                .build()
                .unwrap(),
        )
}

fn params(cli: &mut Cli, args: &[&str]) -> Params {
    match cli.parse_args(args.iter().copied()) {
        Ok(ParseOutcome::Params(params)) => params,
        Ok(ParseOutcome::Help(text)) => panic!("unexpected help for {args:?}:\n{text}"),
        Err(err) => panic!("unexpected error for {args:?}: {err}"),
    }
}

fn error(cli: &mut Cli, args: &[&str]) -> ParseError {
    match cli.parse_args(args.iter().copied()) {
        Err(err) => err,
        Ok(outcome) => panic!("expected an error for {args:?}, got {outcome:?}"),
    }
}

fn test_option(arity: Arity) -> Cli {
    Cli::new().option(
        OptionDef::builder("test1")
            .short("-t")
            .long("--test1")
            .arity(arity)
            .build()
            .unwrap(),
    )
}

#[test]
fn git_style_push() {
    let mut cli = git(true);
    let p = params(&mut cli, &["push", "-f", "-r", "origin"]);
    assert_eq!(p.get_str("cmd"), Some("push"));
    assert_eq!(p.get("force"), Some(&Value::Bool(true)));
    assert_eq!(p.get_str("remote"), Some("origin"));
}

#[test]
fn reparse_does_not_leak_state() {
    let mut cli = git(false);
    let first = params(&mut cli, &["push", "-f", "-r", "origin"]);
    assert!(first.is_set("force"));

    let second = params(&mut cli, &["pull"]);
    assert_eq!(second.get_str("cmd"), Some("pull"));
    assert_eq!(second.get("force"), Some(&Value::Bool(false)));
    assert!(!second.contains("remote"));

    let mut strict = git(true);
    params(&mut strict, &["push", "-r", "origin"]);
    let err = error(&mut strict, &["pull"]);
    assert_eq!(err.message(), "-r/--remote is required, and wasn't found");
}

#[test]
fn extra_params_fail_unless_allowed() {
    let mut cli = git(true);
    let err = error(&mut cli, &["push", "-f", "-r", "origin", "-h", "world"]);
    assert!(err.is_invalid_input());
    assert_eq!(err.message(), "Invalid extra params supplied: -h, world");

    let mut cli = git(true).allow_extra_args(true);
    let p = params(&mut cli, &["push", "-f", "-r", "origin", "-h", "world"]);
    assert_eq!(p.get_str("cmd"), Some("push"));
    assert_eq!(p.get_str("remote"), Some("origin"));
}

#[test]
fn verbosity_levels() {
    let mut cli = Cli::new().help_on_no_args(false);
    assert_eq!(params(&mut cli, &[]).get_int("verbose"), Some(0));
    assert_eq!(params(&mut cli, &["-v"]).get_int("verbose"), Some(1));
    assert_eq!(params(&mut cli, &["-vv"]).get_int("verbose"), Some(2));
    assert_eq!(params(&mut cli, &["-vvv"]).get_int("verbose"), Some(3));
    assert_eq!(params(&mut cli, &["--verbose"]).get_int("verbose"), Some(1));
}

#[test]
fn verbose_flag_is_unknown_when_disabled() {
    let mut cli = Cli::new().verbose_enabled(false);
    let err = error(&mut cli, &["-v"]);
    assert_eq!(err.message(), "Invalid extra params supplied: -v");
}

#[test]
fn fixed_arity_needs_exact_count() {
    let mut cli = test_option(Arity::Fixed(3));
    let p = params(&mut cli, &["-t", "value1", "value2", "value3"]);
    assert_eq!(p.get("test1"), Some(&Value::from(vec!["value1", "value2", "value3"])));

    assert!(error(&mut cli, &["-t", "value1", "value2"]).is_invalid_input());
    let err = error(&mut cli, &["-t", "value1", "value2", "value3", "value4"]);
    assert_eq!(err.message(), "Invalid extra params supplied: value4");
}

#[test]
fn zero_or_more_and_at_least_one() {
    let mut cli = test_option("*".parse().unwrap());
    assert_eq!(params(&mut cli, &["-t"]).get("test1"), Some(&Value::Null));
    assert_eq!(
        params(&mut cli, &["--test1", "a", "b"]).get_list("test1").map(<[Value]>::len),
        Some(2)
    );

    let mut cli = test_option("+".parse().unwrap());
    assert!(error(&mut cli, &["-t"]).is_invalid_input());
    assert_eq!(
        params(&mut cli, &["-t", "a"]).get("test1"),
        Some(&Value::from(vec!["a"]))
    );
}

#[test]
fn legacy_unbounded_arity_respects_required() {
    let mut cli = test_option("-1".parse().unwrap());
    let err = error(&mut cli, &["-t"]);
    assert!(err.is_invalid_input());
    assert_eq!(
        params(&mut cli, &["-t", "hello", "world", "here"]).get("test1"),
        Some(&Value::from(vec!["hello", "world", "here"]))
    );

    let mut cli = test_option("*".parse().unwrap());
    assert_eq!(params(&mut cli, &["-t"]).get("test1"), Some(&Value::Null));

    let mut cli = Cli::new()
        .option(
            OptionDef::builder("test1")
                .short("-t")
                .arity("-1".parse().unwrap())
                .required(false)
                .build()
                .unwrap(),
        )
        .option(OptionDef::builder("test2").short("-u").build().unwrap());
    let p = params(&mut cli, &["-u", "hello"]);
    assert_eq!(p.get_str("test2"), Some("hello"));
    assert!(!p.contains("test1"));
    assert_eq!(params(&mut cli, &["-t", "-u", "x"]).get_list("test1"), Some(&[][..]));
}

#[test]
fn required_default_and_absent_options() {
    let mut cli = Cli::new()
        .help_on_no_args(false)
        .option(OptionDef::builder("test1").short("-t").build().unwrap());
    let err = error(&mut cli, &[]);
    assert!(err.is_invalid_input());

    let mut cli = Cli::new().help_on_no_args(false).option(
        OptionDef::builder("test1")
            .short("-t")
            .required(false)
            .default_value("value1")
            .build()
            .unwrap(),
    );
    assert_eq!(params(&mut cli, &[]).get_str("test1"), Some("value1"));

    let mut cli = Cli::new()
        .help_on_no_args(false)
        .option(OptionDef::builder("test1").short("-t").required(false).build().unwrap());
    assert!(!params(&mut cli, &[]).contains("test1"));
}

#[test]
fn typed_options() {
    let number = |kind: &str| {
        Cli::new().option(
            OptionDef::builder("test1")
                .short("-t")
                .kind(kind)
                .build()
                .unwrap(),
        )
    };

    let mut cli = number("number");
    assert_eq!(params(&mut cli, &["-t", "123.5"]).get_float("test1"), Some(123.5));
    assert!(error(&mut cli, &["-t", "abc"]).is_invalid_input());

    let mut cli = number("int");
    assert_eq!(params(&mut cli, &["-t", "123"]).get_int("test1"), Some(123));
    assert!(error(&mut cli, &["-t", "123.4"]).is_invalid_input());

    let numbers = |arity: Arity| {
        Cli::new().option(
            OptionDef::builder("test1")
                .short("-t")
                .kind("number")
                .arity(arity)
                .build()
                .unwrap(),
        )
    };
    let mut cli = numbers(Arity::Fixed(2));
    assert_eq!(
        params(&mut cli, &["-t", "123.5", "54.321"]).get("test1"),
        Some(&Value::List(vec![Value::Float(123.5), Value::Float(54.321)]))
    );
    let err = error(&mut cli, &["-t", "123.5", "x"]);
    assert!(err.is_invalid_input());
    assert_eq!(err.message(), "Option -t: 'x' wasn't of type number");

    let mut cli = numbers(Arity::AtLeastOne);
    assert!(error(&mut cli, &["-t", "1.5", "x"]).is_invalid_input());

    let mut cli = number("hippos");
    assert_eq!(params(&mut cli, &["-t", "value1"]).get_str("test1"), Some("value1"));
}

#[test]
fn multiple_command_groups_in_order() {
    let group = |name: &str, commands: [&str; 2]| {
        CommandGroup::builder(name)
            .commands(commands.map(|c| Command::builder(c).build().unwrap()))
            .required(true)
            .build()
            .unwrap()
    };
    let mut cli = Cli::new()
        .command_group(group("cmd1", ["test1", "test2"]))
        .command_group(group("cmd2", ["testA", "testB"]));

    let p = params(&mut cli, &["test1", "testB"]);
    assert_eq!(p.get_str("cmd1"), Some("test1"));
    assert_eq!(p.get_str("cmd2"), Some("testB"));

    let err = error(&mut cli, &["testB", "test1"]);
    assert_eq!(err.message(), "Command Group cmd1 is required and cannot be omitted");
}

#[test]
fn unknown_command_fails() {
    let mut cli = Cli::new().command_group(push_pull(true));
    assert!(error(&mut cli, &["fetch"]).is_invalid_input());

    let mut cli = Cli::new().command_group(push_pull(false));
    let err = error(&mut cli, &["fetch"]);
    assert_eq!(err.message(), "Invalid extra params supplied: fetch");
}

#[test]
fn command_then_group_callbacks() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let record = |label: &'static str| {
        let calls = Arc::clone(&calls);
        move |ctx: &mut bosun_argparse::CommandContext<'_>, command: &Command| {
            let cmd = ctx.params().get_str("cmd").unwrap_or_default().to_string();
            calls.lock().unwrap().push(format!("{label}:{}:{cmd}", command.name()));
        }
    };

    let group = CommandGroup::builder("cmd")
        .command(Command::builder("test1").callback(record("command")).build().unwrap())
        .command(Command::builder("test2").build().unwrap())
        .callback(record("group"))
        .build()
        .unwrap();
    let mut cli = Cli::new().command_group(group);

    params(&mut cli, &["test1"]);
    params(&mut cli, &["test2"]);
    assert_eq!(
        *calls.lock().unwrap(),
        ["command:test1:test1", "group:test1:test1", "group:test2:test2"]
    );
}

#[test]
fn nested_elements_resolve_before_callbacks() {
    let seen = Arc::new(Mutex::new(None));
    let seen_in_callback = Arc::clone(&seen);

    let remote = Command::builder("remote")
        .element(
            CommandGroup::builder("action")
                .command(Command::builder("add").build().unwrap())
                .command(Command::builder("remove").build().unwrap())
                .required(true)
                .build()
                .unwrap(),
        )
        .element(OptionDef::builder("name").short("-n").build().unwrap())
        .element(FlagDef::builder("dry").long("--dry-run").build().unwrap())
        .callback(move |ctx, _| {
            let p = ctx.params();
            *seen_in_callback.lock().unwrap() = Some((
                p.get_str("action").map(str::to_string),
                p.get_str("name").map(str::to_string),
                p.is_set("dry"),
            ));
        })
        .build()
        .unwrap();
    let mut cli = Cli::new().command_group(
        CommandGroup::builder("cmd")
            .command(remote)
            .build()
            .unwrap(),
    );

    let p = params(&mut cli, &["remote", "add", "-n", "origin", "--dry-run"]);
    assert_eq!(p.get_str("cmd"), Some("remote"));
    assert_eq!(p.get_str("action"), Some("add"));
    assert_eq!(
        *seen.lock().unwrap(),
        Some((Some("add".to_string()), Some("origin".to_string()), true))
    );

    // nested required group fails the whole parse
    let err = error(&mut cli, &["remote", "-n", "origin"]);
    assert_eq!(err.message(), "Command Group action is required and cannot be omitted");
}

#[test]
fn short_bundles_span_nested_scopes() {
    let push = Command::builder("push")
        .element(FlagDef::builder("tags").short("-t").build().unwrap())
        .build()
        .unwrap();
    let mut cli = Cli::new()
        .command_group(CommandGroup::builder("cmd").command(push).build().unwrap())
        .flag(FlagDef::builder("force").short("-f").build().unwrap());

    for args in [&["push", "-ft"][..], &["push", "-f", "-t"], &["push", "-tf"]] {
        let p = params(&mut cli, args);
        assert!(p.is_set("force"), "{args:?}");
        assert!(p.is_set("tags"), "{args:?}");
    }

    let err = error(&mut cli, &["push", "-fx"]);
    assert!(err.is_invalid_input());
    assert_eq!(err.message(), "Flag '-x' in '-fx' is unknown");
}

#[test]
fn unknown_long_flag_reads_as_user_error() {
    let mut cli = git(false);
    let err = error(&mut cli, &["push", "--nope"]);
    assert_eq!(err.to_string(), "Flag '--nope' is unknown");
}

#[test]
fn help_outcome_carries_rendered_text() {
    let mut cli = git(true).script_name("git-lite");
    let outcome = cli.parse_args(["--help"]).unwrap();
    let text = outcome.help_text().unwrap();
    assert!(text.starts_with("Usage: git-lite <cmd> [flags] [options]"));
    assert!(text.contains("push  Push up to the remote"));
    assert!(text.contains("-f, --force"));
    assert!(text.contains("-r, --remote <REMOTE>"));

    // the required option is never checked once help was requested
    assert!(cli.parse_args(["push", "--help"]).unwrap().is_help());
}

#[test]
fn help_on_no_args_only_replaces_failures() {
    let mut cli = git(true);
    assert!(cli.parse_args(Vec::<String>::new()).unwrap().is_help());

    let mut cli = git(true).help_on_no_args(false);
    assert!(cli.parse_args(Vec::<String>::new()).is_err());

    // an empty argv that parses cleanly still yields params
    let mut cli = Cli::new();
    let p = params(&mut cli, &[]);
    assert_eq!(p.get_int("verbose"), Some(0));
}

#[test]
fn help_disabled_leaves_help_token_alone() {
    let mut cli = Cli::new().help_enabled(false);
    let err = error(&mut cli, &["--help"]);
    assert!(err.is_config());
    assert_eq!(err.message(), "Flag '--help' is unknown");
}

#[test]
fn definition_errors_surface_at_build_time() {
    let bad: [Result<(), ParseError>; 5] = [
        FlagDef::builder("t").short("t").build().map(drop),
        OptionDef::builder("t").long("-t").build().map(drop),
        OptionDef::builder("t").short("-t").arity(Arity::Fixed(0)).build().map(drop),
        Command::builder("").build().map(drop),
        CommandGroup::builder("").build().map(drop),
    ];
    for result in bad {
        assert!(result.unwrap_err().is_config());
    }
}

#[test]
fn params_serialize_in_resolution_order() {
    let mut cli = git(true);
    let p = params(&mut cli, &["push", "-r", "origin"]);
    let json = serde_json::to_string(&p).unwrap();
    assert_eq!(
        json,
        r#"{"values":{"force":false,"verbose":0,"help":false,"remote":"origin","cmd":"push"}}"#
    );
}
