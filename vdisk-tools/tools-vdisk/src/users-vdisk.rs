use clap::{App, AppSettings, Arg, SubCommand};
use vdisk_tool_lib::{init_logging, or_exit, session_with_mount, ToolError};

fn main() {
    let arguments = App::new("users-vdisk")
        .version("0.1.0")
        .about("This program manages the groups and users of a formatted partition.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image"),
        )
        .arg(
            Arg::with_name("partition")
                .short("n")
                .required(true)
                .takes_value(true)
                .help("The name of the partition"),
        )
        .arg(
            Arg::with_name("user")
                .short("u")
                .required(true)
                .takes_value(true)
                .help("The user to log in as"),
        )
        .arg(
            Arg::with_name("password")
                .short("p")
                .required(true)
                .takes_value(true)
                .help("The password of the user"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .required(false)
                .takes_value(false)
                .help("Log what happens to stderr"),
        )
        .subcommand(SubCommand::with_name("whoami").about("Print the logged in user"))
        .subcommand(
            SubCommand::with_name("list").about("Print the users.txt registry of the partition"),
        )
        .subcommand(
            SubCommand::with_name("mkgrp")
                .about("Create a group")
                .arg(Arg::with_name("name").required(true).takes_value(true)),
        )
        .subcommand(
            SubCommand::with_name("rmgrp")
                .about("Remove a group and its users")
                .arg(Arg::with_name("name").required(true).takes_value(true)),
        )
        .subcommand(
            SubCommand::with_name("mkusr")
                .about("Create a user")
                .arg(Arg::with_name("name").required(true).takes_value(true))
                .arg(Arg::with_name("password").required(true).takes_value(true))
                .arg(Arg::with_name("group").required(true).takes_value(true)),
        )
        .subcommand(
            SubCommand::with_name("rmusr")
                .about("Remove a user")
                .arg(Arg::with_name("name").required(true).takes_value(true)),
        )
        .subcommand(
            SubCommand::with_name("chgrp")
                .about("Move a user to another group")
                .arg(Arg::with_name("name").required(true).takes_value(true))
                .arg(Arg::with_name("group").required(true).takes_value(true)),
        )
        .get_matches();

    init_logging(arguments.is_present("verbose"));

    let image = arguments.value_of("image").unwrap_or_default();
    let partition = arguments.value_of("partition").unwrap_or_default();
    let user = arguments.value_of("user").unwrap_or_default();
    let password = arguments.value_of("password").unwrap_or_default();

    let (mut session, id) = or_exit(session_with_mount(image, partition));
    or_exit(session.login(user, password, &id).map_err(ToolError::from));

    let result = match arguments.subcommand() {
        ("whoami", _) => {
            if let Some(logged) = session.current_user() {
                println!("{} on {}", logged.username, logged.partition_id);
            }
            Ok(())
        }
        ("list", _) => session.read_file(&id, "/users.txt").map(|text| {
            print!("{}", String::from_utf8_lossy(&text));
        }),
        ("mkgrp", Some(sub)) => session.add_group(sub.value_of("name").unwrap_or_default()),
        ("rmgrp", Some(sub)) => session.remove_group(sub.value_of("name").unwrap_or_default()),
        ("mkusr", Some(sub)) => session.add_user(
            sub.value_of("name").unwrap_or_default(),
            sub.value_of("password").unwrap_or_default(),
            sub.value_of("group").unwrap_or_default(),
        ),
        ("rmusr", Some(sub)) => session.remove_user(sub.value_of("name").unwrap_or_default()),
        ("chgrp", Some(sub)) => session.change_user_group(
            sub.value_of("name").unwrap_or_default(),
            sub.value_of("group").unwrap_or_default(),
        ),
        _ => Ok(()),
    };
    or_exit(result.map_err(ToolError::from));

    or_exit(session.logout().map(|_| ()).map_err(ToolError::from));
}
