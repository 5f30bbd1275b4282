use clap::{App, Arg};
use std::process::exit;
use vdisk_tool_lib::{digit_pattern, init_logging, or_exit, session_with_mount, ToolError};

fn main() {
    let arguments = App::new("mkfile-vdisk")
        .version("0.1.0")
        .about("This program creates a file in a formatted partition.")
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
            Arg::with_name("path")
                .required(true)
                .takes_value(true)
                .help("The absolute path of the file"),
        )
        .arg(
            Arg::with_name("parents")
                .short("r")
                .required(false)
                .takes_value(false)
                .help("Create missing parent directories"),
        )
        .arg(
            Arg::with_name("size")
                .short("s")
                .required(false)
                .takes_value(true)
                .conflicts_with("content")
                .help("Fill the file with this many bytes of 0123456789"),
        )
        .arg(
            Arg::with_name("content")
                .short("c")
                .required(false)
                .takes_value(true)
                .help("Copy the content of a file on the host"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .required(false)
                .takes_value(false)
                .help("Log what happens to stderr"),
        )
        .get_matches();

    init_logging(arguments.is_present("verbose"));

    let image = arguments.value_of("image").unwrap_or_default();
    let partition = arguments.value_of("partition").unwrap_or_default();
    let path = arguments.value_of("path").unwrap_or_default();

    let content = if let Some(host) = arguments.value_of("content") {
        or_exit(std::fs::read(host).map_err(|e| ToolError::io(host, e)))
    } else if let Some(size) = arguments.value_of("size") {
        let size = match size.trim().parse::<usize>() {
            Ok(s) => s,
            Err(_) => {
                eprintln!("{}", ToolError::InvalidSize(String::from(size)));
                exit(1);
            }
        };
        digit_pattern(size)
    } else {
        Vec::new()
    };

    let (session, id) = or_exit(session_with_mount(image, partition));

    if arguments.is_present("parents") {
        or_exit(
            session
                .create_path(&id, path, true, true)
                .map_err(ToolError::from),
        );
    }

    or_exit(
        session
            .write_file(&id, path, &content)
            .map_err(ToolError::from),
    );
}
