use clap::{App, Arg};
use vdisk_tool_lib::{init_logging, or_exit, session_with_mount, ToolError};

fn main() {
    let arguments = App::new("mkdir-vdisk")
        .version("0.1.0")
        .about("This program creates a directory in a formatted partition.")
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
                .help("The absolute path of the directory"),
        )
        .arg(
            Arg::with_name("parents")
                .short("p")
                .required(false)
                .takes_value(false)
                .help("Create missing parent directories"),
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

    let (session, id) = or_exit(session_with_mount(image, partition));
    or_exit(
        session
            .create_path(&id, path, false, arguments.is_present("parents"))
            .map_err(ToolError::from),
    );
}
