use clap::{App, Arg};
use vdisk_tool_lib::{init_logging, or_exit, session_with_mount, ToolError};

fn main() {
    let arguments = App::new("mkfs-vdisk")
        .version("0.1.0")
        .about("This program formats a primary partition with an ext2 style filesystem.")
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
                .help("The name of the partition to format"),
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

    let (session, id) = or_exit(session_with_mount(image, partition));
    or_exit(session.create_filesystem(&id).map_err(ToolError::from));

    println!("Formatted {} (mounted as {}).", partition, id);
}
