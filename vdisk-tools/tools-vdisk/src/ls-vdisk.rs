use clap::{App, Arg};
use vdisk::disk_blocks::InodeType;
use vdisk_tool_lib::{init_logging, or_exit, session_with_mount, u64_to_sized_string, ToolError};

const SPACER: &str = "    ";

fn main() {
    let arguments = App::new("ls-vdisk")
        .version("0.1.0")
        .about("This program lists a directory of a formatted partition.")
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
                .required(false)
                .takes_value(true)
                .help("The directory to list (default /)"),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .required(false)
                .takes_value(false)
                .help("List the entries with their metadata."),
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
    let path = arguments.value_of("path").unwrap_or("/");

    let (session, id) = or_exit(session_with_mount(image, partition));
    let entries = or_exit(session.list_directory(&id, path).map_err(ToolError::from));

    let long = arguments.is_present("list");
    for entry in entries {
        if !long {
            println!("{}", entry.name);
            continue;
        }

        let kind = match entry.kind {
            InodeType::Directory => 'd',
            InodeType::File => '-',
        };
        println!(
            "{}{}{}{}{}{}{}",
            kind,
            SPACER,
            entry.inode,
            SPACER,
            u64_to_sized_string(entry.size.max(0) as u64),
            SPACER,
            entry.name
        );
    }
}
