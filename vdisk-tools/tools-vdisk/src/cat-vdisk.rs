use clap::{App, Arg};
use std::io::stdout;
use vdisk_tool_lib::{concatenate, init_logging, or_exit, session_with_mount};

fn main() {
    let arguments = App::new("cat-vdisk")
        .version("0.1.0")
        .about("This program prints files stored in a formatted partition.")
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
            Arg::with_name("paths")
                .required(true)
                .takes_value(true)
                .multiple(true)
                .help("The absolute paths of the files to print"),
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
    let paths: Vec<&str> = arguments.values_of("paths").into_iter().flatten().collect();
    let out = stdout();
    let mut out = out.lock();

    or_exit(concatenate(&session, &id, &paths, &mut out));
}
