use clap::{App, Arg};
use std::path::Path;
use vdisk::{Fit, Session};
use vdisk_tool_lib::{
    init_logging, or_exit, parse_fit, parse_size, u64_to_sized_string, Manager, ToolError,
};

fn main() {
    let arguments = App::new("mkdisk-vdisk")
        .version("0.1.0")
        .about("This program creates a zero-filled disk image with an empty partition table.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image to create"),
        )
        .arg(
            Arg::with_name("size")
                .short("s")
                .required(true)
                .takes_value(true)
                .help("The size of the disk, either a count used with -u or a sized string (5MiB)"),
        )
        .arg(
            Arg::with_name("unit")
                .short("u")
                .required(false)
                .takes_value(true)
                .help("The unit of the size: B, K or M (default M)"),
        )
        .arg(
            Arg::with_name("fit")
                .short("f")
                .required(false)
                .takes_value(true)
                .help("The default fit of the disk: BF, FF or WF (default FF)"),
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

    let path = arguments.value_of("image").unwrap_or_default();
    let size_arg = arguments.value_of("size").unwrap_or_default();
    let size = match arguments.value_of("unit") {
        Some(unit) => or_exit(parse_size(size_arg, Some(unit))),
        None if size_arg.chars().all(|c| c.is_ascii_digit()) => {
            or_exit(parse_size(size_arg, Some("M")))
        }
        None => or_exit(parse_size(size_arg, None)),
    };
    let fit = match arguments.value_of("fit") {
        Some(f) => or_exit(parse_fit(f)),
        None => Fit::First,
    };

    let session = Session::new(Box::new(Manager::new()));
    or_exit(
        session
            .create_disk(Path::new(path), size, fit)
            .map_err(ToolError::from),
    );

    println!("Created {} ({}).", path, u64_to_sized_string(size));
}
