use clap::{App, Arg};
use std::io::{stdin, stdout, Write};
use std::path::Path;
use std::process::exit;
use vdisk::Session;
use vdisk_tool_lib::{init_logging, or_exit, Manager, ToolError};

fn main() {
    let arguments = App::new("rmdisk-vdisk")
        .version("0.1.0")
        .about("This program deletes a disk image.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image to delete"),
        )
        .arg(
            Arg::with_name("yes")
                .short("y")
                .required(false)
                .takes_value(false)
                .help("Do not ask for confirmation"),
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

    if !Path::new(path).is_file() {
        eprintln!("{} does not exist.", path);
        exit(1);
    }

    if !arguments.is_present("yes") {
        print!("Delete {}? (y/n) ", path);
        if let Err(e) = stdout().flush() {
            eprintln!("Failed to write to stdout: {}", e);
            exit(1);
        }

        let mut answer = String::new();
        if let Err(e) = stdin().read_line(&mut answer) {
            eprintln!("Failed to read the answer: {}", e);
            exit(1);
        }

        if answer.trim().to_lowercase() != "y" {
            println!("Nothing was deleted.");
            return;
        }
    }

    let session = Session::new(Box::new(Manager::new()));
    or_exit(session.remove_disk(Path::new(path)).map_err(ToolError::from));

    println!("Deleted {}.", path);
}
