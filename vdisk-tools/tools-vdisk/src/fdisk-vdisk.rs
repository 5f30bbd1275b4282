use clap::{App, Arg};
use std::path::Path;
use std::process::exit;
use vdisk::disk_blocks::PartitionType;
use vdisk::{PartitionRequest, Session};
use vdisk_tool_lib::{
    init_logging, or_exit, parse_fit, parse_partition_type, parse_size, u64_to_sized_string,
    Manager, ToolError,
};

const SPACER: &str = "    ";

fn main() {
    let arguments = App::new("fdisk-vdisk")
        .version("0.1.0")
        .about("This program creates partitions on a disk image or lists them.")
        .arg(
            Arg::with_name("image")
                .required(true)
                .takes_value(true)
                .help("The path of the image"),
        )
        .arg(
            Arg::with_name("name")
                .short("n")
                .required_unless("list")
                .takes_value(true)
                .help("The name of the new partition (at most 16 bytes)"),
        )
        .arg(
            Arg::with_name("size")
                .short("s")
                .required_unless("list")
                .takes_value(true)
                .help("The size of the partition, either a count used with -u or a sized string"),
        )
        .arg(
            Arg::with_name("unit")
                .short("u")
                .required(false)
                .takes_value(true)
                .help("The unit of the size: B, K or M (default K)"),
        )
        .arg(
            Arg::with_name("type")
                .short("t")
                .required(false)
                .takes_value(true)
                .help("The partition type: P, E or L (default P)"),
        )
        .arg(
            Arg::with_name("fit")
                .short("f")
                .required(false)
                .takes_value(true)
                .help("The fit used to place the partition (default: the disk fit)"),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .required(false)
                .takes_value(false)
                .help("List the partitions of the image."),
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

    let path = Path::new(arguments.value_of("image").unwrap_or_default());
    let session = Session::new(Box::new(Manager::new()));

    if arguments.is_present("list") {
        list(&session, path);
        return;
    }

    let name = arguments.value_of("name").unwrap_or_default();
    let size_arg = arguments.value_of("size").unwrap_or_default();
    let size = match arguments.value_of("unit") {
        Some(unit) => or_exit(parse_size(size_arg, Some(unit))),
        None if size_arg.chars().all(|c| c.is_ascii_digit()) => {
            or_exit(parse_size(size_arg, Some("K")))
        }
        None => or_exit(parse_size(size_arg, None)),
    };
    let kind = match arguments.value_of("type") {
        Some(t) => or_exit(parse_partition_type(t)),
        None => PartitionType::Primary,
    };

    if size > i64::MAX as u64 {
        eprintln!("{}", ToolError::InvalidSize(String::from(size_arg)));
        exit(1);
    }

    let mut request = PartitionRequest::new(name, size as i64, kind);
    if let Some(f) = arguments.value_of("fit") {
        request = request.with_fit(or_exit(parse_fit(f)));
    }

    let start = or_exit(
        session
            .create_partition(path, &request)
            .map_err(ToolError::from),
    );

    println!(
        "Created partition {} at byte {} ({}).",
        name,
        start,
        u64_to_sized_string(size)
    );
}

fn list(session: &Session, path: &Path) {
    let (mbr, logical) = or_exit(session.partitions(path).map_err(ToolError::from));

    println!(
        "{} bytes, fit {}, signature {}",
        mbr.size,
        mbr.fit.to_u8() as char,
        mbr.signature
    );

    for (i, p) in mbr.partitions.iter().enumerate() {
        if p.is_empty() {
            continue;
        }

        let id = if p.is_mounted() { p.id() } else { String::from("-") };
        println!(
            "{}{}{}{}{}{}{}{}{}{}{}",
            i + 1,
            SPACER,
            p.kind.to_u8() as char,
            SPACER,
            p.start,
            SPACER,
            u64_to_sized_string(p.size as u64),
            SPACER,
            id,
            SPACER,
            p.name()
        );
    }

    for ebr in logical {
        println!(
            "-{}L{}{}{}{}{}-{}{}",
            SPACER,
            SPACER,
            ebr.start,
            SPACER,
            u64_to_sized_string(ebr.size as u64),
            SPACER,
            SPACER,
            ebr.name()
        );
    }
}
