use clap::{Arg, ArgAction, ArgMatches, Command};
use geosop::config::parse_op_arg;
use geosop::{run, OpArgs, OutputFormat, OPERATIONS};
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("geosop")
        .version("0.1.0")
        .about("Executes geometry operations on inputs")
        .override_usage("geosop [OPTIONS] [SOURCE] [OPERATION] [ARG]")
        .disable_help_flag(true)
        .allow_negative_numbers(true)
        .arg(
            Arg::new("a")
                .short('a')
                .num_args(1)
                .allow_hyphen_values(true)
                .help("Source for A geometries: WKT or hex WKB literal, file, or stdin"),
        )
        .arg(
            Arg::new("alimit")
                .long("alimit")
                .num_args(1)
                .value_parser(clap::value_parser!(i64))
                .help("Limit on number of A geometries read"),
        )
        .arg(
            Arg::new("collect")
                .short('c')
                .long("collect")
                .num_args(0..=1)
                .require_equals(true)
                .default_value("true")
                .default_missing_value("true")
                .value_parser(clap::value_parser!(bool))
                .help("Collect input into a single geometry"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .num_args(1)
                .help("Output format: txt, wkt, wkb, geojson"),
        )
        .arg(
            Arg::new("help")
                .short('h')
                .long("help")
                .action(ArgAction::SetTrue)
                .help("Print help and the list of operations"),
        )
        .arg(
            Arg::new("time")
                .short('t')
                .long("time")
                .action(ArgAction::SetTrue)
                .help("Print execution time"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Verbose output"),
        )
        .arg(
            Arg::new("positional")
                .num_args(0..)
                .allow_hyphen_values(true)
                .value_name("SOURCE OPERATION ARG")
                .help("Input source (unless -a is given), operation name and argument"),
        )
}

fn print_help(cmd: &mut Command, list_ops: bool) {
    println!("{}", cmd.render_help());
    if list_ops {
        println!("Operations:");
        for op in OPERATIONS {
            println!("  {:<16} {}", op.signature(), op.description);
        }
    }
}

fn op_args(matches: &ArgMatches) -> geosop::Result<OpArgs> {
    let mut args = OpArgs::default();

    let mut positional: Vec<String> = matches
        .get_many::<String>("positional")
        .map(|vals| vals.cloned().collect::<Vec<String>>())
        .unwrap_or_default()
        .into_iter()
        .rev()
        .collect();
    args.src_a = match matches.get_one::<String>("a") {
        Some(src) => src.clone(),
        None => positional.pop().unwrap_or_default(),
    };
    if let Some(op) = positional.pop() {
        args.op_name = op;
    }
    if let Some(arg) = positional.pop() {
        args.op_arg = parse_op_arg(&arg)?;
    }

    if let Some(limit) = matches.get_one::<i64>("alimit") {
        args.limit_a = *limit;
    }
    args.collect = matches.get_one::<bool>("collect").copied().unwrap_or(true);
    if let Some(fmt) = matches.get_one::<String>("format") {
        args.format = fmt.parse::<OutputFormat>()?;
    }
    args.show_time = matches.get_flag("time");
    args.verbose = matches.get_flag("verbose");
    Ok(args)
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let mut cmd = command();

    // Without any arguments, show usage and stop.
    if std::env::args().len() <= 1 {
        print_help(&mut cmd, false);
        return;
    }

    let matches = cmd.clone().get_matches();
    if matches.get_flag("help") {
        print_help(&mut cmd, true);
        return;
    }

    let result = op_args(&matches).and_then(run);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
