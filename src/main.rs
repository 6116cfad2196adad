use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, error, info, LevelFilter};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use esri_geojson::{export, import, EsriGeometry, GeoJsonGeometry, ImportOptions, MultiPointTag};

fn cli() -> Command {
    let input = Arg::new("input")
        .value_parser(value_parser!(PathBuf))
        .help("Input file (reads stdin when omitted or '-')");
    let output = Arg::new("output")
        .short('o')
        .long("output")
        .value_parser(value_parser!(PathBuf))
        .help("Output file (writes stdout when omitted)");
    let indent = Arg::new("indent")
        .long("indent")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Pretty-print the output JSON with N spaces per level");
    let precision = Arg::new("precision")
        .long("precision")
        .value_name("N")
        .value_parser(value_parser!(u8))
        .help("Round ordinates to N decimal places");

    Command::new("esri-geojson")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Jesper Fjellin")
        .about("Converts geometries between Esri JSON and GeoJSON")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true)
                .help("Increase verbosity"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::Count)
                .global(true)
                .help("Decrease verbosity"),
        )
        .subcommand(
            Command::new("import")
                .about("Convert an Esri JSON geometry to GeoJSON")
                .arg(input.clone())
                .arg(output.clone())
                .arg(indent.clone())
                .arg(precision.clone())
                .arg(
                    Arg::new("canonical-tags")
                        .long("canonical-tags")
                        .action(ArgAction::SetTrue)
                        .help("Write 'MultiPoint' instead of the legacy 'Multipoint' tag"),
                )
                .arg(
                    Arg::new("single-linestring")
                        .long("single-linestring")
                        .action(ArgAction::SetTrue)
                        .help("Write a LineString when a polyline has exactly one path"),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Convert a GeoJSON geometry to Esri JSON")
                .arg(input)
                .arg(output)
                .arg(indent)
                .arg(precision),
        )
}

fn log_level(matches: &ArgMatches) -> LevelFilter {
    let verbosity = i16::from(matches.get_count("verbose")) - i16::from(matches.get_count("quiet"));
    match verbosity {
        i16::MIN..=-2 => LevelFilter::Off,
        -1 => LevelFilter::Error,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn main() {
    let matches = cli().get_matches();

    env_logger::Builder::new()
        .filter_level(log_level(&matches))
        .format_timestamp(None)
        .init();

    if let Err(e) = run(&matches) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("import", args)) => {
            let options = ImportOptions {
                multipoint_tag: if args.get_flag("canonical-tags") {
                    MultiPointTag::Canonical
                } else {
                    MultiPointTag::Legacy
                },
                single_part_linestring: args.get_flag("single-linestring"),
            };
            let esri = EsriGeometry::from_value(&read_input(args)?)
                .context("failed to convert Esri JSON to GeoJSON")?;
            debug!("importing Esri {}", esri.kind());
            let mut geometry = import::to_geojson(&esri, &options);
            if let Some(&precision) = args.get_one::<u8>("precision") {
                geometry.round(precision);
            }
            write_output(args, &geometry.tagged(options.multipoint_tag))
        }
        Some(("export", args)) => {
            let geometry = GeoJsonGeometry::from_value(&read_input(args)?)
                .context("failed to convert GeoJSON to Esri JSON")?;
            debug!("exporting GeoJSON {}", geometry.kind());
            let mut esri =
                export::to_esri(&geometry).context("failed to convert GeoJSON to Esri JSON")?;
            if let Some(&precision) = args.get_one::<u8>("precision") {
                esri.round(precision);
            }
            write_output(args, &esri)
        }
        Some((name, _)) => bail!("unknown command '{name}'"),
        None => bail!("no command given"),
    }
}

fn read_input(args: &ArgMatches) -> Result<Value> {
    let text = match args.get_one::<PathBuf>("input") {
        Some(path) if path.as_os_str() != "-" => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(text.trim()).context("input is not valid JSON")
}

/// Compact JSON, or pretty-printed with `indent` spaces per level.
fn to_text<T: Serialize>(value: &T, indent: Option<usize>) -> Result<String> {
    let Some(width) = indent else {
        return Ok(serde_json::to_string(value)?);
    };
    let spaces = b" ".repeat(width);
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(&spaces));
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_output<T: Serialize>(args: &ArgMatches, value: &T) -> Result<()> {
    let mut text = to_text(value, args.get_one::<usize>("indent").copied())?;
    text.push('\n');

    match args.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => io::stdout().write_all(text.as_bytes())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn requires_a_subcommand() {
        assert!(cli().try_get_matches_from(["esri-geojson"]).is_err());
    }

    #[test]
    fn import_flags() {
        let matches = cli()
            .try_get_matches_from(["esri-geojson", "-vv", "import", "in.json", "--canonical-tags"])
            .unwrap();
        assert_eq!(log_level(&matches), LevelFilter::Debug);
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "import");
        assert!(args.get_flag("canonical-tags"));
        assert!(!args.get_flag("single-linestring"));
        assert_eq!(args.get_one::<PathBuf>("input"), Some(&PathBuf::from("in.json")));
    }

    #[test]
    fn quiet_lowers_level() {
        let matches = cli()
            .try_get_matches_from(["esri-geojson", "export", "-q"])
            .unwrap();
        assert_eq!(log_level(&matches), LevelFilter::Error);

        let matches = cli()
            .try_get_matches_from(["esri-geojson", "-qq", "export"])
            .unwrap();
        assert_eq!(log_level(&matches), LevelFilter::Off);
    }

    #[test]
    fn precision_and_indent_take_numbers() {
        let matches = cli()
            .try_get_matches_from(["esri-geojson", "export", "--precision", "3", "--indent", "4"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<u8>("precision"), Some(&3));
        assert_eq!(args.get_one::<usize>("indent"), Some(&4));

        assert!(cli()
            .try_get_matches_from(["esri-geojson", "import", "--precision", "-1"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["esri-geojson", "import", "--indent", "wide"])
            .is_err());
    }

    #[test]
    fn indent_sets_width() {
        let value = serde_json::json!({"x": 1});
        assert_eq!(to_text(&value, None).unwrap(), r#"{"x":1}"#);
        assert_eq!(to_text(&value, Some(2)).unwrap(), "{\n  \"x\": 1\n}");
        assert_eq!(to_text(&value, Some(0)).unwrap(), "{\n\"x\": 1\n}");
    }

    #[test]
    fn export_has_no_import_options() {
        assert!(cli()
            .try_get_matches_from(["esri-geojson", "export", "--canonical-tags"])
            .is_err());
    }
}
