use anyhow::Context;
use clap::{value_parser, Arg, ArgMatches, Command};
use numshim::test_util::gen_random_views;
use numshim::{diagonal_view, shape, Strides};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn handle_views(matches: &ArgMatches) -> anyhow::Result<()> {
    let arg = |name: &str| {
        matches
            .get_one::<usize>(name)
            .copied()
            .with_context(|| format!("missing --{}", name))
    };
    let (max_ndim, max_dim, min_ndim, samples) = (
        arg("max-ndim")?,
        arg("max-dim")?,
        arg("min-ndim")?,
        arg("samples")?,
    );
    if min_ndim > max_ndim {
        anyhow::bail!("--min-ndim {} exceeds --max-ndim {}", min_ndim, max_ndim);
    }

    let mut rng = match matches.get_one::<u64>("seed") {
        Some(seed) => StdRng::seed_from_u64(*seed),
        None => StdRng::from_entropy(),
    };
    let fixtures = gen_random_views(max_ndim, max_dim, min_ndim, samples, &mut rng);
    log::info!("Generated {} fixtures", fixtures.len());
    for fixture in fixtures {
        println!("{}", fixture);
    }
    Ok(())
}

fn handle_diagonal(matches: &ArgMatches) -> anyhow::Result<()> {
    let rows = *matches.get_one::<usize>("rows").context("missing --rows")?;
    let cols = *matches.get_one::<usize>("cols").context("missing --cols")?;
    let offset = *matches.get_one::<isize>("offset").context("missing --offset")?;

    let shape = shape![rows, cols];
    let strides = Strides::from(&shape);
    let view = diagonal_view(&shape, &strides, offset)?;
    log::info!("Diagonal {} of {:?} with strides {:?}", offset, shape, strides);
    println!(
        "start={} len={} stride={}",
        view.start, view.len, view.stride
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let matches = Command::new("numshim")
        .about("Strided view and diagonal inspection")
        .version("0.1.0")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("views")
                .long_about("Prints random subview fixtures: base shape, subscription, view shape.")
                .arg(
                    Arg::new("max-ndim")
                        .long("max-ndim")
                        .default_value("3")
                        .value_parser(value_parser!(usize))
                        .help("Largest rank to generate."),
                )
                .arg(
                    Arg::new("max-dim")
                        .long("max-dim")
                        .default_value("10")
                        .value_parser(value_parser!(usize))
                        .help("Largest size of any dimension."),
                )
                .arg(
                    Arg::new("min-ndim")
                        .long("min-ndim")
                        .default_value("1")
                        .value_parser(value_parser!(usize))
                        .help("Smallest rank to generate."),
                )
                .arg(
                    Arg::new("samples")
                        .short('s')
                        .long("samples")
                        .default_value("3")
                        .value_parser(value_parser!(usize))
                        .help("Random shapes per rank and subviews per shape."),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Seed for reproducible output."),
                ),
        )
        .subcommand(
            Command::new("diagonal")
                .long_about("Prints the k-th diagonal view of a contiguous rows x cols matrix.")
                .arg(
                    Arg::new("rows")
                        .short('r')
                        .long("rows")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("cols")
                        .short('c')
                        .long("cols")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("offset")
                        .short('k')
                        .long("offset")
                        .default_value("0")
                        .allow_hyphen_values(true)
                        .value_parser(value_parser!(isize))
                        .help("Diagonal offset, negative below the main diagonal."),
                ),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("views") {
        handle_views(matches)?;
    } else if let Some(matches) = matches.subcommand_matches("diagonal") {
        handle_diagonal(matches)?;
    }

    Ok(())
}
