use day11::{part1, part2, Troop};
use util::{read_input_file, render_bad_input};

use anyhow::Result;
use env_logger::Env;
use log::error;

const INPUT_PATH: &str = "input.txt";

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let input = read_input_file(INPUT_PATH)?;

    let troop: Troop = input.parse().map_err(|e: day11::ParseError| {
        if let Some(line) = e.line() {
            match render_bad_input(&input, line, &e.to_string()) {
                Ok(report) => eprintln!("{report}"),
                Err(render_err) => error!("could not render parse error: {render_err}"),
            }
        }
        e
    })?;

    println!("{}", part1(&troop)?);
    println!("{}", part2(&troop)?);

    Ok(())
}
