extern crate clap;
extern crate env_logger;
extern crate failure;
extern crate image;
extern crate log;
extern crate num;
extern crate num_cpus;
extern crate smoothbrot;

use clap::{App, Arg, ArgMatches};
use image::RgbaImage;
use log::info;
use num::Complex;
use smoothbrot::{Decomposition, RenderConfig};
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex<f64>> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const CENTER: &str = "center";
const ZOOM: &str = "zoom";
const COLORS: &str = "colors";
const SPACING: &str = "spacing";
const THREADS: &str = "threads";
const ITERATIONS: &str = "iterations";
const DECOMPOSE: &str = "decompose";

fn args<'a>() -> ArgMatches<'a> {
    let max_threads = num_cpus::get();

    App::new("smoothbrot")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Smooth-coloured Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file; the format follows the extension"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("800x600")
                .validator(|s| validate_pair::<u32>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(CENTER)
                .required(false)
                .long(CENTER)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-0.5,0")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse center point"))
                .help("Point of the complex plane at the center of the image"),
        )
        .arg(
            Arg::with_name(ZOOM)
                .required(false)
                .long(ZOOM)
                .short("z")
                .takes_value(true)
                .default_value("1")
                .validator(|s| {
                    validate_range(
                        &s,
                        std::f64::MIN_POSITIVE,
                        std::f64::MAX,
                        "Could not parse zoom",
                        "Zoom must be greater than zero",
                    )
                })
                .help("Magnification; 1 shows 3 units of the real axis"),
        )
        .arg(
            Arg::with_name(COLORS)
                .required(false)
                .long(COLORS)
                .short("p")
                .takes_value(true)
                .default_value("#000764,#206bcb,#edffff,#ffaa00,#000200,#000000")
                .help("Comma-separated hex colors; the last one colors the interior"),
        )
        .arg(
            Arg::with_name(SPACING)
                .required(false)
                .long(SPACING)
                .short("g")
                .takes_value(true)
                .default_value("16")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        usize::max_value(),
                        "Could not parse color spacing",
                        "Color spacing must be at least 1",
                    )
                })
                .help("Palette entries between neighbouring colors"),
        )
        .arg(
            Arg::with_name(THREADS)
                .required(false)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver [default: one per CPU]"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("4096")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Iterations after which a point counts as inside the set"),
        )
        .arg(
            Arg::with_name(DECOMPOSE)
                .required(false)
                .long(DECOMPOSE)
                .short("d")
                .takes_value(true)
                .possible_values(&["rows", "columns"])
                .default_value("rows")
                .help("Hand out work by rows or by columns"),
        )
        .get_matches()
}

fn write_image(
    outfile: &str,
    pixels: Vec<u8>,
    bounds: (u32, u32),
) -> Result<(), failure::Error> {
    let image = RgbaImage::from_raw(bounds.0, bounds.1, pixels)
        .ok_or_else(|| failure::err_msg("Pixel buffer does not match image size"))?;
    image.save(Path::new(outfile))?;
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let (width, height) = parse_pair::<u32>(matches.value_of(SIZE).unwrap_or_default(), 'x')
        .ok_or_else(|| failure::err_msg("Error parsing image dimensions"))?;
    let center = parse_complex(matches.value_of(CENTER).unwrap_or_default())
        .ok_or_else(|| failure::err_msg("Error parsing center point"))?;
    let zoom = f64::from_str(matches.value_of(ZOOM).unwrap_or_default())?;
    let colors: Vec<&str> = matches
        .value_of(COLORS)
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .collect();
    let spacing = usize::from_str(matches.value_of(SPACING).unwrap_or_default())?;
    let threads = match matches.value_of(THREADS) {
        Some(threads) => usize::from_str(threads)?,
        None => num_cpus::get(),
    };
    let iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap_or_default())?;
    let decomposition = Decomposition::from_str(matches.value_of(DECOMPOSE).unwrap_or_default())
        .map_err(failure::err_msg)?;

    let config = RenderConfig::default()
        .with_threads(threads)
        .with_max_iterations(iterations)
        .with_decomposition(decomposition);

    let started = Instant::now();
    let buffer =
        smoothbrot::render_with(width, height, center, zoom, &colors, spacing, &config)?;
    info!("rendered {}x{} in {:?}", width, height, started.elapsed());

    // OUTPUT is required, so clap has already rejected a missing value.
    write_image(
        matches.value_of(OUTPUT).unwrap_or_default(),
        buffer.into_raw(),
        (width, height),
    )
}

fn main() {
    env_logger::init();
    let matches = args();
    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
