//! Interactive digit-recognition CLI.
//!
//! All numeric logic lives in the library; this binary only parses
//! arguments, loads the parameter files, and runs the prompt/predict loop.
//!
//! Run with:
//!   mlp-digits <w1> <w2> <w3> <w4> <b1> <b2> <b3> <b4>

use std::io::BufRead;
use std::path::Path;
use std::process::ExitCode;

use mlp_digits::io::{load_parameters, read_image, read_matrix};
use mlp_digits::{Matrix, Network, Result, Topology};

const USAGE: &str = "Usage: mlp-digits <w1> <w2> <w3> <w4> <b1> <b2> <b3> <b4>";
const PROMPT: &str = "Please insert image path:";
const QUIT: &str = "q";

/// Expected argument count after the program name: four weight paths
/// followed by four bias paths.
const PARAM_ARGS: usize = 8;

fn build_network(topology: &Topology, args: &[String]) -> Result<Network> {
    let (weight_paths, bias_paths) = args.split_at(topology.len());
    let parameters = load_parameters(topology, weight_paths, bias_paths)?;
    Network::new(topology, parameters)
}

/// Loads an input image: `.bin` files are raw binary f32 at the network's
/// native shape, everything else goes through the image decoder.
fn load_input(path: &str, rows: usize, cols: usize) -> Result<Matrix> {
    let is_raw = Path::new(path)
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("bin"))
        .unwrap_or(false);
    if is_raw {
        let mut image = Matrix::zeros(rows, cols)?;
        read_matrix(path, &mut image)?;
        Ok(image)
    } else {
        read_image(path, rows, cols)
    }
}

/// Prompt/predict loop. A failed image load prints the error and prompts
/// again; only `q` or EOF ends the loop.
fn predict_loop(network: &Network, rows: usize, cols: usize) {
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("{}", PROMPT);
        let path = match lines.next() {
            Some(Ok(line)) => line.trim().to_string(),
            _ => break,
        };
        if path.is_empty() {
            continue;
        }
        if path == QUIT {
            break;
        }

        let image = match load_input(&path, rows, cols) {
            Ok(image) => image,
            Err(e) => {
                eprintln!("Cannot load image '{}': {}", path, e);
                continue;
            }
        };

        match network.classify(&image) {
            Ok(digit) => {
                println!("Image processed:");
                println!("{}", image);
                println!("MLP result: {} at probability: {}", digit.value, digit.probability);
            }
            Err(e) => eprintln!("Classification failed for '{}': {}", path, e),
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != PARAM_ARGS {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    }

    let topology = Topology::mnist();
    let network = match build_network(&topology, &args) {
        Ok(network) => network,
        Err(e) => {
            eprintln!("Failed to load network parameters: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let (rows, cols) = topology.image_dims();
    predict_loop(&network, rows, cols);
    ExitCode::SUCCESS
}
