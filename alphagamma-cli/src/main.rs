use alphagamma::{
    pack_descriptor_set, DescriptorLayout, DistanceConfig, DistanceEngine, DistanceMatrix,
    FieldWeighting, OwnedDescriptorSet, Weights,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "AlphaGamma CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for performance profiling.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum KernelConfig {
    #[default]
    Reference,
    Packed,
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum EncodingConfig {
    #[default]
    Unpacked,
    Packed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum WeightingConfig {
    Separate,
    Merged,
}

impl From<WeightingConfig> for FieldWeighting {
    fn from(value: WeightingConfig) -> Self {
        match value {
            WeightingConfig::Separate => FieldWeighting::Separate,
            WeightingConfig::Merged => FieldWeighting::Merged,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct WeightsJson {
    a: f64,
    b: f64,
    g: f64,
}

impl Default for WeightsJson {
    fn default() -> Self {
        let w = Weights::default();
        Self {
            a: w.alpha,
            b: w.beta,
            g: w.gamma,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct Config {
    desc1_path: String,
    desc2_path: String,
    output_path: Option<String>,
    num_circles: usize,
    num_rays: usize,
    kernel: KernelConfig,
    input_encoding: EncodingConfig,
    weights: WeightsJson,
    weighting: Option<WeightingConfig>,
    parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            desc1_path: String::new(),
            desc2_path: String::new(),
            output_path: None,
            num_circles: 0,
            num_rays: 0,
            kernel: KernelConfig::default(),
            input_encoding: EncodingConfig::default(),
            weights: WeightsJson::default(),
            weighting: None,
            parallel: false,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    rows: usize,
    cols: usize,
    distances: Vec<Vec<f64>>,
}

impl From<&DistanceMatrix> for Output {
    fn from(value: &DistanceMatrix) -> Self {
        Self {
            rows: value.rows(),
            cols: value.cols(),
            distances: (0..value.rows())
                .filter_map(|j| value.row(j).map(<[f64]>::to_vec))
                .collect(),
        }
    }
}

fn load_descriptors(path: &Path) -> Result<OwnedDescriptorSet, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let descriptors: Vec<Vec<u8>> = serde_json::from_str(&text)?;
    Ok(OwnedDescriptorSet::from_descriptors(descriptors)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("alphagamma=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.desc1_path.is_empty() || config.desc2_path.is_empty() {
        return Err("desc1_path and desc2_path must be set in the config".into());
    }
    if config.kernel == KernelConfig::Reference && config.input_encoding == EncodingConfig::Packed
    {
        return Err("the reference kernel needs unpacked descriptors".into());
    }

    let layout = DescriptorLayout::new(config.num_circles, config.num_rays)?;
    let engine = DistanceEngine::new(layout).with_config(DistanceConfig {
        weights: Weights::new(config.weights.a, config.weights.b, config.weights.g),
        weighting: config.weighting.map(FieldWeighting::from),
        parallel: config.parallel,
    });
    engine.config().validate()?;

    let mut desc1 = load_descriptors(Path::new(&config.desc1_path))?;
    let mut desc2 = load_descriptors(Path::new(&config.desc2_path))?;

    let matrix = match config.kernel {
        KernelConfig::Reference => engine.reference_distances(desc1.view(), desc2.view())?,
        KernelConfig::Packed => {
            if config.input_encoding == EncodingConfig::Unpacked {
                desc1 = pack_descriptor_set(desc1.view(), &layout)?;
                desc2 = pack_descriptor_set(desc2.view(), &layout)?;
            }
            engine.packed_distances(desc1.view(), desc2.view())?
        }
    };

    let output = Output::from(&matrix);
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
