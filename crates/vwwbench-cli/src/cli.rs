use clap::{Args, Parser, Subcommand, ValueEnum};
use vwwbench_runtime::InputPolicy;

#[derive(Parser, Debug)]
#[command(name = "vwwbench", version, about = "On-device latency bench for VWW model variants")]
pub struct Cli {
    /// Log level (RUST_LOG wins when set)
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Time every variant and print the average latency table
    Run {
        #[command(flatten)]
        models: ModelArgs,

        /// Measured calls per variant
        #[arg(long, default_value_t = 500)]
        iterations: usize,

        /// Discarded calls per variant before measuring
        #[arg(long, default_value_t = 5)]
        warmup: usize,

        /// How the benchmark input is handed to each call
        #[arg(long, value_enum, default_value_t = InputPolicyArg::Shared)]
        input_policy: InputPolicyArg,

        /// Number of back-to-back runs on the same loaded models
        #[arg(long, default_value_t = 1)]
        repeat: usize,

        /// Also write the last report as JSON
        #[arg(long)]
        json: Option<std::path::PathBuf>,
    },
    /// Load every variant and print its input/output specs
    Inspect {
        #[command(flatten)]
        models: ModelArgs,
    },
}

#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Directory holding the default variant files
    #[arg(long, default_value = "models")]
    pub model_dir: std::path::PathBuf,

    /// Variant as NAME=PATH; repeat to replace the default set
    #[arg(long = "variant", value_name = "NAME=PATH")]
    pub variants: Vec<String>,

    /// Device for inference (cpu, cuda:N or coreml)
    #[arg(long, default_value = "cpu")]
    pub device: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum InputPolicyArg {
    Shared,
    Fresh,
}

impl From<InputPolicyArg> for InputPolicy {
    fn from(arg: InputPolicyArg) -> Self {
        match arg {
            InputPolicyArg::Shared => InputPolicy::Shared,
            InputPolicyArg::Fresh => InputPolicy::FreshPerCall,
        }
    }
}
