use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use surfacefx::{
    BlendMode, ColorMatrix, ColorSpace, CompositeOp, FilterChain, PixelBuffer, blend_into_source,
    color_transform_in_place, composite_arithmetic_into_source, composite_into_source,
    gaussian_blur_in_place, load_image, luminance_to_alpha_in_place, output_file_name, save_image,
};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

#[derive(Parser, Debug)]
#[command(name = "surfacefx", version, about = "Filter and composite images")]
struct Cli {
    /// More log output (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blend <input1> over <input2>.
    Blend {
        input1: PathBuf,
        input2: PathBuf,
        /// One of: normal, multiply, screen, overlay, darken, lighten, color-dodge, color-burn,
        /// hard-light, soft-light, difference, exclusion.
        mode: BlendMode,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Porter-Duff composite of <input1> with <input2>.
    Composite {
        input1: PathBuf,
        input2: PathBuf,
        /// One of: over, in, out, atop, xor.
        op: CompositeOp,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// k1*i1*i2 + k2*i1 + k3*i2 + k4, per channel.
    Arithmetic {
        input1: PathBuf,
        input2: PathBuf,
        #[arg(allow_negative_numbers = true)]
        k1: f32,
        #[arg(allow_negative_numbers = true)]
        k2: f32,
        #[arg(allow_negative_numbers = true)]
        k3: f32,
        #[arg(allow_negative_numbers = true)]
        k4: f32,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Gaussian blur; the vertical deviation defaults to the horizontal one.
    Blur {
        input: PathBuf,
        std_dev_x: f32,
        std_dev_y: Option<f32>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Scale color (1 keeps the image).
    Brightness(AmountArgs),
    /// Scale color around mid-gray (1 keeps the image).
    Contrast(AmountArgs),
    /// Desaturate toward luma (0 keeps the image).
    Grayscale(AmountArgs),
    /// Invert color (0 keeps the image).
    Invert(AmountArgs),
    /// Scale alpha (1 keeps the image).
    Opacity(AmountArgs),
    /// Scale saturation (1 keeps the image).
    Saturate(AmountArgs),
    /// Tone toward sepia (0 keeps the image).
    Sepia(AmountArgs),
    /// Rotate hue by an angle in degrees.
    HueRotate {
        input: PathBuf,
        #[arg(allow_negative_numbers = true)]
        angle: f32,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Replace alpha with luma and clear color.
    LuminanceToAlpha {
        input: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Apply a JSON filter chain.
    Chain {
        input: PathBuf,
        /// Filter chain JSON, e.g. {"filters": [{"op": "sepia", "amount": 1}]}.
        #[arg(long)]
        config: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
struct AmountArgs {
    input: PathBuf,
    #[arg(allow_negative_numbers = true)]
    amount: f32,
    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output path. Defaults to `<input>[-<input2>]-<effect>.<png|jpg>` in the working directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Filter encoded sRGB values directly instead of linear light.
    #[arg(long)]
    no_linearize: bool,
}

impl OutputArgs {
    fn space(&self) -> ColorSpace {
        if self.no_linearize {
            ColorSpace::Srgb
        } else {
            ColorSpace::LinearRgb
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.cmd {
        Command::Blend {
            input1,
            input2,
            mode,
            output,
        } => run_binary(&input1, &input2, &format!("blend-{mode}"), &output, |dst, src| {
            blend_into_source(&mut dst.surface_mut(), &src.surface(), mode);
        }),
        Command::Composite {
            input1,
            input2,
            op,
            output,
        } => run_binary(&input1, &input2, &format!("composite-{op}"), &output, |dst, src| {
            composite_into_source(&mut dst.surface_mut(), &src.surface(), op);
        }),
        Command::Arithmetic {
            input1,
            input2,
            k1,
            k2,
            k3,
            k4,
            output,
        } => {
            let k = surfacefx::Arithmetic::new(k1, k2, k3, k4);
            let tag = format!("arithmetic-{k1}-{k2}-{k3}-{k4}");
            run_binary(&input1, &input2, &tag, &output, |dst, src| {
                composite_arithmetic_into_source(&mut dst.surface_mut(), &src.surface(), k);
            })
        }
        Command::Blur {
            input,
            std_dev_x,
            std_dev_y,
            output,
        } => {
            let std_dev_y = std_dev_y.unwrap_or(std_dev_x);
            if !(std_dev_x >= 0.0 && std_dev_y >= 0.0) {
                anyhow::bail!("blur deviations must be >= 0, got ({std_dev_x}, {std_dev_y})");
            }
            let tag = format!("blur-{std_dev_x}-{std_dev_y}");
            run_unary(&input, &tag, &output, |buf| {
                gaussian_blur_in_place(&mut buf.surface_mut(), std_dev_x, std_dev_y);
            })
        }
        Command::Brightness(a) => run_matrix(a, "brightness", ColorMatrix::brightness),
        Command::Contrast(a) => run_matrix(a, "contrast", ColorMatrix::contrast),
        Command::Grayscale(a) => run_matrix(a, "grayscale", ColorMatrix::grayscale),
        Command::Invert(a) => run_matrix(a, "invert", ColorMatrix::invert),
        Command::Opacity(a) => run_matrix(a, "opacity", ColorMatrix::opacity),
        Command::Saturate(a) => run_matrix(a, "saturate", ColorMatrix::saturate),
        Command::Sepia(a) => run_matrix(a, "sepia", ColorMatrix::sepia),
        Command::HueRotate {
            input,
            angle,
            output,
        } => run_matrix(
            AmountArgs {
                input,
                amount: angle,
                output,
            },
            "hue-rotate",
            ColorMatrix::hue_rotate,
        ),
        Command::LuminanceToAlpha { input, output } => {
            run_unary(&input, "luminance-to-alpha", &output, |buf| {
                luminance_to_alpha_in_place(&mut buf.surface_mut());
            })
        }
        Command::Chain {
            input,
            config,
            output,
        } => {
            let chain = FilterChain::from_path(&config)
                .with_context(|| format!("load filter chain '{}'", config.display()))?;
            let stem = config
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "chain".to_string());
            run_unary(&input, &format!("chain-{stem}"), &output, |buf| {
                chain.apply_in_place(&mut buf.surface_mut());
            })
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load(path: &Path, space: ColorSpace) -> anyhow::Result<PixelBuffer> {
    load_image(path, space).with_context(|| format!("load input '{}'", path.display()))
}

fn run_matrix(args: AmountArgs, name: &str, preset: fn(f32) -> ColorMatrix) -> anyhow::Result<()> {
    let matrix = preset(args.amount);
    let tag = format!("{name}-{}", args.amount);
    run_unary(&args.input, &tag, &args.output, |buf| {
        color_transform_in_place(&mut buf.surface_mut(), &matrix);
    })
}

fn run_unary(
    input: &Path,
    tag: &str,
    output: &OutputArgs,
    apply: impl FnOnce(&mut PixelBuffer),
) -> anyhow::Result<()> {
    let space = output.space();
    let mut buf = load(input, space)?;
    apply(&mut buf);
    let out = output
        .out
        .clone()
        .unwrap_or_else(|| output_file_name(input, None, tag, buf.has_transparency()));
    write(&buf, &out, space)
}

/// The result lands in the first input's buffer, then gets written out.
fn run_binary(
    input1: &Path,
    input2: &Path,
    tag: &str,
    output: &OutputArgs,
    apply: impl FnOnce(&mut PixelBuffer, &PixelBuffer),
) -> anyhow::Result<()> {
    let space = output.space();
    let mut first = load(input1, space)?;
    let second = load(input2, space)?;
    if first.extent() != second.extent() {
        tracing::warn!(
            first = ?first.extent(),
            second = ?second.extent(),
            "input sizes differ; only the common top-left region is combined"
        );
    }
    apply(&mut first, &second);
    let out = output.out.clone().unwrap_or_else(|| {
        output_file_name(input1, Some(input2), tag, first.has_transparency())
    });
    write(&first, &out, space)
}

fn write(buf: &PixelBuffer, out: &Path, space: ColorSpace) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let written = save_image(buf, out, space)
        .with_context(|| format!("write output '{}'", out.display()))?;
    eprintln!("wrote {}", written.display());
    Ok(())
}
