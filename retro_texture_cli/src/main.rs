use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
    str::FromStr,
    time::Instant,
};

use anyhow::Context;
use clap::Parser;
use rayon::prelude::*;
use retro_texture::{PixelFormat, Surface, Tiling};
use strum::IntoEnumIterator;
use tracing::{error, info};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about = "Convert raw texture data to PNG or DDS", long_about = None)]
struct Args {
    /// The files containing raw texture data
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// The pixel format like rgb565, etc1a4, or dxt1
    #[arg(short, long, value_parser = parse_name::<PixelFormat>)]
    format: PixelFormat,

    /// The width of the image in pixels
    #[arg(short = 'W', long)]
    width: u32,

    /// The height of the image in pixels
    #[arg(short = 'H', long)]
    height: u32,

    /// The memory layout of the data: linear, ctr, or gx
    #[arg(short, long, default_value = "ctr", value_parser = parse_name::<Tiling>)]
    tiling: Tiling,

    /// The number of header bytes to skip in each file
    #[arg(long, default_value_t = 0)]
    offset: usize,

    /// The folder for converted files instead of the input folder
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Save DDS files instead of PNG files
    #[arg(long)]
    dds: bool,

    /// The maximum number of files to convert at once
    #[arg(short, long)]
    jobs: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let args = Args::parse();

    if let Some(output_dir) = &args.output_dir {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {output_dir:?}"))?;
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(jobs) = args.jobs {
        builder = builder.num_threads(jobs);
    }
    let pool = builder.build()?;

    let start = Instant::now();

    // Each file is independent, so a failure shouldn't stop the other conversions.
    let failed = pool.install(|| {
        args.files
            .par_iter()
            .filter(|path| match convert(path, &args) {
                Ok(output) => {
                    info!("{path:?} -> {output:?}");
                    false
                }
                Err(e) => {
                    error!("failed to convert {path:?}: {e:?}");
                    true
                }
            })
            .count()
    });

    info!(
        "converted {} of {} files in {:?}",
        args.files.len() - failed,
        args.files.len(),
        start.elapsed()
    );

    if failed > 0 {
        anyhow::bail!("{failed} of {} files failed to convert", args.files.len());
    }

    Ok(())
}

// Case insensitive names with the supported values listed on error.
fn parse_name<T>(name: &str) -> Result<T, String>
where
    T: FromStr + IntoEnumIterator + std::fmt::Display,
{
    T::from_str(name).map_err(|_| {
        let names: Vec<_> = T::iter().map(|v| v.to_string().to_lowercase()).collect();
        format!("expected one of {}", names.join(", "))
    })
}

fn convert(path: &Path, args: &Args) -> anyhow::Result<PathBuf> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {path:?}"))?;
    let data = bytes.get(args.offset..).with_context(|| {
        format!(
            "offset {} is past the end of the {} byte file",
            args.offset,
            bytes.len()
        )
    })?;

    let surface = Surface {
        width: args.width,
        height: args.height,
        image_format: args.format,
        tiling: args.tiling,
        data,
    };

    let extension = if args.dds { "dds" } else { "png" };
    let output = output_path(path, args.output_dir.as_deref(), extension);

    if args.dds {
        let dds = surface.to_dds()?;
        let mut writer = BufWriter::new(
            File::create(&output).with_context(|| format!("failed to create {output:?}"))?,
        );
        dds.write(&mut writer)?;
    } else {
        let image = surface.to_image()?;
        image
            .save(&output)
            .with_context(|| format!("failed to save {output:?}"))?;
    }

    Ok(output)
}

fn output_path(input: &Path, output_dir: Option<&Path>, extension: &str) -> PathBuf {
    let output = input.with_extension(extension);
    match (output_dir, output.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => output,
    }
}
