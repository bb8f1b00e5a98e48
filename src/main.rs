use std::fs;
use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use simplelog::{Config, LevelFilter, SimpleLogger};

use dfuse_pack::{DfuseConfig, Error, SuffixCrc};

#[derive(Parser)]
#[command(name = "dfuse-pack", version, about = "Create a DfuSe image from a raw firmware binary")]
struct Args {
    /// Source firmware image (.bin, or .hex/.ihex for Intel HEX)
    input: PathBuf,

    /// Target .dfu path (defaults to the input path with a .dfu extension)
    output: Option<PathBuf>,

    /// Load address for the image
    #[arg(long, default_value = "0x08000000", value_parser = parse_u32)]
    address: u32,

    /// String stored in the DfuSe target header
    #[arg(long, default_value = "Firmware", conflicts_with_all = ["preset", "unnamed"])]
    target_name: String,

    /// Use a built-in chip family memory layout as the target descriptor
    #[arg(long, conflicts_with = "unnamed")]
    preset: Option<String>,

    /// Emit an unnamed target (all-zero name field)
    #[arg(long)]
    unnamed: bool,

    /// USB vendor identifier stored in the suffix
    #[arg(long, default_value = "0x0483", value_parser = parse_u16)]
    vendor_id: u16,

    /// USB product identifier stored in the suffix
    #[arg(long, default_value = "0xDF11", value_parser = parse_u16)]
    product_id: u16,

    /// USB device release number stored in the suffix
    #[arg(long, default_value = "0xFFFF", value_parser = parse_u16)]
    device_id: u16,

    /// DFU specification version stored in the suffix
    #[arg(long, default_value = "0x011A", value_parser = parse_u16)]
    dfu_version: u16,

    /// Store the uncomplemented CRC32 in the suffix
    #[arg(long)]
    raw_crc: bool,

    /// Byte used to fill gaps between Intel HEX records
    #[arg(long, default_value = "0xFF", value_parser = parse_u8)]
    gap_fill: u8,

    /// Enable verbose logs
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = run(args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> dfuse_pack::Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::init(level, Config::default());

    let image = dfuse_pack::load_image(&args.input, args.gap_fill)?;
    info!("loaded {} ({} bytes)", args.input.display(), image.data.len());
    if let Some(start) = image.start_address {
        if start != args.address {
            warn!(
                "hex data starts at {:#010x} but the element address is {:#010x}",
                start, args.address
            );
        }
    }

    let mut config = DfuseConfig::new()
        .with_base_address(args.address)
        .with_vendor_id(args.vendor_id)
        .with_product_id(args.product_id)
        .with_device_id(args.device_id)
        .with_dfu_version(args.dfu_version);
    if args.raw_crc {
        config = config.with_suffix_crc(SuffixCrc::Raw);
    }
    config = if args.unnamed {
        config.unnamed()
    } else if let Some(key) = &args.preset {
        let preset =
            dfuse_pack::find_preset(key).ok_or_else(|| Error::UnknownPreset(key.clone()))?;
        config.with_target_name(preset.descriptor()?)
    } else {
        config.with_target_name(args.target_name)
    };

    let container = dfuse_pack::build_container(&image.data, &config)?;

    let output = args
        .output
        .unwrap_or_else(|| args.input.with_extension("dfu"));
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(&output, &container)?;
    info!("wrote {} ({} bytes)", output.display(), container.len());
    Ok(())
}

fn parse_u32(value: &str) -> Result<u32, String> {
    parse_int(value)
}

fn parse_u16(value: &str) -> Result<u16, String> {
    parse_int(value)
}

fn parse_u8(value: &str) -> Result<u8, String> {
    parse_int(value)
}

/// Accepts decimal or `0x`-prefixed hexadecimal numbers.
fn parse_int<T: TryFrom<u64>>(value: &str) -> Result<T, String> {
    let trimmed = value.trim();
    let parsed = if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16)
    } else {
        trimmed.parse::<u64>()
    };
    parsed
        .ok()
        .and_then(|wide| T::try_from(wide).ok())
        .ok_or_else(|| format!("invalid number '{value}'"))
}
