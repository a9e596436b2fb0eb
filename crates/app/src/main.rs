//! rastercodec: command-line front end for the bitmap codec.
//!
//! Dispatches one command per run:
//! - `info`: print the header of a bitmap
//! - `roundtrip`: compress and decompress a pixel buffer, report metrics,
//!   save the decoded image
//! - `hide` / `extract`: nibble steganography between two bitmaps
//! - `sample`: write a generated test image
//!
//! Outputs land under `--out` (default `./output`):
//! `bitmap/` for round-trips and samples, `steganography/code/` for hidden
//! images and `steganography/decode/` for extracted ones.

mod config;
mod input_gen;
mod logger;

use std::path::Path;
use std::time::Instant;

use config::{Command, Config};
use log::{error, info};
use rastercodec_core::framing::{compress_framed, decompress_framed};
use rastercodec_core::{stego, CodecMetrics, Error, RasterImage, Result};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    };

    logger::init(config.log_level);

    if config.print_config {
        config.print();
    }

    if let Err(e) = run(&config) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    match config.command {
        Command::Info => info_command(config),
        Command::Roundtrip => roundtrip_command(config),
        Command::Hide => hide_command(config),
        Command::Extract => extract_command(config),
        Command::Sample => sample_command(config),
    }
}

/// File stem of `path`, or `fallback` when there is none.
fn stem(path: &Path, fallback: &str) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| fallback.to_string())
}

/// Load `--in`, or generate a sample when no input was given.
fn input_image(config: &Config) -> Result<(RasterImage, String)> {
    match &config.input_file {
        Some(path) => Ok((RasterImage::load(path)?, stem(path, "image"))),
        None => {
            info!(
                "no input given, generating {}x{} sample (seed {})",
                config.width, config.height, config.seed
            );
            let image = input_gen::generate_sample_image(config.seed, config.width, config.height)?;
            Ok((image, format!("sample_{}", config.seed)))
        }
    }
}

fn info_command(config: &Config) -> Result<()> {
    let (image, name) = input_image(config)?;
    let header = image.header();

    println!("=== {name} ===");
    println!("File size:      {} bytes", header.file_size);
    println!("Data offset:    {}", header.data_offset);
    println!("Info size:      {}", header.info_size);
    println!("Dimensions:     {}x{}", header.width, header.height);
    println!("Planes:         {}", header.planes);
    println!("Bits per pixel: {}", header.bits_per_pixel);
    println!("Stride:         {} bytes", image.stride());
    println!("Pixel bytes:    {}", image.pixel_bytes().len());
    Ok(())
}

fn roundtrip_command(config: &Config) -> Result<()> {
    let (mut image, name) = input_image(config)?;
    let raw = image.pixel_bytes().to_vec();
    let mut metrics = CodecMetrics::new();

    let restored = if config.framed {
        let started = Instant::now();
        let (frame, tree) = compress_framed(&raw)?;
        metrics.compress_time = started.elapsed();
        metrics.record_tree(&raw, &tree);
        metrics.compressed_bytes = frame.len() as u64;

        let started = Instant::now();
        let decoded = decompress_framed(&frame, &tree)?;
        metrics.decompress_time = started.elapsed();
        metrics.record_decoded(&raw, &decoded);

        RasterImage::from_bytes(&[image.header_bytes(), decoded.as_slice()].concat())?
    } else {
        let started = Instant::now();
        let tree = image.compress()?;
        metrics.compress_time = started.elapsed();
        metrics.record_tree(&raw, &tree);
        metrics.compressed_bytes = image.pixel_bytes().len() as u64;

        let started = Instant::now();
        image.decompress(&tree)?;
        metrics.decompress_time = started.elapsed();
        metrics.record_decoded(&raw, image.pixel_bytes());

        image
    };
    metrics.complete();

    if config.print_metrics {
        metrics.print_summary();
    }

    let path = restored.save(
        &format!("{name}_Compressed_Decompressed"),
        config.output_dir.join("bitmap"),
    )?;
    info!("saved {}", path.display());

    if metrics.prefix_matches {
        println!("✓ Round-trip verified ({} bytes)", metrics.raw_bytes);
    } else {
        println!("✗ Round-trip mismatch");
    }
    Ok(())
}

fn hide_command(config: &Config) -> Result<()> {
    let (Some(cover_path), Some(secret_path)) = (&config.cover_file, &config.secret_file) else {
        return Err(Error::InvalidArgument("hide requires --cover and --secret".into()));
    };

    let cover = RasterImage::load(cover_path)?;
    let secret = RasterImage::load(secret_path)?;
    let stego_image = stego::hide(&cover, &secret)?;

    let name = format!(
        "{}_hidden_{}",
        stem(cover_path, "cover"),
        stem(secret_path, "secret")
    );
    let directory = config.output_dir.join("steganography").join("code");
    let path = stego_image.save(&name, directory)?;
    println!("✓ Hidden image written to {}", path.display());
    Ok(())
}

fn extract_command(config: &Config) -> Result<()> {
    let (stego_image, name) = input_image(config)?;
    let recovered = stego::extract(&stego_image)?;

    // "<cover>_hidden_<secret>" yields "<secret>_extracted"
    let base = name.rsplit('_').next().unwrap_or(&name);
    let path = recovered.save(
        &format!("{base}_extracted"),
        config.output_dir.join("steganography").join("decode"),
    )?;
    println!("✓ Extracted image written to {}", path.display());
    Ok(())
}

fn sample_command(config: &Config) -> Result<()> {
    let image = input_gen::generate_sample_image(config.seed, config.width, config.height)?;
    let name = format!("sample_{}", config.seed);
    let path = image.save(&name, config.output_dir.join("bitmap"))?;
    println!("✓ Sample written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rastercodec_core::Pixel;
    use std::path::PathBuf;

    fn config_for(command: &str, dir: &Path, extra: &[&str]) -> Config {
        let mut args = vec![
            command.to_string(),
            "--out".to_string(),
            dir.display().to_string(),
            "--seed".to_string(),
            "3".to_string(),
            "--width".to_string(),
            "20".to_string(),
            "--height".to_string(),
            "40".to_string(),
            "--no-metrics".to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Config::from_args(&args).unwrap()
    }

    #[test]
    fn test_roundtrip_generated_sample() {
        let dir = tempfile::tempdir().unwrap();
        for extra in [&[][..], &["--framed"][..]] {
            run(&config_for("roundtrip", dir.path(), extra)).unwrap();

            let saved = dir.path().join("bitmap").join("sample_3_Compressed_Decompressed.bmp");
            let loaded = RasterImage::load(&saved).unwrap();
            let expected = input_gen::generate_sample_image(3, 20, 40).unwrap();
            assert_eq!(loaded.pixel_bytes(), expected.pixel_bytes());
        }
    }

    #[test]
    fn test_hide_then_extract() {
        let dir = tempfile::tempdir().unwrap();
        let mut cover = RasterImage::new(4, 4).unwrap();
        cover.set(0, 0, Pixel::new(0xFF, 0xFF, 0xFF)).unwrap();
        let mut secret = RasterImage::new(2, 2).unwrap();
        secret.set(0, 0, Pixel::new(0xAB, 0xCD, 0xEF)).unwrap();
        cover.save("photo", dir.path()).unwrap();
        secret.save("logo", dir.path()).unwrap();

        let cover_arg = dir.path().join("photo.bmp").display().to_string();
        let secret_arg = dir.path().join("logo.bmp").display().to_string();
        let hide_args = ["--cover", cover_arg.as_str(), "--secret", secret_arg.as_str()];
        run(&config_for("hide", dir.path(), &hide_args)).unwrap();

        let hidden: PathBuf = dir.path().join("steganography/code/photo_hidden_logo.bmp");
        assert_eq!(
            RasterImage::load(&hidden).unwrap().get(0, 0).unwrap(),
            Pixel::new(0xFA, 0xFC, 0xFE)
        );

        let hidden_arg = hidden.display().to_string();
        run(&config_for("extract", dir.path(), &["--in", &hidden_arg])).unwrap();
        let extracted = dir.path().join("steganography/decode/logo_extracted.bmp");
        assert_eq!(
            RasterImage::load(&extracted).unwrap().get(0, 0).unwrap(),
            Pixel::new(0xA0, 0xC0, 0xE0)
        );
    }

    #[test]
    fn test_sample_and_info() {
        let dir = tempfile::tempdir().unwrap();
        run(&config_for("sample", dir.path(), &[])).unwrap();

        let sample = dir.path().join("bitmap").join("sample_3.bmp").display().to_string();
        run(&config_for("info", dir.path(), &["--in", &sample])).unwrap();
    }
}
